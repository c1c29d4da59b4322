/// +----------------------------------------------------------+
/// | MODULES                                                  |
/// +----------+-------+-------+------------------------------+
/// | Exports:                                                 |
/// |   - commands                                             |
/// |   - csv_loader                                           |
/// |   - dtos                                                 |
/// |   - inbound_error                                        |
/// +----------------------------------------------------------+

/// Interactive order-entry commands.
pub mod commands;

/// Bulk loading of orders from CSV files.
pub mod csv_loader;

/// Flat input records and their conversion into order requests.
pub mod dtos;

/// Error types for the inbound layer.
pub mod inbound_error;

pub use self::commands::{Command, CommandOutcome, OrderEntry};
pub use self::csv_loader::{
    LoadSummary, load_orders, load_orders_from_path, load_records, load_sample,
};
pub use self::dtos::OrderRecord;
pub use self::inbound_error::{CommandError, LoadError};
