// Expose the modules
pub mod config;
pub mod domain;
pub mod inbounds;
pub mod outbounds;
pub mod session;

// Re-export key types for easier usage
pub use config::Config;
pub use domain::models::types::{
    Order, OrderId, OrderRequest, Price, Side, Size, Trade, TradeId, UserId,
};
pub use domain::services::matching_engine::{
    AddOrderResult, LevelChange, MatchingEngine, MatchingError, MatchingResult,
    SharedMatchingEngine, validate_order,
};
pub use domain::services::orderbook::{
    CumulativeLevel, DepthSnapshot, Direction, LevelSnapshot, OrderStore, PriceIndex, PriceLevel,
};
pub use inbounds::{LoadError, LoadSummary, OrderRecord, load_orders, load_orders_from_path};
