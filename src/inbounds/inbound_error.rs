use std::path::PathBuf;

use thiserror::Error;

use crate::domain::services::matching_engine::MatchingError;

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Enums:                                                   |
/// |   - LoadError                                            |
/// |   - CommandError                                         |
/// +----------------------------------------------------------+

/// Reasons a bulk load is aborted.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The order file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid CSV.
    #[error("malformed order file: {0}")]
    Csv(#[from] csv::Error),

    /// A record was rejected by the engine; `line` counts data rows from 1.
    #[error("invalid order on line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: MatchingError,
    },
}

/// Reasons an order-entry command line cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid {name}: {value}")]
    InvalidArgument { name: &'static str, value: String },
}
