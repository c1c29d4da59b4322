use thiserror::Error;

pub mod matching_engine;
pub mod shared;

/// Re-export key types for convenience
pub use self::matching_engine::{AddOrderResult, LevelChange, MatchingEngine, validate_order};
pub use self::shared::SharedMatchingEngine;

/// Errors that can occur during matching engine operations.
///
/// Every error is raised before the engine changes any state. Unknown order
/// and trade ids are not errors: lookups return `None` and cancels are no-ops.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchingError {
    /// A required field is missing, or the price or size is not strictly positive.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

/// Type alias for Result with MatchingError
pub type MatchingResult<T> = Result<T, MatchingError>;
