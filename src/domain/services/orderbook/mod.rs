pub mod depth;
pub mod order_store;
pub mod price_index;
pub mod price_level;

pub use depth::{CumulativeLevel, DepthSnapshot, LevelSnapshot};
pub use order_store::{OrderKey, OrderStore};
pub use price_index::{Direction, PriceIndex};
pub use price_level::{LevelOrders, PriceLevel};
