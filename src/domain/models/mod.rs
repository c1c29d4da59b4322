/// Core value types: orders, trades, sides and id aliases.
pub mod types;
