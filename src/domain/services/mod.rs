/// Order-carrying structures: price index, price levels and the order arena.
pub mod orderbook;

/// The matching engine and its thread-safe handle.
pub mod matching_engine;
