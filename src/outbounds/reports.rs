//! Serializable reports for machine-readable output.
//!
//! These mirror the text renderings in [`super::render`] but keep prices and
//! sizes as decimal strings so no precision is lost in JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::types::{Price, Side, Size, Trade};
use crate::domain::services::orderbook::DepthSnapshot;
use crate::inbounds::LoadSummary;

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Structs:                                                 |
/// |   - LevelReport                                          |
/// |   - BookReport                                           |
/// |   - LoadReport                                           |
/// | Implementations:                                         |
/// |   - From<&DepthSnapshot> for BookReport                  |
/// | Functions:                                               |
/// |   - to_json                                              |
/// +----------------------------------------------------------+

/// One price level with its running total from the top of the book.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LevelReport {
    pub price: Price,
    pub size: Size,
    pub order_count: usize,
    pub cumulative_size: Size,
}

/// Both sides of the book, best level first.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookReport {
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    pub spread: Option<Price>,
    pub mid_price: Option<Price>,
    pub bids: Vec<LevelReport>,
    pub asks: Vec<LevelReport>,
    pub timestamp: DateTime<Utc>,
}

fn side_report(depth: &DepthSnapshot, side: Side) -> Vec<LevelReport> {
    depth
        .levels(side)
        .iter()
        .zip(depth.cumulative(side))
        .map(|(level, cumulative)| LevelReport {
            price: level.price,
            size: level.total_size,
            order_count: level.order_count(),
            cumulative_size: cumulative.cumulative_size,
        })
        .collect()
}

impl From<&DepthSnapshot> for BookReport {
    fn from(depth: &DepthSnapshot) -> Self {
        Self {
            best_bid: depth.best_bid(),
            best_ask: depth.best_ask(),
            spread: depth.spread(),
            mid_price: depth.mid_price(),
            bids: side_report(depth, Side::Bid),
            asks: side_report(depth, Side::Ask),
            timestamp: depth.timestamp,
        }
    }
}

/// Summary of a bulk load together with the resulting book.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub orders_loaded: usize,
    pub trades_executed: usize,
    pub resting_orders: usize,
    pub book: BookReport,
    pub recent_trades: Vec<Trade>,
}

impl LoadReport {
    pub fn new(summary: &LoadSummary, levels: usize, trades: usize) -> Self {
        let engine = &summary.engine;
        Self {
            orders_loaded: summary.orders_loaded,
            trades_executed: summary.trades_executed,
            resting_orders: engine.order_count(),
            book: BookReport::from(&engine.depth(levels)),
            recent_trades: engine.get_recent_trades(trades).into_iter().cloned().collect(),
        }
    }
}

/// Pretty-printed JSON for any report.
pub fn to_json<T: Serialize>(report: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::types::OrderRequest;
    use crate::domain::services::matching_engine::MatchingEngine;
    use rust_decimal_macros::dec;

    fn engine() -> MatchingEngine {
        let mut engine = MatchingEngine::new();
        engine.add_order(OrderRequest::sell("s1", "a", dec!(101), dec!(2))).unwrap();
        engine.add_order(OrderRequest::sell("s2", "a", dec!(102), dec!(3))).unwrap();
        engine.add_order(OrderRequest::buy("b1", "b", dec!(99), dec!(4))).unwrap();
        engine.add_order(OrderRequest::buy("b2", "b", dec!(99), dec!(1))).unwrap();
        engine
    }

    #[test]
    fn test_book_report_cumulates() {
        let report = BookReport::from(&engine().depth(5));

        assert_eq!(report.best_bid, Some(dec!(99)));
        assert_eq!(report.best_ask, Some(dec!(101)));
        assert_eq!(report.spread, Some(dec!(2)));
        assert_eq!(report.mid_price, Some(dec!(100)));
        assert_eq!(report.bids.len(), 1);
        assert_eq!(report.bids[0].order_count, 2);
        assert_eq!(report.bids[0].size, dec!(5));
        assert_eq!(report.asks[1].cumulative_size, dec!(5));
    }

    #[test]
    fn test_json_field_names() {
        let json = to_json(&BookReport::from(&engine().depth(5))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["bestBid"], "99");
        assert_eq!(value["asks"][0]["cumulativeSize"], "2");
        assert!(value["midPrice"].is_string());
    }

    #[test]
    fn test_empty_book_report() {
        let report = BookReport::from(&MatchingEngine::new().depth(5));
        assert!(report.best_bid.is_none());
        assert!(report.spread.is_none());
        assert!(report.asks.is_empty());
    }
}
