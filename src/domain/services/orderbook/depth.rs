//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Read-only snapshots of the order book handed to display collaborators. A snapshot is an owned
// copy: it never changes after creation and says nothing about later engine state.
//
// | Component         | Description                                                   |
// |-------------------|---------------------------------------------------------------|
// | LevelSnapshot     | One price level with its aggregate size and ordered orders    |
// | DepthSnapshot     | Best-first bid and ask levels with touch statistics           |
// | CumulativeLevel   | Running depth total walking away from the touch               |
//--------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order_store::OrderStore;
use super::price_level::PriceLevel;
use crate::domain::models::types::{Order, Price, Side, Size};

/// A price level as seen at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub side: Side,
    pub price: Price,
    /// Sum of the remaining sizes of `orders`.
    pub total_size: Size,
    /// Resting orders, oldest first.
    pub orders: Vec<Order>,
}

impl LevelSnapshot {
    pub(crate) fn capture(level: &PriceLevel, store: &OrderStore) -> Self {
        Self {
            side: level.side(),
            price: level.price(),
            total_size: level.total_size(),
            orders: level.orders(store).cloned().collect(),
        }
    }

    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

/// Depth at one price including every better level on the same side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeLevel {
    pub price: Price,
    pub size: Size,
    pub cumulative_size: Size,
}

/// Best-first view of both sides of the book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    /// Bid levels ordered by price descending (best bids first)
    pub bids: Vec<LevelSnapshot>,
    /// Ask levels ordered by price ascending (best asks first)
    pub asks: Vec<LevelSnapshot>,
    /// Timestamp when this snapshot was taken
    pub timestamp: DateTime<Utc>,
}

impl DepthSnapshot {
    pub fn new(bids: Vec<LevelSnapshot>, asks: Vec<LevelSnapshot>) -> Self {
        Self {
            bids,
            asks,
            timestamp: Utc::now(),
        }
    }

    /// Returns the best bid price if available
    #[inline]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|level| level.price)
    }

    /// Returns the best ask price if available
    #[inline]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|level| level.price)
    }

    /// Returns the current spread (best ask - best bid)
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Midpoint between the best bid and the best ask.
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(bid + (ask - bid) / Decimal::TWO),
            _ => None,
        }
    }

    pub fn levels(&self, side: Side) -> &[LevelSnapshot] {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Running size totals for one side, starting at the touch.
    ///
    /// Totals saturate at `Decimal::MAX` rather than overflow.
    pub fn cumulative(&self, side: Side) -> Vec<CumulativeLevel> {
        let mut running = Decimal::ZERO;
        self.levels(side)
            .iter()
            .map(|level| {
                running = running.saturating_add(level.total_size);
                CumulativeLevel {
                    price: level.price,
                    size: level.total_size,
                    cumulative_size: running,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(side: Side, price: Price, total_size: Size) -> LevelSnapshot {
        LevelSnapshot {
            side,
            price,
            total_size,
            orders: Vec::new(),
        }
    }

    #[test]
    fn test_empty_depth() {
        let depth = DepthSnapshot::new(Vec::new(), Vec::new());
        assert_eq!(depth.best_bid(), None);
        assert_eq!(depth.best_ask(), None);
        assert_eq!(depth.spread(), None);
        assert_eq!(depth.mid_price(), None);
        assert!(depth.cumulative(Side::Bid).is_empty());
    }

    #[test]
    fn test_touch_statistics() {
        let depth = DepthSnapshot::new(
            vec![level(Side::Bid, dec!(99), dec!(1)), level(Side::Bid, dec!(98), dec!(2))],
            vec![level(Side::Ask, dec!(100.5), dec!(3))],
        );
        assert_eq!(depth.best_bid(), Some(dec!(99)));
        assert_eq!(depth.best_ask(), Some(dec!(100.5)));
        assert_eq!(depth.spread(), Some(dec!(1.5)));
        assert_eq!(depth.mid_price(), Some(dec!(99.75)));
    }

    #[test]
    fn test_cumulative_depth() {
        let depth = DepthSnapshot::new(
            vec![
                level(Side::Bid, dec!(99), dec!(1)),
                level(Side::Bid, dec!(98), dec!(2)),
                level(Side::Bid, dec!(97), dec!(4)),
            ],
            Vec::new(),
        );
        let cumulative: Vec<Size> = depth
            .cumulative(Side::Bid)
            .iter()
            .map(|level| level.cumulative_size)
            .collect();
        assert_eq!(cumulative, vec![dec!(1), dec!(3), dec!(7)]);
    }
}
