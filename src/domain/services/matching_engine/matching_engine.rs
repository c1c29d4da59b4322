//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the core matching engine logic for processing orders and generating trades.
// The matching engine follows price-time priority to ensure fair order execution.
//
// | Component                | Description                                               |
// |--------------------------|-----------------------------------------------------------|
// | MatchingEngine           | Owns both price indices, the order store and trade history|
// | AddOrderResult           | Trades and level changes produced by one add_order call   |
// | LevelChange              | New aggregate size of a touched level (0 = level removed) |
//
//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                    | Description                                       | Return Type       |
// |-------------------------|---------------------------------------------------|-------------------|
// | add_order               | Validate, match, and rest any remainder           | Result<AddOrder..>|
// | remove_order            | Cancel a resting order (unknown id is a no-op)    | Option<LevelChange>|
// | get_order_by_id         | Resting order lookup                              | Option<&Order>    |
// | get_trade_by_id         | Trade lookup                                      | Option<&Trade>    |
// | get_top_bid_levels      | Best bids, price descending                       | Vec<LevelSnapshot>|
// | get_top_ask_levels      | Best asks, price ascending                        | Vec<LevelSnapshot>|
// | get_recent_trades       | Most recent trades first                          | Vec<&Trade>       |
// | depth                   | Both sides with touch statistics                  | DepthSnapshot     |
//--------------------------------------------------------------------------------------------------

use std::cmp::min;
use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{MatchingError, MatchingResult};
use crate::domain::models::types::{Order, OrderRequest, Price, Side, Size, Trade, TradeId};
use crate::domain::services::orderbook::{
    DepthSnapshot, Direction, LevelSnapshot, OrderStore, PriceIndex, PriceLevel,
};

/// New aggregate size of a price level touched by an engine call.
///
/// A size of zero means the level no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelChange {
    pub side: Side,
    pub price: Price,
    pub size: Size,
}

impl LevelChange {
    #[inline]
    pub fn is_removal(&self) -> bool {
        self.size.is_zero()
    }
}

/// Represents the outcome of an `add_order` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOrderResult {
    /// Trades generated by this call, in execution order.
    pub trades: Vec<TradeId>,
    /// One entry per touched level, carrying its final size after the call.
    pub level_changes: Vec<LevelChange>,
}

impl AddOrderResult {
    fn record_level(&mut self, change: LevelChange) {
        match self
            .level_changes
            .iter_mut()
            .find(|existing| existing.side == change.side && existing.price == change.price)
        {
            Some(existing) => existing.size = change.size,
            None => self.level_changes.push(change),
        }
    }

    /// Final size reported for a level, if this call touched it.
    pub fn level_change(&self, side: Side, price: Price) -> Option<&LevelChange> {
        self.level_changes
            .iter()
            .find(|change| change.side == side && change.price == price)
    }
}

/// Checks a submission before any engine state is touched.
pub fn validate_order(request: &OrderRequest) -> MatchingResult<()> {
    if request.id.trim().is_empty() {
        return Err(MatchingError::InvalidOrder("order id is required".to_string()));
    }
    if request.user_id.trim().is_empty() {
        return Err(MatchingError::InvalidOrder("user id is required".to_string()));
    }
    if request.price <= Decimal::ZERO {
        return Err(MatchingError::InvalidOrder(format!(
            "price must be greater than zero, got {}",
            request.price
        )));
    }
    if request.size <= Decimal::ZERO {
        return Err(MatchingError::InvalidOrder(format!(
            "size must be greater than zero, got {}",
            request.size
        )));
    }
    Ok(())
}

/// The core matching engine responsible for processing orders and generating trades.
///
/// # Price-Time Priority
///
/// * Better prices are matched first (higher bids, lower asks)
/// * At the same price level, orders are matched in arrival order (FIFO)
/// * Trades execute at the resting order's price
///
/// The engine is single-threaded and does no locking of its own; wrap it in a
/// [`SharedMatchingEngine`](super::SharedMatchingEngine) to share it between threads.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    /// Bid levels keyed by price
    bids: PriceIndex<PriceLevel>,
    /// Ask levels keyed by price
    asks: PriceIndex<PriceLevel>,
    /// Owner of every resting order
    orders: OrderStore,
    /// Every trade ever executed, by id
    trades: HashMap<TradeId, Trade>,
    /// Trade ids in execution order
    trade_log: Vec<TradeId>,
    /// Sequence counter for assigning order priorities
    next_sequence_id: u64,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits the borrow of one side's index and the order store.
    #[inline]
    fn book_side_mut(&mut self, side: Side) -> (&mut PriceIndex<PriceLevel>, &mut OrderStore) {
        match side {
            Side::Bid => (&mut self.bids, &mut self.orders),
            Side::Ask => (&mut self.asks, &mut self.orders),
        }
    }

    #[inline]
    fn book_side(&self, side: Side) -> &PriceIndex<PriceLevel> {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Submits a limit order.
    ///
    /// The order is matched against the opposite side while prices cross; any
    /// remainder rests at the submitted price behind earlier orders at that price.
    /// Submitting an id that is already resting cancels the old order first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOrder` without touching the book when the submission fails
    /// validation.
    pub fn add_order(&mut self, request: OrderRequest) -> MatchingResult<AddOrderResult> {
        validate_order(&request)?;
        self.check_level_capacity(&request)?;

        let mut result = AddOrderResult::default();

        if let Some(change) = self.remove_order(&request.id) {
            debug!(order_id = %request.id, "replacing resting order");
            result.record_level(change);
        }

        self.next_sequence_id += 1;
        let mut order = Order::from_request(request, self.next_sequence_id);

        self.match_order(&mut order, &mut result);

        if !order.is_filled() {
            let change = self.rest_order(order);
            result.record_level(change);
        }

        Ok(result)
    }

    /// Rejects a request whose size would push the aggregate of its own level past `Decimal::MAX`.
    ///
    /// A resting order with the same id at that level is left out of the sum, since it is
    /// cancelled before the new one rests. Matching only touches the opposite side, so the
    /// level can only be smaller by the time any remainder rests.
    fn check_level_capacity(&self, request: &OrderRequest) -> MatchingResult<()> {
        let Some(level) = self.book_side(request.side).find(request.price) else {
            return Ok(());
        };
        let replaced = self
            .orders
            .get(&request.id)
            .filter(|order| order.side == request.side && order.price == request.price)
            .map_or(Decimal::ZERO, |order| order.remaining_size);

        match (level.total_size() - replaced).checked_add(request.size) {
            Some(_) => Ok(()),
            None => Err(MatchingError::InvalidOrder(format!(
                "size {} would overflow the {} level at {}",
                request.size, request.side, request.price
            ))),
        }
    }

    /// Crosses `order` against the opposite side until it is filled or no longer marketable.
    fn match_order(&mut self, order: &mut Order, result: &mut AddOrderResult) {
        let opposite = order.side.opposite();

        while order.remaining_size > Decimal::ZERO {
            let (index, store) = self.book_side_mut(opposite);

            let best_price = match opposite {
                Side::Ask => index.min(),
                Side::Bid => index.max(),
            };
            let Some(best_price) = best_price else {
                break;
            };
            let crosses = match order.side {
                Side::Bid => best_price <= order.price,
                Side::Ask => best_price >= order.price,
            };
            if !crosses {
                break;
            }
            let Some(level) = index.find_mut(best_price) else {
                break;
            };

            let (trade, resting_id) = match level.oldest_order(store) {
                Some(resting) => {
                    let size = min(order.remaining_size, resting.remaining_size);
                    let trade = match order.side {
                        Side::Bid => Trade::new(order, resting, resting.price, size),
                        Side::Ask => Trade::new(resting, order, resting.price, size),
                    };
                    (trade, resting.id.clone())
                }
                None => {
                    index.remove(best_price);
                    continue;
                }
            };

            let filled = level.fill_order(store, &resting_id, trade.size);
            if filled.is_zero() {
                break;
            }
            order.remaining_size -= filled;

            let level_size = level.total_size();
            let level_empty = level.is_empty();

            if let Some(key) = store.key_of(&resting_id) {
                if store.order(key).is_some_and(Order::is_filled) {
                    store.remove(key);
                    trace!(order_id = %resting_id, "resting order filled");
                }
            }
            if level_empty {
                index.remove(best_price);
            }

            result.record_level(LevelChange {
                side: opposite,
                price: best_price,
                size: level_size,
            });
            self.record_trade(trade, result);
        }
    }

    fn record_trade(&mut self, trade: Trade, result: &mut AddOrderResult) {
        debug!(
            trade_id = %trade.id,
            buy_order_id = %trade.buy_order_id,
            sell_order_id = %trade.sell_order_id,
            price = %trade.price,
            size = %trade.size,
            "trade executed"
        );
        result.trades.push(trade.id);
        self.trade_log.push(trade.id);
        self.trades.insert(trade.id, trade);
    }

    /// Places an unmatched remainder at the tail of its price level.
    fn rest_order(&mut self, order: Order) -> LevelChange {
        let (side, price) = (order.side, order.price);
        let id = order.id.clone();
        let (index, store) = self.book_side_mut(side);

        let key = store.insert(order);
        if !index.contains(price) {
            index.insert(price, PriceLevel::new(side, price));
        }
        let (linked, size) = match index.find_mut(price) {
            Some(level) => (level.add_order(store, &id), level.total_size()),
            None => (false, Decimal::ZERO),
        };
        if !linked {
            // Never leave an order registered without a level.
            store.remove(key);
            if size.is_zero() {
                index.remove(price);
            }
        }

        debug!(order_id = %id, side = %side, price = %price, level_size = %size, "order resting");
        LevelChange { side, price, size }
    }

    /// Cancels a resting order.
    ///
    /// Returns the new size of the order's level, or `None` (changing nothing)
    /// when no order with this id is resting.
    pub fn remove_order(&mut self, id: &str) -> Option<LevelChange> {
        let key = self.orders.key_of(id)?;
        let (side, price) = self.orders.order(key).map(|order| (order.side, order.price))?;
        let (index, store) = self.book_side_mut(side);

        let (emptied, size) = match index.find_mut(price) {
            Some(level) => (level.remove_order(store, id), level.total_size()),
            None => (false, Decimal::ZERO),
        };
        if emptied {
            index.remove(price);
        }
        if let Some(order) = store.remove(key) {
            debug!(
                order_id = %order.id,
                remaining_size = %order.remaining_size,
                "order cancelled"
            );
        }

        Some(LevelChange { side, price, size })
    }

    /// Looks up a resting order.
    pub fn get_order_by_id(&self, id: &str) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Looks up an executed trade.
    pub fn get_trade_by_id(&self, id: &TradeId) -> Option<&Trade> {
        self.trades.get(id)
    }

    /// Up to `k` best bid levels, highest price first.
    pub fn get_top_bid_levels(&self, k: usize) -> Vec<LevelSnapshot> {
        self.top_levels(Side::Bid, k)
    }

    /// Up to `k` best ask levels, lowest price first.
    pub fn get_top_ask_levels(&self, k: usize) -> Vec<LevelSnapshot> {
        self.top_levels(Side::Ask, k)
    }

    fn top_levels(&self, side: Side, k: usize) -> Vec<LevelSnapshot> {
        let direction = match side {
            Side::Bid => Direction::Descending,
            Side::Ask => Direction::Ascending,
        };
        self.book_side(side)
            .top_k(k, direction)
            .into_iter()
            .map(|(_, level)| LevelSnapshot::capture(level, &self.orders))
            .collect()
    }

    /// Snapshot of a single level, if any order rests at that price.
    pub fn get_level(&self, side: Side, price: Price) -> Option<LevelSnapshot> {
        self.book_side(side)
            .find(price)
            .map(|level| LevelSnapshot::capture(level, &self.orders))
    }

    /// Up to `k` trades, most recent first.
    pub fn get_recent_trades(&self, k: usize) -> Vec<&Trade> {
        self.trade_log
            .iter()
            .rev()
            .take(k)
            .filter_map(|id| self.trades.get(id))
            .collect()
    }

    /// Both sides of the book, `k` levels deep.
    pub fn depth(&self, k: usize) -> DepthSnapshot {
        DepthSnapshot::new(self.get_top_bid_levels(k), self.get_top_ask_levels(k))
    }

    /// Highest resting bid price.
    #[inline]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.max()
    }

    /// Lowest resting ask price.
    #[inline]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.min()
    }

    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask - bid),
            _ => None,
        }
    }

    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(bid + (ask - bid) / Decimal::TWO),
            _ => None,
        }
    }

    /// Number of resting orders.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Number of trades executed since the engine was created.
    #[inline]
    pub fn trade_count(&self) -> usize {
        self.trade_log.len()
    }

    /// Number of distinct price levels on one side.
    #[inline]
    pub fn level_count(&self, side: Side) -> usize {
        self.book_side(side).len()
    }
}
