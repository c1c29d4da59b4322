//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// A cloneable, thread-safe handle around a single MatchingEngine. Each public call takes the one
// engine-wide lock for its whole duration, so a matching loop can never interleave with another
// mutation. Query results are owned copies and stay valid after the lock is released.
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use parking_lot::Mutex;

use super::{AddOrderResult, LevelChange, MatchingEngine, MatchingResult};
use crate::domain::models::types::{Order, OrderRequest, Trade, TradeId};
use crate::domain::services::orderbook::{DepthSnapshot, LevelSnapshot};

/// Shared handle to one matching engine.
#[derive(Debug, Clone, Default)]
pub struct SharedMatchingEngine {
    inner: Arc<Mutex<MatchingEngine>>,
}

impl SharedMatchingEngine {
    pub fn new(engine: MatchingEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn add_order(&self, request: OrderRequest) -> MatchingResult<AddOrderResult> {
        self.inner.lock().add_order(request)
    }

    pub fn remove_order(&self, id: &str) -> Option<LevelChange> {
        self.inner.lock().remove_order(id)
    }

    pub fn get_order_by_id(&self, id: &str) -> Option<Order> {
        self.inner.lock().get_order_by_id(id).cloned()
    }

    pub fn get_trade_by_id(&self, id: &TradeId) -> Option<Trade> {
        self.inner.lock().get_trade_by_id(id).cloned()
    }

    pub fn get_top_bid_levels(&self, k: usize) -> Vec<LevelSnapshot> {
        self.inner.lock().get_top_bid_levels(k)
    }

    pub fn get_top_ask_levels(&self, k: usize) -> Vec<LevelSnapshot> {
        self.inner.lock().get_top_ask_levels(k)
    }

    pub fn get_recent_trades(&self, k: usize) -> Vec<Trade> {
        self.inner
            .lock()
            .get_recent_trades(k)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn depth(&self, k: usize) -> DepthSnapshot {
        self.inner.lock().depth(k)
    }

    /// Runs several reads against one consistent view of the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&MatchingEngine) -> R) -> R {
        f(&*self.inner.lock())
    }
}

impl From<MatchingEngine> for SharedMatchingEngine {
    fn from(engine: MatchingEngine) -> Self {
        Self::new(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::types::Side;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::thread;

    #[test]
    fn test_concurrent_submissions_keep_book_consistent() {
        let shared = SharedMatchingEngine::default();

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..50u32 {
                        let id = format!("w{worker}-{i}");
                        let price = Decimal::from(95 + (i % 10));
                        let request = if (worker + i) % 2 == 0 {
                            OrderRequest::buy(id, format!("user{worker}"), price, dec!(1))
                        } else {
                            OrderRequest::sell(id, format!("user{worker}"), price, dec!(1))
                        };
                        shared.add_order(request).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        shared.with_engine(|engine| {
            if let (Some(bid), Some(ask)) = (engine.best_bid(), engine.best_ask()) {
                assert!(bid < ask);
            }
            // 200 unit orders: every trade consumes one from each side.
            assert_eq!(engine.order_count() + 2 * engine.trade_count(), 200);
            for level in engine.get_top_bid_levels(usize::MAX) {
                let sum: Decimal = level.orders.iter().map(|o| o.remaining_size).sum();
                assert_eq!(level.total_size, sum);
                assert_eq!(level.side, Side::Bid);
            }
        });
    }

    #[test]
    fn test_snapshots_are_owned() {
        let shared = SharedMatchingEngine::new(MatchingEngine::new());
        shared.add_order(OrderRequest::sell("s1", "u", dec!(10), dec!(2))).unwrap();
        let before = shared.get_top_ask_levels(1);

        shared.add_order(OrderRequest::buy("b1", "u", dec!(10), dec!(2))).unwrap();

        assert_eq!(before[0].total_size, dec!(2));
        assert!(shared.get_top_ask_levels(1).is_empty());
        assert_eq!(shared.get_recent_trades(5).len(), 1);
        assert!(shared.get_order_by_id("s1").is_none());
    }
}
