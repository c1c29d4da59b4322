//--------------------------------------------------------------------------------------------------
// TEST MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Property tests. The price index is checked against a BTreeMap model; the engine is driven with
// random submissions and cancels and its book is checked for structural consistency after every
// call.
//--------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use avl_matching::{Direction, MatchingEngine, OrderRequest, PriceIndex, Side};

#[derive(Debug, Clone)]
enum IndexOp {
    Insert(u32, u32),
    Remove(u32),
}

fn index_op() -> impl Strategy<Value = IndexOp> {
    prop_oneof![
        (0u32..200, any::<u32>()).prop_map(|(p, v)| IndexOp::Insert(p, v)),
        (0u32..200).prop_map(IndexOp::Remove),
    ]
}

#[derive(Debug, Clone)]
enum EngineOp {
    Add {
        id: u8,
        side: Side,
        price: u32,
        size: u32,
    },
    Remove(u8),
}

fn engine_op() -> impl Strategy<Value = EngineOp> {
    prop_oneof![
        4 => (0u8..40, any::<bool>(), 95u32..106, 1u32..20).prop_map(
            |(id, bid, price, size)| EngineOp::Add {
                id,
                side: if bid { Side::Bid } else { Side::Ask },
                price,
                size,
            }
        ),
        1 => (0u8..40).prop_map(EngineOp::Remove),
    ]
}

fn assert_book_consistent(engine: &MatchingEngine) {
    let bids = engine.get_top_bid_levels(usize::MAX);
    let asks = engine.get_top_ask_levels(usize::MAX);

    for pair in bids.windows(2) {
        assert!(pair[0].price > pair[1].price, "bids not strictly descending");
    }
    for pair in asks.windows(2) {
        assert!(pair[0].price < pair[1].price, "asks not strictly ascending");
    }
    if let (Some(bid), Some(ask)) = (bids.first(), asks.first()) {
        assert!(bid.price < ask.price, "book left crossed");
    }

    let mut resting = 0;
    for (side, levels) in [(Side::Bid, &bids), (Side::Ask, &asks)] {
        for level in levels.iter() {
            assert!(!level.orders.is_empty(), "empty level kept in index");
            let sum: Decimal = level.orders.iter().map(|o| o.remaining_size).sum();
            assert_eq!(level.total_size, sum);
            for pair in level.orders.windows(2) {
                assert!(pair[0].sequence_id < pair[1].sequence_id, "level not in arrival order");
            }
            for order in &level.orders {
                assert_eq!(order.side, side);
                assert_eq!(order.price, level.price);
                assert!(order.remaining_size > Decimal::ZERO);
                assert!(order.remaining_size <= order.initial_size);
                assert_eq!(engine.get_order_by_id(&order.id), Some(order));
            }
            resting += level.orders.len();
        }
    }
    assert_eq!(resting, engine.order_count());
    assert_eq!(bids.len(), engine.level_count(Side::Bid));
    assert_eq!(asks.len(), engine.level_count(Side::Ask));
}

proptest! {
    #[test]
    fn prop_price_index_matches_model(ops in prop::collection::vec(index_op(), 1..300)) {
        let mut index = PriceIndex::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                IndexOp::Insert(price, value) => {
                    let price = Decimal::from(price);
                    prop_assert_eq!(index.insert(price, value), model.insert(price, value));
                }
                IndexOp::Remove(price) => {
                    let price = Decimal::from(price);
                    prop_assert_eq!(index.remove(price), model.remove(&price));
                }
            }
            prop_assert!(index.is_valid());
            prop_assert_eq!(index.len(), model.len());
        }

        prop_assert_eq!(index.min(), model.keys().next().copied());
        prop_assert_eq!(index.max(), model.keys().next_back().copied());

        let ascending: Vec<_> = index.iter().map(|(p, v)| (p, *v)).collect();
        let expected: Vec<_> = model.iter().map(|(p, v)| (*p, *v)).collect();
        prop_assert_eq!(ascending, expected);

        let top: Vec<_> = index
            .top_k(5, Direction::Descending)
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        let expected: Vec<_> = model.keys().rev().take(5).copied().collect();
        prop_assert_eq!(top, expected);
    }

    #[test]
    fn prop_engine_book_stays_consistent(ops in prop::collection::vec(engine_op(), 1..200)) {
        let mut engine = MatchingEngine::new();

        for op in ops {
            match op {
                EngineOp::Add { id, side, price, size } => {
                    let request = OrderRequest::new(
                        format!("o{id}"),
                        "trader",
                        side,
                        Decimal::from(price),
                        Decimal::from(size),
                    );
                    let limit = request.price;
                    let result = engine.add_order(request).unwrap();

                    for trade_id in &result.trades {
                        let trade = engine.get_trade_by_id(trade_id).unwrap();
                        prop_assert!(trade.size > Decimal::ZERO);
                        match side {
                            Side::Bid => prop_assert!(trade.price <= limit),
                            Side::Ask => prop_assert!(trade.price >= limit),
                        }
                    }
                    for change in &result.level_changes {
                        let actual = engine
                            .get_level(change.side, change.price)
                            .map(|level| level.total_size)
                            .unwrap_or(Decimal::ZERO);
                        prop_assert_eq!(actual, change.size);
                    }
                }
                EngineOp::Remove(id) => {
                    let id = format!("o{id}");
                    let was_resting = engine.get_order_by_id(&id).is_some();
                    prop_assert_eq!(engine.remove_order(&id).is_some(), was_resting);
                    prop_assert!(engine.get_order_by_id(&id).is_none());
                }
            }
            assert_book_consistent(&engine);
        }
    }
}
