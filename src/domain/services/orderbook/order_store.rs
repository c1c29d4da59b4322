//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The order store is the single owner of every resting order. Orders live in a slab arena and
// are addressed by arena key; price levels thread their FIFO queues through the same arena by
// key, so no order is ever aliased.
//
// | Component     | Description                                                    |
// |---------------|----------------------------------------------------------------|
// | OrderStore    | Arena of order nodes plus the id -> key registry               |
// | OrderNode     | An order and its queue links inside its price level            |
//--------------------------------------------------------------------------------------------------

use std::collections::HashMap;

use slab::Slab;

use crate::domain::models::types::{Order, OrderId};

/// Arena key of an order node.
pub type OrderKey = usize;

/// An order together with its position in its price level's queue.
#[derive(Debug)]
pub struct OrderNode {
    pub(super) order: Order,
    pub(super) prev: Option<OrderKey>,
    pub(super) next: Option<OrderKey>,
    /// True while the node is threaded into a price level.
    pub(super) linked: bool,
}

/// Registry of resting orders, owning them in a slab arena.
#[derive(Debug, Default)]
pub struct OrderStore {
    nodes: Slab<OrderNode>,
    by_id: HashMap<OrderId, OrderKey>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered orders.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Registers `order`, returning its arena key.
    ///
    /// An order already registered under the same id is dropped first.
    pub fn insert(&mut self, order: Order) -> OrderKey {
        if let Some(previous) = self.by_id.get(&order.id).copied() {
            self.nodes.try_remove(previous);
        }
        let id = order.id.clone();
        let key = self.nodes.insert(OrderNode {
            order,
            prev: None,
            next: None,
            linked: false,
        });
        self.by_id.insert(id, key);
        key
    }

    /// Unregisters the order stored at `key` and hands it back.
    pub fn remove(&mut self, key: OrderKey) -> Option<Order> {
        let node = self.nodes.try_remove(key)?;
        self.by_id.remove(&node.order.id);
        Some(node.order)
    }

    #[inline]
    pub fn key_of(&self, id: &str) -> Option<OrderKey> {
        self.by_id.get(id).copied()
    }

    /// O(1) lookup by order id.
    pub fn get(&self, id: &str) -> Option<&Order> {
        self.key_of(id).and_then(|key| self.order(key))
    }

    /// Lookup by arena key.
    #[inline]
    pub fn order(&self, key: OrderKey) -> Option<&Order> {
        self.nodes.get(key).map(|node| &node.order)
    }

    /// Iterates over every registered order, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.nodes.iter().map(|(_, node)| &node.order)
    }

    #[inline]
    pub(super) fn node(&self, key: OrderKey) -> Option<&OrderNode> {
        self.nodes.get(key)
    }

    #[inline]
    pub(super) fn node_mut(&mut self, key: OrderKey) -> Option<&mut OrderNode> {
        self.nodes.get_mut(key)
    }
}
