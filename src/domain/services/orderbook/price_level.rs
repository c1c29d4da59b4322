//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// A price level is the FIFO queue of resting orders at one exact price on one side, plus the
// aggregate remaining size of those orders. The queue is an intrusive doubly linked list
// threaded through the order store, so appending, removing by id and peeking the oldest order
// are all O(1).
//
//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name            | Description                                          | Return Type       |
// |-----------------|------------------------------------------------------|-------------------|
// | add_order       | Append an order to the tail of the queue             | bool              |
// | remove_order    | Unlink an order, report whether the level is empty   | bool              |
// | fill_order      | Reduce an order's remaining size, evict when filled  | Size              |
// | oldest_order    | Head of the queue, the next order to match           | Option<&Order>    |
// | orders          | Orders in arrival order                              | LevelOrders       |
//--------------------------------------------------------------------------------------------------

use rust_decimal::Decimal;

use super::order_store::{OrderKey, OrderStore};
use crate::domain::models::types::{Order, Price, Side, Size};

/// Resting orders at a single price, in arrival order.
///
/// Invariant: `total_size` equals the sum of `remaining_size` over the linked orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    side: Side,
    price: Price,
    head: Option<OrderKey>,
    tail: Option<OrderKey>,
    order_count: usize,
    total_size: Size,
}

impl PriceLevel {
    pub fn new(side: Side, price: Price) -> Self {
        Self {
            side,
            price,
            head: None,
            tail: None,
            order_count: 0,
            total_size: Decimal::ZERO,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Aggregate remaining size of every order at this level.
    #[inline]
    pub fn total_size(&self) -> Size {
        self.total_size
    }

    #[inline]
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Key of `id` if that order is currently queued at this level.
    fn member_key(&self, store: &OrderStore, id: &str) -> Option<OrderKey> {
        let key = store.key_of(id)?;
        let node = store.node(key)?;
        let belongs = node.linked && node.order.side == self.side && node.order.price == self.price;
        belongs.then_some(key)
    }

    /// Appends the registered order `id` to the tail of the queue.
    ///
    /// Returns false, changing nothing, if the order is unknown, already queued,
    /// does not belong to this side and price, or would overflow the aggregate size.
    pub fn add_order(&mut self, store: &mut OrderStore, id: &str) -> bool {
        let Some(key) = store.key_of(id) else {
            return false;
        };
        let tail = self.tail;
        let total_size = match store.node_mut(key) {
            Some(node)
                if !node.linked && node.order.side == self.side && node.order.price == self.price =>
            {
                let Some(total_size) = self.total_size.checked_add(node.order.remaining_size) else {
                    return false;
                };
                node.prev = tail;
                node.next = None;
                node.linked = true;
                total_size
            }
            _ => return false,
        };

        match tail.and_then(|tail| store.node_mut(tail)) {
            Some(tail_node) => tail_node.next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
        self.order_count += 1;
        self.total_size = total_size;
        true
    }

    /// Unlinks order `id` from the queue and subtracts its remaining size.
    ///
    /// The order stays registered in the store. Returns whether the level is now empty.
    pub fn remove_order(&mut self, store: &mut OrderStore, id: &str) -> bool {
        if let Some(key) = self.member_key(store, id) {
            self.unlink(store, key);
        }
        self.is_empty()
    }

    fn unlink(&mut self, store: &mut OrderStore, key: OrderKey) {
        let Some(node) = store.node_mut(key) else {
            return;
        };
        let (prev, next) = (node.prev.take(), node.next.take());
        node.linked = false;
        let remaining = node.order.remaining_size;

        match prev.and_then(|prev| store.node_mut(prev)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|next| store.node_mut(next)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }
        self.order_count -= 1;
        self.total_size -= remaining;
    }

    /// Fills `amount` of order `id`, decreasing its remaining size and the level aggregate.
    ///
    /// Returns the filled amount, or zero without changing anything when `amount` is not
    /// positive, exceeds the order's remaining size, or the order is not at this level.
    /// An order whose remaining size reaches zero is evicted from the queue.
    pub fn fill_order(&mut self, store: &mut OrderStore, id: &str, amount: Size) -> Size {
        if amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let Some(key) = self.member_key(store, id) else {
            return Decimal::ZERO;
        };
        let filled = match store.node_mut(key) {
            Some(node) if amount <= node.order.remaining_size => {
                node.order.remaining_size -= amount;
                node.order.is_filled()
            }
            _ => return Decimal::ZERO,
        };

        self.total_size -= amount;
        if filled {
            // Remaining size is zero, so unlinking leaves the aggregate untouched.
            self.unlink(store, key);
        }
        amount
    }

    /// The oldest order at this level, without removing it.
    pub fn oldest_order<'a>(&self, store: &'a OrderStore) -> Option<&'a Order> {
        self.head.and_then(|key| store.order(key))
    }

    /// Orders at this level, oldest first.
    pub fn orders<'a>(&self, store: &'a OrderStore) -> LevelOrders<'a> {
        LevelOrders {
            store,
            cursor: self.head,
        }
    }
}

/// Iterator over the orders of a [`PriceLevel`] in arrival order.
pub struct LevelOrders<'a> {
    store: &'a OrderStore,
    cursor: Option<OrderKey>,
}

impl<'a> Iterator for LevelOrders<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.store.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.order)
    }
}
