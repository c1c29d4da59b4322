//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the price index: a height-balanced (AVL) binary search tree keyed
// by exact price. The matching engine keeps one index for bids and one for asks.
//
// | Component     | Description                                                               |
// |---------------|---------------------------------------------------------------------------|
// | PriceIndex    | Balanced map price -> value with O(log n) single-key operations           |
// | Direction     | Traversal order used by top_k and iterators                               |
// | Iter          | Stack based in-order iterator, ascending or descending                    |
//
//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name          | Description                                | Return Type              |
// |---------------|--------------------------------------------|--------------------------|
// | insert        | Insert or overwrite the value at a price   | Option<V>                |
// | find          | Look up the value at a price               | Option<&V>               |
// | remove        | Delete a price, rebalancing on the way up  | Option<V>                |
// | min / max     | Lowest / highest price in the index        | Option<Price>            |
// | top_k         | Up to k entries, best first for direction  | Vec<(Price, &V)>         |
//--------------------------------------------------------------------------------------------------

use std::cmp::{Ordering, max};
use std::mem;

use crate::domain::models::types::Price;

/// Order in which entries are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Lowest price first (best first for asks).
    Ascending,
    /// Highest price first (best first for bids).
    Descending,
}

type Link<V> = Option<Box<Node<V>>>;

#[derive(Debug)]
struct Node<V> {
    key: Price,
    value: V,
    height: u32,
    left: Link<V>,
    right: Link<V>,
}

impl<V> Node<V> {
    fn leaf(key: Price, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    #[inline]
    fn update_height(&mut self) {
        self.height = 1 + max(height(&self.left), height(&self.right));
    }

    #[inline]
    fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

#[inline]
fn height<V>(link: &Link<V>) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn rotate_right<V>(mut node: Box<Node<V>>) -> Box<Node<V>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left<V>(mut node: Box<Node<V>>) -> Box<Node<V>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Restores the height-balance property at `node`, assuming both subtrees are balanced.
fn rebalance<V>(mut node: Box<Node<V>>) -> Box<Node<V>> {
    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        // Left-right case needs the child straightened first.
        if node.left.as_ref().map_or(0, |left| left.balance_factor()) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        // Right-left case.
        if node.right.as_ref().map_or(0, |right| right.balance_factor()) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

fn insert_node<V>(link: Link<V>, key: Price, value: V, replaced: &mut Option<V>) -> Box<Node<V>> {
    let Some(mut node) = link else {
        return Node::leaf(key, value);
    };

    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert_node(node.left.take(), key, value, replaced)),
        Ordering::Greater => {
            node.right = Some(insert_node(node.right.take(), key, value, replaced))
        }
        Ordering::Equal => {
            *replaced = Some(mem::replace(&mut node.value, value));
            return node;
        }
    }

    rebalance(node)
}

fn leftmost_key<V>(mut node: &Node<V>) -> Price {
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    node.key
}

fn remove_node<V>(link: Link<V>, key: Price, removed: &mut Option<V>) -> Link<V> {
    let mut node = link?;

    match key.cmp(&node.key) {
        Ordering::Less => node.left = remove_node(node.left.take(), key, removed),
        Ordering::Greater => node.right = remove_node(node.right.take(), key, removed),
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (Some(left), Some(right)) => {
                // The in-order successor takes over this node's key and value.
                let successor_key = leftmost_key(&right);
                let mut successor_value = None;
                node.right = remove_node(Some(right), successor_key, &mut successor_value);
                node.left = Some(left);
                if let Some(value) = successor_value {
                    node.key = successor_key;
                    *removed = Some(mem::replace(&mut node.value, value));
                }
            }
            (only, None) | (None, only) => {
                let Node { value, .. } = *node;
                *removed = Some(value);
                return only;
            }
        },
    }

    Some(rebalance(node))
}

/// Balanced binary search tree mapping exact prices to values.
///
/// In-order traversal yields strictly increasing prices, and after every insert
/// or remove the heights of any node's subtrees differ by at most one.
#[derive(Debug)]
pub struct PriceIndex<V> {
    root: Link<V>,
    len: usize,
}

impl<V> Default for PriceIndex<V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<V> PriceIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct prices in the index.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; 0 when empty.
    #[inline]
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Inserts `value` at `price`, returning the previous value if the price was present.
    pub fn insert(&mut self, price: Price, value: V) -> Option<V> {
        let mut replaced = None;
        self.root = Some(insert_node(self.root.take(), price, value, &mut replaced));
        if replaced.is_none() {
            self.len += 1;
        }
        replaced
    }

    pub fn find(&self, price: Price) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match price.cmp(&node.key) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    pub fn find_mut(&mut self, price: Price) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match price.cmp(&node.key) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    #[inline]
    pub fn contains(&self, price: Price) -> bool {
        self.find(price).is_some()
    }

    /// Removes `price` from the index, returning its value if it was present.
    pub fn remove(&mut self, price: Price) -> Option<V> {
        let mut removed = None;
        self.root = remove_node(self.root.take(), price, &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Lowest price in the index.
    pub fn min(&self) -> Option<Price> {
        self.root.as_deref().map(leftmost_key)
    }

    /// Highest price in the index.
    pub fn max(&self) -> Option<Price> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(node.key)
    }

    /// Ascending in-order iterator.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.root, Direction::Ascending)
    }

    /// Iterator in the requested direction.
    pub fn iter_in(&self, direction: Direction) -> Iter<'_, V> {
        Iter::new(&self.root, direction)
    }

    /// Returns up to `k` entries, best first for `direction`.
    ///
    /// The traversal stops after `k` entries, so the cost is O(log n + k).
    pub fn top_k(&self, k: usize, direction: Direction) -> Vec<(Price, &V)> {
        self.iter_in(direction).take(k).collect()
    }

    /// Checks ordering, cached heights and the balance property of every node.
    pub fn is_valid(&self) -> bool {
        fn check<V>(link: &Link<V>, low: Option<Price>, high: Option<Price>) -> Option<u32> {
            let Some(node) = link.as_deref() else {
                return Some(0);
            };
            if low.is_some_and(|low| node.key <= low) || high.is_some_and(|high| node.key >= high) {
                return None;
            }
            let left = check(&node.left, low, Some(node.key))?;
            let right = check(&node.right, Some(node.key), high)?;
            if left.abs_diff(right) > 1 || node.height != 1 + max(left, right) {
                return None;
            }
            Some(node.height)
        }

        let mut count = 0;
        let mut cursor = self.iter();
        while cursor.next().is_some() {
            count += 1;
        }
        count == self.len && check(&self.root, None, None).is_some()
    }
}

/// In-order iterator over a [`PriceIndex`].
pub struct Iter<'a, V> {
    stack: Vec<&'a Node<V>>,
    direction: Direction,
}

impl<'a, V> Iter<'a, V> {
    fn new(root: &'a Link<V>, direction: Direction) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            direction,
        };
        iter.push_spine(root.as_deref());
        iter
    }

    fn push_spine(&mut self, mut current: Option<&'a Node<V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = match self.direction {
                Direction::Ascending => node.left.as_deref(),
                Direction::Descending => node.right.as_deref(),
            };
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Price, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let next = match self.direction {
            Direction::Ascending => node.right.as_deref(),
            Direction::Descending => node.left.as_deref(),
        };
        self.push_spine(next);
        Some((node.key, &node.value))
    }
}
