//! Comparator contract and the min-priority structure built on it.
//!
//! A comparator is a zero-sized type with static ordering functions, so a
//! heap's ordering is fixed by its type rather than carried as a value.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::marker::PhantomData;

/// Static three-way ordering over `T`.
pub trait Comparator<T: ?Sized> {
    fn less_than(lhs: &T, rhs: &T) -> bool;

    fn equal_to(lhs: &T, rhs: &T) -> bool;

    fn less_than_or_equal_to(lhs: &T, rhs: &T) -> bool {
        Self::less_than(lhs, rhs) || Self::equal_to(lhs, rhs)
    }
}

/// The type's own `Ord`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    fn less_than(lhs: &T, rhs: &T) -> bool {
        lhs < rhs
    }

    fn equal_to(lhs: &T, rhs: &T) -> bool {
        lhs == rhs
    }
}

/// A priority key paired with the value it ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyed<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Keyed<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

/// Orders [`Keyed`] entries by key alone; values never break ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByKey;

impl<K: Ord, V> Comparator<Keyed<K, V>> for ByKey {
    fn less_than(lhs: &Keyed<K, V>, rhs: &Keyed<K, V>) -> bool {
        lhs.key < rhs.key
    }

    fn equal_to(lhs: &Keyed<K, V>, rhs: &Keyed<K, V>) -> bool {
        lhs.key == rhs.key
    }
}

/// Adapter turning a comparator into the reversed `Ord` that makes
/// `BinaryHeap` pop the smallest element first.
struct MinFirst<T, C> {
    item: T,
    _order: PhantomData<C>,
}

impl<T, C: Comparator<T>> PartialEq for MinFirst<T, C> {
    fn eq(&self, other: &Self) -> bool {
        C::equal_to(&self.item, &other.item)
    }
}

impl<T, C: Comparator<T>> Eq for MinFirst<T, C> {}

impl<T, C: Comparator<T>> Ord for MinFirst<T, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        if C::less_than(&self.item, &other.item) {
            Ordering::Greater
        } else if C::equal_to(&self.item, &other.item) {
            Ordering::Equal
        } else {
            Ordering::Less
        }
    }
}

impl<T, C: Comparator<T>> PartialOrd for MinFirst<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue ordered by comparator `C`.
///
/// No decrease-key: callers push a fresh entry when a priority improves and
/// discard stale entries when they surface.
pub struct MinHeap<T, C = NaturalOrder> {
    heap: BinaryHeap<MinFirst<T, C>>,
}

impl<T, C: Comparator<T>> MinHeap<T, C> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, item: T) {
        self.heap.push(MinFirst {
            item,
            _order: PhantomData,
        });
    }

    /// Remove and return the smallest element.
    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.peek().map(|entry| &entry.item)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T, C: Comparator<T>> Default for MinHeap<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Comparator<T>> Extend<T> for MinHeap<T, C> {
    fn extend<It: IntoIterator<Item = T>>(&mut self, iter: It) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T, C: Comparator<T>> FromIterator<T> for MinHeap<T, C> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}
