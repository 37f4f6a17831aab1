//! The frontier shared by every ordering of a search.
//!
//! Entries are stored in a min-heap keyed by
//! `(estimate, ordering, position)`. Lower estimates are popped first; ties
//! go to the lower ordering index, then to the lower position, so two runs
//! over the same grid expand cells in exactly the same sequence.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use waypath_core::Point;

/// A pending expansion of `position` within one ordering.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrontierEntry {
    /// Cost so far plus heuristic estimate.
    pub estimate: f32,
    /// Index of the ordering the entry belongs to.
    pub ordering: usize,
    pub position: Point,
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.estimate
            .total_cmp(&other.estimate)
            .then(self.ordering.cmp(&other.ordering))
            .then(self.position.cmp(&other.position))
    }
}

/// Priority queue of [`FrontierEntry`]s, smallest first.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<FrontierEntry>>,
}

impl Frontier {
    /// Create an empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        self.heap.push(Reverse(entry));
    }

    /// Pop the entry with the lowest `(estimate, ordering, position)`.
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    /// The entry [`pop`](Self::pop) would return next.
    pub fn peek(&self) -> Option<&FrontierEntry> {
        self.heap.peek().map(|Reverse(entry)| entry)
    }

    /// Drop every pending entry of `ordering`. Other orderings are untouched.
    pub fn purge(&mut self, ordering: usize) {
        self.heap.retain(|Reverse(entry)| entry.ordering != ordering);
    }

    /// Number of pending entries of `ordering`.
    pub fn pending(&self, ordering: usize) -> usize {
        self.heap
            .iter()
            .filter(|Reverse(entry)| entry.ordering == ordering)
            .count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
