//! Frontier disciplines: FIFO for breadth-first, sorted array for best-first.

use std::cmp::Ordering;

use super::types::QueueItem;

/// The pending-work container.
///
/// `pending` deep-copies the not-yet-popped items for checkpoint snapshots.
pub trait Frontier: Send {
    fn push(&mut self, item: QueueItem);
    fn pop(&mut self) -> Option<QueueItem>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn pending(&self) -> Vec<QueueItem>;
}

/// Head index beyond which the consumed prefix becomes worth reclaiming.
const COMPACT_THRESHOLD: usize = 1024;

/// FIFO frontier with an amortized O(1) dequeue.
///
/// Popping advances a head index instead of shifting the backing array.
/// The consumed prefix is physically discarded only once the index exceeds
/// both [`COMPACT_THRESHOLD`] and half the backing length, which bounds
/// memory growth for long-lived queues without an O(n) cost per pop.
#[derive(Debug, Default)]
pub struct FifoFrontier {
    items: Vec<QueueItem>,
    head: usize,
}

impl FifoFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_items(items: Vec<QueueItem>) -> Self {
        Self { items, head: 0 }
    }
}

impl Frontier for FifoFrontier {
    fn push(&mut self, item: QueueItem) {
        self.items.push(item);
    }

    fn pop(&mut self) -> Option<QueueItem> {
        if self.head >= self.items.len() {
            return None;
        }
        let item = std::mem::take(&mut self.items[self.head]);
        self.head += 1;
        if self.head > COMPACT_THRESHOLD && self.head > self.items.len() / 2 {
            self.items.drain(..self.head);
            self.head = 0;
        }
        Some(item)
    }

    fn len(&self) -> usize {
        self.items.len() - self.head
    }

    fn pending(&self) -> Vec<QueueItem> {
        self.items[self.head..].to_vec()
    }
}

/// Ascending priority order for the best-first frontier.
///
/// Primary key is the score; on a tie the shallower depth wins, and on a
/// depth tie the lexicographically smaller URL wins. The highest-priority
/// item therefore sorts last and pops from the tail. This exact comparator
/// keeps traversal order deterministic under tied scores; reimplementations
/// (e.g. a binary heap) must preserve it bit-for-bit.
#[must_use]
pub fn priority_cmp(a: &QueueItem, b: &QueueItem) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| b.depth.cmp(&a.depth))
        .then_with(|| b.url.cmp(&a.url))
}

/// Best-first frontier: a vector kept sorted ascending by [`priority_cmp`],
/// with binary-search insertion and tail pops.
#[derive(Debug, Default)]
pub struct BestFirstFrontier {
    items: Vec<QueueItem>,
}

impl BestFirstFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_items(items: Vec<QueueItem>) -> Self {
        let mut frontier = Self::default();
        for item in items {
            frontier.push(item);
        }
        frontier
    }
}

impl Frontier for BestFirstFrontier {
    fn push(&mut self, item: QueueItem) {
        let pos = match self
            .items
            .binary_search_by(|probe| priority_cmp(probe, &item))
        {
            Ok(pos) | Err(pos) => pos,
        };
        self.items.insert(pos, item);
    }

    fn pop(&mut self) -> Option<QueueItem> {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn pending(&self) -> Vec<QueueItem> {
        self.items.clone()
    }
}
