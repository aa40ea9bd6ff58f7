//! Min-priority frontier with deterministic tie-breaking.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("extract from an empty frontier")]
pub struct EmptyFrontier;

/// `BinaryHeap` is a max-heap, so keys are reversed. Equal priorities pop in
/// insertion order.
#[derive(Debug)]
struct Entry {
    key: Reverse<(u32, u64)>,
    node: Node,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    seq: u64,
    high_water: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keyed by the node's current priority.
    pub fn insert(&mut self, node: Node) {
        let key = Reverse((node.priority(), self.seq));
        self.seq += 1;
        self.heap.push(Entry { key, node });
        self.high_water = self.high_water.max(self.heap.len());
    }

    pub fn extract_min(&mut self) -> Result<Node, EmptyFrontier> {
        self.heap.pop().map(|e| e.node).ok_or(EmptyFrontier)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Largest size the frontier has reached.
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}
