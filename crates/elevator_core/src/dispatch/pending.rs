use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::request::{Direction, Request, RequestKind};

/// Heap entry ordered by kind priority, then creation sequence (oldest first).
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEntry(Request);

impl Ord for PendingEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest entry: higher priority wins, then lower seq.
        self.0
            .kind
            .priority()
            .cmp(&other.0.kind.priority())
            .then_with(|| other.0.seq.cmp(&self.0.seq))
    }
}

impl PartialOrd for PendingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Requests waiting for a car. Internal requests go before external ones; within a
/// kind, requests leave in creation order.
#[derive(Debug, Default, Clone)]
pub struct PendingQueue {
    heap: BinaryHeap<PendingEntry>,
}

impl PendingQueue {
    pub fn push(&mut self, request: Request) {
        self.heap.push(PendingEntry(request));
    }

    pub fn pop(&mut self) -> Option<Request> {
        self.heap.pop().map(|entry| entry.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Empties the queue, returning requests in priority order.
    pub fn drain_ordered(&mut self) -> Vec<Request> {
        let mut ordered = Vec::with_capacity(self.heap.len());
        while let Some(request) = self.pop() {
            ordered.push(request);
        }
        ordered
    }

    /// Requests in priority order without removing them.
    pub fn to_sorted_vec(&self) -> Vec<Request> {
        let mut entries: Vec<_> = self.heap.iter().cloned().collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries.into_iter().map(|entry| entry.0).collect()
    }

    /// Drops the hall call for `floor`/`direction`, if queued. Returns how many were removed.
    pub fn remove_hall_call(&mut self, floor: u32, direction: Direction) -> usize {
        let before = self.heap.len();
        self.heap.retain(|entry| {
            !(entry.0.kind == RequestKind::External
                && entry.0.source_floor == floor
                && entry.0.direction == direction)
        });
        before - self.heap.len()
    }
}
