//! OpenQueue: binary min-heap of node handles with removal by identity.
//!
//! The heap orders handles by a cost snapshot taken at push time, with ties
//! broken FIFO by an insertion sequence number, so equal-cost nodes pop in
//! the order they were pushed (deterministic across runs). A side map from
//! handle to heap slot, maintained through every sift, makes removal of an
//! arbitrary queued node O(log n) instead of the O(n) position scan a plain
//! binary heap would need.

use hashbrown::HashMap;

use crate::arena::NodeHandle;

struct HeapSlot<C> {
    handle: NodeHandle,
    cost: C,
    seq: u64,
}

/// Priority queue over the open set.
///
/// Costs are snapshots: changing a node's cost while it is queued does not
/// reorder the heap. The node-list protocol removes (or dequeues) a node
/// before mutating its cost and pushes it again afterwards.
pub struct OpenQueue<C> {
    slots: Vec<HeapSlot<C>>,
    position: HashMap<NodeHandle, usize>,
    next_seq: u64,
}

impl<C: Ord + Copy> OpenQueue<C> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            position: HashMap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.position.contains_key(&handle)
    }

    /// Queue a handle under `cost`. O(log n).
    ///
    /// Panics if the handle is already queued: double-pushing would leave two
    /// slots claiming one position-map entry (caller bug, fail fast).
    pub fn push(&mut self, handle: NodeHandle, cost: C) {
        assert!(
            !self.position.contains_key(&handle),
            "OpenQueue::push: handle already queued"
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        let at = self.slots.len();
        self.slots.push(HeapSlot { handle, cost, seq });
        self.position.insert(handle, at);
        self.sift_up(at);
    }

    /// Cheapest queued handle without removing it. O(1).
    pub fn peek(&self) -> Option<NodeHandle> {
        self.slots.first().map(|s| s.handle)
    }

    /// Remove and return the cheapest queued handle. O(log n).
    /// An empty queue yields `None`; that is normal termination, not an error.
    pub fn pop(&mut self) -> Option<NodeHandle> {
        let top = self.slots.first()?.handle;
        self.position.remove(&top);
        let last = self.slots.len() - 1;
        self.slots.swap(0, last);
        self.slots.pop();
        if !self.slots.is_empty() {
            self.position.insert(self.slots[0].handle, 0);
            self.sift_down(0);
        }
        Some(top)
    }

    /// Remove an arbitrary queued handle. O(log n) via the position map.
    /// Returns whether the handle was present.
    pub fn remove(&mut self, handle: NodeHandle) -> bool {
        let Some(pos) = self.position.remove(&handle) else {
            return false;
        };
        let last = self.slots.len() - 1;
        self.slots.swap(pos, last);
        self.slots.pop();
        if pos < self.slots.len() {
            // The displaced tail element may belong above or below `pos`;
            // at most one of the two sifts moves it.
            self.position.insert(self.slots[pos].handle, pos);
            self.sift_up(pos);
            self.sift_down(pos);
        }
        true
    }

    fn less(&self, a: usize, b: usize) -> bool {
        let (sa, sb) = (&self.slots[a], &self.slots[b]);
        (sa.cost, sa.seq) < (sb.cost, sb.seq)
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        self.position.insert(self.slots[a].handle, a);
        self.position.insert(self.slots[b].handle, b);
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.swap_slots(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let mut smallest = i;
            for child in [2 * i + 1, 2 * i + 2] {
                if child < self.slots.len() && self.less(child, smallest) {
                    smallest = child;
                }
            }
            if smallest == i {
                break;
            }
            self.swap_slots(i, smallest);
            i = smallest;
        }
    }
}

impl<C: Ord + Copy> Default for OpenQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}
