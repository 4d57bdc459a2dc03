//! NodeList: the open/closed/staging state machine composed from the
//! arena, two key indices, and the open queue.

use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;

use crate::arena::{AllocError, NodeArena, NodeHandle};
use crate::key_index::{InsertError, KeyIndex};
use crate::node::SearchNode;
use crate::open_queue::OpenQueue;

/// Frontier and visited-set bookkeeping for one A*-style search.
///
/// Per key, a node is in exactly one of four states: absent, staged (under
/// construction, invisible to lookups), open (in the open index and the
/// queue), or closed (in the closed index only). The queue and the open
/// index hold the same handles at all times, except inside the documented
/// dequeue-then-reinsert window; debug builds assert the cardinality parity
/// after every transition.
///
/// Misuse (inserting a key that is already open or closed, or removing a
/// key that is not there) is a driver bug and panics rather than corrupting
/// the three views. Running out of open nodes is normal termination and
/// surfaces as `None`.
pub struct NodeList<N: SearchNode, S = RandomState> {
    arena: NodeArena<N>,
    open: KeyIndex<S>,
    closed: KeyIndex<S>,
    queue: OpenQueue<N::Cost>,
    staged: Option<NodeHandle>,
}

impl<N: SearchNode> NodeList<N> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<N: SearchNode> Default for NodeList<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, S> NodeList<N, S>
where
    N: SearchNode,
    S: BuildHasher + Clone,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            arena: NodeArena::new(),
            open: KeyIndex::with_hasher(hasher.clone()),
            closed: KeyIndex::with_hasher(hasher),
            queue: OpenQueue::new(),
            staged: None,
        }
    }

    /// Number of open nodes.
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Number of closed nodes.
    pub fn closed_count(&self) -> usize {
        self.closed.len()
    }

    /// Total nodes allocated this search, staged and discarded ones included.
    pub fn total_count(&self) -> usize {
        self.arena.len()
    }

    /// Borrow a node for reading (driver relaxation / path reconstruction).
    pub fn node(&self, handle: NodeHandle) -> &N {
        self.arena.get(handle)
    }

    /// Borrow a node for writing. The key of an open or closed node must not
    /// be changed, and the cost of a queued node only through the
    /// dequeue-then-reinsert protocol.
    pub fn node_mut(&mut self, handle: NodeHandle) -> &mut N {
        self.arena.get_mut(handle)
    }

    /// Hand out the staging node, allocating one only if none is staged.
    ///
    /// Repeated calls without an intervening [`insert_open`] or
    /// [`found_best_node`] return the same handle, so rejected candidates
    /// cost no arena slots. The node is *not* re-defaulted on reuse; the
    /// driver initializes every field it reads.
    ///
    /// [`insert_open`]: NodeList::insert_open
    /// [`found_best_node`]: NodeList::found_best_node
    pub fn create_new_node(&mut self) -> Result<NodeHandle, AllocError> {
        if let Some(h) = self.staged {
            return Ok(h);
        }
        let h = self.arena.allocate()?;
        self.staged = Some(h);
        Ok(h)
    }

    /// Detach `handle` from the staging slot without committing it to any
    /// index. The next [`create_new_node`] call allocates a fresh node.
    ///
    /// [`create_new_node`]: NodeList::create_new_node
    pub fn found_best_node(&mut self, handle: NodeHandle) {
        if self.staged == Some(handle) {
            self.staged = None;
        }
    }

    /// Commit a node as open: it enters the open index and the queue, and
    /// leaves the staging slot if it was staged.
    ///
    /// Panics if the key is already open or closed.
    pub fn insert_open(&mut self, handle: NodeHandle) {
        let key = self.arena.get(handle).key();
        assert!(
            self.closed.find(&self.arena, key).is_none(),
            "insert_open: key is already closed"
        );
        match self.open.insert(&self.arena, handle) {
            Ok(()) => {}
            Err(InsertError::DuplicateKey) => panic!("insert_open: key is already open"),
        }
        let cost = self.arena.get(handle).total_cost();
        self.queue.push(handle, cost);
        if self.staged == Some(handle) {
            self.staged = None;
        }
        self.debug_check_parity();
    }

    /// Cheapest open node without removing it, or `None` when the open set
    /// is empty (search space exhausted).
    pub fn get_best_open(&self) -> Option<NodeHandle> {
        self.queue.peek()
    }

    /// Remove and return the cheapest open node from both the queue and the
    /// open index.
    pub fn pop_best_open(&mut self) -> Option<NodeHandle> {
        let handle = self.queue.pop()?;
        let key = self.arena.get(handle).key();
        let removed = self.open.remove(&self.arena, key);
        assert_eq!(
            removed,
            Some(handle),
            "pop_best_open: open index out of sync with queue"
        );
        self.debug_check_parity();
        Some(handle)
    }

    /// Remove the cheapest open node from the queue only, leaving it in the
    /// open index. Used when re-costing: dequeue, mutate the cost, then
    /// either [`reenqueue_open_node`] or take it out of the open index via
    /// [`pop_already_dequeued_open_node`] and close it.
    ///
    /// Panics when the queue is empty.
    ///
    /// [`reenqueue_open_node`]: NodeList::reenqueue_open_node
    /// [`pop_already_dequeued_open_node`]: NodeList::pop_already_dequeued_open_node
    pub fn dequeue_best_open_node(&mut self) -> NodeHandle {
        self.queue
            .pop()
            .expect("dequeue_best_open_node: no open nodes")
    }

    /// Put a dequeued-but-still-open node back in the queue under its
    /// current cost.
    pub fn reenqueue_open_node(&mut self, handle: NodeHandle) {
        debug_assert_eq!(
            self.open.find(&self.arena, self.arena.get(handle).key()),
            Some(handle),
            "reenqueue_open_node: node is not open"
        );
        let cost = self.arena.get(handle).total_cost();
        self.queue.push(handle, cost);
        self.debug_check_parity();
    }

    /// Remove a node from the open index that was already taken off the
    /// queue via [`dequeue_best_open_node`]. Panics if the key is not open.
    ///
    /// [`dequeue_best_open_node`]: NodeList::dequeue_best_open_node
    pub fn pop_already_dequeued_open_node(&mut self, key: &N::Key) -> NodeHandle {
        let handle = self
            .open
            .remove(&self.arena, key)
            .expect("pop_already_dequeued_open_node: key is not open");
        debug_assert!(
            !self.queue.contains(handle),
            "pop_already_dequeued_open_node: node is still queued"
        );
        self.debug_check_parity();
        handle
    }

    /// Remove an open node by key from both the open index and the queue.
    /// Used when a cheaper path to an already-open key is found and the old
    /// entry must go before the replacement is inserted.
    ///
    /// Panics if the key is not open.
    pub fn pop_open(&mut self, key: &N::Key) -> NodeHandle {
        let handle = self
            .open
            .remove(&self.arena, key)
            .expect("pop_open: key is not open");
        let removed = self.queue.remove(handle);
        assert!(removed, "pop_open: node missing from queue");
        self.debug_check_parity();
        handle
    }

    /// Commit a node as closed. The caller removes it from the open
    /// index/queue first; this does not evict from open.
    ///
    /// Panics if the key is still open or already closed.
    pub fn insert_closed(&mut self, handle: NodeHandle) {
        let key = self.arena.get(handle).key();
        assert!(
            self.open.find(&self.arena, key).is_none(),
            "insert_closed: key is still open"
        );
        match self.closed.insert(&self.arena, handle) {
            Ok(()) => {}
            Err(InsertError::DuplicateKey) => panic!("insert_closed: key is already closed"),
        }
        self.debug_check_parity();
    }

    /// Open node stored under `key`, if any.
    pub fn find_open(&self, key: &N::Key) -> Option<NodeHandle> {
        self.open.find(&self.arena, key)
    }

    /// Closed node stored under `key`, if any.
    pub fn find_closed(&self, key: &N::Key) -> Option<NodeHandle> {
        self.closed.find(&self.arena, key)
    }

    /// Every allocated node in allocation order, whatever its state.
    /// Debug export for tooling; no format contract beyond the order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &N)> {
        self.arena
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeHandle::new(i), n))
    }

    #[inline]
    fn debug_check_parity(&self) {
        debug_assert_eq!(
            self.open.len(),
            self.queue.len(),
            "open index and queue hold different node sets"
        );
    }
}
