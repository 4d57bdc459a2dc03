//! astar-frontier: arena-backed open/closed node bookkeeping for A*-style
//! graph search.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: give a search driver one structure that keeps three views of the
//!   same nodes (stable storage, key membership, cost ordering) consistent,
//!   built in small, independently verifiable layers.
//! - Layers:
//!   - NodeArena<N>: chunked append-only storage handing out stable
//!     `NodeHandle`s; growth appends a chunk and never moves a node.
//!   - KeyIndex<S>: key → handle map over arena-resident nodes, used twice
//!     (open set, closed set); stores precomputed hashes and handles only.
//!   - OpenQueue<C>: binary min-heap of handles ordered by cost snapshot,
//!     with a handle → slot map for O(log n) removal by identity.
//!   - NodeList<N, S>: public state machine composing one arena, both
//!     indices, the queue, and a single staging slot.
//!
//! Constraints
//! - Single-threaded: one search owns one `NodeList`; `&mut self`
//!   everywhere, no locking.
//! - Bulk lifetime: nodes are never freed individually; superseded nodes
//!   stay in the arena until the list is dropped at the end of the search.
//! - Per key, a node is in at most one of {staged, open, closed}; the open
//!   index and the queue hold identical handle sets outside the documented
//!   dequeue-then-reinsert window.
//! - O(1) average key lookup, O(log n) queue operations, O(1) arena access.
//!
//! Failure boundaries
//! - Driver bugs (duplicate keys, cross-index insertion, removing absent
//!   keys, dequeuing an empty queue) panic with the violated invariant;
//!   these are never recoverable runtime conditions.
//! - Allocation failure is an explicit `AllocError` result.
//! - Expected absences (`find_*`, empty `pop_best_open`) are `None`;
//!   running out of open nodes is how "no path" terminates.
//!
//! Hasher and rehashing invariants
//! - Each index entry stores a precomputed `u64` hash; growth reuses stored
//!   hashes and never re-invokes `Key: Hash`. Only the bucket arrays move
//!   on rehash; node addresses are pinned by the arena.
//!
//! Notes and non-goals
//! - Ties in the queue break FIFO by insertion sequence, so equal-cost pop
//!   order is deterministic.
//! - No persistence across searches; build a fresh `NodeList` per search.
//! - Public API surface is `NodeList` plus the `SearchNode` contract and
//!   `NodeHandle`; the lower layers are exported for reuse and benches but
//!   a driver normally never touches them.

pub mod arena;
pub mod key_index;
pub mod node;
mod node_list;
mod node_list_proptest;
pub mod open_queue;

// Public surface
pub use arena::{AllocError, NodeArena, NodeHandle};
pub use key_index::InsertError;
pub use node::SearchNode;
pub use node_list::NodeList;
pub use open_queue::OpenQueue;
