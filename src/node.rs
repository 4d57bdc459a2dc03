//! Node contract satisfied by the search driver's node type.

use core::hash::Hash;

/// A unit of search state stored in the arena.
///
/// The driver defines the concrete node type: the key identifying the search
/// state (for example a map position plus approach direction), the cost
/// accumulated so far, the estimated total cost, and a parent handle used for
/// path reconstruction. This crate only ever reads the key and the estimated
/// total cost; everything else is opaque driver data.
///
/// Requirements:
/// - Two keys compare equal iff they represent the same search state, and
///   hashing is deterministic (`Eq + Hash`).
/// - `total_cost` is the ordering key of the open queue (cost so far plus a
///   heuristic estimate to the goal). It must stay constant while the node
///   sits in the queue; to change it, remove the node first and re-push it.
/// - `Default` provides the zero-initialized state handed out by the arena.
///   A staged node may be returned more than once without reinitialization,
///   so the driver must write every field it later reads.
pub trait SearchNode: Default {
    /// Opaque search-state identifier.
    type Key: Eq + Hash;
    /// Numeric cost used for open-queue ordering.
    type Cost: Ord + Copy;

    /// The key uniquely identifying this node's search state.
    fn key(&self) -> &Self::Key;

    /// Cost so far plus heuristic estimate; orders the open queue.
    fn total_cost(&self) -> Self::Cost;
}
