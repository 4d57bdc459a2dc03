//! KeyIndex: key → handle lookup over arena-resident nodes.
//!
//! The index stores only `(precomputed hash, handle)` pairs; the keys
//! themselves live in the arena. Because every entry carries its hash,
//! growing the bucket array never re-invokes `Key: Hash`, and rehashing can
//! only move the index's own buckets; node storage is untouched.

use core::hash::BuildHasher;
use hashbrown::hash_table::Entry;
use hashbrown::HashTable;
use std::collections::hash_map::RandomState;

use crate::arena::{NodeArena, NodeHandle};
use crate::node::SearchNode;

#[derive(Debug)]
pub enum InsertError {
    DuplicateKey,
}

struct IndexEntry {
    hash: u64,
    handle: NodeHandle,
}

/// Hash index from node key to node handle.
///
/// Used twice by the node list: once for the open set and once for the
/// closed set. Keys are unique within one index; cross-index uniqueness is
/// the orchestrator's invariant, not this layer's. Lookups are O(1) average;
/// user code only runs through `Key: Eq`/`Key: Hash` during probing.
pub struct KeyIndex<S = RandomState> {
    hasher: S,
    table: HashTable<IndexEntry>,
}

impl KeyIndex<RandomState> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl Default for KeyIndex<RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BuildHasher> KeyIndex<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            table: HashTable::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Add `handle` under the key of the node it points at.
    ///
    /// The node's key is read from `arena` at call time; it must not change
    /// while the entry is in the index.
    pub fn insert<N: SearchNode>(
        &mut self,
        arena: &NodeArena<N>,
        handle: NodeHandle,
    ) -> Result<(), InsertError> {
        let key = arena.get(handle).key();
        let hash = self.hasher.hash_one(key);
        match self.table.entry(
            hash,
            |e| arena.get(e.handle).key() == key,
            |e| e.hash,
        ) {
            Entry::Occupied(_) => Err(InsertError::DuplicateKey),
            Entry::Vacant(v) => {
                v.insert(IndexEntry { hash, handle });
                Ok(())
            }
        }
    }

    /// Handle stored under `key`, or `None` if the key is absent.
    pub fn find<N: SearchNode>(
        &self,
        arena: &NodeArena<N>,
        key: &N::Key,
    ) -> Option<NodeHandle> {
        let hash = self.hasher.hash_one(key);
        self.table
            .find(hash, |e| arena.get(e.handle).key() == key)
            .map(|e| e.handle)
    }

    /// Remove and return the entry stored under `key`.
    pub fn remove<N: SearchNode>(
        &mut self,
        arena: &NodeArena<N>,
        key: &N::Key,
    ) -> Option<NodeHandle> {
        let hash = self.hasher.hash_one(key);
        match self
            .table
            .find_entry(hash, |e| arena.get(e.handle).key() == key)
        {
            Ok(occupied) => {
                let (entry, _) = occupied.remove();
                Some(entry.handle)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::hash::{Hash, Hasher};

    #[derive(Default)]
    struct TestNode {
        key: u32,
        cost: i32,
    }

    impl SearchNode for TestNode {
        type Key = u32;
        type Cost = i32;
        fn key(&self) -> &u32 {
            &self.key
        }
        fn total_cost(&self) -> i32 {
            self.cost
        }
    }

    fn alloc(arena: &mut NodeArena<TestNode>, key: u32) -> NodeHandle {
        let h = arena.allocate().unwrap();
        arena.get_mut(h).key = key;
        h
    }

    /// Invariant: duplicate keys are rejected and the index is unchanged.
    #[test]
    fn duplicate_insert_rejected() {
        let mut arena = NodeArena::new();
        let mut idx = KeyIndex::new();
        let h1 = alloc(&mut arena, 7);
        let h2 = alloc(&mut arena, 7);
        idx.insert(&arena, h1).unwrap();
        match idx.insert(&arena, h2) {
            Err(InsertError::DuplicateKey) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.find(&arena, &7), Some(h1));
    }

    /// Invariant: `find` returns exactly the handle stored for a present
    /// key and `None` for an absent one.
    #[test]
    fn find_present_and_absent() {
        let mut arena = NodeArena::new();
        let mut idx = KeyIndex::new();
        let mut handles = Vec::new();
        for k in 0..20u32 {
            let h = alloc(&mut arena, k);
            idx.insert(&arena, h).unwrap();
            handles.push(h);
        }
        for k in 0..20u32 {
            assert_eq!(idx.find(&arena, &k), Some(handles[k as usize]));
        }
        assert_eq!(idx.find(&arena, &999), None);
    }

    /// Invariant: `remove` returns the stored handle once; removing again
    /// or looking the key up afterwards yields `None`.
    #[test]
    fn remove_then_absent() {
        let mut arena = NodeArena::new();
        let mut idx = KeyIndex::new();
        let h = alloc(&mut arena, 42);
        idx.insert(&arena, h).unwrap();
        assert_eq!(idx.remove(&arena, &42), Some(h));
        assert_eq!(idx.remove(&arena, &42), None);
        assert_eq!(idx.find(&arena, &42), None);
        assert_eq!(idx.len(), 0);
    }

    /// Invariant: lookups resolve correctly under worst-case collisions
    /// (constant hasher forces every key into one bucket chain).
    #[test]
    fn collision_handling_with_const_hasher() {
        #[derive(Clone, Default)]
        struct ConstBuildHasher;
        struct ConstHasher;
        impl BuildHasher for ConstBuildHasher {
            type Hasher = ConstHasher;
            fn build_hasher(&self) -> Self::Hasher {
                ConstHasher
            }
        }
        impl Hasher for ConstHasher {
            fn write(&mut self, _bytes: &[u8]) {}
            fn finish(&self) -> u64 {
                0
            }
        }

        let mut arena = NodeArena::new();
        let mut idx: KeyIndex<ConstBuildHasher> = KeyIndex::with_hasher(ConstBuildHasher);
        let ha = alloc(&mut arena, 1);
        let hb = alloc(&mut arena, 2);
        idx.insert(&arena, ha).unwrap();
        idx.insert(&arena, hb).unwrap();
        assert_eq!(idx.find(&arena, &1), Some(ha));
        assert_eq!(idx.find(&arena, &2), Some(hb));
        assert_eq!(idx.remove(&arena, &1), Some(ha));
        assert_eq!(idx.find(&arena, &2), Some(hb));
    }

    /// Invariant: `Key: Hash` runs exactly once per public operation;
    /// internal growth/rehashing reuses the stored hashes.
    #[test]
    fn rehash_never_rehashes_keys() {
        thread_local! {
            static HASH_CALLS: Cell<u64> = const { Cell::new(0) };
        }

        #[derive(Default, PartialEq, Eq)]
        struct CountedKey(u32);
        impl Hash for CountedKey {
            fn hash<H: Hasher>(&self, state: &mut H) {
                HASH_CALLS.with(|c| c.set(c.get() + 1));
                self.0.hash(state);
            }
        }

        #[derive(Default)]
        struct CountedNode {
            key: CountedKey,
        }
        impl SearchNode for CountedNode {
            type Key = CountedKey;
            type Cost = i32;
            fn key(&self) -> &CountedKey {
                &self.key
            }
            fn total_cost(&self) -> i32 {
                0
            }
        }

        let mut arena: NodeArena<CountedNode> = NodeArena::new();
        let mut idx = KeyIndex::new();
        // Enough inserts to force several internal growth steps.
        let n = 1000u32;
        for k in 0..n {
            let h = arena.allocate().unwrap();
            arena.get_mut(h).key = CountedKey(k);
            idx.insert(&arena, h).unwrap();
        }
        let calls = HASH_CALLS.with(|c| c.get());
        assert_eq!(calls, n as u64, "each insert must hash its key exactly once");
    }
}
