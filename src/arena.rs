//! NodeArena: chunked append-only node storage with stable handles.

use core::fmt;

/// Default number of nodes per chunk.
const DEFAULT_CHUNK_CAPACITY: usize = 4096;

/// Stable, copyable identifier of a node inside a [`NodeArena`].
///
/// Handles are assigned in allocation order and stay valid until the arena
/// itself is dropped; growth never moves or invalidates existing nodes. A
/// handle carries no generation: the arena has bulk lifetime only, so a
/// handle can never outlive the slot it names while the arena is alive.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeHandle(u32);

impl NodeHandle {
    pub(crate) fn new(index: usize) -> Self {
        NodeHandle(index as u32)
    }

    /// Position of the node in allocation order.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Chunk allocation failed; the current search cannot continue.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("arena chunk allocation failed")
    }
}

impl std::error::Error for AllocError {}

/// Append-only storage for search nodes.
///
/// Nodes live in fixed-capacity chunks; when the current chunk fills up a new
/// one is appended, so a node's address never changes after allocation. There
/// is no per-item free: superseded nodes stay in place until the whole arena
/// is dropped at the end of the search.
pub struct NodeArena<N> {
    chunks: Vec<Vec<N>>,
    chunk_capacity: usize,
    len: usize,
}

impl<N> NodeArena<N> {
    pub fn new() -> Self {
        Self::with_chunk_capacity(DEFAULT_CHUNK_CAPACITY)
    }

    /// Arena with a custom chunk capacity. Small capacities are useful in
    /// tests to exercise growth across several chunks.
    pub fn with_chunk_capacity(chunk_capacity: usize) -> Self {
        assert!(chunk_capacity > 0, "chunk capacity must be non-zero");
        Self {
            chunks: Vec::new(),
            chunk_capacity,
            len: 0,
        }
    }

    /// Total number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the node a handle points at. Panics on a handle that this
    /// arena never issued (caller bug).
    pub fn get(&self, handle: NodeHandle) -> &N {
        let i = handle.index();
        &self.chunks[i / self.chunk_capacity][i % self.chunk_capacity]
    }

    /// Mutably borrow the node a handle points at.
    pub fn get_mut(&mut self, handle: NodeHandle) -> &mut N {
        let i = handle.index();
        &mut self.chunks[i / self.chunk_capacity][i % self.chunk_capacity]
    }

    /// All nodes in allocation order, for debug export.
    pub fn iter(&self) -> impl Iterator<Item = &N> {
        self.chunks.iter().flatten()
    }
}

impl<N: Default> NodeArena<N> {
    /// Allocate a default-initialized node and return its handle.
    ///
    /// O(1); appends a new chunk when the current one is full. Out-of-memory
    /// is reported as [`AllocError`] rather than aborting, so the driver can
    /// fail the whole search cleanly.
    pub fn allocate(&mut self) -> Result<NodeHandle, AllocError> {
        if self.len > u32::MAX as usize {
            return Err(AllocError);
        }
        if self.len == self.chunks.len() * self.chunk_capacity {
            let mut chunk = Vec::new();
            chunk
                .try_reserve_exact(self.chunk_capacity)
                .map_err(|_| AllocError)?;
            self.chunks.try_reserve(1).map_err(|_| AllocError)?;
            self.chunks.push(chunk);
        }
        // Capacity was reserved up front, so this push cannot reallocate
        // and existing node addresses stay put.
        self.chunks
            .last_mut()
            .expect("chunk list non-empty after reserve")
            .push(N::default());
        let handle = NodeHandle::new(self.len);
        self.len += 1;
        Ok(handle)
    }
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self::new()
    }
}
