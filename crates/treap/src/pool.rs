//! Node storage strategies.
//!
//! [`Heap`] allocates every node afresh and leaves reclamation to `Arc`.
//! [`NodePool`] keeps a free list of node allocations for write-heavy
//! workloads; trees are handed back to it with [`NodePool::recycle`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::node::{Node, Tree};
use crate::traits::NodeAlloc;

/// Plain `Arc::new` for every node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Heap;

impl<K, V, W> NodeAlloc<K, V, W> for Heap {
    fn alloc(&self, node: Node<K, V, W>) -> Arc<Node<K, V, W>> {
        Arc::new(node)
    }
}

/// Counters of a [`NodePool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Allocations served from the free list.
    pub reused: usize,
    /// Allocations that fell through to the heap.
    pub fresh: usize,
    /// Allocations currently parked in the free list.
    pub idle: usize,
}

/// A thread-safe free list of node allocations.
///
/// Recycling needs proof that nothing else can reach a node. Here the proof
/// is the reference count: [`recycle`](Self::recycle) only takes nodes for
/// which the caller holds the last `Arc`, and walks into children only once
/// they became exclusively owned that way. Nodes still shared with another
/// root are merely released, so every other tree stays intact.
///
/// Parked allocations keep their old key, value and weight until they are
/// reused or the pool is dropped.
pub struct NodePool<K, V, W> {
    free: Mutex<Vec<Arc<Node<K, V, W>>>>,
    capacity: usize,
    reused: AtomicUsize,
    fresh: AtomicUsize,
}

impl<K, V, W> NodePool<K, V, W> {
    /// Parked slots still hold their old entry, so a full pool retains this
    /// many keys, values and weights. Lower it, or call
    /// [`clear`](Self::clear), when entries are large.
    pub const DEFAULT_CAPACITY: usize = 4096;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// A pool that parks at most `capacity` allocations; surplus nodes are
    /// freed normally.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            capacity,
            reused: AtomicUsize::new(0),
            fresh: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            reused: self.reused.load(Ordering::Relaxed),
            fresh: self.fresh.load(Ordering::Relaxed),
            idle: self.free.lock().len(),
        }
    }

    /// Give up `tree` and park every node it owned exclusively.
    ///
    /// Returns how many nodes were parked. A tree that shares all of its
    /// nodes with some other live root yields `0`.
    pub fn recycle(&self, tree: Tree<K, V, W>) -> usize {
        let mut pending: Vec<Arc<Node<K, V, W>>> = tree.into_iter().collect();
        let mut reclaimed = Vec::new();

        while let Some(mut node) = pending.pop() {
            // still reachable from elsewhere: dropping our reference is all we may do
            let Some(cell) = Arc::get_mut(&mut node) else {
                continue;
            };
            pending.extend(cell.left.take());
            pending.extend(cell.right.take());
            reclaimed.push(node);
        }

        let parked = {
            let mut free = self.free.lock();
            let room = self.capacity.saturating_sub(free.len());
            let parked = room.min(reclaimed.len());
            free.extend(reclaimed.drain(..parked));
            parked
        };
        if !reclaimed.is_empty() {
            debug_log!(
                dropped = reclaimed.len(),
                capacity = self.capacity,
                "node pool full"
            );
        }
        trace_log!(parked, "node pool recycle");
        parked
    }

    /// Free every parked allocation together with the entry it still
    /// holds. Returns how many were released.
    pub fn clear(&self) -> usize {
        let drained = std::mem::take(&mut *self.free.lock());
        let released = drained.len();
        // entries are dropped outside the lock
        drop(drained);
        trace_log!(released, "node pool clear");
        released
    }
}

impl<K, V, W> NodeAlloc<K, V, W> for NodePool<K, V, W> {
    fn alloc(&self, node: Node<K, V, W>) -> Arc<Node<K, V, W>> {
        let slot = self.free.lock().pop();
        if let Some(mut slot) = slot {
            if let Some(cell) = Arc::get_mut(&mut slot) {
                *cell = node;
                self.reused.fetch_add(1, Ordering::Relaxed);
                return slot;
            }
        }
        self.fresh.fetch_add(1, Ordering::Relaxed);
        Arc::new(node)
    }
}

impl<K, V, W> Default for NodePool<K, V, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, W> fmt::Debug for NodePool<K, V, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodePool")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats())
            .finish()
    }
}
