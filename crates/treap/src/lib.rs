//! Persistent treap.
//!
//! A treap is a binary search tree on keys and, at the same time, a binary
//! heap on weights. Every operation in [`Handle`] returns a new root and
//! leaves the roots it was given untouched: unmodified subtrees are shared
//! through [`Arc`](std::sync::Arc) between the old and the new version.
//! Readers may therefore walk any previously published root while a writer
//! derives the next one, without any coordination.
//!
//! ```
//! use treap::{Handle, Natural, Tree};
//!
//! let handle = Handle::new(Natural, Natural);
//! let root: Tree<i32, &str, i32> = None;
//!
//! let (root, _) = handle.insert(&root, 7, "a", 1);
//! let (root, _) = handle.insert(&root, 2, "b", 11);
//! let (next, _) = handle.insert(&root, 13, "c", -1);
//!
//! assert_eq!(next.as_ref().map(|n| *n.key()), Some(13));
//! assert_eq!(handle.get(&root, &13), None);
//!
//! let (value, _) = handle.pop(&next);
//! assert_eq!(value, Some("c"));
//! ```

#[macro_use]
mod tracing_helpers;

mod comparator;
mod handle;
mod iter;
mod node;
mod pool;
mod traits;

pub use comparator::{ByKey, Bytes, Float, Natural, Nullable, Reverse, Then, max_heap};
pub use handle::Handle;
pub use iter::Iter;
pub use node::{Node, Tree};
pub use pool::{Heap, NodePool, PoolStats};
pub use traits::{Comparator, NodeAlloc};
