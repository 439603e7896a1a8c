use std::cmp::Ordering;
use std::sync::Arc;

use crate::node::Node;

/// Three-way total order.
///
/// Implementations must be antisymmetric and transitive. Absent values are
/// expressed as `Option<T>` and sort before every present value; see
/// [`Nullable`](crate::Nullable).
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Source of node storage for a [`Handle`](crate::Handle).
///
/// Every node the handle creates goes through `alloc`. The returned `Arc`
/// must be uniquely owned.
pub trait NodeAlloc<K, V, W> {
    fn alloc(&self, node: Node<K, V, W>) -> Arc<Node<K, V, W>>;
}

impl<K, V, W, A> NodeAlloc<K, V, W> for &A
where
    A: NodeAlloc<K, V, W> + ?Sized,
{
    fn alloc(&self, node: Node<K, V, W>) -> Arc<Node<K, V, W>> {
        (**self).alloc(node)
    }
}

impl<K, V, W, A> NodeAlloc<K, V, W> for Arc<A>
where
    A: NodeAlloc<K, V, W> + ?Sized,
{
    fn alloc(&self, node: Node<K, V, W>) -> Arc<Node<K, V, W>> {
        (**self).alloc(node)
    }
}
