use std::fmt;
use std::sync::Arc;

/// A (possibly empty) persistent treap. `None` is the empty tree.
pub type Tree<K, V, W> = Option<Arc<Node<K, V, W>>>;

/// An immutable treap cell.
///
/// Nodes are only ever read through shared references, so a node that has
/// been handed out as part of a [`Tree`] never changes. Every logical update
/// builds a new node and reuses the untouched children.
#[derive(Clone)]
pub struct Node<K, V, W> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) weight: W,
    pub(crate) left: Tree<K, V, W>,
    pub(crate) right: Tree<K, V, W>,
}

impl<K, V, W> Node<K, V, W> {
    /// A detached leaf.
    pub fn new(key: K, value: V, weight: W) -> Self {
        Self::with_children(key, value, weight, None, None)
    }

    pub(crate) fn with_children(
        key: K,
        value: V,
        weight: W,
        left: Tree<K, V, W>,
        right: Tree<K, V, W>,
    ) -> Self {
        Self {
            key,
            value,
            weight,
            left,
            right,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn weight(&self) -> &W {
        &self.weight
    }

    pub fn left(&self) -> &Tree<K, V, W> {
        &self.left
    }

    pub fn right(&self) -> &Tree<K, V, W> {
        &self.right
    }

    /// Entry triple, for pattern matching in loops.
    pub fn entry(&self) -> (&K, &V, &W) {
        (&self.key, &self.value, &self.weight)
    }
}

// Frees exclusively owned descendants with an explicit stack, so dropping a
// degenerate (list-shaped) tree does not recurse once per level.
impl<K, V, W> Drop for Node<K, V, W> {
    fn drop(&mut self) {
        let mut pending: Vec<Arc<Node<K, V, W>>> = Vec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());
        while let Some(node) = pending.pop() {
            // a subtree still shared with another root is only released
            if let Some(mut node) = Arc::into_inner(node) {
                pending.extend(node.left.take());
                pending.extend(node.right.take());
            }
        }
    }
}

impl<K, V, W> fmt::Debug for Node<K, V, W>
where
    K: fmt::Debug,
    V: fmt::Debug,
    W: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("weight", &self.weight)
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}
