use std::iter::FusedIterator;

use crate::node::{Node, Tree};

/// In-order cursor over one treap snapshot.
///
/// Keeps an explicit stack of ancestors whose right subtree is still to be
/// visited, so traversal depth does not grow the call stack. The snapshot is
/// borrowed and never modified, so any number of iterators may walk the
/// same tree at once. A finished iterator stays finished.
pub struct Iter<'a, K, V, W> {
    stack: Vec<&'a Node<K, V, W>>,
    /// Subtree still to be descended before the next visit.
    pending: Option<&'a Node<K, V, W>>,
}

impl<'a, K, V, W> Iter<'a, K, V, W> {
    pub(crate) fn new(root: &'a Tree<K, V, W>) -> Self {
        Self {
            stack: Vec::new(),
            pending: root.as_deref(),
        }
    }
}

impl<'a, K, V, W> Iterator for Iter<'a, K, V, W> {
    type Item = &'a Node<K, V, W>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.pending {
            self.stack.push(node);
            self.pending = node.left.as_deref();
        }
        let node = self.stack.pop()?;
        self.pending = node.right.as_deref();
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower = self.stack.len() + usize::from(self.pending.is_some());
        (lower, None)
    }
}

impl<K, V, W> FusedIterator for Iter<'_, K, V, W> {}

impl<K, V, W> Clone for Iter<'_, K, V, W> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            pending: self.pending,
        }
    }
}
