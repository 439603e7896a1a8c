use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::iter::Iter;
use crate::node::{Node, Tree};
use crate::pool::Heap;
use crate::traits::{Comparator, NodeAlloc};

/// Purely functional operations on a treap.
///
/// A handle carries the key order, the weight order and the node allocator.
/// It holds no tree state: roots are passed in and new roots are returned,
/// and the roots passed in are never modified. Weights form a min-heap, so
/// the entry with the smallest weight sits at the root; wrap the weight
/// comparator in [`max_heap`](crate::max_heap) to flip that.
///
/// All operations run in `O(log n)` expected time when weights are drawn
/// independently of keys (random or otherwise uncorrelated priorities).
/// Monotonic weights degrade the tree to a list and every operation to
/// `O(n)`, but no operation recurses per level, so such trees are still
/// safe to build, update and drop.
pub struct Handle<K, V, W, KC, WC, A = Heap> {
    compare_keys: KC,
    compare_weights: WC,
    alloc: A,
    _marker: PhantomData<fn() -> (K, V, W)>,
}

/// What the upsert family writes at the matching key.
enum Write<'k, K, V> {
    /// Create if absent; overwrite value and weight if present and `update`.
    Entry { key: K, value: V, update: bool },
    /// Overwrite the weight of a present entry, keep its value.
    Weight { key: &'k K },
}

impl<K, V> Write<'_, K, V> {
    fn key(&self) -> &K {
        match self {
            Write::Entry { key, .. } => key,
            Write::Weight { key } => key,
        }
    }
}

enum Outcome<K, V, W> {
    /// Nothing to do; the caller's subtree stays as it is.
    Unchanged,
    Replaced {
        node: Arc<Node<K, V, W>>,
        created: bool,
    },
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

type NoVeto<K, V, W> = fn(&Node<K, V, W>) -> bool;

impl<K, V, W, KC, WC> Handle<K, V, W, KC, WC> {
    pub fn new(compare_keys: KC, compare_weights: WC) -> Self {
        Self::with_alloc(compare_keys, compare_weights, Heap)
    }
}

impl<K, V, W, KC, WC, A> Handle<K, V, W, KC, WC, A> {
    /// Build nodes through `alloc` instead of the global heap, e.g. a shared
    /// [`NodePool`](crate::NodePool).
    pub fn with_alloc(compare_keys: KC, compare_weights: WC, alloc: A) -> Self {
        Self {
            compare_keys,
            compare_weights,
            alloc,
            _marker: PhantomData,
        }
    }

    pub fn compare_keys(&self) -> &KC {
        &self.compare_keys
    }

    pub fn compare_weights(&self) -> &WC {
        &self.compare_weights
    }

    pub fn alloc(&self) -> &A {
        &self.alloc
    }

    /// In-order (ascending key) traversal of one snapshot.
    pub fn iter<'a>(&self, root: &'a Tree<K, V, W>) -> Iter<'a, K, V, W> {
        Iter::new(root)
    }
}

impl<K, V, W, KC, WC, A> Handle<K, V, W, KC, WC, A>
where
    KC: Comparator<K>,
{
    /// Value stored under `key`.
    pub fn get<'a>(&self, root: &'a Tree<K, V, W>, key: &K) -> Option<&'a V> {
        self.get_node(root, key).map(|node| node.value())
    }

    /// The subtree whose root holds `key`.
    pub fn get_node<'a>(
        &self,
        root: &'a Tree<K, V, W>,
        key: &K,
    ) -> Option<&'a Arc<Node<K, V, W>>> {
        let mut cur = root.as_ref();
        while let Some(node) = cur {
            match self.compare_keys.compare(key, &node.key) {
                Ordering::Less => cur = node.left.as_ref(),
                Ordering::Greater => cur = node.right.as_ref(),
                Ordering::Equal => return Some(node),
            }
        }
        None
    }
}

impl<K, V, W, KC, WC, A> Handle<K, V, W, KC, WC, A>
where
    K: Clone,
    V: Clone,
    W: Clone,
    KC: Comparator<K>,
    WC: Comparator<W>,
    A: NodeAlloc<K, V, W>,
{
    /// Add an entry. Returns `false` and the very same root if `key` is
    /// already present.
    pub fn insert(
        &self,
        root: &Tree<K, V, W>,
        key: K,
        value: V,
        weight: W,
    ) -> (Tree<K, V, W>, bool) {
        let write = Write::Entry {
            key,
            value,
            update: false,
        };
        self.apply(root, weight, write, None::<NoVeto<K, V, W>>)
    }

    /// Add or overwrite an entry. The flag reports whether the key was
    /// created (`true`) rather than updated.
    pub fn upsert(
        &self,
        root: &Tree<K, V, W>,
        key: K,
        value: V,
        weight: W,
    ) -> (Tree<K, V, W>, bool) {
        let write = Write::Entry {
            key,
            value,
            update: true,
        };
        self.apply(root, weight, write, None::<NoVeto<K, V, W>>)
    }

    /// [`upsert`](Self::upsert), except that an existing entry is only
    /// overwritten when `accept` returns `true` for it. On a veto the input
    /// root is returned and nothing is allocated.
    pub fn upsert_if<F>(
        &self,
        root: &Tree<K, V, W>,
        key: K,
        value: V,
        weight: W,
        accept: F,
    ) -> (Tree<K, V, W>, bool)
    where
        F: FnOnce(&Node<K, V, W>) -> bool,
    {
        let write = Write::Entry {
            key,
            value,
            update: true,
        };
        self.apply(root, weight, write, Some(accept))
    }

    /// Change the weight of an existing entry. The flag is `false`, and the
    /// root is returned as is, when `key` is absent.
    pub fn set_weight(
        &self,
        root: &Tree<K, V, W>,
        key: &K,
        weight: W,
    ) -> (Tree<K, V, W>, bool) {
        let write = Write::Weight { key };
        match self.upsert_at(root, weight, write, None::<NoVeto<K, V, W>>) {
            Outcome::Unchanged => (root.clone(), false),
            Outcome::Replaced { node, .. } => (Some(node), true),
        }
    }

    /// Partition into keys below and above `key`. An entry stored under
    /// `key` itself ends up in neither half.
    pub fn split(&self, root: &Tree<K, V, W>, key: &K) -> (Tree<K, V, W>, Tree<K, V, W>) {
        let (left, right, _) = self.split_at(root, key);
        trace_log!(
            left = left.is_some(),
            right = right.is_some(),
            "treap split"
        );
        (left, right)
    }

    /// Join two treaps. Every key of `left` must be smaller than every key of
    /// `right`; this is only checked in debug builds.
    pub fn merge(&self, left: &Tree<K, V, W>, right: &Tree<K, V, W>) -> Tree<K, V, W> {
        debug_assert!(self.is_ordered_pair(left, right), "merge: key ranges overlap");
        self.merge_trees(left, right)
    }

    /// Remove `key`. Returns the same root when `key` is absent.
    pub fn delete(&self, root: &Tree<K, V, W>, key: &K) -> Tree<K, V, W> {
        let (left, right, removed) = self.split_at(root, key);
        trace_log!(found = removed.is_some(), "treap delete");
        match removed {
            Some(_) => self.merge_trees(&left, &right),
            None => root.clone(),
        }
    }

    /// Take the root entry, i.e. the one with the smallest weight, and
    /// return its value with the merge of its children.
    ///
    /// Same result as deleting the root's key, without the split.
    pub fn pop(&self, root: &Tree<K, V, W>) -> (Option<V>, Tree<K, V, W>) {
        trace_log!(empty = root.is_none(), "treap pop");
        match root {
            None => (None, None),
            Some(node) => (
                Some(node.value.clone()),
                self.merge_trees(&node.left, &node.right),
            ),
        }
    }

    fn apply<F>(
        &self,
        root: &Tree<K, V, W>,
        weight: W,
        write: Write<'_, K, V>,
        accept: Option<F>,
    ) -> (Tree<K, V, W>, bool)
    where
        F: FnOnce(&Node<K, V, W>) -> bool,
    {
        match self.upsert_at(root, weight, write, accept) {
            Outcome::Unchanged => (root.clone(), false),
            Outcome::Replaced { node, created } => (Some(node), created),
        }
    }

    fn upsert_at<F>(
        &self,
        tree: &Tree<K, V, W>,
        weight: W,
        write: Write<'_, K, V>,
        accept: Option<F>,
    ) -> Outcome<K, V, W>
    where
        F: FnOnce(&Node<K, V, W>) -> bool,
    {
        let mut path: Vec<(&Arc<Node<K, V, W>>, Side)> = Vec::new();
        let mut cur = tree.as_ref();
        let (mut node, created) = loop {
            let Some(at) = cur else {
                match write {
                    Write::Entry { key, value, .. } => {
                        break (self.alloc.alloc(Node::new(key, value, weight)), true)
                    }
                    Write::Weight { .. } => return Outcome::Unchanged,
                }
            };
            match self.compare_keys.compare(write.key(), &at.key) {
                Ordering::Less => {
                    path.push((at, Side::Left));
                    cur = at.left.as_ref();
                }
                Ordering::Greater => {
                    path.push((at, Side::Right));
                    cur = at.right.as_ref();
                }
                Ordering::Equal => {
                    let value = match write {
                        Write::Entry { update: false, .. } => return Outcome::Unchanged,
                        Write::Entry { value, .. } => value,
                        Write::Weight { .. } => at.value.clone(),
                    };
                    if accept.is_some_and(|accept| !accept(at.as_ref())) {
                        return Outcome::Unchanged;
                    }
                    let replaced = self.join(
                        at.key.clone(),
                        value,
                        weight,
                        at.left.clone(),
                        at.right.clone(),
                    );
                    break (replaced, false);
                }
            }
        };

        // rebuild the search path bottom-up, rotating where the new child is lighter
        for (parent, side) in path.into_iter().rev() {
            let (left, right) = match side {
                Side::Left => (Some(node), parent.right.clone()),
                Side::Right => (parent.left.clone(), Some(node)),
            };
            node = self.join(
                parent.key.clone(),
                parent.value.clone(),
                parent.weight.clone(),
                left,
                right,
            );
        }
        Outcome::Replaced { node, created }
    }

    /// Build a node over `left`/`right` and restore the heap order locally.
    ///
    /// A child lighter than `weight` is rotated above the new node; the
    /// lighter of two such children wins, the left one on ties. When only
    /// one child changed this is a single rotation. A node whose weight grew
    /// keeps sinking until both children are at least as heavy.
    fn join(
        &self,
        key: K,
        value: V,
        weight: W,
        mut left: Tree<K, V, W>,
        mut right: Tree<K, V, W>,
    ) -> Arc<Node<K, V, W>> {
        let mut lifted: Vec<(Arc<Node<K, V, W>>, Side)> = Vec::new();
        loop {
            let lift = match (self.lighter(&left, &weight), self.lighter(&right, &weight)) {
                (Some(l), Some(r))
                    if self.compare_weights.compare(&r.weight, &l.weight).is_lt() =>
                {
                    Side::Right
                }
                (Some(_), _) => Side::Left,
                (None, Some(_)) => Side::Right,
                (None, None) => break,
            };
            match (lift, left.take(), right.take()) {
                // left rotation: the left child moves above the sinking node
                (Side::Left, Some(l), r) => {
                    left = l.right.clone();
                    right = r;
                    lifted.push((l, Side::Left));
                }
                // right rotation
                (Side::Right, l, Some(r)) => {
                    left = l;
                    right = r.left.clone();
                    lifted.push((r, Side::Right));
                }
                (_, l, r) => {
                    left = l;
                    right = r;
                    break;
                }
            }
        }

        let mut node = self
            .alloc
            .alloc(Node::with_children(key, value, weight, left, right));
        for (upper, side) in lifted.into_iter().rev() {
            node = match side {
                Side::Left => self.copy_with(&upper, upper.left.clone(), Some(node)),
                Side::Right => self.copy_with(&upper, Some(node), upper.right.clone()),
            };
        }
        node
    }

    fn lighter<'t>(
        &self,
        tree: &'t Tree<K, V, W>,
        weight: &W,
    ) -> Option<&'t Arc<Node<K, V, W>>> {
        tree.as_ref()
            .filter(|child| self.compare_weights.compare(&child.weight, weight).is_lt())
    }

    fn copy_with(
        &self,
        node: &Node<K, V, W>,
        left: Tree<K, V, W>,
        right: Tree<K, V, W>,
    ) -> Arc<Node<K, V, W>> {
        self.alloc.alloc(Node::with_children(
            node.key.clone(),
            node.value.clone(),
            node.weight.clone(),
            left,
            right,
        ))
    }

    /// Split with the matched node reported separately.
    ///
    /// Equivalent to upserting a sentinel at `key` whose weight beats every
    /// other weight: each level applies the rotation that would lift the
    /// sentinel, so the halves come out as the sentinel's children.
    fn split_at(
        &self,
        tree: &Tree<K, V, W>,
        key: &K,
    ) -> (Tree<K, V, W>, Tree<K, V, W>, Option<Arc<Node<K, V, W>>>) {
        let mut path: Vec<(&Arc<Node<K, V, W>>, Side)> = Vec::new();
        let mut cur = tree.as_ref();
        let (mut left, mut right, hit) = loop {
            let Some(node) = cur else {
                break (None, None, None);
            };
            match self.compare_keys.compare(key, &node.key) {
                Ordering::Less => {
                    path.push((node, Side::Left));
                    cur = node.left.as_ref();
                }
                Ordering::Greater => {
                    path.push((node, Side::Right));
                    cur = node.right.as_ref();
                }
                Ordering::Equal => {
                    break (node.left.clone(), node.right.clone(), Some(node.clone()));
                }
            }
        };

        for (node, side) in path.into_iter().rev() {
            match side {
                Side::Left => right = Some(self.copy_with(node, right, node.right.clone())),
                Side::Right => left = Some(self.copy_with(node, node.left.clone(), left)),
            }
        }
        (left, right, hit)
    }

    fn merge_trees(&self, left: &Tree<K, V, W>, right: &Tree<K, V, W>) -> Tree<K, V, W> {
        // each step keeps the lighter root on top; ties go to the right root
        let mut path: Vec<(&Arc<Node<K, V, W>>, Side)> = Vec::new();
        let (mut l, mut r) = (left, right);
        let mut merged = loop {
            match (l, r) {
                (None, _) => break r.clone(),
                (_, None) => break l.clone(),
                (Some(ln), Some(rn)) => {
                    if self.compare_weights.compare(&ln.weight, &rn.weight).is_lt() {
                        path.push((ln, Side::Left));
                        l = &ln.right;
                    } else {
                        path.push((rn, Side::Right));
                        r = &rn.left;
                    }
                }
            }
        };

        for (node, side) in path.into_iter().rev() {
            merged = Some(match side {
                Side::Left => self.copy_with(node, node.left.clone(), merged),
                Side::Right => self.copy_with(node, merged, node.right.clone()),
            });
        }
        merged
    }

    fn is_ordered_pair(&self, left: &Tree<K, V, W>, right: &Tree<K, V, W>) -> bool {
        match (extreme(left, Side::Right), extreme(right, Side::Left)) {
            (Some(max), Some(min)) => self.compare_keys.compare(&max.key, &min.key).is_lt(),
            _ => true,
        }
    }
}

impl<K, V, W, KC, WC, A> Handle<K, V, W, KC, WC, A>
where
    KC: Comparator<K>,
    WC: Comparator<W>,
{
    /// Check the search-tree order on keys (which implies key uniqueness)
    /// and the heap order on weights for every node of `root`.
    pub fn is_well_formed(&self, root: &Tree<K, V, W>) -> bool {
        let mut stack: Vec<(&Node<K, V, W>, Option<&K>, Option<&K>)> = Vec::new();
        if let Some(node) = root.as_deref() {
            stack.push((node, None, None));
        }

        while let Some((node, lo, hi)) = stack.pop() {
            if lo.is_some_and(|lo| !self.compare_keys.compare(lo, &node.key).is_lt())
                || hi.is_some_and(|hi| !self.compare_keys.compare(&node.key, hi).is_lt())
            {
                return false;
            }
            for child in [&node.left, &node.right].into_iter().flatten() {
                if self.compare_weights.compare(&child.weight, &node.weight).is_lt() {
                    return false;
                }
            }
            if let Some(left) = node.left.as_deref() {
                stack.push((left, lo, Some(&node.key)));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, Some(&node.key), hi));
            }
        }
        true
    }
}

fn extreme<K, V, W>(tree: &Tree<K, V, W>, side: Side) -> Option<&Node<K, V, W>> {
    let mut node = tree.as_deref()?;
    loop {
        let next = match side {
            Side::Left => node.left.as_deref(),
            Side::Right => node.right.as_deref(),
        };
        match next {
            Some(next) => node = next,
            None => return Some(node),
        }
    }
}

impl<K, V, W, KC: Clone, WC: Clone, A: Clone> Clone for Handle<K, V, W, KC, WC, A> {
    fn clone(&self) -> Self {
        Self::with_alloc(
            self.compare_keys.clone(),
            self.compare_weights.clone(),
            self.alloc.clone(),
        )
    }
}

impl<K, V, W, KC, WC, A> fmt::Debug for Handle<K, V, W, KC, WC, A>
where
    KC: fmt::Debug,
    WC: fmt::Debug,
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("compare_keys", &self.compare_keys)
            .field("compare_weights", &self.compare_weights)
            .field("alloc", &self.alloc)
            .finish()
    }
}
