//! Property-based tests for the treap operations.
//!
//! Differential testing against `BTreeMap`, plus the persistence laws:
//! old roots never change, unchanged outcomes hand back the same root.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;
use treap::{Handle, Natural, Tree};

type H = Handle<u8, u16, i16, Natural, Natural>;
type Root = Tree<u8, u16, i16>;
type Oracle = BTreeMap<u8, (u16, i16)>;

fn handle() -> H {
    Handle::new(Natural, Natural)
}

fn same(a: &Root, b: &Root) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

fn contents(h: &H, root: &Root) -> Vec<(u8, u16, i16)> {
    h.iter(root)
        .map(|n| (*n.key(), *n.value(), *n.weight()))
        .collect()
}

fn flatten(oracle: &Oracle) -> Vec<(u8, u16, i16)> {
    oracle.iter().map(|(&k, &(v, w))| (k, v, w)).collect()
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, u16, i16),
    Upsert(u8, u16, i16),
    UpsertIfGreater(u8, u16, i16),
    SetWeight(u8, i16),
    Delete(u8),
    Pop,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<u8>(), any::<u16>(), any::<i16>()).prop_map(|(k, v, w)| Op::Insert(k, v, w)),
        2 => (any::<u8>(), any::<u16>(), any::<i16>()).prop_map(|(k, v, w)| Op::Upsert(k, v, w)),
        1 => (any::<u8>(), any::<u16>(), any::<i16>())
            .prop_map(|(k, v, w)| Op::UpsertIfGreater(k, v, w)),
        2 => (any::<u8>(), any::<i16>()).prop_map(|(k, w)| Op::SetWeight(k, w)),
        2 => any::<u8>().prop_map(Op::Delete),
        1 => Just(Op::Pop),
    ]
}

/// Apply `op` to both models and check the reported flags agree.
fn step(h: &H, root: &Root, oracle: &mut Oracle, op: &Op) -> Result<Root, TestCaseError> {
    let next = match *op {
        Op::Insert(k, v, w) => {
            let (next, created) = h.insert(root, k, v, w);
            prop_assert_eq!(created, !oracle.contains_key(&k));
            if !created {
                prop_assert!(same(&next, root));
            }
            oracle.entry(k).or_insert((v, w));
            next
        }
        Op::Upsert(k, v, w) => {
            let (next, created) = h.upsert(root, k, v, w);
            prop_assert_eq!(created, oracle.insert(k, (v, w)).is_none());
            next
        }
        Op::UpsertIfGreater(k, v, w) => {
            let (next, created) = h.upsert_if(root, k, v, w, |n| v > *n.value());
            match oracle.get(&k).copied() {
                None => {
                    prop_assert!(created);
                    oracle.insert(k, (v, w));
                }
                Some((old, _)) if v > old => {
                    prop_assert!(!created);
                    oracle.insert(k, (v, w));
                }
                Some(_) => {
                    prop_assert!(!created);
                    prop_assert!(same(&next, root));
                }
            }
            next
        }
        Op::SetWeight(k, w) => {
            let (next, found) = h.set_weight(root, &k, w);
            match oracle.get_mut(&k) {
                Some(entry) => {
                    prop_assert!(found);
                    entry.1 = w;
                }
                None => {
                    prop_assert!(!found);
                    prop_assert!(same(&next, root));
                }
            }
            next
        }
        Op::Delete(k) => {
            let next = h.delete(root, &k);
            if oracle.remove(&k).is_none() {
                prop_assert!(same(&next, root));
            }
            next
        }
        Op::Pop => {
            let (value, next) = h.pop(root);
            match root {
                None => {
                    prop_assert!(value.is_none());
                    prop_assert!(next.is_none());
                }
                Some(top) => {
                    let min = oracle.values().map(|e| e.1).min();
                    prop_assert_eq!(Some(*top.weight()), min);
                    let removed = oracle.remove(top.key()).map(|e| e.0);
                    prop_assert_eq!(value, removed);
                }
            }
            next
        }
    };
    Ok(next)
}

fn entries() -> impl Strategy<Value = Oracle> {
    prop::collection::btree_map(any::<u8>(), (any::<u16>(), any::<i16>()), 0..=128)
}

fn build(h: &H, oracle: &Oracle) -> Root {
    let mut root = None;
    for (&k, &(v, w)) in oracle {
        root = h.insert(&root, k, v, w).0;
    }
    root
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn operations_preserve_invariants(ops in prop::collection::vec(op(), 0..200)) {
        let h = handle();
        let mut root = None;
        let mut oracle = Oracle::new();
        for op in &ops {
            root = step(&h, &root, &mut oracle, op)?;
            prop_assert!(h.is_well_formed(&root), "after {:?}", op);
        }
        prop_assert_eq!(contents(&h, &root), flatten(&oracle));
    }

    #[test]
    fn old_roots_never_change(ops in prop::collection::vec(op(), 0..80)) {
        let h = handle();
        let mut root = None;
        let mut oracle = Oracle::new();
        let mut history = Vec::new();
        for op in &ops {
            history.push((root.clone(), oracle.clone()));
            root = step(&h, &root, &mut oracle, op)?;
        }
        for (snapshot, expected) in &history {
            prop_assert_eq!(contents(&h, snapshot), flatten(expected));
        }
    }

    #[test]
    fn merge_of_split_drops_only_pivot(oracle in entries(), pivot in any::<u8>()) {
        let h = handle();
        let root = build(&h, &oracle);

        let (left, right) = h.split(&root, &pivot);
        prop_assert!(h.is_well_formed(&left));
        prop_assert!(h.is_well_formed(&right));
        prop_assert!(h.iter(&left).all(|n| *n.key() < pivot));
        prop_assert!(h.iter(&right).all(|n| *n.key() > pivot));

        let merged = h.merge(&left, &right);
        prop_assert!(h.is_well_formed(&merged));
        let mut expected = oracle.clone();
        expected.remove(&pivot);
        prop_assert_eq!(contents(&h, &merged), flatten(&expected));
        prop_assert_eq!(contents(&h, &root), flatten(&oracle));
    }

    #[test]
    fn pops_come_out_in_weight_order(oracle in entries()) {
        let h = handle();
        let mut root = build(&h, &oracle);
        let mut last = i16::MIN;
        let mut popped = 0;
        while let Some(top) = root.clone() {
            prop_assert!(last <= *top.weight());
            last = *top.weight();
            let (value, rest) = h.pop(&root);
            prop_assert_eq!(value, Some(*top.value()));
            root = rest;
            popped += 1;
        }
        prop_assert_eq!(popped, oracle.len());
    }

    #[test]
    fn missing_keys_leave_root_identical(
        oracle in entries(),
        key in any::<u8>(),
        w in any::<i16>()
    ) {
        prop_assume!(!oracle.contains_key(&key));
        let h = handle();
        let root = build(&h, &oracle);

        prop_assert!(same(&h.delete(&root, &key), &root));
        let (next, found) = h.set_weight(&root, &key, w);
        prop_assert!(!found);
        prop_assert!(same(&next, &root));
        prop_assert_eq!(h.get(&root, &key), None);
    }
}
