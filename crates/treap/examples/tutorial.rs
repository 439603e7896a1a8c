//! A treap is a map and a priority queue at once.
//!
//! Run with `cargo run -p treap --example tutorial`.

use treap::{Handle, Natural, Tree};

struct Boxer {
    first_name: &'static str,
    last_name: &'static str,
    weight: u32,
}

const BOXERS: [Boxer; 4] = [
    Boxer {
        first_name: "Cassius",
        last_name: "Clay",
        weight: 210,
    },
    Boxer {
        first_name: "Joe",
        last_name: "Frazier",
        weight: 215,
    },
    Boxer {
        first_name: "Marcel",
        last_name: "Cerdan",
        weight: 154,
    },
    Boxer {
        first_name: "Jake",
        last_name: "LaMotta",
        weight: 160,
    },
];

fn main() {
    // Keys order the search tree, weights order the heap. Wrap the weight
    // comparator in `treap::max_heap` to pop the heaviest entry first.
    let handle = Handle::new(Natural, Natural);

    // Every write returns a new root; the old one stays valid.
    let mut root: Tree<&str, &str, u32> = None;
    for boxer in &BOXERS {
        root = handle
            .insert(&root, boxer.first_name, boxer.last_name, boxer.weight)
            .0;
    }

    if let Some(last) = handle.get(&root, &"Cassius") {
        println!("Cassius => {last}");
    }

    if let Some(head) = &root {
        let (first, last, weight) = head.entry();
        println!("Head node is:\t\t{first} {last}, {weight} lbs");
    }

    // `pop` hands back the value only; read the key off the root first.
    let head_key = root.as_ref().map(|head| *head.key());
    let (popped, _) = handle.pop(&root);
    if let (Some(first), Some(last)) = (head_key, popped) {
        println!("Popped head node:\t{first} {last}");
    }

    // Jake LaMotta moved up a weight class late in his career.
    root = handle.set_weight(&root, &"Jake", 205).0;

    // Popping is merging the root's children, so draining the heap is a loop.
    println!("\n[ heap traversal... ]");
    let mut heap = root.clone();
    while let Some(node) = heap {
        println!("{} {}: {}", node.key(), node.value(), node.weight());
        heap = handle.merge(node.left(), node.right());
    }

    println!("\n[ binary search-tree traversal (keys sorted alphabetically)... ]");
    for (i, node) in handle.iter(&root).enumerate() {
        let (first, last, weight) = node.entry();
        println!("[{i}] {first} {last}: {weight}");
    }
}
