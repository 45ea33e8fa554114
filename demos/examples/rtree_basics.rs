// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree basics.
//!
//! Insert a handful of boxes one at a time, watch the root split, and query.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example rtree_basics`

use understory_rtree::{RTree, Rect};

fn main() {
    env_logger::init();

    let mut tree: RTree<(Rect<i32>, &str)> = RTree::new(4);
    for (xy, name) in [(0, "a"), (1, "b"), (2, "c"), (3, "d")] {
        tree.insert((Rect::new(xy, xy, xy + 1, xy + 1), name));
    }
    println!("after 4 inserts: height {}", tree.height());

    // Overflows the root leaf.
    tree.insert((Rect::new(10, 10, 11, 11), "far"));
    println!("after 5 inserts: height {}", tree.height());

    let mut names: Vec<&str> = tree
        .search(&Rect::new(0, 0, 3, 3))
        .into_iter()
        .map(|(_, name)| *name)
        .collect();
    names.sort_unstable();
    println!("intersecting (0,0)-(3,3): {names:?}");
    assert_eq!(names, ["a", "b", "c", "d"]);

    // Shared edges count as intersections.
    assert!(tree.collides(&Rect::point(11, 11)));
    assert!(!tree.collides(&Rect::new(5, 5, 9, 9)));

    let containing = tree.search_containing(&Rect::point(1, 1));
    println!("containing (1,1): {containing:?}");
    println!("{tree:?}");
}
