// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory R-tree: insert, bulk load, and query.

use understory_rtree::{RTree, Rect};

fn main() {
    let mut tree: RTree<(Rect<i64>, u32)> = RTree::new(6);
    tree.insert((Rect::new(0, 0, 10, 10), 1));
    tree.insert((Rect::new(5, 5, 15, 15), 2));

    // Pack a batch of small boxes along the diagonal.
    tree.bulk_load((0..100_u32).map(|i| {
        let p = i64::from(i) * 20;
        (Rect::new(p, p, p + 4, p + 4), 100 + i)
    }));

    let hits: Vec<_> = tree.search(&Rect::point(6, 6));
    println!("hits at (6,6): {:?}", hits);

    let inside: Vec<_> = tree.search_containing(&Rect::new(6, 6, 9, 9));
    println!("boxes containing (6,6)-(9,9): {:?}", inside);

    println!("{} items, height {}", tree.len(), tree.height());
}
