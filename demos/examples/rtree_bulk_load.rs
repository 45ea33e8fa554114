// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bulk loading.
//!
//! Pack a grid of tiles into a tree, then merge a second, smaller batch into it.
//! Bulk loads log their tiling and merge decisions at `debug`.
//!
//! Run:
//! - `RUST_LOG=understory_rtree=debug cargo run -p understory_demos --example rtree_bulk_load`

use understory_rtree::{Bounded, RTree, Rect};

#[derive(Debug)]
struct Tile {
    col: i32,
    row: i32,
}

impl Bounded for Tile {
    type Coord = i32;

    fn bounds(&self) -> Rect<i32> {
        let (x, y) = (self.col * 256, self.row * 256);
        Rect::new(x, y, x + 255, y + 255)
    }
}

fn main() {
    env_logger::init();

    let mut tree = RTree::default();
    tree.bulk_load((0..64).flat_map(|row| (0..64).map(move |col| Tile { col, row })));
    println!(
        "packed {} tiles: height {}, bounds {:?}",
        tree.len(),
        tree.height(),
        tree.bounds()
    );

    // A second batch far to the right; merged as a shorter subtree.
    tree.bulk_load((0..8).flat_map(|row| (100..108).map(move |col| Tile { col, row })));
    println!("after merge: {} tiles, height {}", tree.len(), tree.height());

    let viewport = Rect::new(1_024, 1_024, 2_000, 1_600);
    let visible = tree.search(&viewport);
    println!("{} tiles visible in {viewport:?}", visible.len());
    assert_eq!(visible.len(), 4 * 3);

    let under_cursor = tree.search_containing(&Rect::point(25_700, 300));
    println!("under cursor: {under_cursor:?}");
    assert_eq!(under_cursor.len(), 1);
}
