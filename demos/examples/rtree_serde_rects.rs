// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading rectangles from JSON.
//!
//! Rectangles arrive either as serialized [`Rect`] objects or as bare coordinate
//! arrays (`[x, y]` for a point, `[min_x, min_y, max_x, max_y]` for a box).
//!
//! Run:
//! - `cargo run -p understory_demos --example rtree_serde_rects`

use understory_rtree::{RTree, Rect};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let objects = r#"[
        {"min_x": 0, "min_y": 0, "max_x": 10, "max_y": 10},
        {"min_x": 20, "min_y": 0, "max_x": 30, "max_y": 10}
    ]"#;
    let mut tree: RTree<Rect<i64>> = RTree::default();
    tree.bulk_load(serde_json::from_str::<Vec<Rect<i64>>>(objects)?);

    let arrays = "[[5, 5], [0, 0, 40, 40], [1, 2, 3]]";
    for coords in serde_json::from_str::<Vec<Vec<i64>>>(arrays)? {
        match Rect::try_from(coords.as_slice()) {
            Ok(rect) => tree.insert(rect),
            Err(err) => log::warn!("skipping {coords:?}: {err}"),
        }
    }

    println!("{} rects, bounds {:?}", tree.len(), tree.bounds());
    let hits = tree.search(&Rect::point(5, 5));
    println!("at (5,5): {}", serde_json::to_string(&hits)?);
    assert_eq!(hits.len(), 3);
    Ok(())
}
