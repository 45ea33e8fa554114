// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_rtree --heading-base-level=0

//! Understory R-tree: an in-memory 2D R-tree over integer rectangles.
//!
//! - Insert items one at a time; overflowing nodes are split along the axis
//!   with the smaller total margin, at the cut with the least overlap.
//! - Bulk-load batches with Sort-Tile-Recursive packing, including into a
//!   non-empty tree.
//! - Query by intersection ([`RTree::search`]), by containment
//!   ([`RTree::search_containing`]), or just test for a hit ([`RTree::collides`]).
//!
//! Items are anything implementing [`Bounded`]; [`Rect`] and `(Rect, payload)`
//! pairs work out of the box. Coordinates are integers (`i16`, `i32`, `i64`)
//! and every area or margin metric is computed in a widened accumulator
//! (saturating for `i64`), so rectangles spanning the whole coordinate range
//! never overflow.
//!
//! Bounds are closed: rectangles that only share an edge or a corner intersect.
//!
//! # Example
//!
//! ```rust
//! use understory_rtree::{RTree, Rect};
//!
//! let mut tree: RTree<(Rect<i32>, u32)> = RTree::new(4);
//! for (i, xy) in [0, 1, 2, 3, 10].into_iter().enumerate() {
//!     tree.insert((Rect::new(xy, xy, xy + 1, xy + 1), i as u32));
//! }
//! // The fifth insert overflowed the root leaf.
//! assert_eq!(tree.height(), 2);
//!
//! let mut hits: Vec<u32> = tree
//!     .search(&Rect::new(0, 0, 3, 3))
//!     .into_iter()
//!     .map(|(_, id)| *id)
//!     .collect();
//! hits.sort_unstable();
//! assert_eq!(hits, [0, 1, 2, 3]);
//! assert!(!tree.collides(&Rect::new(5, 5, 9, 9)));
//! ```
//!
//! Bulk loading packs the batch into a balanced subtree:
//!
//! ```rust
//! use understory_rtree::{RTree, Rect};
//!
//! let mut tree = RTree::default();
//! tree.bulk_load((0..1_000).map(|i| Rect::point(i % 100, i / 100)));
//! assert_eq!(tree.len(), 1_000);
//! assert_eq!(tree.search_containing(&Rect::point(42, 7)).len(), 1);
//! ```
//!
//! ## Features
//!
//! - `std` (default): use the standard library for float math in selection.
//! - `libm`: float math for `no_std` builds. One of `std` or `libm` is required.
//! - `serde`: `Serialize`/`Deserialize` for [`Rect`].
//!
//! ## Logging
//!
//! Structural changes are reported through the [`log`](https://docs.rs/log)
//! facade: node splits at `trace`, root growth and bulk-load merges at `debug`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod bounded;
mod error;
mod math;
mod node;
pub mod select;
mod tree;
pub mod types;

pub use bounded::Bounded;
pub use error::{Error, Result};
pub use select::{multi_select, select};
pub use tree::{DEFAULT_MAX_ENTRIES, Iter, MIN_MAX_ENTRIES, RTree};
pub use types::{Coord, Rect, SaturatingI128};
