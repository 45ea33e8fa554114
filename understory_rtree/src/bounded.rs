// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item capability: anything that can report its bounding rectangle.

use crate::types::{Coord, Rect};

/// An item that can be stored in an [`RTree`](crate::RTree).
///
/// The tree calls [`Bounded::bounds`] once per item, when it is inserted or
/// bulk-loaded, and keeps the result next to the item. Items are never mutated
/// by the tree.
///
/// Implemented for [`Rect`] itself and for `(Rect, P)` pairs, so arbitrary
/// payloads can be indexed without a custom impl:
///
/// ```
/// use understory_rtree::{RTree, Rect};
///
/// let mut tree: RTree<(Rect<i32>, &str)> = RTree::new(4);
/// tree.insert((Rect::new(0, 0, 2, 2), "a"));
/// let hits = tree.search(&Rect::point(1, 1));
/// assert_eq!(hits[0].1, "a");
/// ```
pub trait Bounded {
    /// Coordinate scalar of the bounding rectangle.
    type Coord: Coord;

    /// The item's bounding rectangle.
    fn bounds(&self) -> Rect<Self::Coord>;
}

impl<C: Coord> Bounded for Rect<C> {
    type Coord = C;

    #[inline]
    fn bounds(&self) -> Rect<C> {
        *self
    }
}

impl<C: Coord, P> Bounded for (Rect<C>, P) {
    type Coord = C;

    #[inline]
    fn bounds(&self) -> Rect<C> {
        self.0
    }
}

impl<B: Bounded + ?Sized> Bounded for &B {
    type Coord = B::Coord;

    #[inline]
    fn bounds(&self) -> Rect<B::Coord> {
        (**self).bounds()
    }
}
