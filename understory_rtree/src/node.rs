// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena nodes and the split / subtree-choice heuristics.

use alloc::vec::Vec;

use crate::types::{Coord, Rect};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

/// A stored item together with the rectangle it reported on insert.
#[derive(Clone, Debug)]
pub(crate) struct Entry<C, I> {
    pub(crate) rect: Rect<C>,
    pub(crate) item: I,
}

#[derive(Clone, Debug)]
pub(crate) enum Children<C, I> {
    Leaf(Vec<Entry<C, I>>),
    Branch(Vec<NodeIdx>),
}

#[derive(Clone, Debug)]
pub(crate) struct Node<C, I> {
    /// Tight MBR of `children`.
    pub(crate) rect: Rect<C>,
    /// 1 for leaves.
    pub(crate) height: usize,
    pub(crate) children: Children<C, I>,
}

impl<C: Coord, I> Node<C, I> {
    pub(crate) fn empty_leaf() -> Self {
        Self {
            rect: Rect::empty(),
            height: 1,
            children: Children::Leaf(Vec::new()),
        }
    }

    pub(crate) fn leaf(entries: Vec<Entry<C, I>>) -> Self {
        Self {
            rect: union_of(&entries, |e| e.rect),
            height: 1,
            children: Children::Leaf(entries),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match &self.children {
            Children::Leaf(entries) => entries.len(),
            Children::Branch(nodes) => nodes.len(),
        }
    }
}

/// Split axis chosen by [`split_children`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

/// MBR of `children`; [`Rect::empty`] when there are none.
pub(crate) fn union_of<X, C: Coord>(children: &[X], rect_of: impl Fn(&X) -> Rect<C>) -> Rect<C> {
    children.iter().fold(Rect::empty(), |mut acc, c| {
        acc.extend(&rect_of(c));
        acc
    })
}

/// Index of the child needing the least area enlargement to cover `target`.
///
/// Ties go to the smaller child area, then to the first child.
pub(crate) fn choose_child<C: Coord>(
    rects: impl IntoIterator<Item = Rect<C>>,
    target: &Rect<C>,
) -> usize {
    let mut best = 0;
    let mut best_cost: Option<(C::Acc, C::Acc)> = None;
    for (i, r) in rects.into_iter().enumerate() {
        let area = r.area();
        let cost = (r.enlarged_area(target) - area, area);
        if best_cost.map(|bc| cost < bc).unwrap_or(true) {
            best_cost = Some(cost);
            best = i;
        }
    }
    best
}

/// Split an overflowing child list in two.
///
/// Sorts `children` along the axis with the smaller total margin over all
/// valid distributions, then cuts at the index with the least overlap between
/// the two halves (ties: least total area, then lowest index). `children` keeps
/// the first half; the second half is returned.
pub(crate) fn split_children<X, C, F>(
    children: &mut Vec<X>,
    min_entries: usize,
    rect_of: F,
) -> (Vec<X>, Axis)
where
    C: Coord,
    F: Fn(&X) -> Rect<C>,
{
    debug_assert!(
        children.len() >= 2 * min_entries,
        "split requires at least two minimally filled halves"
    );
    let axis = choose_split_axis(children, min_entries, &rect_of);
    let index = choose_split_index(children, min_entries, &rect_of);
    log::trace!(
        "split {} children along {:?} at {}",
        children.len(),
        axis,
        index
    );
    (children.split_off(index), axis)
}

/// Leaves `children` sorted by the winning axis.
fn choose_split_axis<X, C, F>(children: &mut [X], min_entries: usize, rect_of: &F) -> Axis
where
    C: Coord,
    F: Fn(&X) -> Rect<C>,
{
    let x_margin = all_dist_margin(children, min_entries, rect_of, Axis::X);
    let y_margin = all_dist_margin(children, min_entries, rect_of, Axis::Y);

    // Already sorted by y from the second pass.
    if x_margin < y_margin {
        sort_by_axis(children, rect_of, Axis::X);
        Axis::X
    } else {
        Axis::Y
    }
}

fn sort_by_axis<X, C, F>(children: &mut [X], rect_of: &F, axis: Axis)
where
    C: Coord,
    F: Fn(&X) -> Rect<C>,
{
    match axis {
        Axis::X => children.sort_by(|a, b| rect_of(a).compare_min_x(&rect_of(b))),
        Axis::Y => children.sort_by(|a, b| rect_of(a).compare_min_y(&rect_of(b))),
    }
}

/// Sum of the margins of both halves over every split position in
/// `min_entries..=len - min_entries`, built incrementally from each end.
fn all_dist_margin<X, C, F>(
    children: &mut [X],
    min_entries: usize,
    rect_of: &F,
    axis: Axis,
) -> C::Acc
where
    C: Coord,
    F: Fn(&X) -> Rect<C>,
{
    sort_by_axis(children, rect_of, axis);
    let n = children.len();

    let mut left = union_of(&children[..min_entries], rect_of);
    let mut right = union_of(&children[n - min_entries..], rect_of);
    let mut margin = left.margin() + right.margin();

    for c in &children[min_entries..n - min_entries] {
        left.extend(&rect_of(c));
        margin = margin + left.margin();
    }
    for c in children[min_entries..n - min_entries].iter().rev() {
        right.extend(&rect_of(c));
        margin = margin + right.margin();
    }
    margin
}

fn choose_split_index<X, C, F>(children: &[X], min_entries: usize, rect_of: &F) -> usize
where
    C: Coord,
    F: Fn(&X) -> Rect<C>,
{
    let n = children.len();
    let mut index = min_entries;
    let mut best: Option<(C::Acc, C::Acc)> = None;

    for i in min_entries..=n - min_entries {
        let left = union_of(&children[..i], rect_of);
        let right = union_of(&children[i..], rect_of);
        let cost = (left.intersection_area(&right), left.area() + right.area());
        if best.map(|b| cost < b).unwrap_or(true) {
            best = Some(cost);
            index = i;
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn r(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Rect<i32> {
        Rect::new(min_x, min_y, max_x, max_y)
    }

    #[test]
    fn choose_child_prefers_least_enlargement() {
        let children = [r(0, 0, 10, 10), r(20, 0, 30, 10)];
        assert_eq!(choose_child(children, &r(21, 1, 22, 2)), 1);
        assert_eq!(choose_child(children, &r(9, 9, 11, 11)), 0);
    }

    #[test]
    fn choose_child_ties_on_area_then_first() {
        // Both contain the target (zero enlargement); smaller area wins.
        let nested = [r(0, 0, 10, 10), r(0, 0, 5, 5)];
        assert_eq!(choose_child(nested, &r(1, 1, 2, 2)), 1);
        // Identical candidates: first wins.
        let twins = [r(0, 0, 4, 4), r(0, 0, 4, 4)];
        assert_eq!(choose_child(twins, &r(1, 1, 2, 2)), 0);
    }

    #[test]
    fn split_picks_the_gap_axis() {
        // Two columns far apart on x, interleaved on y.
        let mut v = vec![
            r(0, 0, 1, 1),
            r(100, 2, 101, 3),
            r(0, 4, 1, 5),
            r(100, 6, 101, 7),
            r(0, 8, 1, 9),
        ];
        let (right, axis) = split_children(&mut v, 2, |c| *c);
        assert_eq!(axis, Axis::X);
        assert!(v.iter().all(|c| c.min_x == 0));
        assert!(right.iter().all(|c| c.min_x == 100));
        assert_eq!(v.len() + right.len(), 5);
    }

    #[test]
    fn split_respects_min_entries() {
        let mut v: Vec<Rect<i32>> = (0..10).map(|i| r(i, 0, i + 1, 1)).collect();
        let (right, _) = split_children(&mut v, 4, |c| *c);
        assert!(v.len() >= 4 && right.len() >= 4);
        // Disjoint halves along x.
        let lu = union_of(&v, |c| *c);
        let ru = union_of(&right, |c| *c);
        assert_eq!(lu.intersection_area(&ru), 0);
    }

    #[test]
    fn split_index_first_minimum_wins() {
        // Evenly spaced disjoint boxes: every cut has zero overlap; the total
        // area is also equal, so the lowest valid index is chosen.
        let v: Vec<Rect<i32>> = (0..6).map(|i| r(i * 10, 0, i * 10, 0)).collect();
        assert_eq!(choose_split_index(&v, 2, &|c: &Rect<i32>| *c), 2);
    }

    #[test]
    fn union_of_empty_is_empty() {
        let v: Vec<Rect<i32>> = Vec::new();
        assert!(union_of(&v, |c| *c).is_empty());
    }

    #[test]
    fn all_dist_margin_matches_brute_force() {
        let mut v = vec![
            r(5, 1, 6, 9),
            r(0, 0, 2, 2),
            r(3, 3, 8, 4),
            r(1, 7, 2, 8),
            r(9, 0, 10, 1),
        ];
        let m = 2;
        let total = all_dist_margin(&mut v, m, &|c: &Rect<i32>| *c, Axis::X);
        let mut expected =
            union_of(&v[..m], |c| *c).margin() + union_of(&v[5 - m..], |c| *c).margin();
        for i in m..5 - m {
            expected += union_of(&v[..=i], |c| *c).margin();
            expected += union_of(&v[i..], |c| *c).margin();
        }
        assert_eq!(total, expected);
    }
}
