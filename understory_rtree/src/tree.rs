// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic R-tree with overlap-minimizing splits and STR bulk loading.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::bounded::Bounded;
use crate::node::{Children, Entry, Node, NodeIdx, choose_child, split_children, union_of};
use crate::select::multi_select;
use crate::types::Rect;

/// Default maximum fan-out.
pub const DEFAULT_MAX_ENTRIES: usize = 9;

/// Smallest accepted maximum fan-out; smaller hints are clamped up to this.
pub const MIN_MAX_ENTRIES: usize = 4;

/// Something to attach below a node: an item into a leaf, or a subtree into a branch.
enum Pending<C, I> {
    Item(Entry<C, I>),
    Subtree(NodeIdx),
}

/// In-memory R-tree over items that report a bounding [`Rect`].
///
/// Nodes live in an arena and are addressed by index. Every traversal uses an
/// explicit stack, so stack depth never depends on the number of items.
pub struct RTree<I: Bounded> {
    max_entries: usize,
    min_entries: usize,
    len: usize,
    root: NodeIdx,
    arena: Vec<Node<I::Coord, I>>,
}

impl<I: Bounded> Default for RTree<I> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl<I: Bounded> RTree<I> {
    /// Create an empty tree holding at most `max_entries` children per node.
    ///
    /// `max_entries` is clamped to at least [`MIN_MAX_ENTRIES`]. Non-root
    /// nodes created by splits hold at least `max(2, ceil(0.4 * max_entries))`
    /// children.
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(MIN_MAX_ENTRIES);
        let min_entries = (max_entries * 2).div_ceil(5).max(2);
        Self {
            max_entries,
            min_entries,
            len: 0,
            root: NodeIdx::new(0),
            arena: vec![Node::empty_leaf()],
        }
    }

    /// Maximum number of children per node.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Minimum number of children for non-root nodes produced by a split.
    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no items are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; 1 while the root is a leaf.
    pub fn height(&self) -> usize {
        self.node(self.root).height
    }

    /// MBR of every stored item, or `None` when empty.
    pub fn bounds(&self) -> Option<Rect<I::Coord>> {
        let rect = self.node(self.root).rect;
        (!rect.is_empty()).then_some(rect)
    }

    /// Remove every item and reset the root to an empty leaf.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.arena.push(Node::empty_leaf());
        self.root = NodeIdx::new(0);
        self.len = 0;
    }

    /// Insert a single item.
    pub fn insert(&mut self, item: I) {
        let rect = item.bounds();
        let level = self.height() - 1;
        self.insert_at(Pending::Item(Entry { rect, item }), rect, level);
        self.len += 1;
    }

    /// Insert a batch of items, building packed subtrees with Sort-Tile-Recursive.
    ///
    /// Into an empty tree the packed subtree becomes the whole tree. Otherwise
    /// it is merged: equal heights share a new root, and the shorter tree is
    /// inserted into the taller one at the level matching its height.
    /// Batches smaller than [`RTree::min_entries`] are inserted one by one.
    ///
    /// Packed trees stay height-balanced and never exceed
    /// [`RTree::max_entries`], but the last tiles of a batch may leave some
    /// non-root nodes with fewer than [`RTree::min_entries`] children.
    pub fn bulk_load<It>(&mut self, items: It)
    where
        It: IntoIterator<Item = I>,
    {
        let items: Vec<I> = items.into_iter().collect();
        if items.is_empty() {
            return;
        }
        if items.len() < self.min_entries {
            for item in items {
                self.insert(item);
            }
            return;
        }

        let count = items.len();
        let mut keys: Vec<(Rect<I::Coord>, usize)> = items
            .iter()
            .enumerate()
            .map(|(slot, item)| (item.bounds(), slot))
            .collect();
        let mut slots: Vec<Option<I>> = items.into_iter().map(Some).collect();

        if self.is_empty() {
            self.arena.clear();
            let built = self.build(&mut keys, &mut slots, 0, count - 1, None);
            log::debug!(
                "bulk load of {count} items into empty tree, height {}",
                self.node(built).height
            );
            self.root = built;
            self.len = count;
            return;
        }

        let built = self.build(&mut keys, &mut slots, 0, count - 1, None);
        self.len += count;
        let (root_height, built_height) = (self.height(), self.node(built).height);

        if root_height == built_height {
            log::debug!("bulk load of {count} items: joining equal-height trees ({root_height})");
            self.grow_root(self.root, built);
        } else {
            let (tall, short) = if root_height < built_height {
                (built, self.root)
            } else {
                (self.root, built)
            };
            self.root = tall;
            let short_height = self.node(short).height;
            let level = self.node(tall).height - short_height - 1;
            log::debug!(
                "bulk load of {count} items: inserting height {short_height} subtree at level {level}"
            );
            let rect = self.node(short).rect;
            self.insert_at(Pending::Subtree(short), rect, level);
        }
    }

    /// Items whose rectangle intersects `rect` (closed bounds).
    pub fn search(&self, rect: &Rect<I::Coord>) -> Vec<&I> {
        let mut out = Vec::new();
        self.search_into(rect, &mut out);
        out
    }

    /// Like [`RTree::search`], reusing `out` as the result buffer. `out` is cleared first.
    pub fn search_into<'a>(&'a self, rect: &Rect<I::Coord>, out: &mut Vec<&'a I>) {
        out.clear();
        if !self.node(self.root).rect.intersects(rect) {
            return;
        }
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            match &self.node(idx).children {
                Children::Leaf(entries) => out.extend(
                    entries
                        .iter()
                        .filter(|e| e.rect.intersects(rect))
                        .map(|e| &e.item),
                ),
                Children::Branch(nodes) => {
                    for &child in nodes {
                        let child_rect = &self.node(child).rect;
                        if !child_rect.intersects(rect) {
                            continue;
                        }
                        if rect.contains(child_rect) {
                            out.extend(Iter::new(&self.arena, child));
                        } else {
                            stack.push(child);
                        }
                    }
                }
            }
        }
    }

    /// Items whose rectangle contains `rect` (closed bounds).
    pub fn search_containing(&self, rect: &Rect<I::Coord>) -> Vec<&I> {
        let mut out = Vec::new();
        self.search_containing_into(rect, &mut out);
        out
    }

    /// Like [`RTree::search_containing`], reusing `out`. `out` is cleared first.
    ///
    /// Every subtree is admitted only if its MBR contains `rect`, and every
    /// item is tested on its own rectangle.
    pub fn search_containing_into<'a>(&'a self, rect: &Rect<I::Coord>, out: &mut Vec<&'a I>) {
        out.clear();
        if !self.node(self.root).rect.contains(rect) {
            return;
        }
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            match &self.node(idx).children {
                Children::Leaf(entries) => out.extend(
                    entries
                        .iter()
                        .filter(|e| e.rect.contains(rect))
                        .map(|e| &e.item),
                ),
                Children::Branch(nodes) => stack.extend(
                    nodes
                        .iter()
                        .copied()
                        .filter(|&child| self.node(child).rect.contains(rect)),
                ),
            }
        }
    }

    /// True if any stored item intersects `rect`. Stops at the first hit.
    pub fn collides(&self, rect: &Rect<I::Coord>) -> bool {
        if !self.node(self.root).rect.intersects(rect) {
            return false;
        }
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            match &self.node(idx).children {
                Children::Leaf(entries) => {
                    if entries.iter().any(|e| e.rect.intersects(rect)) {
                        return true;
                    }
                }
                Children::Branch(nodes) => {
                    for &child in nodes {
                        let child_rect = &self.node(child).rect;
                        if !child_rect.intersects(rect) {
                            continue;
                        }
                        if rect.contains(child_rect) {
                            return true;
                        }
                        stack.push(child);
                    }
                }
            }
        }
        false
    }

    /// Lazily iterate over every stored item. Order is unspecified.
    pub fn iter(&self) -> Iter<'_, I> {
        Iter::new(&self.arena, self.root)
    }

    /// Alias for [`RTree::iter`].
    pub fn all(&self) -> Iter<'_, I> {
        self.iter()
    }

    #[inline]
    fn node(&self, idx: NodeIdx) -> &Node<I::Coord, I> {
        &self.arena[idx.get()]
    }

    #[inline]
    fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<I::Coord, I> {
        &mut self.arena[idx.get()]
    }

    fn push_node(&mut self, node: Node<I::Coord, I>) -> NodeIdx {
        let idx = NodeIdx::new(self.arena.len());
        self.arena.push(node);
        idx
    }

    fn children_rect(&self, children: &Children<I::Coord, I>) -> Rect<I::Coord> {
        match children {
            Children::Leaf(entries) => union_of(entries, |e| e.rect),
            Children::Branch(nodes) => union_of(nodes, |&n| self.node(n).rect),
        }
    }

    /// Path from the root down to `level`, descending into the child that
    /// needs the least enlargement to cover `rect`.
    fn choose_subtree(&self, rect: &Rect<I::Coord>, level: usize) -> Vec<NodeIdx> {
        let mut path = Vec::with_capacity(level + 1);
        let mut idx = self.root;
        loop {
            path.push(idx);
            let Children::Branch(nodes) = &self.node(idx).children else {
                break;
            };
            if path.len() - 1 == level {
                break;
            }
            let best = choose_child(nodes.iter().map(|&n| self.node(n).rect), rect);
            idx = nodes[best];
        }
        path
    }

    fn insert_at(&mut self, pending: Pending<I::Coord, I>, rect: Rect<I::Coord>, level: usize) {
        let path = self.choose_subtree(&rect, level);
        debug_assert_eq!(path.len(), level + 1, "insertion level below the leaves");
        let target = path[path.len() - 1];

        let node = self.node_mut(target);
        match (&mut node.children, pending) {
            (Children::Leaf(entries), Pending::Item(entry)) => entries.push(entry),
            (Children::Branch(nodes), Pending::Subtree(child)) => nodes.push(child),
            _ => unreachable!("items go into leaves and subtrees into branches"),
        }
        node.rect.extend(&rect);

        // Split overflowing nodes bottom-up; stop at the first one that fits.
        let mut level = path.len();
        while level > 0 && self.node(path[level - 1]).len() > self.max_entries {
            self.split(&path, level - 1);
            level -= 1;
        }

        for &idx in &path[..level] {
            self.node_mut(idx).rect.extend(&rect);
        }
    }

    fn split(&mut self, path: &[NodeIdx], level: usize) {
        let idx = path[level];
        let min_entries = self.min_entries;
        let height = self.node(idx).height;
        let children = core::mem::replace(
            &mut self.node_mut(idx).children,
            Children::Branch(Vec::new()),
        );

        let (kept, moved) = match children {
            Children::Leaf(mut entries) => {
                let (moved, _) = split_children(&mut entries, min_entries, |e| e.rect);
                (Children::Leaf(entries), Children::Leaf(moved))
            }
            Children::Branch(mut nodes) => {
                let arena = &self.arena;
                let (moved, _) =
                    split_children(&mut nodes, min_entries, |&n| arena[n.get()].rect);
                (Children::Branch(nodes), Children::Branch(moved))
            }
        };

        let kept_rect = self.children_rect(&kept);
        let moved_rect = self.children_rect(&moved);
        let node = self.node_mut(idx);
        node.children = kept;
        node.rect = kept_rect;
        let sibling = self.push_node(Node {
            rect: moved_rect,
            height,
            children: moved,
        });

        if level == 0 {
            self.grow_root(idx, sibling);
        } else {
            match &mut self.node_mut(path[level - 1]).children {
                Children::Branch(nodes) => nodes.push(sibling),
                Children::Leaf(_) => unreachable!("a split node's parent is a branch"),
            }
        }
    }

    /// Replace the root with a new branch holding `left` and `right`.
    fn grow_root(&mut self, left: NodeIdx, right: NodeIdx) {
        let height = self.node(left).height + 1;
        let children = Children::Branch(vec![left, right]);
        let rect = self.children_rect(&children);
        self.root = self.push_node(Node {
            rect,
            height,
            children,
        });
        log::debug!("root grew to height {height}");
    }

    /// Pack `keys[left..=right]` into a subtree. `height` is `None` on the
    /// outermost call, where the target height and root fan-out are derived.
    fn build(
        &mut self,
        keys: &mut [(Rect<I::Coord>, usize)],
        slots: &mut [Option<I>],
        left: usize,
        right: usize,
        height: Option<usize>,
    ) -> NodeIdx {
        let n = right - left + 1;
        let mut m = self.max_entries;

        if n <= m {
            let entries = keys[left..=right]
                .iter()
                .map(|&(rect, slot)| Entry {
                    rect,
                    item: slots[slot]
                        .take()
                        .expect("every bulk-load slot is consumed by exactly one leaf"),
                })
                .collect();
            return self.push_node(Node::leaf(entries));
        }

        let height = match height {
            Some(h) => h,
            None => {
                let (h, below) = target_height(n, m);
                // Root fan-out that fills the tree as much as possible.
                m = n.div_ceil(below);
                log::debug!("tiling {n} items: height {h}, root fan-out {m}");
                h
            }
        };

        // `m` mostly square tiles: columns of `n1` by x, rows of `n2` by y.
        let n2 = n.div_ceil(m);
        let n1 = n2 * ceil_sqrt(m);

        multi_select(keys, left, right, n1, &mut |a, b| a.0.compare_min_x(&b.0));

        let mut children = Vec::new();
        let mut i = left;
        while i <= right {
            let right2 = (i + n1 - 1).min(right);
            multi_select(keys, i, right2, n2, &mut |a, b| a.0.compare_min_y(&b.0));

            let mut j = i;
            while j <= right2 {
                let right3 = (j + n2 - 1).min(right2);
                children.push(self.build(keys, slots, j, right3, Some(height - 1)));
                j += n2;
            }
            i += n1;
        }

        let children = Children::Branch(children);
        let rect = self.children_rect(&children);
        self.push_node(Node {
            rect,
            height,
            children,
        })
    }
}

/// Smallest `h` with `m^h >= n`, together with `m^(h - 1)`.
fn target_height(n: usize, m: usize) -> (usize, usize) {
    let mut height = 1;
    let mut below = 1_usize;
    while below.saturating_mul(m) < n {
        below *= m;
        height += 1;
    }
    (height, below)
}

fn ceil_sqrt(v: usize) -> usize {
    let r = v.isqrt();
    if r * r < v { r + 1 } else { r }
}

impl<I: Bounded> Debug for RTree<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("max_entries", &self.max_entries)
            .field("min_entries", &self.min_entries)
            .field("len", &self.len)
            .field("height", &self.height())
            .field("arena_nodes", &self.arena.len())
            .finish_non_exhaustive()
    }
}

impl<'a, I: Bounded> IntoIterator for &'a RTree<I> {
    type Item = &'a I;
    type IntoIter = Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy depth-first iterator over the items of an [`RTree`] or one of its subtrees.
pub struct Iter<'a, I: Bounded> {
    arena: &'a [Node<I::Coord, I>],
    stack: Vec<NodeIdx>,
    entries: core::slice::Iter<'a, Entry<I::Coord, I>>,
}

impl<'a, I: Bounded> Iter<'a, I> {
    fn new(arena: &'a [Node<I::Coord, I>], start: NodeIdx) -> Self {
        Self {
            arena,
            stack: vec![start],
            entries: [].iter(),
        }
    }
}

impl<'a, I: Bounded> Iterator for Iter<'a, I> {
    type Item = &'a I;

    fn next(&mut self) -> Option<&'a I> {
        loop {
            if let Some(entry) = self.entries.next() {
                return Some(&entry.item);
            }
            let idx = self.stack.pop()?;
            match &self.arena[idx.get()].children {
                Children::Leaf(entries) => self.entries = entries.iter(),
                Children::Branch(nodes) => self.stack.extend(nodes.iter().copied()),
            }
        }
    }
}

impl<I: Bounded> Debug for Iter<'_, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("pending_nodes", &self.stack.len())
            .field("pending_entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}
