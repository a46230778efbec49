// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-dimensional packed rectangle index with branch-and-bound searches.

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Rect;

use crate::nearest::{self, Pair, Side};
use crate::tree::{ItemsTree, PackedTree};

/// A query-only rectangle index bulk-loaded with sort-tile-recursive (STR)
/// packing.
///
/// STR sorts one level's boundables by x-centre into vertical slices and
/// packs each slice in y-centre order. The second sort per level buys
/// compact sibling bounds with little overlap, which is what makes query
/// pruning effective. Once [`build`](StrTree::build) has run (explicitly
/// or through [`remove`](StrTree::remove)), items can no longer be added.
///
/// Beyond rectangle queries, the tree offers a family of branch-and-bound
/// searches driven by a caller-supplied item distance: nearest pair, nearest
/// to a query item, k-nearest, and a within-distance test against another
/// tree. The item distance must be non-negative; where a search must return
/// distinct items, it must also be anti-reflexive (see
/// [`nearest_pair`](StrTree::nearest_pair)).
///
/// # Example
///
/// ```
/// use kurbo::Rect;
/// use stratum_index::StrTree;
///
/// let mut tree = StrTree::new();
/// tree.insert(Rect::new(0.0, 0.0, 10.0, 10.0), "a");
/// tree.insert(Rect::new(20.0, 20.0, 30.0, 30.0), "b");
/// tree.build();
///
/// let hits = tree.query(Rect::new(5.0, 5.0, 12.0, 12.0));
/// assert_eq!(hits, [&"a"]);
/// ```
pub struct StrTree<T> {
    tree: PackedTree<Rect, T>,
}

impl<T> Default for StrTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StrTree<T> {
    /// Create an empty tree with the default node capacity (10).
    pub fn new() -> Self {
        Self {
            tree: PackedTree::new(),
        }
    }

    /// Create an empty tree whose interior nodes hold at most
    /// `node_capacity` children. Capacities of 4 and up behave well.
    ///
    /// # Panics
    ///
    /// Panics if `node_capacity <= 1`.
    pub fn with_node_capacity(node_capacity: usize) -> Self {
        Self {
            tree: PackedTree::with_node_capacity(node_capacity),
        }
    }

    /// Maximum number of children per interior node.
    pub fn node_capacity(&self) -> usize {
        self.tree.node_capacity()
    }

    /// Buffer an item with its bounding rectangle for the next
    /// [`build`](StrTree::build). Non-finite rectangles are ignored; a
    /// reversed rectangle is normalized.
    ///
    /// # Panics
    ///
    /// Panics if the tree has already been built.
    pub fn insert(&mut self, bounds: Rect, item: T) {
        if !bounds.is_finite() {
            return;
        }
        self.tree.insert(bounds.abs(), item);
    }

    /// Pack the buffered items into the tree. One-shot and idempotent.
    pub fn build(&mut self) {
        self.tree.build();
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Number of items held.
    pub fn size(&self) -> usize {
        self.tree.size()
    }

    /// Number of node levels, counting the leaf-holding level as 1.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Collect every item whose rectangle intersects `bounds`.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn query(&self, bounds: Rect) -> Vec<&T> {
        self.tree.query(&bounds)
    }

    /// Streaming variant of [`query`](StrTree::query): call `visitor` for
    /// every item whose rectangle intersects `bounds`.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn query_with<'a>(&'a self, bounds: Rect, visitor: impl FnMut(&'a T)) {
        self.tree.query_with(&bounds, visitor);
    }

    /// Remove the first item equal to `item` found under `bounds`, building
    /// the tree first if necessary. Returns whether an item was removed.
    pub fn remove(&mut self, bounds: Rect, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.tree.remove(&bounds, item)
    }

    /// Structural dump of the tree as nested lists of items. See
    /// [`PackedTree::items_tree`].
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn items_tree(&self) -> Vec<ItemsTree<'_, T>> {
        self.tree.items_tree()
    }

    /// The two nearest items in this tree under `item_distance`, or `None`
    /// on an empty tree.
    ///
    /// The search pairs the tree with itself, so with a reflexive distance
    /// (one that reports zero for an item paired with itself) the result
    /// degenerates to an item paired with itself; a one-item tree can only
    /// ever return such a pair. Supply an anti-reflexive distance when the
    /// two items must be distinct.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn nearest_pair(&self, mut item_distance: impl FnMut(&T, &T) -> f64) -> Option<(&T, &T)> {
        if self.is_empty() {
            return None;
        }
        let root = self.root_side();
        let init = Pair::new(root, root, &mut item_distance);
        nearest::nearest_pair(init, &mut item_distance)
    }

    /// The nearest items between this tree and `other`, as a
    /// (this tree, other tree) pair, or `None` if either tree is empty.
    ///
    /// # Panics
    ///
    /// Panics if either tree has not been built.
    pub fn nearest_pair_between<'a>(
        &'a self,
        other: &'a Self,
        mut item_distance: impl FnMut(&T, &T) -> f64,
    ) -> Option<(&'a T, &'a T)> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let init = Pair::new(self.root_side(), other.root_side(), &mut item_distance);
        nearest::nearest_pair(init, &mut item_distance)
    }

    /// The item of this tree nearest to the query item, or `None` on an
    /// empty tree.
    ///
    /// The query item does not have to be stored in the tree; it only has to
    /// be acceptable to `item_distance`.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn nearest_to<'a>(
        &'a self,
        bounds: Rect,
        item: &'a T,
        mut item_distance: impl FnMut(&T, &T) -> f64,
    ) -> Option<&'a T> {
        if self.is_empty() {
            return None;
        }
        let init = Pair::new(
            self.root_side(),
            Side::Item(bounds.abs(), item),
            &mut item_distance,
        );
        nearest::nearest_pair(init, &mut item_distance).map(|(found, _)| found)
    }

    /// Up to `k` items of this tree nearest to the query item, ascending by
    /// distance. Returns fewer than `k` items when the tree holds fewer.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn k_nearest_to<'a>(
        &'a self,
        bounds: Rect,
        item: &'a T,
        mut item_distance: impl FnMut(&T, &T) -> f64,
        k: usize,
    ) -> Vec<&'a T> {
        if self.is_empty() || k == 0 {
            return Vec::new();
        }
        let init = Pair::new(
            self.root_side(),
            Side::Item(bounds.abs(), item),
            &mut item_distance,
        );
        nearest::nearest_k(init, k, &mut item_distance)
    }

    /// Whether some item of this tree and some item of `other` lie within
    /// `max_distance` of each other. `false` if either tree is empty.
    ///
    /// Cheaper than a full nearest search: the traversal stops as soon as
    /// either answer is certain, in both directions.
    ///
    /// # Panics
    ///
    /// Panics if either tree has not been built.
    pub fn is_within_distance(
        &self,
        other: &Self,
        mut item_distance: impl FnMut(&T, &T) -> f64,
        max_distance: f64,
    ) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let init = Pair::new(self.root_side(), other.root_side(), &mut item_distance);
        nearest::within_distance(init, max_distance, &mut item_distance)
    }

    fn root_side(&self) -> Side<'_, T> {
        Side::Node(&self.tree, self.tree.root_index())
    }
}

impl<T> Debug for StrTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StrTree")
            .field("tree", &self.tree)
            .finish()
    }
}
