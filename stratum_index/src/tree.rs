// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The generic packed-tree engine: bulk load, queries, removal, introspection.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::types::Bound;

/// Default number of children per interior node.
pub(crate) const DEFAULT_NODE_CAPACITY: usize = 10;

/// A child of an interior node, addressed into the tree's arenas: either
/// another node or a leaf item slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Child {
    Node(usize),
    Item(usize),
}

/// Interior node. `bounds` is set exactly once, after every child has been
/// attached; only the sentinel root of an empty tree keeps `None`. Bounds are
/// never recomputed after removals, so they may over-cover but never
/// under-cover the live subtree.
#[derive(Clone, Debug)]
pub(crate) struct Node<B> {
    level: usize,
    bounds: Option<B>,
    children: Vec<Child>,
}

impl<B: Bound> Node<B> {
    pub(crate) fn bounds(&self) -> Option<B> {
        self.bounds
    }

    pub(crate) fn children(&self) -> &[Child] {
        &self.children
    }
}

#[derive(Clone, Debug)]
struct ItemEntry<B, T> {
    bounds: B,
    item: T,
}

/// One level of the structural dump produced by [`PackedTree::items_tree`]:
/// a leaf item or a non-empty subtree. Subtrees holding no items are omitted
/// from the dump entirely.
#[derive(Debug, PartialEq)]
pub enum ItemsTree<'a, T> {
    /// A leaf item.
    Item(&'a T),
    /// The dump of a non-empty subtree.
    Subtree(Vec<ItemsTree<'a, T>>),
}

/// A bulk-loaded, read-mostly spatial tree, generic over its bound type.
///
/// Items are buffered by [`insert`](PackedTree::insert) and packed into a
/// balanced tree by a one-shot, idempotent [`build`](PackedTree::build):
/// each level is sorted with the bound's packing order, cut into runs of at
/// most `node_capacity` children, and wrapped in parent nodes until a single
/// root remains. After the build the structure is immutable except for
/// [`remove`](PackedTree::remove).
///
/// The concrete trees ([`StrTree`](crate::StrTree),
/// [`SirTree`](crate::SirTree)) wrap this engine with their bound type; use
/// it directly only for custom [`Bound`] implementations.
///
/// Mutation requires `&mut self`, so the compiler enforces the single-writer
/// discipline: once built, any number of shared borrows may query in
/// parallel.
pub struct PackedTree<B: Bound, T> {
    node_capacity: usize,
    built: bool,
    /// Leaf store. Doubles as the staging buffer before the build; slots
    /// vacate on removal.
    items: Vec<Option<ItemEntry<B, T>>>,
    nodes: Vec<Node<B>>,
    root: Option<usize>,
}

impl<B: Bound, T> Default for PackedTree<B, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bound, T> PackedTree<B, T> {
    /// Create an empty tree with the default node capacity (10).
    pub fn new() -> Self {
        Self::with_node_capacity(DEFAULT_NODE_CAPACITY)
    }

    /// Create an empty tree whose interior nodes hold at most
    /// `node_capacity` children.
    ///
    /// # Panics
    ///
    /// Panics if `node_capacity <= 1`; such a tree could never shrink a
    /// level during packing.
    pub fn with_node_capacity(node_capacity: usize) -> Self {
        assert!(node_capacity > 1, "node capacity must be greater than 1");
        Self {
            node_capacity,
            built: false,
            items: Vec::new(),
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Maximum number of children per interior node.
    pub fn node_capacity(&self) -> usize {
        self.node_capacity
    }

    /// Buffer an item with its bound for the next [`build`](PackedTree::build).
    ///
    /// # Panics
    ///
    /// Panics if the tree has already been built.
    pub fn insert(&mut self, bounds: B, item: T) {
        assert!(
            !self.built,
            "cannot insert into a packed tree after build()"
        );
        self.items.push(Some(ItemEntry { bounds, item }));
    }

    /// Pack the buffered items into the tree, bottom-up. The first call does
    /// all the work; later calls are no-ops. A tree built with no items gets
    /// an explicit empty leaf-level root, so queries and
    /// [`is_empty`](PackedTree::is_empty) work without special cases.
    pub fn build(&mut self) {
        if self.built {
            return;
        }
        self.built = true;
        if self.items.is_empty() {
            let root = self.new_node(0, Vec::new());
            self.root = Some(root);
            return;
        }
        let mut level: Vec<Child> = (0..self.items.len()).map(Child::Item).collect();
        let mut node_level = 0;
        loop {
            let parents = self.build_level(&mut level, node_level);
            if parents.len() == 1 {
                self.root = Some(parents[0]);
                return;
            }
            level = parents.into_iter().map(Child::Node).collect();
            node_level += 1;
        }
    }

    /// Sort one level's boundables and wrap them, `node_capacity` at a time,
    /// in new parent nodes. The bound type controls the ordering: a slicing
    /// pre-sort cuts the level into slices, then each slice is packed in
    /// packing order.
    fn build_level(&mut self, level: &mut [Child], node_level: usize) -> Vec<usize> {
        let group_count = level.len().div_ceil(self.node_capacity);
        let slices = B::slice_count(group_count);
        if slices > 1 {
            level.sort_by(|a, b| B::slicing_cmp(&self.child_bounds(*a), &self.child_bounds(*b)));
        }
        let slice_len = level.len().div_ceil(slices);
        let mut parents = Vec::with_capacity(group_count);
        for slice in level.chunks_mut(slice_len) {
            slice.sort_by(|a, b| B::packing_cmp(&self.child_bounds(*a), &self.child_bounds(*b)));
            for run in slice.chunks(self.node_capacity) {
                let node = self.new_node(node_level, run.to_vec());
                parents.push(node);
            }
        }
        parents
    }

    /// Push a node whose bound is the union of its children's bounds,
    /// computed here, once, after the child list is complete.
    fn new_node(&mut self, level: usize, children: Vec<Child>) -> usize {
        let mut bounds: Option<B> = None;
        for child in &children {
            let cb = self.child_bounds(*child);
            bounds = Some(match bounds {
                None => cb,
                Some(b) => b.union(&cb),
            });
        }
        let idx = self.nodes.len();
        self.nodes.push(Node {
            level,
            bounds,
            children,
        });
        idx
    }

    fn child_bounds(&self, child: Child) -> B {
        match child {
            Child::Item(i) => {
                self.items[i]
                    .as_ref()
                    .expect("staged items are all live during the build")
                    .bounds
            }
            Child::Node(n) => self.nodes[n]
                .bounds
                .expect("child nodes are sealed before being parented"),
        }
    }

    fn built_root(&self) -> usize {
        assert!(
            self.built,
            "packed tree reads require build() to have been called"
        );
        self.root.expect("build() always sets a root")
    }

    /// Whether the tree holds no items. Answers from the staging buffer
    /// before the build and from the root afterwards.
    pub fn is_empty(&self) -> bool {
        match self.root {
            None => self.items.is_empty(),
            Some(root) => self.nodes[root].children.is_empty(),
        }
    }

    /// Number of items held. Counts the staging buffer before the build and
    /// walks the tree afterwards.
    pub fn size(&self) -> usize {
        match self.root {
            None => self.items.iter().filter(|slot| slot.is_some()).count(),
            Some(root) => self.size_below(root),
        }
    }

    fn size_below(&self, node: usize) -> usize {
        self.nodes[node]
            .children
            .iter()
            .map(|child| match child {
                Child::Item(_) => 1,
                Child::Node(n) => self.size_below(*n),
            })
            .sum()
    }

    /// Number of node levels, counting the leaf-holding level as 1. An empty
    /// tree has depth 0.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn depth(&self) -> usize {
        let root = self.built_root();
        if self.nodes[root].children.is_empty() {
            return 0;
        }
        self.depth_below(root)
    }

    fn depth_below(&self, node: usize) -> usize {
        let child_depth = self.nodes[node]
            .children
            .iter()
            .map(|child| match child {
                Child::Item(_) => 0,
                Child::Node(n) => self.depth_below(*n),
            })
            .max()
            .unwrap_or(0);
        child_depth + 1
    }

    /// Collect every item whose bound intersects `bounds`.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn query(&self, bounds: &B) -> Vec<&T> {
        let mut matches = Vec::new();
        self.query_with(bounds, |item| matches.push(item));
        matches
    }

    /// Streaming variant of [`query`](PackedTree::query): call `visitor` for
    /// every item whose bound intersects `bounds`, without materializing a
    /// result list.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn query_with<'a>(&'a self, bounds: &B, mut visitor: impl FnMut(&'a T)) {
        let root = self.built_root();
        let Some(root_bounds) = self.nodes[root].bounds else {
            return;
        };
        if !root_bounds.intersects(bounds) {
            return;
        }
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            for child in &self.nodes[n].children {
                match *child {
                    Child::Item(i) => {
                        if let Some(entry) = &self.items[i]
                            && entry.bounds.intersects(bounds)
                        {
                            visitor(&entry.item);
                        }
                    }
                    Child::Node(c) => {
                        if let Some(cb) = self.nodes[c].bounds
                            && cb.intersects(bounds)
                        {
                            stack.push(c);
                        }
                    }
                }
            }
        }
    }

    /// Remove the first leaf equal to `item` from the subtrees intersecting
    /// `bounds`, building the tree first if necessary. Returns whether an
    /// item was removed.
    ///
    /// A node emptied by the removal is unlinked from its direct parent;
    /// grandparents are not re-examined, so a chain of removals can leave
    /// empty interior nodes in place until their own parent loses an item.
    pub fn remove(&mut self, bounds: &B, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.build();
        let root = self.root.expect("build() always sets a root");
        match self.nodes[root].bounds {
            Some(rb) if rb.intersects(bounds) => self.remove_below(root, bounds, item),
            _ => false,
        }
    }

    fn remove_below(&mut self, node: usize, bounds: &B, item: &T) -> bool
    where
        T: PartialEq,
    {
        // The direct item children of this node first. Item bounds are not
        // consulted here, matching the descent guard below which already
        // confined the search.
        let direct = self.nodes[node].children.iter().find_map(|c| match c {
            Child::Item(i) if self.items[*i].as_ref().is_some_and(|e| e.item == *item) => Some(*i),
            _ => None,
        });
        if let Some(i) = direct {
            self.nodes[node]
                .children
                .retain(|c| *c != Child::Item(i));
            self.items[i] = None;
            return true;
        }
        // Then the intersecting child subtrees.
        let child_nodes: Vec<usize> = self.nodes[node]
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Node(n) if self.nodes[*n].bounds.is_some_and(|b| b.intersects(bounds)) => {
                    Some(*n)
                }
                _ => None,
            })
            .collect();
        for c in child_nodes {
            if self.remove_below(c, bounds, item) {
                // Single-level pruning: unlink the child if it was emptied,
                // leaving this node for its own parent to examine.
                if self.nodes[c].children.is_empty() {
                    self.nodes[node].children.retain(|ch| *ch != Child::Node(c));
                }
                return true;
            }
        }
        false
    }

    /// Structural dump of the tree as nested lists of items, mirroring the
    /// non-empty subtrees only. Intended for introspection and debugging,
    /// not as a query path.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn items_tree(&self) -> Vec<ItemsTree<'_, T>> {
        let root = self.built_root();
        self.items_tree_below(root).unwrap_or_default()
    }

    fn items_tree_below(&self, node: usize) -> Option<Vec<ItemsTree<'_, T>>> {
        let mut out = Vec::new();
        for child in &self.nodes[node].children {
            match *child {
                Child::Item(i) => {
                    if let Some(entry) = &self.items[i] {
                        out.push(ItemsTree::Item(&entry.item));
                    }
                }
                Child::Node(c) => {
                    if let Some(sub) = self.items_tree_below(c) {
                        out.push(ItemsTree::Subtree(sub));
                    }
                }
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }

    /// Root node index of a built tree.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub(crate) fn root_index(&self) -> usize {
        self.built_root()
    }

    pub(crate) fn node(&self, idx: usize) -> &Node<B> {
        &self.nodes[idx]
    }

    pub(crate) fn item(&self, idx: usize) -> Option<(&B, &T)> {
        self.items[idx].as_ref().map(|e| (&e.bounds, &e.item))
    }
}

impl<B: Bound, T> Debug for PackedTree<B, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live = self.items.iter().filter(|slot| slot.is_some()).count();
        let root_level = self.root.map(|r| self.nodes[r].level);
        f.debug_struct("PackedTree")
            .field("node_capacity", &self.node_capacity)
            .field("built", &self.built)
            .field("items_live", &live)
            .field("nodes", &self.nodes.len())
            .field("root_level", &root_level)
            .finish_non_exhaustive()
    }
}
