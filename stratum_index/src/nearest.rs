// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Branch-and-bound search over pairs of tree nodes.
//!
//! Every candidate [`Pair`] carries a memoized distance estimate: the exact
//! caller-supplied item distance when both sides are leaves, otherwise the
//! rectangle separation distance of the sides' bounds, a certified lower
//! bound on the distance of any leaf pair inside. Candidates are drained
//! from a min-first queue, so the moment the head estimate reaches the best
//! exact distance found, no remaining pair can improve on it and the search
//! stops. This is the classic Roussopoulos / Hjaltason–Samet guarantee.

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::Rect;

use crate::distance;
use crate::tree::{Child, PackedTree};

/// The caller-supplied item distance, threaded through the search unboxed.
type ItemDistance<'d, T> = dyn FnMut(&T, &T) -> f64 + 'd;

/// One side of a search pair: a subtree, or a single leaf item (a stored
/// leaf, or the caller's query item).
pub(crate) enum Side<'a, T> {
    Node(&'a PackedTree<Rect, T>, usize),
    Item(Rect, &'a T),
}

impl<T> Copy for Side<'_, T> {}

impl<T> Clone for Side<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Side<'_, T> {
    fn bounds(&self) -> Rect {
        match self {
            Side::Node(tree, idx) => tree
                .node(*idx)
                .bounds()
                .expect("search pairs are formed over non-empty subtrees only"),
            Side::Item(bounds, _) => *bounds,
        }
    }

    fn is_node(&self) -> bool {
        matches!(self, Side::Node(..))
    }
}

/// A candidate pair of boundables with its memoized distance estimate. The
/// estimate is exact once both sides are items; until then it is the
/// separation distance of the bounds, a lower bound on anything inside.
pub(crate) struct Pair<'a, T> {
    a: Side<'a, T>,
    b: Side<'a, T>,
    distance: f64,
}

impl<'a, T> Pair<'a, T> {
    pub(crate) fn new(a: Side<'a, T>, b: Side<'a, T>, item_distance: &mut ItemDistance<'_, T>) -> Self {
        let distance = match (a, b) {
            (Side::Item(_, x), Side::Item(_, y)) => item_distance(x, y),
            _ => distance::rect_distance(&a.bounds(), &b.bounds()),
        };
        Self { a, b, distance }
    }

    fn is_leaves(&self) -> bool {
        !(self.a.is_node() || self.b.is_node())
    }

    fn maximum_distance(&self) -> f64 {
        distance::maximum_distance(&self.a.bounds(), &self.b.bounds())
    }

    /// Expand one side into its children and push every resulting pair that
    /// can still beat `min_distance`.
    ///
    /// When both sides are nodes, the one with the larger extent is
    /// expanded. That choice is a performance heuristic only; correctness
    /// needs nothing beyond every pushed pair keeping a valid lower bound
    /// as its rank.
    fn expand_to_queue(
        &self,
        queue: &mut BinaryHeap<MinOrder<'a, T>>,
        min_distance: f64,
        item_distance: &mut ItemDistance<'_, T>,
    ) {
        let expand_a = match (self.a.is_node(), self.b.is_node()) {
            (true, true) => self.a.bounds().area() > self.b.bounds().area(),
            (true, false) => true,
            (false, true) => false,
            (false, false) => return,
        };
        if expand_a {
            expand(self.a, self.b, false, queue, min_distance, item_distance);
        } else {
            expand(self.b, self.a, true, queue, min_distance, item_distance);
        }
    }
}

/// Pair each child of `side` (which must be a node) with `other`, keeping
/// the (this tree, other tree) orientation of the original pair.
fn expand<'a, T>(
    side: Side<'a, T>,
    other: Side<'a, T>,
    flipped: bool,
    queue: &mut BinaryHeap<MinOrder<'a, T>>,
    min_distance: f64,
    item_distance: &mut ItemDistance<'_, T>,
) {
    let Side::Node(tree, node) = side else {
        return;
    };
    for child in tree.node(node).children() {
        let child_side = match *child {
            Child::Node(c) => Side::Node(tree, c),
            Child::Item(i) => {
                let Some((bounds, item)) = tree.item(i) else {
                    continue;
                };
                Side::Item(*bounds, item)
            }
        };
        let pair = if flipped {
            Pair::new(other, child_side, item_distance)
        } else {
            Pair::new(child_side, other, item_distance)
        };
        if pair.distance < min_distance {
            queue.push(MinOrder(pair));
        }
    }
}

/// Min-first heap wrapper: `BinaryHeap<MinOrder<_>>` pops the smallest
/// distance estimate.
struct MinOrder<'a, T>(Pair<'a, T>);

impl<T> PartialEq for MinOrder<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.distance == other.0.distance
    }
}

impl<T> Eq for MinOrder<'_, T> {}

impl<T> PartialOrd for MinOrder<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for MinOrder<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .distance
            .partial_cmp(&self.0.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Max-first heap wrapper over a ranked result, for the bounded k-nearest
/// heap: the worst candidate sits at the top, ready to be evicted.
struct MaxOrder<'a, T> {
    distance: f64,
    item: &'a T,
}

impl<T> PartialEq for MaxOrder<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl<T> Eq for MaxOrder<'_, T> {}

impl<T> PartialOrd for MaxOrder<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for MaxOrder<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Best-first search for the single nearest leaf pair reachable from `init`.
///
/// Returns the items of the closest leaf pair, in (side a, side b) order, or
/// `None` if no leaf pair survives the pruning (for example when the item
/// distance rules every pair out).
pub(crate) fn nearest_pair<'a, T>(
    init: Pair<'a, T>,
    item_distance: &mut ItemDistance<'_, T>,
) -> Option<(&'a T, &'a T)> {
    let mut lower_bound = f64::INFINITY;
    let mut best = None;
    let mut queue = BinaryHeap::new();
    queue.push(MinOrder(init));

    // A best distance of zero cannot be improved; stop popping outright.
    while lower_bound > 0.0 {
        let Some(MinOrder(pair)) = queue.pop() else {
            break;
        };
        // The head is the smallest estimate left, so nothing in the queue
        // can beat the best leaf pair found: that pair is the true minimum.
        if pair.distance >= lower_bound {
            break;
        }
        if let (Side::Item(_, x), Side::Item(_, y)) = (pair.a, pair.b) {
            lower_bound = pair.distance;
            best = Some((x, y));
        } else {
            pair.expand_to_queue(&mut queue, lower_bound, item_distance);
        }
    }
    best
}

/// Best-first search for the `k` nearest leaf pairs reachable from `init`,
/// keeping side-a items only. Results come back ascending by distance, at
/// most `k` of them.
///
/// The bounded max-heap holds the best `k` candidates seen; once full, its
/// top is the pruning bound for the search queue.
pub(crate) fn nearest_k<'a, T>(
    init: Pair<'a, T>,
    k: usize,
    item_distance: &mut ItemDistance<'_, T>,
) -> Vec<&'a T> {
    if k == 0 {
        return Vec::new();
    }
    let mut lower_bound = f64::INFINITY;
    let mut queue = BinaryHeap::new();
    queue.push(MinOrder(init));
    let mut nearest: BinaryHeap<MaxOrder<'a, T>> = BinaryHeap::with_capacity(k + 1);

    while let Some(MinOrder(pair)) = queue.pop() {
        if pair.distance >= lower_bound {
            break;
        }
        if let (Side::Item(_, item), Side::Item(..)) = (pair.a, pair.b) {
            nearest.push(MaxOrder {
                distance: pair.distance,
                item,
            });
            if nearest.len() > k {
                nearest.pop();
            }
            if nearest.len() == k
                && let Some(worst) = nearest.peek()
            {
                lower_bound = worst.distance;
            }
        } else {
            pair.expand_to_queue(&mut queue, lower_bound, item_distance);
        }
    }

    nearest
        .into_sorted_vec()
        .into_iter()
        .map(|ranked| ranked.item)
        .collect()
}

/// Decide whether any leaf pair reachable from `init` lies within
/// `max_distance`, without necessarily finding the nearest one.
///
/// Two early exits make this cheaper than a nearest search: if the head
/// estimate already exceeds the limit, nothing left can qualify; and if a
/// pair's maximum bound distance fits the limit, every leaf pair inside it
/// must qualify.
pub(crate) fn within_distance<T>(
    init: Pair<'_, T>,
    max_distance: f64,
    item_distance: &mut ItemDistance<'_, T>,
) -> bool {
    let mut upper_bound = f64::INFINITY;
    let mut queue = BinaryHeap::new();
    queue.push(MinOrder(init));

    while let Some(MinOrder(pair)) = queue.pop() {
        if pair.distance > max_distance {
            return false;
        }
        if pair.maximum_distance() <= max_distance {
            return true;
        }
        if pair.is_leaves() {
            upper_bound = pair.distance;
            if upper_bound <= max_distance {
                return true;
            }
        } else {
            pair.expand_to_queue(&mut queue, upper_bound, item_distance);
        }
    }
    false
}
