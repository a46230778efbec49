// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=stratum_index --heading-base-level=0

//! Stratum Index: Kurbo-native packed (bulk-loaded) spatial indexes.
//!
//! Stratum Index is the spatial-query building block of the Stratum geometry
//! stack: a read-mostly index you load once from a complete item set and then
//! query from as many readers as you like.
//!
//! - [`StrTree`]: a 2-D rectangle index packed with the Sort-Tile-Recursive
//!   algorithm, with rectangle queries plus branch-and-bound nearest-pair,
//!   nearest-to-item, k-nearest, and within-distance searches.
//! - [`SirTree`]: its 1-D sibling over intervals, with range and stabbing
//!   queries.
//! - [`PackedTree`]: the generic engine under both, reusable with any
//!   [`Bound`] implementation.
//! - [`distance`]: the rectangle distance estimators that certify the
//!   branch-and-bound pruning.
//!
//! Items are buffered with `insert`, packed by a one-shot, idempotent
//! `build`, and queried afterwards; `insert` after `build` is a programmer
//! error and panics. The trees never look inside items: 2-D searches rank
//! candidates by rectangle separation and only consult the caller-supplied
//! item distance on leaf pairs.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Rect;
//! use stratum_index::StrTree;
//!
//! // Bulk-load a few labelled rectangles.
//! let mut tree = StrTree::with_node_capacity(4);
//! tree.insert(Rect::new(0.0, 0.0, 10.0, 10.0), "r1");
//! tree.insert(Rect::new(20.0, 20.0, 30.0, 30.0), "r2");
//! tree.insert(Rect::new(5.0, 5.0, 15.0, 15.0), "r3");
//! tree.build();
//!
//! // Rectangle query: r2 does not touch the window.
//! let mut hits = tree.query(Rect::new(0.0, 0.0, 12.0, 12.0));
//! hits.sort();
//! assert_eq!(hits, [&"r1", &"r3"]);
//! ```
//!
//! Nearest-neighbour searches take the item distance as a closure, so the
//! index works with whatever geometry the items carry:
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use stratum_index::StrTree;
//!
//! let mut tree = StrTree::new();
//! tree.insert(Rect::new(0.0, 0.0, 2.0, 2.0), Point::new(1.0, 1.0));
//! tree.insert(Rect::new(50.0, 0.0, 52.0, 2.0), Point::new(51.0, 1.0));
//! tree.build();
//!
//! let query = Point::new(4.0, 1.0);
//! let found = tree
//!     .nearest_to(Rect::from_center_size(query, (0.0, 0.0)), &query, |a, b| {
//!         a.distance(*b)
//!     })
//!     .unwrap();
//! assert_eq!(*found, Point::new(1.0, 1.0));
//! ```
//!
//! ## Float semantics
//!
//! Coordinates are assumed finite (no NaNs); [`StrTree::insert`] drops
//! non-finite rectangles. Item distances must be non-negative, and
//! anti-reflexive where a search promises distinct items.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod distance;
mod nearest;
pub mod rtree;
pub mod sirtree;
pub mod tree;
pub mod types;

pub use rtree::StrTree;
pub use sirtree::SirTree;
pub use tree::{ItemsTree, PackedTree};
pub use types::{Bound, Interval};
