// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Stratum Index: bulk-load, query, and remove.

use kurbo::Rect;
use stratum_index::{SirTree, StrTree};

fn main() {
    let mut tree = StrTree::with_node_capacity(4);
    tree.insert(Rect::new(0.0, 0.0, 10.0, 10.0), "r1");
    tree.insert(Rect::new(20.0, 20.0, 30.0, 30.0), "r2");
    tree.insert(Rect::new(5.0, 5.0, 15.0, 15.0), "r3");
    tree.build();

    let hits = tree.query(Rect::new(0.0, 0.0, 12.0, 12.0));
    println!("window hits: {hits:?}");
    println!("size={}, depth={}", tree.size(), tree.depth());

    let removed = tree.remove(Rect::new(5.0, 5.0, 15.0, 15.0), &"r3");
    println!("removed r3: {removed}, size now {}", tree.size());

    // The 1-D sibling answers range and stabbing queries over intervals.
    let mut spans = SirTree::new();
    spans.insert(1.0, 4.0, "short");
    spans.insert(2.0, 9.0, "long");
    spans.build();
    println!("spans at 3.0: {:?}", spans.query_point(3.0));
    println!("spans over [5, 6]: {:?}", spans.query(5.0, 6.0));
}
