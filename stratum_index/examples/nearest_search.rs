// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest-neighbour searches driven by a caller-supplied item distance.

use kurbo::{Point, Rect};
use stratum_index::StrTree;

fn main() {
    // Index a diagonal line of points by their bounding rectangles.
    let points: Vec<Point> = (0..10)
        .map(|i| Point::new(f64::from(i) * 10.0, f64::from(i) * 10.0))
        .collect();
    let mut tree = StrTree::new();
    for p in &points {
        tree.insert(Rect::from_center_size(*p, (1.0, 1.0)), *p);
    }
    tree.build();

    let query = Point::new(34.0, 30.0);
    let nearest = tree
        .nearest_to(
            Rect::from_center_size(query, (0.0, 0.0)),
            &query,
            |a, b| a.distance(*b),
        )
        .expect("tree is not empty");
    println!("nearest to {query:?}: {nearest:?}");

    let three = tree.k_nearest_to(
        Rect::from_center_size(query, (0.0, 0.0)),
        &query,
        |a, b| a.distance(*b),
        3,
    );
    println!("three nearest: {three:?}");

    // Distinct closest pair within the tree itself: make the distance
    // anti-reflexive so an item is never paired with itself.
    let pair = tree
        .nearest_pair(|a, b| {
            if a == b {
                f64::INFINITY
            } else {
                a.distance(*b)
            }
        })
        .expect("tree is not empty");
    println!("closest distinct pair: {pair:?}");
}
