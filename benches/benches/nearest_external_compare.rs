// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use stratum_index::StrTree;

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Rect::new(x0, y0, x0 + cell, y0 + cell));
        }
    }
    out
}

fn to_rstar_rects(v: &[Rect]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|r| Rectangle::from_corners([r.x0, r.y0], [r.x1, r.y1]))
        .collect()
}

fn bench_nearest_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_external_compare");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        let mut tree = StrTree::with_node_capacity(10);
        for (i, r) in rects.iter().enumerate() {
            tree.insert(*r, i as u32);
        }
        tree.build();
        let query_rect = Rect::new(333.0, 333.0, 334.0, 334.0);
        let query = u32::MAX;
        let centre = |i: &u32| {
            if *i == query {
                query_rect.center()
            } else {
                rects[*i as usize].center()
            }
        };
        group.bench_function(format!("stratum_nearest_n{n}"), |b| {
            b.iter(|| {
                tree.nearest_to(black_box(query_rect), &query, |a, b| {
                    centre(a).distance(centre(b))
                })
            });
        });

        let rtree = RTree::bulk_load(to_rstar_rects(&rects));
        group.bench_function(format!("rstar_nearest_n{n}"), |b| {
            b.iter(|| black_box(rtree.nearest_neighbor(&[333.5, 333.5])));
        });

        let window = AABB::from_corners([100.0, 100.0], [500.0, 500.0]);
        group.bench_function(format!("rstar_window_n{n}"), |b| {
            b.iter(|| rtree.locate_in_envelope_intersecting(&window).count());
        });
        group.bench_function(format!("stratum_window_n{n}"), |b| {
            b.iter(|| {
                tree.query(black_box(Rect::new(100.0, 100.0, 500.0, 500.0)))
                    .len()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_nearest_external_compare);
criterion_main!(benches);
