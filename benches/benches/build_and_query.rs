// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use stratum_index::{SirTree, StrTree};

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

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, extent: f64, rect_w: f64, rect_h: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (extent - rect_w);
        let y0 = rng.next_f64() * (extent - rect_h);
        out.push(Rect::new(x0, y0, x0 + rect_w, y0 + rect_h));
    }
    out
}

fn build_tree(rects: &[Rect], capacity: usize) -> StrTree<u32> {
    let mut tree = StrTree::with_node_capacity(capacity);
    for (i, r) in rects.iter().enumerate() {
        tree.insert(*r, i as u32);
    }
    tree.build();
    tree
}

fn bench_str_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("str_build");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        for &capacity in &[4usize, 10, 16] {
            group.bench_function(format!("grid_n{n}_cap{capacity}"), |b| {
                b.iter_batched(
                    || rects.clone(),
                    |rects| black_box(build_tree(&rects, capacity)),
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_str_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("str_query");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let tree = build_tree(&rects, 10);
        let window = Rect::new(100.0, 100.0, 500.0, 500.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("window_n{n}"), |b| {
            b.iter(|| black_box(tree.query(black_box(window))).len());
        });
        group.bench_function(format!("window_visitor_n{n}"), |b| {
            b.iter(|| {
                let mut count = 0usize;
                tree.query_with(black_box(window), |_| count += 1);
                black_box(count)
            });
        });
    }
    group.finish();
}

fn bench_str_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("str_nearest");
    let rects = gen_random_rects(10_000, 1000.0, 2.0, 2.0);
    let tree = build_tree(&rects, 10);
    let query_rect = Rect::new(500.0, 500.0, 501.0, 501.0);
    let query = u32::MAX;
    let centre = |i: &u32| {
        if *i == query {
            query_rect.center()
        } else {
            rects[*i as usize].center()
        }
    };
    group.bench_function("nearest_to_10k", |b| {
        b.iter(|| {
            tree.nearest_to(black_box(query_rect), &query, |a, b| {
                centre(a).distance(centre(b))
            })
        });
    });
    group.bench_function("k_nearest_16_of_10k", |b| {
        b.iter(|| {
            tree.k_nearest_to(
                black_box(query_rect),
                &query,
                |a, b| centre(a).distance(centre(b)),
                16,
            )
        });
    });
    group.finish();
}

fn bench_sir_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("sir_query");
    let mut tree = SirTree::with_node_capacity(10);
    for i in 0..10_000u32 {
        let lo = f64::from(i) * 0.5;
        tree.insert(lo, lo + 2.0, i);
    }
    tree.build();
    group.bench_function("range_10k", |b| {
        b.iter(|| black_box(tree.query(black_box(1000.0), black_box(1100.0))).len());
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_str_build,
    bench_str_query,
    bench_str_nearest,
    bench_sir_query
);
criterion_main!(benches);
