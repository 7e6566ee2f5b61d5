// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use sinuous_aabb::{AabbTree, BoundingBox};
use sinuous_polyline::PolyLine;

fn gen_grid_boxes(n: usize, cell: f64) -> Vec<Arc<BoundingBox>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            let b = BoundingBox::new(x0, y0, x0 + cell, y0 + cell, 0, out.len());
            out.push(Arc::new(b));
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

/// A random walk: the segments of a long, self-crossing polyline.
fn gen_random_walk(count: usize, step: f64, seed: u64) -> PolyLine {
    let mut rng = Rng::new(seed);
    let mut p = Point::ORIGIN;
    let mut pl = PolyLine::new();
    let _ = pl.init(p);
    for _ in 0..count {
        p.x += (rng.next_f64() - 0.5) * step;
        p.y += (rng.next_f64() - 0.5) * step;
        let _ = pl.push_back(p);
    }
    pl
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[32usize, 64, 128] {
        let boxes = gen_grid_boxes(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{}", n), |b| {
            b.iter_batched(
                AabbTree::new,
                |mut tree| {
                    tree.build(&boxes);
                    black_box(tree.depth());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_tree_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_pairs");
    for &n in &[32usize, 64, 128] {
        let a = AabbTree::from_boxes(&gen_grid_boxes(n, 10.0));
        let shifted: Vec<_> = gen_grid_boxes(n, 10.0)
            .iter()
            .map(|b| {
                let mut s = **b;
                s.min_x += 5.0;
                s.max_x += 5.0;
                Arc::new(s)
            })
            .collect();
        let b_tree = AabbTree::from_boxes(&shifted);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("intersect_n{}", n), |b| {
            b.iter(|| black_box(a.intersect(&b_tree).len()))
        });
        // Rejects every pair, so the whole overlap is visited.
        group.bench_function(format!("collision_none_n{}", n), |b| {
            b.iter(|| black_box(a.collision(&b_tree, |_, _| false)))
        });
    }
    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    for &n in &[32usize, 64, 128] {
        let tree = AabbTree::from_boxes(&gen_grid_boxes(n, 10.0));
        let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
        let extent = n as f64 * 10.0;
        let queries: Vec<_> = (0..256)
            .map(|_| (rng.next_f64() * extent, rng.next_f64() * extent))
            .collect();
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(format!("min_distance_n{}", n), |b| {
            b.iter(|| {
                let hits: usize = queries
                    .iter()
                    .map(|&(x, y)| tree.min_distance(x, y).len())
                    .sum();
                black_box(hits);
            })
        });
    }
    group.finish();
}

fn bench_polyline(c: &mut Criterion) {
    let mut group = c.benchmark_group("polyline");
    for &n in &[1_000usize, 10_000] {
        let a = gen_random_walk(n, 4.0, 0xBADC_F00D_1234_5678);
        let b_pl = gen_random_walk(n, 4.0, 0xC1A5_7E55_9999_ABCD);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("intersect_cold_n{}", n), |b| {
            b.iter_batched(
                || (a.clone(), b_pl.clone()),
                |(mut x, y)| {
                    // Force a rebuild of one cached tree.
                    let _ = x.translate(kurbo::Vec2::ZERO);
                    black_box(x.intersect(&y).len());
                },
                BatchSize::LargeInput,
            )
        });
        group.bench_function(format!("closest_point_warm_n{}", n), |b| {
            let _ = a.aabb_tree();
            b.iter(|| black_box(a.closest_point(Point::new(1.0, 1.0)).ok()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_tree_pairs, bench_nearest, bench_polyline);
criterion_main!(benches);
