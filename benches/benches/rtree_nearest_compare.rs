// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use std::sync::Arc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sinuous_aabb::{AabbTree, BoundingBox};

use rstar::RTree;
use rstar::primitives::Rectangle;

fn gen_grid_boxes(n: usize, cell: f64) -> Vec<Arc<BoundingBox>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            let b = BoundingBox::new(x0, y0, x0 + 0.8 * cell, y0 + 0.8 * cell, 0, out.len());
            out.push(Arc::new(b));
        }
    }
    out
}

fn to_rstar_rects(v: &[Arc<BoundingBox>]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|b| Rectangle::from_corners([b.min_x, b.min_y], [b.max_x, b.max_y]))
        .collect()
}

fn bench_nearest_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_external_compare");
    for &n in &[64usize, 128] {
        let boxes = gen_grid_boxes(n, 10.0);
        let queries: Vec<_> = (0..64)
            .map(|i| (i as f64 * 17.3 % (n as f64 * 10.0), i as f64 * 9.1))
            .collect();
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("sinuous_build_nearest_n{}", n), |b| {
            b.iter_batched(
                || boxes.clone(),
                |boxes| {
                    let tree = AabbTree::from_boxes(&boxes);
                    let hits: usize = queries
                        .iter()
                        .map(|&(x, y)| tree.min_distance(x, y).len())
                        .sum();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_nearest_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&boxes),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let hits = queries
                        .iter()
                        .filter(|&&(x, y)| tree.nearest_neighbor(&[x, y]).is_some())
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_nearest_external_compare);
criterion_main!(benches);
