// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! AABB tree basics.
//!
//! Build a tree over a handful of tagged boxes, print it, and run the three queries.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p sinuous_demos --example aabb_tree_basics`

use std::sync::Arc;

use sinuous_aabb::{AabbTree, BoundingBox};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let boxes: Vec<_> = [
        (0.0, 0.0, 1.0, 1.0),
        (2.0, 2.0, 3.0, 3.0),
        (0.0, 2.0, 1.0, 3.0),
        (4.0, 0.0, 6.0, 0.5),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (x0, y0, x1, y1))| Arc::new(BoundingBox::new(x0, y0, x1, y1, 0, i)))
    .collect();
    let tree = AabbTree::from_boxes(&boxes);
    println!("{} leaves, depth {}", tree.len(), tree.depth());
    print!("{tree}");

    // Nearest candidates for a query point.
    let (x, y) = (0.5, 0.5);
    println!("bound distance from ({x}, {y}): {}", tree.bound_distance(x, y));
    for b in tree.min_distance(x, y) {
        println!("  candidate ipos={} at distance {:.3}", b.ipos, b.distance(x, y));
    }

    // Pairs against a second tree, first at box level, then with an exact test.
    let probe = AabbTree::from_boxes(&[Arc::new(BoundingBox::new(0.5, 0.5, 2.0, 2.0, 1, 0))]);
    let hits = tree.intersect(&probe);
    println!("box-level hits: {:?}", hits.iter().map(|(a, _)| a.ipos).collect::<Vec<_>>());
    let strict = tree.intersect_with(&probe, |a, b| {
        a.max_x.min(b.max_x) > a.min_x.max(b.min_x) && a.max_y.min(b.max_y) > a.min_y.max(b.min_y)
    });
    println!("interior overlaps: {}", strict.len());
    println!("any collision: {}", tree.collision(&probe, |_, _| true));
    Ok(())
}
