// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polyline queries.
//!
//! Intersect two polylines, walk one of them by arc length, and find a closest point.
//! The lazily built segment trees are logged at debug level.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p sinuous_demos --example polyline_queries`

use std::f64::consts::TAU;

use kurbo::Point;
use sinuous_polyline::{PolyLine, SegmentHint};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // A 64-gon approximating the unit circle, and a horizontal chord.
    let ring: Vec<_> = (0..=64)
        .map(|i| {
            let th = TAU * f64::from(i) / 64.0;
            Point::new(th.cos(), th.sin())
        })
        .collect();
    let circle = PolyLine::from_points(&ring)?;
    let chord = PolyLine::from_points(&[Point::new(-2.0, 0.3), Point::new(2.0, 0.3)])?;
    println!("{circle}");
    println!("{chord}");

    for (s0, s1) in circle.intersect(&chord) {
        let p = circle.eval(s0)?;
        println!("crossing at ({:.4}, {:.4}), s_circle={s0:.4} s_chord={s1:.4}", p.x, p.y);
    }

    // Sequential evaluation reuses the hint.
    let mut hint = SegmentHint::new();
    let steps = 8_u32;
    for k in 0..=steps {
        let s = circle.length() * f64::from(k) / f64::from(steps);
        let p = circle.eval_with_hint(s, &mut hint)?;
        tracing::info!(s, segment = hint.segment(), x = p.x, y = p.y, "walk");
    }

    let q = Point::new(0.2, 0.1);
    let near = circle.closest_point(q)?;
    println!(
        "closest to ({}, {}): ({:.4}, {:.4}) on segment {}, distance {:.4}",
        q.x, q.y, near.point.x, near.point.y, near.segment, near.distance
    );
    Ok(())
}
