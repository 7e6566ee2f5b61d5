// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sinuous Polyline: Kurbo-native polylines backed by an AABB tree.
//!
//! A [`PolyLine`] is a chain of [`LineSegment`]s parameterized by arc length. Queries between
//! polylines (collision, intersection) and against points (closest point) use a
//! [`sinuous_aabb::AabbTree`] over the segments to skip segments that cannot matter, and run
//! the exact segment test only on the survivors.
//!
//! The tree is built on first use and cached inside the polyline behind a
//! [`OnceLock`](std::sync::OnceLock). Any mutation drops it. A polyline that is no longer
//! mutated can be shared between threads and queried concurrently.
//!
//! Arc-length lookups ([`PolyLine::find_at_s`], [`PolyLine::eval_with_hint`]) take a
//! caller-owned [`SegmentHint`] so that walking along a polyline stays cheap without any
//! hidden per-thread state.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use sinuous_polyline::PolyLine;
//!
//! let zigzag = PolyLine::from_points(&[
//!     Point::new(0.0, 0.0),
//!     Point::new(1.0, 1.0),
//!     Point::new(2.0, 0.0),
//!     Point::new(3.0, 1.0),
//! ])?;
//! let floor = PolyLine::from_points(&[Point::new(-1.0, 0.5), Point::new(4.0, 0.5)])?;
//!
//! // The zigzag crosses y = 0.5 three times.
//! let hits = zigzag.intersect(&floor);
//! assert_eq!(hits.len(), 3);
//! for (s0, s1) in hits {
//!     let (a, b) = (zigzag.eval(s0)?, floor.eval(s1)?);
//!     assert!((a - b).hypot() < 1e-9);
//! }
//!
//! let nearest = zigzag.closest_point(Point::new(1.0, 2.0))?;
//! assert_eq!(nearest.point, Point::new(1.0, 1.0));
//! # Ok::<(), sinuous_polyline::PolyLineError>(())
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`LineSegment`], [`ClosestPoint`] and
//!   [`PolyLine`] (as its list of vertices).

mod error;
mod polyline;
mod segment;

pub use error::PolyLineError;
pub use polyline::{ClosestPoint, PolyLine, SegmentHint};
pub use segment::{INTERSECTION_TOLERANCE, LINE_SEGMENT_ID, LineSegment};
