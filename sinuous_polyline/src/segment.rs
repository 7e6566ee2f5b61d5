// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Straight line segments parameterized by arc length.

use kurbo::{Affine, Line, Point, Rect};
use sinuous_aabb::BoundingBox;

/// Owner tag carried by the leaf boxes of line segments.
pub const LINE_SEGMENT_ID: u32 = 0;

/// Relative tolerance of [`LineSegment::intersect`].
///
/// Parameters may overshoot the segment ends by this fraction of their length, and two
/// segments are treated as parallel when the sine of the angle between them is below it.
pub const INTERSECTION_TOLERANCE: f64 = 1e-12;

/// A straight segment from `start` to `end`, parameterized by arc length `s` in `[0, length]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment {
    line: Line,
}

impl LineSegment {
    /// Create the segment joining `p0` to `p1`.
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self {
            line: Line::new(p0, p1),
        }
    }

    /// The underlying kurbo line.
    pub fn line(&self) -> Line {
        self.line
    }

    /// First point.
    pub fn start(&self) -> Point {
        self.line.p0
    }

    /// Last point.
    pub fn end(&self) -> Point {
        self.line.p1
    }

    /// Arc length.
    pub fn length(&self) -> f64 {
        (self.line.p1 - self.line.p0).hypot()
    }

    /// Whether both endpoints have finite coordinates.
    pub fn is_finite(&self) -> bool {
        self.line.p0.is_finite() && self.line.p1.is_finite()
    }

    /// Point at arc length `s`, clamped to the segment.
    pub fn eval(&self, s: f64) -> Point {
        let len = self.length();
        if len == 0.0 {
            return self.line.p0;
        }
        self.line.p0.lerp(self.line.p1, (s / len).clamp(0.0, 1.0))
    }

    /// Tight axis-aligned bounds.
    pub fn bbox(&self) -> Rect {
        Rect::from_points(self.line.p0, self.line.p1)
    }

    /// Leaf box for the tree, tagged with [`LINE_SEGMENT_ID`] and rank `ipos`.
    pub fn bounding_box(&self, ipos: usize) -> BoundingBox {
        let r = self.bbox();
        BoundingBox::new(r.x0, r.y0, r.x1, r.y1, LINE_SEGMENT_ID, ipos)
    }

    /// Move the segment rigidly so that it starts at `origin`.
    pub fn translate_to(&mut self, origin: Point) {
        let d = self.line.p1 - self.line.p0;
        self.line = Line::new(origin, origin + d);
    }

    /// Apply an affine map to both endpoints.
    pub fn transform(&mut self, affine: Affine) {
        self.line = affine * self.line;
    }

    /// Swap the endpoints.
    pub fn reverse(&mut self) {
        self.line = Line::new(self.line.p1, self.line.p0);
    }

    /// Keep the piece between arc lengths `s_begin` and `s_end` (both clamped).
    pub fn trim(&mut self, s_begin: f64, s_end: f64) {
        let p0 = self.eval(s_begin);
        let p1 = self.eval(s_end);
        self.line = Line::new(p0, p1);
    }

    /// Orthogonal projection of `p` onto the segment.
    ///
    /// Returns the nearest point, its arc length, and the distance to `p`.
    pub fn closest_point(&self, p: Point) -> (Point, f64, f64) {
        let d = self.line.p1 - self.line.p0;
        let len2 = d.hypot2();
        let t = if len2 > 0.0 {
            ((p - self.line.p0).dot(d) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let q = self.line.p0.lerp(self.line.p1, t);
        (q, t * len2.sqrt(), p.distance(q))
    }

    /// First intersection point with `other`, as arc lengths `(s_self, s_other)`.
    ///
    /// Crossing and touching segments meet in a single point. Overlapping collinear
    /// segments report the overlap point with the smallest arc length on `self`.
    pub fn intersect(&self, other: &Self) -> Option<(f64, f64)> {
        let len0 = self.length();
        let len1 = other.length();
        if len0 == 0.0 {
            return other.locate(self.line.p0).map(|s1| (0.0, s1));
        }
        if len1 == 0.0 {
            return self.locate(other.line.p0).map(|s0| (s0, 0.0));
        }

        let r = self.line.p1 - self.line.p0;
        let q = other.line.p1 - other.line.p0;
        let w = other.line.p0 - self.line.p0;
        let denom = r.cross(q);
        if denom.abs() > INTERSECTION_TOLERANCE * len0 * len1 {
            let t = w.cross(q) / denom;
            let u = w.cross(r) / denom;
            let range = -INTERSECTION_TOLERANCE..=1.0 + INTERSECTION_TOLERANCE;
            if range.contains(&t) && range.contains(&u) {
                return Some((t.clamp(0.0, 1.0) * len0, u.clamp(0.0, 1.0) * len1));
            }
            return None;
        }

        // Parallel; only collinear segments can still overlap.
        if w.cross(r).abs() > INTERSECTION_TOLERANCE * len0 * len0.max(w.hypot()) {
            return None;
        }
        let r2 = r.hypot2();
        let t0 = w.dot(r) / r2;
        let t1 = (other.line.p1 - self.line.p0).dot(r) / r2;
        let lo = t0.min(t1).max(0.0);
        let hi = t0.max(t1).min(1.0);
        if lo > hi {
            return None;
        }
        let p = self.line.p0.lerp(self.line.p1, lo);
        let s1 = ((p - other.line.p0).dot(q) / len1).clamp(0.0, len1);
        Some((lo * len0, s1))
    }

    /// Whether the two segments share at least one point.
    pub fn collision(&self, other: &Self) -> bool {
        self.intersect(other).is_some()
    }

    /// Arc length of `p` if it lies on the segment.
    fn locate(&self, p: Point) -> Option<f64> {
        let (_, s, d) = self.closest_point(p);
        (d <= INTERSECTION_TOLERANCE * self.length().max(1.0)).then_some(s)
    }
}

impl From<Line> for LineSegment {
    fn from(line: Line) -> Self {
        Self { line }
    }
}
