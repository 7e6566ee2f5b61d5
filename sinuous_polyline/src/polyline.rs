// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polylines with a lazily built tree over their segments.

use std::fmt;
use std::sync::{Arc, OnceLock};

use kurbo::{Affine, Point, Rect, Vec2};
use sinuous_aabb::AabbTree;

use crate::error::PolyLineError;
use crate::segment::LineSegment;

/// Remembers the segment found by the last arc-length lookup.
///
/// Sequential evaluations along a polyline mostly land in the same or the next segment.
/// Passing the same hint to consecutive [`PolyLine::find_at_s`] calls turns those lookups
/// into constant time. A hint is only an accelerator: it is checked on every call, so a
/// stale hint (or one used with another polyline) costs a binary search and nothing else.
///
/// Each thread or task keeps its own hint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentHint(usize);

impl SegmentHint {
    /// A hint pointing at the first segment.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Segment found by the last lookup.
    pub const fn segment(self) -> usize {
        self.0
    }
}

/// Result of [`PolyLine::closest_point`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClosestPoint {
    /// Nearest point on the polyline.
    pub point: Point,
    /// Arc length of `point` along the polyline.
    pub s: f64,
    /// Distance from the query point to `point`.
    pub distance: f64,
    /// Index of the segment holding `point`.
    pub segment: usize,
}

/// A chain of line segments, each starting where the previous one ends.
///
/// The polyline is parameterized by arc length from its start. Geometric queries between
/// polylines go through an [`AabbTree`] over the segments, built on first use and dropped
/// by every mutation. The cache is synchronized, so a polyline can be queried from several
/// threads at once.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "Vec<Point>", try_from = "Vec<Point>")
)]
pub struct PolyLine {
    segments: Vec<LineSegment>,
    /// Arc length at each vertex; one more entry than `segments`.
    s_offsets: Vec<f64>,
    end: Point,
    tree: OnceLock<AabbTree>,
}

impl PolyLine {
    /// An empty polyline starting at the origin.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            s_offsets: vec![0.0],
            end: Point::ORIGIN,
            tree: OnceLock::new(),
        }
    }

    /// A polyline through `points`, which must hold at least two vertices.
    pub fn from_points(points: &[Point]) -> Result<Self, PolyLineError> {
        let [first, rest @ ..] = points else {
            return Err(PolyLineError::NotEnoughPoints(0));
        };
        if rest.is_empty() {
            return Err(PolyLineError::NotEnoughPoints(1));
        }
        let mut pl = Self::new();
        pl.init(*first)?;
        pl.segments.reserve(rest.len());
        pl.s_offsets.reserve(rest.len());
        for p in rest {
            pl.push_back(*p)?;
        }
        Ok(pl)
    }

    /// Drop every segment and restart the polyline at `start`.
    pub fn init(&mut self, start: Point) -> Result<(), PolyLineError> {
        check_finite(start)?;
        self.segments.clear();
        self.s_offsets.clear();
        self.s_offsets.push(0.0);
        self.end = start;
        self.invalidate();
        Ok(())
    }

    /// Append a segment from the current end to `p`.
    pub fn push_back(&mut self, p: Point) -> Result<(), PolyLineError> {
        check_finite(p)?;
        self.append(LineSegment::new(self.end, p));
        Ok(())
    }

    /// Append a copy of `segment`, moved rigidly so that it starts at the current end.
    pub fn push_segment(&mut self, segment: LineSegment) -> Result<(), PolyLineError> {
        if !segment.is_finite() {
            let p = if segment.start().is_finite() {
                segment.end()
            } else {
                segment.start()
            };
            return Err(PolyLineError::NonFinite { x: p.x, y: p.y });
        }
        let mut seg = segment;
        seg.translate_to(self.end);
        self.append(seg);
        Ok(())
    }

    fn append(&mut self, seg: LineSegment) {
        let s = self.length() + seg.length();
        self.end = seg.end();
        self.segments.push(seg);
        self.s_offsets.push(s);
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.tree = OnceLock::new();
    }

    /// Recompute arc lengths and the end point after the segments were rewritten in place.
    fn rechain(&mut self) {
        self.s_offsets.truncate(1);
        let mut s = 0.0;
        for seg in &self.segments {
            s += seg.length();
            self.s_offsets.push(s);
        }
        if let Some(last) = self.segments.last() {
            self.end = last.end();
        }
        self.invalidate();
    }

    /// Number of segments.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Whether the polyline has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment `n`.
    pub fn segment(&self, n: usize) -> Result<&LineSegment, PolyLineError> {
        self.segments
            .get(n)
            .ok_or(PolyLineError::SegmentOutOfRange {
                index: n,
                len: self.segments.len(),
            })
    }

    /// All segments in order.
    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.s_offsets.last().copied().unwrap_or(0.0)
    }

    /// Arc length at each vertex, starting with zero.
    pub fn s_offsets(&self) -> &[f64] {
        &self.s_offsets
    }

    /// First vertex.
    pub fn start(&self) -> Point {
        self.segments.first().map_or(self.end, LineSegment::start)
    }

    /// Last vertex.
    pub fn end(&self) -> Point {
        self.end
    }

    /// All vertices, `num_segments() + 1` of them.
    pub fn vertices(&self) -> Vec<Point> {
        let mut out: Vec<_> = self.segments.iter().map(LineSegment::start).collect();
        out.push(self.end);
        out
    }

    /// Index of the segment holding arc length `s`.
    ///
    /// Arc lengths before the start or past the end map to the first or last segment.
    /// A vertex shared by two segments may be reported in either of them.
    /// Returns 0 for an empty polyline.
    pub fn find_at_s(&self, s: f64, hint: &mut SegmentHint) -> usize {
        if self.segments.is_empty() {
            *hint = SegmentHint(0);
            return 0;
        }
        let i = search_interval(&self.s_offsets, s, hint.0);
        *hint = SegmentHint(i);
        i
    }

    /// Point at arc length `s`, clamped to the polyline.
    pub fn eval(&self, s: f64) -> Result<Point, PolyLineError> {
        self.eval_with_hint(s, &mut SegmentHint::new())
    }

    /// Like [`eval`](Self::eval), reusing and updating `hint`.
    pub fn eval_with_hint(&self, s: f64, hint: &mut SegmentHint) -> Result<Point, PolyLineError> {
        if self.segments.is_empty() {
            return Err(PolyLineError::Empty);
        }
        let i = self.find_at_s(s, hint);
        Ok(self.segments[i].eval(s - self.s_offsets[i]))
    }

    /// Tight axis-aligned bounds of the polyline.
    ///
    /// Read from the tree root when the tree has been built, otherwise from the vertices.
    pub fn bbox(&self) -> Result<Rect, PolyLineError> {
        if self.segments.is_empty() {
            return Err(PolyLineError::Empty);
        }
        if let Some(root) = self.tree.get().and_then(AabbTree::bbox) {
            return Ok(Rect::new(root.min_x, root.min_y, root.max_x, root.max_y));
        }
        let start = self.start();
        let rect = self
            .segments
            .iter()
            .fold(Rect::from_points(start, start), |acc, seg| {
                acc.union(seg.bbox())
            });
        Ok(rect)
    }

    /// The tree over the segments, built on first use.
    ///
    /// Leaf `ipos` values are segment indices. Concurrent first calls build the tree once.
    pub fn aabb_tree(&self) -> &AabbTree {
        self.tree.get_or_init(|| {
            tracing::debug!(segments = self.segments.len(), "building polyline AABB tree");
            let mut tree = AabbTree::new();
            self.build_aabb_tree(&mut tree);
            tree
        })
    }

    /// Whether [`aabb_tree`](Self::aabb_tree) is currently cached.
    pub fn is_aabb_tree_built(&self) -> bool {
        self.tree.get().is_some()
    }

    /// Build a tree over the segments into a caller-owned `tree`.
    pub fn build_aabb_tree(&self, tree: &mut AabbTree) {
        let boxes: Vec<_> = self
            .segments
            .iter()
            .enumerate()
            .map(|(i, seg)| Arc::new(seg.bounding_box(i)))
            .collect();
        tree.build(&boxes);
    }

    /// Whether the two polylines share at least one point.
    pub fn collision(&self, other: &Self) -> bool {
        self.aabb_tree().collision(other.aabb_tree(), |a, b| {
            self.segments[a.ipos].collision(&other.segments[b.ipos])
        })
    }

    /// Intersection points as arc-length pairs `(s_self, s_other)`.
    ///
    /// Every pair of intersecting segments contributes one point, so a crossing located at
    /// a vertex is reported once per segment touching it. The order is unspecified.
    pub fn intersect(&self, other: &Self) -> Vec<(f64, f64)> {
        let mut out = Vec::new();
        self.intersect_into(other, &mut out, false);
        out
    }

    /// Append the intersection points to `out`, as `(s_other, s_self)` when `swap` is set.
    pub fn intersect_into(&self, other: &Self, out: &mut Vec<(f64, f64)>, swap: bool) {
        for (a, b) in self.aabb_tree().intersect(other.aabb_tree()) {
            let (i, j) = (a.ipos, b.ipos);
            if let Some((s0, s1)) = self.segments[i].intersect(&other.segments[j]) {
                let s0 = s0 + self.s_offsets[i];
                let s1 = s1 + other.s_offsets[j];
                out.push(if swap { (s1, s0) } else { (s0, s1) });
            }
        }
    }

    /// The point of the polyline nearest to `p`.
    ///
    /// On ties the segment with the smallest index wins.
    pub fn closest_point(&self, p: Point) -> Result<ClosestPoint, PolyLineError> {
        let mut best: Option<ClosestPoint> = None;
        for leaf in self.aabb_tree().min_distance(p.x, p.y) {
            let i = leaf.ipos;
            let (point, s, distance) = self.segments[i].closest_point(p);
            let better = best.is_none_or(|b| {
                distance < b.distance || (distance == b.distance && i < b.segment)
            });
            if better {
                best = Some(ClosestPoint {
                    point,
                    s: s + self.s_offsets[i],
                    distance,
                    segment: i,
                });
            }
        }
        best.ok_or(PolyLineError::Empty)
    }

    /// Distance from `p` to the polyline.
    pub fn distance(&self, p: Point) -> Result<f64, PolyLineError> {
        self.closest_point(p).map(|c| c.distance)
    }

    /// Apply an affine map to every vertex.
    ///
    /// Fails with [`PolyLineError::NonFinite`], leaving the polyline untouched, when a mapped
    /// vertex is NaN or infinite (a non-finite map, or an overflowing one).
    pub fn transform(&mut self, affine: Affine) -> Result<(), PolyLineError> {
        let end = affine * self.end;
        check_finite(end)?;
        let mut mapped = self.segments.clone();
        for seg in &mut mapped {
            seg.transform(affine);
            check_finite(seg.start())?;
        }
        self.segments = mapped;
        self.end = end;
        self.rechain();
        Ok(())
    }

    /// Move the polyline by `offset`.
    pub fn translate(&mut self, offset: Vec2) -> Result<(), PolyLineError> {
        self.transform(Affine::translate(offset))
    }

    /// Rotate the polyline by `angle` radians around `center`.
    pub fn rotate(&mut self, angle: f64, center: Point) -> Result<(), PolyLineError> {
        self.transform(Affine::rotate_about(angle, center))
    }

    /// Scale the polyline uniformly around its start.
    pub fn scale(&mut self, factor: f64) -> Result<(), PolyLineError> {
        self.transform(Affine::scale_about(factor, self.start()))
    }

    /// Move the polyline rigidly so that it starts at `origin`.
    pub fn change_origin(&mut self, origin: Point) -> Result<(), PolyLineError> {
        self.translate(origin - self.start())
    }

    /// Run the polyline backwards; the old end becomes the start.
    pub fn reverse(&mut self) {
        self.segments.reverse();
        for seg in &mut self.segments {
            seg.reverse();
        }
        self.rechain();
    }

    /// Keep only the piece between arc lengths `s_begin` and `s_end`.
    ///
    /// Requires `0 <= s_begin < s_end <= length()`.
    pub fn trim(&mut self, s_begin: f64, s_end: f64) -> Result<(), PolyLineError> {
        if self.segments.is_empty() {
            return Err(PolyLineError::Empty);
        }
        let length = self.length();
        if !(0.0 <= s_begin && s_begin < s_end && s_end <= length) {
            return Err(PolyLineError::InvalidRange {
                s_begin,
                s_end,
                length,
            });
        }
        let mut hint = SegmentHint::new();
        let i0 = self.find_at_s(s_begin, &mut hint);
        let i1 = self.find_at_s(s_end, &mut hint);
        let (off0, off1) = (self.s_offsets[i0], self.s_offsets[i1]);

        let mut kept = self.segments[i0..=i1].to_vec();
        if let [only] = kept.as_mut_slice() {
            only.trim(s_begin - off0, s_end - off0);
        } else if let [first, .., last] = kept.as_mut_slice() {
            first.trim(s_begin - off0, first.length());
            last.trim(0.0, s_end - off1);
        }
        // Cuts on a shared vertex leave an empty piece behind.
        if kept.len() > 1 && kept[0].length() == 0.0 {
            kept.remove(0);
        }
        if kept.len() > 1 && kept[kept.len() - 1].length() == 0.0 {
            kept.pop();
        }
        self.segments = kept;
        self.rechain();
        Ok(())
    }
}

impl Default for PolyLine {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Point>> for PolyLine {
    type Error = PolyLineError;

    /// The first point is the start; each further point adds a segment.
    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        let Some((first, rest)) = points.split_first() else {
            return Err(PolyLineError::NotEnoughPoints(0));
        };
        let mut pl = Self::new();
        pl.init(*first)?;
        for p in rest {
            pl.push_back(*p)?;
        }
        Ok(pl)
    }
}

impl From<PolyLine> for Vec<Point> {
    fn from(pl: PolyLine) -> Self {
        pl.vertices()
    }
}

impl fmt::Display for PolyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (p0, p1) = (self.start(), self.end());
        write!(
            f,
            "PolyLine: {} segments from ({:.6}, {:.6}) to ({:.6}, {:.6}), length {:.6}",
            self.segments.len(),
            p0.x,
            p0.y,
            p1.x,
            p1.y,
            self.length()
        )
    }
}

fn check_finite(p: Point) -> Result<(), PolyLineError> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(PolyLineError::NonFinite { x: p.x, y: p.y })
    }
}

/// Index `i` of the interval `[s[i], s[i + 1]]` holding `x`, starting the search at `hint`.
///
/// `s` is nondecreasing with at least two entries. Values outside `[s[0], s[last]]` map to
/// the first or last interval.
fn search_interval(s: &[f64], x: f64, hint: usize) -> usize {
    let last = s.len() - 2;
    let i = hint.min(last);
    if s[i] <= x && x <= s[i + 1] {
        return i;
    }
    if i < last && s[i + 1] <= x && x <= s[i + 2] {
        return i + 1;
    }
    s.partition_point(|&v| v <= x).saturating_sub(1).min(last)
}
