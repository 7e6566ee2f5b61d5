// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bounding box entity and its geometric predicates.

use core::fmt;

use crate::float;

/// Axis-aligned bounding box tagged with the owner id and rank of the primitive it encloses.
///
/// Boxes are plain values. The tree shares leaf boxes behind an `Arc`, so once a box has been
/// handed to [`AabbTree::build`](crate::AabbTree::build) it is never mutated again.
///
/// The constructor does not check `min_x <= max_x` and `min_y <= max_y`; callers uphold it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    /// Minimum x.
    pub min_x: f64,
    /// Minimum y.
    pub min_y: f64,
    /// Maximum x.
    pub max_x: f64,
    /// Maximum y.
    pub max_y: f64,
    /// Tag of the owning curve family (or any caller-defined category).
    pub id: u32,
    /// Rank of the enclosed primitive in the caller's segment collection.
    ///
    /// Tree queries report leaves only; this is how results map back to domain objects.
    pub ipos: usize,
}

impl BoundingBox {
    /// The degenerate box `(0, 0, 0, 0)` with both tags zeroed.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0, 0);

    /// Create a box from its extrema and tags.
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64, id: u32, ipos: usize) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            id,
            ipos,
        }
    }

    /// Create the tight union of `boxes`, tagged with `id` and `ipos`.
    ///
    /// An empty input yields the degenerate box at the origin.
    pub fn from_boxes<'a, I>(boxes: I, id: u32, ipos: usize) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut out = Self::new(0.0, 0.0, 0.0, 0.0, id, ipos);
        out.join(boxes);
        out
    }

    /// Overwrite the extrema with the tight union of `boxes`, keeping the tags.
    ///
    /// An empty input collapses the box to `(0, 0, 0, 0)`.
    pub fn join<'a, I>(&mut self, boxes: I)
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut it = boxes.into_iter();
        let Some(first) = it.next() else {
            self.min_x = 0.0;
            self.min_y = 0.0;
            self.max_x = 0.0;
            self.max_y = 0.0;
            return;
        };
        self.min_x = first.min_x;
        self.min_y = first.min_y;
        self.max_x = first.max_x;
        self.max_y = first.max_y;
        for b in it {
            if b.min_x < self.min_x {
                self.min_x = b.min_x;
            }
            if b.min_y < self.min_y {
                self.min_y = b.min_y;
            }
            if b.max_x > self.max_x {
                self.max_x = b.max_x;
            }
            if b.max_y > self.max_y {
                self.max_y = b.max_y;
            }
        }
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Whether the closed box contains the point.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    /// Whether the two closed boxes overlap. Touching boxes collide.
    pub fn collision(&self, other: &Self) -> bool {
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    /// Euclidean distance from the point to the box; zero inside.
    ///
    /// This is a lower bound on the distance from the point to anything the box encloses.
    pub fn distance(&self, x: f64, y: f64) -> f64 {
        // Regions around the box:
        //
        //   6 | 7 | 8
        //  ---+---+---
        //   3 | 4 | 5
        //  ---+---+---
        //   0 | 1 | 2
        let mut region = 4;
        if x < self.min_x {
            region = 3;
        } else if x > self.max_x {
            region = 5;
        }
        if y < self.min_y {
            region -= 3;
        } else if y > self.max_y {
            region += 3;
        }
        match region {
            0 => float::hypot(x - self.min_x, y - self.min_y),
            1 => self.min_y - y,
            2 => float::hypot(x - self.max_x, y - self.min_y),
            3 => self.min_x - x,
            5 => x - self.max_x,
            6 => float::hypot(x - self.min_x, y - self.max_y),
            7 => y - self.max_y,
            8 => float::hypot(x - self.max_x, y - self.max_y),
            _ => 0.0,
        }
    }

    /// Euclidean distance from the point to the farthest corner of the box.
    ///
    /// Any primitive enclosed by the box has a point no farther than this, so it
    /// bounds the nearest distance from above.
    pub fn max_distance(&self, x: f64, y: f64) -> f64 {
        let dx = float::abs(x - self.min_x).max(float::abs(x - self.max_x));
        let dy = float::abs(y - self.min_y).max(float::abs(y - self.max_y));
        float::hypot(dx, dy)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BBOX (xmin,ymin,xmax,ymax) = ({:.6}, {:.6}, {:.6}, {:.6})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    const UNIT: BoundingBox = BoundingBox::new(0.0, 0.0, 1.0, 1.0, 3, 7);

    #[test]
    fn join_is_tight_union_and_keeps_tags() {
        let boxes = [
            BoundingBox::new(0.0, 1.0, 2.0, 3.0, 1, 0),
            BoundingBox::new(-1.0, 2.0, 1.0, 5.0, 1, 1),
            BoundingBox::new(0.5, -4.0, 0.6, 0.0, 1, 2),
        ];
        let u = BoundingBox::from_boxes(&boxes, 9, 4);
        assert_eq!(u, BoundingBox::new(-1.0, -4.0, 2.0, 5.0, 9, 4));
    }

    #[test]
    fn join_of_nothing_is_zero_box() {
        let mut b = UNIT;
        b.join(core::iter::empty());
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (0.0, 0.0, 0.0, 0.0));
        assert_eq!((b.id, b.ipos), (3, 7), "join must not touch the tags");
    }

    #[test]
    fn distance_covers_all_nine_regions() {
        let b = BoundingBox::new(0.0, 0.0, 2.0, 1.0, 0, 0);
        // interior and boundary
        assert_eq!(b.distance(1.0, 0.5), 0.0);
        assert_eq!(b.distance(2.0, 1.0), 0.0);
        // edges
        assert_eq!(b.distance(1.0, -3.0), 3.0);
        assert_eq!(b.distance(1.0, 4.0), 3.0);
        assert_eq!(b.distance(-2.0, 0.5), 2.0);
        assert_eq!(b.distance(5.0, 0.5), 3.0);
        // corners
        assert_eq!(b.distance(-3.0, -4.0), 5.0);
        assert_eq!(b.distance(5.0, -4.0), 5.0);
        assert_eq!(b.distance(-3.0, 5.0), 5.0);
        assert_eq!(b.distance(5.0, 5.0), 5.0);
    }

    #[test]
    fn max_distance_uses_farthest_corner() {
        let b = BoundingBox::new(0.0, 0.0, 3.0, 4.0, 0, 0);
        assert_eq!(b.max_distance(0.0, 0.0), 5.0);
        assert_eq!(b.max_distance(3.0, 4.0), 5.0);
        assert_eq!(b.max_distance(1.5, 2.0), 2.5);
        assert!(b.max_distance(-1.0, 7.0) >= b.distance(-1.0, 7.0));
    }

    #[test]
    fn collision_is_closed() {
        let touching = BoundingBox::new(1.0, 1.0, 2.0, 2.0, 0, 0);
        let apart = BoundingBox::new(1.0 + 1e-9, 0.0, 2.0, 1.0, 0, 0);
        let above = BoundingBox::new(0.0, 1.5, 1.0, 2.0, 0, 0);
        assert!(UNIT.collision(&touching));
        assert!(touching.collision(&UNIT));
        assert!(!UNIT.collision(&apart));
        assert!(!UNIT.collision(&above));
        assert!(UNIT.collision(&UNIT));
    }

    #[test]
    fn display_matches_print_format() {
        let s = format!("{}", BoundingBox::new(0.0, -1.0, 2.5, 3.0, 0, 0));
        assert_eq!(
            s,
            "BBOX (xmin,ymin,xmax,ymax) = (0.000000, -1.000000, 2.500000, 3.000000)"
        );
    }
}
