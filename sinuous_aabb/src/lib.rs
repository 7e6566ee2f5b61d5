// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sinuous AABB: an axis-aligned bounding box tree for planar curve segments.
//!
//! Curve collections (polylines, arc and clothoid lists, ...) split into many small segments.
//! Comparing two such collections pair by pair is quadratic; this crate prunes the comparison
//! with a hierarchy of bounding boxes so that only segments whose boxes overlap ever reach
//! the exact (and expensive) geometric test.
//!
//! - [`BoundingBox`]: an axis-aligned rectangle tagged with an owner `id` and a rank `ipos`.
//!   The rank is how tree results map back to the caller's segments.
//! - [`AabbTree`]: a binary tree built over shared leaf boxes, with three queries:
//!   - [`AabbTree::collision`]: does any overlapping leaf pair satisfy a caller predicate?
//!   - [`AabbTree::intersect`]: every overlapping leaf pair between two trees.
//!   - [`AabbTree::min_distance`]: the leaves that may hold the primitive nearest to a point.
//!
//! The tree never looks at the enclosed geometry. Exact decisions are delegated to the
//! caller, either through the leaf predicate or by refining the returned candidates.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sinuous_aabb::{AabbTree, BoundingBox};
//!
//! let boxes: Vec<_> = [(0.0, 0.0, 1.0, 1.0), (2.0, 2.0, 3.0, 3.0), (0.0, 2.0, 1.0, 3.0)]
//!     .into_iter()
//!     .enumerate()
//!     .map(|(i, (x0, y0, x1, y1))| Arc::new(BoundingBox::new(x0, y0, x1, y1, 0, i)))
//!     .collect();
//! let tree = AabbTree::from_boxes(&boxes);
//!
//! // Segment 0 is the only candidate for the point nearest to (0.5, 0.5).
//! let candidates = tree.min_distance(0.5, 0.5);
//! assert!(candidates.iter().any(|b| b.ipos == 0));
//!
//! // Compare against another tree. Boxes are closed, so the probe also touches
//! // boxes 1 and 2 along its border.
//! let probe = AabbTree::from_boxes(&[Arc::new(BoundingBox::new(0.5, 0.5, 2.0, 2.0, 0, 0))]);
//! assert!(tree.collision(&probe, |_, _| true));
//! assert_eq!(tree.intersect(&probe).len(), 3);
//!
//! // The predicate would normally run an exact test on the segments ranked by `ipos`.
//! let deep = tree.intersect_with(&probe, |a, _| a.ipos == 0);
//! assert_eq!(deep.len(), 1);
//! ```
//!
//! # Feature Flags
//!
//! - `std` (enabled by default): float functions from the standard library.
//! - `libm`: float functions from [libm](https://docs.rs/libm) for `no_std` targets.
//! - `serde`: `Serialize`/`Deserialize` for [`BoundingBox`].
//!
//! At least one of `std` and `libm` is required; `std` overrides `libm`.
//! The crate requires an allocator (it uses [`alloc`]).
//!
//! ### Float semantics
//!
//! Coordinates are assumed finite. Boxes with `min > max` on either axis are a caller error
//! and are not detected.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("sinuous_aabb requires either the `std` or `libm` feature");

// Suppress the unused_crate_dependencies lint when both std and libm are specified.
#[cfg(all(feature = "std", feature = "libm"))]
use libm as _;

extern crate alloc;

mod float;
pub mod tree;
pub mod types;

pub use tree::{AabbTree, LeafPair};
pub use types::BoundingBox;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    fn tagged(v: &[(f64, f64, f64, f64)]) -> Vec<Arc<BoundingBox>> {
        v.iter()
            .enumerate()
            .map(|(i, &(x0, y0, x1, y1))| Arc::new(BoundingBox::new(x0, y0, x1, y1, 0, i)))
            .collect()
    }

    #[test]
    fn three_boxes_against_a_probe() {
        let tree = AabbTree::from_boxes(&tagged(&[
            (0.0, 0.0, 1.0, 1.0),
            (2.0, 2.0, 3.0, 3.0),
            (0.0, 2.0, 1.0, 3.0),
        ]));
        let probe = AabbTree::from_boxes(&tagged(&[(0.5, 0.5, 2.0, 2.0)]));

        let candidates = tree.min_distance(0.5, 0.5);
        assert!(candidates.iter().any(|b| b.ipos == 0));
        assert!(candidates.iter().all(|b| b.distance(0.5, 0.5) <= tree.bound_distance(0.5, 0.5)));

        assert!(tree.collision(&probe, |_, _| true));

        // Box 0 overlaps the probe's interior, box 1 touches its corner and box 2 its
        // top edge; the predicate narrows the box-level hits down to the interior overlap.
        let hits = tree.intersect(&probe);
        assert_eq!(hits.len(), 3);
        let exact = tree.intersect_with(&probe, |a, b| {
            let w = a.max_x.min(b.max_x) - a.min_x.max(b.min_x);
            let h = a.max_y.min(b.max_y) - a.min_y.max(b.min_y);
            w > 0.0 && h > 0.0
        });
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].0.ipos, 0);
        assert_eq!(exact[0].1.ipos, 0);
    }

    #[test]
    fn shared_leaves_feed_several_trees() {
        let leaves = tagged(&[(0.0, 0.0, 1.0, 1.0), (4.0, 0.0, 5.0, 1.0), (8.0, 0.0, 9.0, 1.0)]);
        let all = AabbTree::from_boxes(&leaves);
        let tail = AabbTree::from_boxes(&leaves[1..]);
        let pairs = all.intersect(&tail);
        assert_eq!(pairs.len(), 2);
        for (a, b) in &pairs {
            assert!(Arc::ptr_eq(a, b), "both trees index the same leaf boxes");
        }
    }
}
