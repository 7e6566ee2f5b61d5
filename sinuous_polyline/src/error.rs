// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by polyline construction and queries.

/// Failure of a [`PolyLine`](crate::PolyLine) operation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PolyLineError {
    /// The polyline has no segments yet.
    #[error("polyline has no segments")]
    Empty,
    /// A polyline was requested from fewer than two points.
    #[error("a polyline needs at least two points, got {0}")]
    NotEnoughPoints(usize),
    /// A segment index past the end of the polyline.
    #[error("segment {index} out of range, polyline has {len} segments")]
    SegmentOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of segments.
        len: usize,
    },
    /// An arc-length range that is empty or leaves the polyline.
    #[error("invalid arc-length range [{s_begin}, {s_end}] on a polyline of length {length}")]
    InvalidRange {
        /// Requested start.
        s_begin: f64,
        /// Requested end.
        s_end: f64,
        /// Polyline length.
        length: f64,
    },
    /// A vertex with a NaN or infinite coordinate.
    #[error("vertex ({x}, {y}) is not finite")]
    NonFinite {
        /// Offending x.
        x: f64,
        /// Offending y.
        y: f64,
    },
}
