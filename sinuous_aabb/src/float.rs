// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Float functions that are not available in `core`. `std` overrides `libm`.

#[cfg(feature = "std")]
#[inline]
pub(crate) fn hypot(a: f64, b: f64) -> f64 {
    a.hypot(b)
}

#[cfg(not(feature = "std"))]
#[inline]
pub(crate) fn hypot(a: f64, b: f64) -> f64 {
    libm::hypot(a, b)
}

#[cfg(feature = "std")]
#[inline]
pub(crate) fn abs(v: f64) -> f64 {
    v.abs()
}

#[cfg(not(feature = "std"))]
#[inline]
pub(crate) fn abs(v: f64) -> f64 {
    libm::fabs(v)
}
