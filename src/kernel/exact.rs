// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Arbitrary-precision fallbacks for the filtered predicates.
//!
//! Every finite `f64` is a dyadic rational, so the determinants below are
//! evaluated without rounding once the coordinates are lifted to
//! `rug::Rational`. Returns `None` when a coordinate is not finite.

use std::cmp::Ordering;

use crate::geometry::Point2;

#[cfg(feature = "exact")]
use rug::Rational;

#[cfg(feature = "exact")]
fn lift(x: f64) -> Option<Rational> {
    Rational::from_f64(x)
}

#[cfg(feature = "exact")]
pub fn orient2d_exact(a: &Point2, b: &Point2, c: &Point2) -> Option<Ordering> {
    let (ax, ay) = (lift(a.x)?, lift(a.y)?);
    let (bx, by) = (lift(b.x)?, lift(b.y)?);
    let (cx, cy) = (lift(c.x)?, lift(c.y)?);

    let left = (bx - ax.clone()) * (cy - ay.clone());
    let right = (by - ay) * (cx - ax);
    Some((left - right).cmp0())
}

#[cfg(feature = "exact")]
pub fn incircle_exact(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> Option<Ordering> {
    let (dx, dy) = (lift(d.x)?, lift(d.y)?);
    let adx = lift(a.x)? - dx.clone();
    let ady = lift(a.y)? - dy.clone();
    let bdx = lift(b.x)? - dx.clone();
    let bdy = lift(b.y)? - dy.clone();
    let cdx = lift(c.x)? - dx;
    let cdy = lift(c.y)? - dy;

    let alift = adx.clone() * adx.clone() + ady.clone() * ady.clone();
    let blift = bdx.clone() * bdx.clone() + bdy.clone() * bdy.clone();
    let clift = cdx.clone() * cdx.clone() + cdy.clone() * cdy.clone();

    let bc = bdx.clone() * cdy.clone() - cdx.clone() * bdy.clone();
    let ca = cdx * ady.clone() - adx.clone() * cdy;
    let ab = adx * bdy - bdx * ady;

    let det = alift * bc + blift * ca + clift * ab;
    Some(det.cmp0())
}

#[cfg(not(feature = "exact"))]
pub fn orient2d_exact(_a: &Point2, _b: &Point2, _c: &Point2) -> Option<Ordering> {
    None
}

#[cfg(not(feature = "exact"))]
pub fn incircle_exact(_a: &Point2, _b: &Point2, _c: &Point2, _d: &Point2) -> Option<Ordering> {
    None
}
