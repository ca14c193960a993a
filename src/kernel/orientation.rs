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

use std::cmp::Ordering;

use crate::geometry::Point2;

// Static filter bounds for the plain floating-point determinants
// (Shewchuk, "Adaptive Precision Floating-Point Arithmetic").
const CCW_ERR_BOUND: f64 = 3.330_669_073_875_471_6e-16;
const ICC_ERR_BOUND: f64 = 1.110_223_024_625_156_6e-15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    pub fn is_positive(self) -> bool {
        self == Sign::Positive
    }

    pub fn is_negative(self) -> bool {
        self == Sign::Negative
    }

    pub fn is_zero(self) -> bool {
        self == Sign::Zero
    }

    fn from_ordering(o: Ordering) -> Self {
        match o {
            Ordering::Less => Sign::Negative,
            Ordering::Equal => Sign::Zero,
            Ordering::Greater => Sign::Positive,
        }
    }
}

/// Returns:
/// - >0 if counter-clockwise
/// - <0 if clockwise
/// - =0 if collinear
///
/// Plain floating-point value; use [`orient2d_sign`] for decisions.
#[inline]
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Robust sign of [`orient2d`].
pub fn orient2d_sign(a: &Point2, b: &Point2, c: &Point2) -> Sign {
    let left = (b.x - a.x) * (c.y - a.y);
    let right = (b.y - a.y) * (c.x - a.x);
    let det = left - right;
    let bound = CCW_ERR_BOUND * (left.abs() + right.abs());
    if det > bound {
        return Sign::Positive;
    }
    if -det > bound {
        return Sign::Negative;
    }
    exact_or_float(|| super::exact::orient2d_exact(a, b, c), det)
}

/// In-circle determinant: positive when `d` lies strictly inside the
/// circumcircle of the counter-clockwise triangle `(a, b, c)`.
#[inline]
pub fn incircle(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> f64 {
    let (adx, ady) = (a.x - d.x, a.y - d.y);
    let (bdx, bdy) = (b.x - d.x, b.y - d.y);
    let (cdx, cdy) = (c.x - d.x, c.y - d.y);

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    alift * (bdx * cdy - cdx * bdy) + blift * (cdx * ady - adx * cdy) + clift * (adx * bdy - bdx * ady)
}

/// Robust sign of [`incircle`].
pub fn incircle_sign(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> Sign {
    let (adx, ady) = (a.x - d.x, a.y - d.y);
    let (bdx, bdy) = (b.x - d.x, b.y - d.y);
    let (cdx, cdy) = (c.x - d.x, c.y - d.y);

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdx * cdy - cdx * bdy)
        + blift * (cdx * ady - adx * cdy)
        + clift * (adx * bdy - bdx * ady);
    let permanent = alift * ((bdx * cdy).abs() + (cdx * bdy).abs())
        + blift * ((cdx * ady).abs() + (adx * cdy).abs())
        + clift * ((adx * bdy).abs() + (bdx * ady).abs());
    let bound = ICC_ERR_BOUND * permanent;
    if det > bound {
        return Sign::Positive;
    }
    if -det > bound {
        return Sign::Negative;
    }
    exact_or_float(|| super::exact::incircle_exact(a, b, c, d), det)
}

#[cfg(feature = "exact")]
#[inline]
fn exact_or_float(exact: impl FnOnce() -> Option<Ordering>, det: f64) -> Sign {
    match exact() {
        Some(o) => Sign::from_ordering(o),
        None => float_sign(det),
    }
}

#[cfg(not(feature = "exact"))]
#[inline]
fn exact_or_float(_exact: impl FnOnce() -> Option<Ordering>, det: f64) -> Sign {
    float_sign(det)
}

fn float_sign(det: f64) -> Sign {
    Sign::from_ordering(det.partial_cmp(&0.0).unwrap_or(Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ccw_test() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);

        assert!(orient2d(&a, &b, &c) > 0.0); // Counter-clockwise
        assert_eq!(orient2d_sign(&a, &c, &b), Sign::Negative);
    }

    #[test]
    fn collinear_points_are_zero() {
        let a = Point2::new(0.1, 0.1);
        let b = Point2::new(0.2, 0.2);
        let c = Point2::new(0.3, 0.3);
        assert_eq!(orient2d_sign(&a, &b, &c), Sign::Zero);
    }

    #[test]
    fn incircle_inside_outside_on() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert!(incircle_sign(&a, &b, &c, &Point2::new(0.5, 0.5)).is_positive());
        assert!(incircle_sign(&a, &b, &c, &Point2::new(2.0, 2.0)).is_negative());
        // (1, 1) is cocircular with the right triangle
        assert!(incircle_sign(&a, &b, &c, &Point2::new(1.0, 1.0)).is_zero());
    }
}
