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

use crate::geometry::Point2;
use crate::kernel::orientation::{Sign, orient2d_sign};

/// Where a point lies with respect to a counter-clockwise triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrianglePoint {
    Inside,
    /// On the edge opposite to the vertex with this local index.
    OnEdge(usize),
    OnVertex(usize),
    Outside,
}

/// Parameter of the projection of `p` on the line `a -> b` (0 at `a`, 1 at `b`).
#[inline]
pub fn param_t(a: &Point2, b: &Point2, p: &Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return 0.0;
    }
    ((p.x - a.x) * dx + (p.y - a.y) * dy) / len2
}

/// `p` is collinear with `[a, b]` and strictly between its endpoints.
pub fn is_point_inside_segment(p: &Point2, a: &Point2, b: &Point2) -> bool {
    if !orient2d_sign(a, b, p).is_zero() {
        return false;
    }
    let t = param_t(a, b, p);
    t > 0.0 && t < 1.0
}

/// Open segments `[a, b]` and `[c, d]` cross at a single interior point.
pub fn segments_properly_intersect(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
    let o1 = orient2d_sign(a, b, c);
    let o2 = orient2d_sign(a, b, d);
    let o3 = orient2d_sign(c, d, a);
    let o4 = orient2d_sign(c, d, b);
    opposite(o1, o2) && opposite(o3, o4)
}

/// Proper crossing, or an endpoint of one segment touching the interior of
/// the other (which includes collinear overlap).
pub fn segments_intersect(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
    segments_properly_intersect(a, b, c, d)
        || is_point_inside_segment(c, a, b)
        || is_point_inside_segment(d, a, b)
        || is_point_inside_segment(a, c, d)
        || is_point_inside_segment(b, c, d)
}

/// Classify `p` against the counter-clockwise triangle `tri`.
pub fn locate_in_triangle(p: &Point2, tri: [&Point2; 3]) -> TrianglePoint {
    for (i, v) in tri.iter().enumerate() {
        if *v == p {
            return TrianglePoint::OnVertex(i);
        }
    }

    let mut on_edge = None;
    for i in 0..3 {
        let a = tri[(i + 1) % 3];
        let b = tri[(i + 2) % 3];
        match orient2d_sign(a, b, p) {
            Sign::Negative => return TrianglePoint::Outside,
            Sign::Zero => on_edge = Some(i),
            Sign::Positive => {}
        }
    }
    match on_edge {
        Some(i) => TrianglePoint::OnEdge(i),
        None => TrianglePoint::Inside,
    }
}

#[inline]
fn opposite(s: Sign, t: Sign) -> bool {
    (s.is_positive() && t.is_negative()) || (s.is_negative() && t.is_positive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_diagonals() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 1.0);
        let c = Point2::new(0.0, 1.0);
        let d = Point2::new(1.0, 0.0);
        assert!(segments_properly_intersect(&a, &b, &c, &d));
        assert!(!segments_properly_intersect(&a, &c, &b, &d));
    }

    #[test]
    fn touching_counts_only_for_loose_test() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        let c = Point2::new(1.0, 0.0);
        let d = Point2::new(1.0, 1.0);
        assert!(!segments_properly_intersect(&a, &b, &c, &d));
        assert!(segments_intersect(&a, &b, &c, &d));
    }

    #[test]
    fn locate_inside_edge_vertex() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        let c = Point2::new(0.0, 2.0);
        let tri = [&a, &b, &c];
        assert_eq!(locate_in_triangle(&Point2::new(0.5, 0.5), tri), TrianglePoint::Inside);
        assert_eq!(locate_in_triangle(&Point2::new(1.0, 0.0), tri), TrianglePoint::OnEdge(2));
        assert_eq!(locate_in_triangle(&Point2::new(2.0, 0.0), tri), TrianglePoint::OnVertex(1));
        assert_eq!(locate_in_triangle(&Point2::new(3.0, 3.0), tri), TrianglePoint::Outside);
    }
}
