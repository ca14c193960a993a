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

use crate::geometry::{Point2, Point3, Vector3};

/// Evaluation interface of an edge's model-space curve.
pub trait CurveEvaluator: Send + Sync {
    /// Parameter range `(first, last)` of the trimmed curve.
    fn range(&self) -> (f64, f64);

    /// Point at parameter `t`; `None` where the curve cannot be evaluated.
    fn point(&self, t: f64) -> Option<Point3>;

    /// First derivative at `t`. Defaults to a central difference.
    fn tangent(&self, t: f64) -> Option<Vector3> {
        let (first, last) = self.range();
        let h = (last - first).abs().max(1.0) * 1e-6;
        let a = self.point((t - h).max(first.min(last)))?;
        let b = self.point((t + h).min(first.max(last)))?;
        let d = &b - &a;
        if d.norm_squared() == 0.0 { None } else { Some(d) }
    }
}

/// Evaluation interface of an edge's curve on a face (p-curve). Shares the
/// parameterization of the model-space curve.
pub trait Curve2dEvaluator: Send + Sync {
    fn point(&self, t: f64) -> Option<Point2>;
}

/// Analytic model-space curves.
#[derive(Clone, Debug, PartialEq)]
pub enum Curve3d {
    /// `origin + t * direction` on `range`.
    Line {
        origin: Point3,
        direction: Vector3,
        range: (f64, f64),
    },
    /// `center + radius * (cos t * x_axis + sin t * y_axis)` on `range`.
    Circle {
        center: Point3,
        x_axis: Vector3,
        y_axis: Vector3,
        radius: f64,
        range: (f64, f64),
    },
    /// A curve collapsed to one point, e.g. the pole of a sphere.
    Degenerate { point: Point3, range: (f64, f64) },
}

impl Curve3d {
    /// The straight segment from `a` (t = 0) to `b` (t = 1).
    pub fn segment(a: Point3, b: Point3) -> Self {
        Curve3d::Line {
            origin: a,
            direction: &b - &a,
            range: (0.0, 1.0),
        }
    }

    /// Circular arc; the axes are normalized here.
    pub fn arc(
        center: Point3,
        x_axis: Vector3,
        y_axis: Vector3,
        radius: f64,
        range: (f64, f64),
    ) -> Self {
        Curve3d::Circle {
            center,
            x_axis: x_axis.normalized().unwrap_or(Vector3::new(1.0, 0.0, 0.0)),
            y_axis: y_axis.normalized().unwrap_or(Vector3::new(0.0, 1.0, 0.0)),
            radius,
            range,
        }
    }
}

impl CurveEvaluator for Curve3d {
    fn range(&self) -> (f64, f64) {
        match self {
            Curve3d::Line { range, .. }
            | Curve3d::Circle { range, .. }
            | Curve3d::Degenerate { range, .. } => *range,
        }
    }

    fn point(&self, t: f64) -> Option<Point3> {
        let p = match self {
            Curve3d::Line { origin, direction, .. } => origin.add_vector(&direction.scale(t)),
            Curve3d::Circle {
                center,
                x_axis,
                y_axis,
                radius,
                ..
            } => {
                let (s, c) = t.sin_cos();
                center.add_vector(&(x_axis.scale(radius * c) + y_axis.scale(radius * s)))
            }
            Curve3d::Degenerate { point, .. } => *point,
        };
        p.is_finite().then_some(p)
    }

    fn tangent(&self, t: f64) -> Option<Vector3> {
        match self {
            Curve3d::Line { direction, .. } => Some(*direction),
            Curve3d::Circle {
                x_axis,
                y_axis,
                radius,
                ..
            } => {
                let (s, c) = t.sin_cos();
                Some(x_axis.scale(-radius * s) + y_axis.scale(radius * c))
            }
            Curve3d::Degenerate { .. } => None,
        }
    }
}

/// Analytic parameter-space curves.
#[derive(Clone, Debug, PartialEq)]
pub enum Curve2d {
    /// `origin + t * direction`.
    Line { origin: Point2, direction: Point2 },
    /// `center + radius * (cos t, sin t)`.
    Circle { center: Point2, radius: f64 },
}

impl Curve2d {
    /// The straight segment from `a` (t = 0) to `b` (t = 1).
    pub fn segment(a: Point2, b: Point2) -> Self {
        Curve2d::Line {
            origin: a,
            direction: b - a,
        }
    }

    /// A line whose parameter advances along `direction` from `origin`.
    pub fn line(origin: Point2, direction: Point2) -> Self {
        Curve2d::Line { origin, direction }
    }
}

impl Curve2dEvaluator for Curve2d {
    fn point(&self, t: f64) -> Option<Point2> {
        let p = match self {
            Curve2d::Line { origin, direction } => *origin + *direction * t,
            Curve2d::Circle { center, radius } => {
                let (s, c) = t.sin_cos();
                Point2::new(center.x + radius * c, center.y + radius * s)
            }
        };
        p.is_finite().then_some(p)
    }
}
