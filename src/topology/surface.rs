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

use crate::geometry::{Point3, Vector3};

/// Evaluation interface of a face's underlying surface.
pub trait SurfaceEvaluator: Send + Sync {
    /// Point at `(u, v)`; `None` where the surface cannot be evaluated.
    fn point(&self, u: f64, v: f64) -> Option<Point3>;
}

/// Analytic surfaces.
#[derive(Clone, Debug, PartialEq)]
pub enum Surface {
    /// `origin + u * x_axis + v * y_axis`.
    Plane {
        origin: Point3,
        x_axis: Vector3,
        y_axis: Vector3,
    },
    /// `origin + radius * (cos u * x_axis + sin u * y_axis) + v * z_axis`.
    Cylinder {
        origin: Point3,
        x_axis: Vector3,
        y_axis: Vector3,
        z_axis: Vector3,
        radius: f64,
    },
    /// `center + radius * (cos v * (cos u * x_axis + sin u * y_axis) + sin v * z_axis)`,
    /// `u` the longitude and `v` the latitude.
    Sphere {
        center: Point3,
        x_axis: Vector3,
        y_axis: Vector3,
        z_axis: Vector3,
        radius: f64,
    },
}

impl Surface {
    /// The plane `z = 0` with `(u, v) = (x, y)`.
    pub fn xy_plane() -> Self {
        Surface::Plane {
            origin: Point3::origin(),
            x_axis: Vector3::new(1.0, 0.0, 0.0),
            y_axis: Vector3::new(0.0, 1.0, 0.0),
        }
    }

    /// A sphere with its poles on the global z axis.
    pub fn sphere(center: Point3, radius: f64) -> Self {
        Surface::Sphere {
            center,
            x_axis: Vector3::new(1.0, 0.0, 0.0),
            y_axis: Vector3::new(0.0, 1.0, 0.0),
            z_axis: Vector3::new(0.0, 0.0, 1.0),
            radius,
        }
    }

    /// A cylinder around the global z axis.
    pub fn cylinder(origin: Point3, radius: f64) -> Self {
        Surface::Cylinder {
            origin,
            x_axis: Vector3::new(1.0, 0.0, 0.0),
            y_axis: Vector3::new(0.0, 1.0, 0.0),
            z_axis: Vector3::new(0.0, 0.0, 1.0),
            radius,
        }
    }
}

impl SurfaceEvaluator for Surface {
    fn point(&self, u: f64, v: f64) -> Option<Point3> {
        let p = match self {
            Surface::Plane {
                origin,
                x_axis,
                y_axis,
            } => origin.add_vector(&(x_axis.scale(u) + y_axis.scale(v))),
            Surface::Cylinder {
                origin,
                x_axis,
                y_axis,
                z_axis,
                radius,
            } => {
                let (s, c) = u.sin_cos();
                let radial = x_axis.scale(radius * c) + y_axis.scale(radius * s);
                origin.add_vector(&(radial + z_axis.scale(v)))
            }
            Surface::Sphere {
                center,
                x_axis,
                y_axis,
                z_axis,
                radius,
            } => {
                let (su, cu) = u.sin_cos();
                let (sv, cv) = v.sin_cos();
                let dir = x_axis.scale(cv * cu) + y_axis.scale(cv * su) + z_axis.scale(sv);
                center.add_vector(&dir.scale(*radius))
            }
        };
        p.is_finite().then_some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_points_lie_on_sphere() {
        let s = Surface::sphere(Point3::new(1.0, 2.0, 3.0), 10.0);
        for &(u, v) in &[(0.0, 0.0), (1.0, 0.5), (4.0, -1.2), (2.0, std::f64::consts::FRAC_PI_2)] {
            let p = s.point(u, v).unwrap();
            assert!((p.distance_to(&Point3::new(1.0, 2.0, 3.0)) - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn plane_maps_parameters_linearly() {
        let s = Surface::xy_plane();
        assert_eq!(s.point(0.25, 0.5), Some(Point3::new(0.25, 0.5, 0.0)));
    }
}
