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

#![allow(dead_code)]

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use cgmesh::geometry::{Point2, Point3, Vector3};
use cgmesh::topology::{Curve2d, Curve3d, EdgeId, FaceId, Shape, ShapeBuilder, Surface};
use cgmesh::{Topology, Triangulation};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn p2(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

pub fn p3(x: f64, y: f64) -> Point3 {
    Point3::new(x, y, 0.0)
}

/// Planar polygon in the xy plane, one segment edge per side.
pub fn polygon(corners: &[(f64, f64)]) -> (Shape, FaceId) {
    let mut b = Shape::builder();
    let pts: Vec<Point2> = corners.iter().map(|&(x, y)| p2(x, y)).collect();
    let (f, _) = b.add_polygon_face(Surface::xy_plane(), &pts);
    (b.build(), f)
}

pub fn unit_square() -> (Shape, FaceId) {
    polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
}

fn segment_use(b: &mut ShapeBuilder, a: (f64, f64), c: (f64, f64)) -> (EdgeId, bool, Curve2d) {
    let e = b.add_segment(p3(a.0, a.1), p3(c.0, c.1));
    (e, false, Curve2d::segment(p2(a.0, a.1), p2(c.0, c.1)))
}

/// Two rectangles `[0, 5] x [0, 2]` and `[0, 5] x [2, 4]` sharing the edge
/// `y = 2`, which the lower face runs backwards.
pub fn abutting_rectangles() -> (Shape, FaceId, FaceId, EdgeId) {
    let mut b = Shape::builder();
    let shared = b.add_segment(p3(0.0, 2.0), p3(5.0, 2.0));
    let shared_2d = Curve2d::segment(p2(0.0, 2.0), p2(5.0, 2.0));

    let lower = vec![
        segment_use(&mut b, (0.0, 0.0), (5.0, 0.0)),
        segment_use(&mut b, (5.0, 0.0), (5.0, 2.0)),
        (shared, true, shared_2d.clone()),
        segment_use(&mut b, (0.0, 2.0), (0.0, 0.0)),
    ];
    let wl = b.add_wire(lower);
    let upper = vec![
        (shared, false, shared_2d),
        segment_use(&mut b, (5.0, 2.0), (5.0, 4.0)),
        segment_use(&mut b, (5.0, 4.0), (0.0, 4.0)),
        segment_use(&mut b, (0.0, 4.0), (0.0, 2.0)),
    ];
    let wu = b.add_wire(upper);
    let fl = b.add_face(Surface::xy_plane(), vec![wl], true);
    let fu = b.add_face(Surface::xy_plane(), vec![wu], true);
    (b.build(), fl, fu, shared)
}

/// Upper half-disk of radius 2 and the rest of the rectangle
/// `[-3, 3] x [0, 3]`, sharing the arc.
pub fn disk_in_rectangle() -> (Shape, FaceId, FaceId, EdgeId) {
    let mut b = Shape::builder();
    let arc = b.add_edge(Curve3d::arc(
        Point3::origin(),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        2.0,
        (0.0, PI),
    ));
    let arc_2d = Curve2d::Circle {
        center: p2(0.0, 0.0),
        radius: 2.0,
    };

    let disk = vec![
        segment_use(&mut b, (-2.0, 0.0), (2.0, 0.0)),
        (arc, false, arc_2d.clone()),
    ];
    let wd = b.add_wire(disk);
    let rest = vec![
        segment_use(&mut b, (-3.0, 0.0), (-2.0, 0.0)),
        (arc, true, arc_2d),
        segment_use(&mut b, (2.0, 0.0), (3.0, 0.0)),
        segment_use(&mut b, (3.0, 0.0), (3.0, 3.0)),
        segment_use(&mut b, (3.0, 3.0), (-3.0, 3.0)),
        segment_use(&mut b, (-3.0, 3.0), (-3.0, 0.0)),
    ];
    let wr = b.add_wire(rest);
    let fd = b.add_face(Surface::xy_plane(), vec![wd], true);
    let fr = b.add_face(Surface::xy_plane(), vec![wr], true);
    (b.build(), fd, fr, arc)
}

/// Sphere of radius `r` above latitude pi/4: the bottom circle, a seam
/// used in both directions and a degenerated edge at the pole.
pub fn sphere_cap(r: f64) -> (Shape, FaceId) {
    let (v0, top, tau) = (FRAC_PI_4, FRAC_PI_2, 2.0 * PI);
    let mut b = Shape::builder();
    let bottom = b.add_edge(Curve3d::arc(
        Point3::new(0.0, 0.0, r * v0.sin()),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        r * v0.cos(),
        (0.0, tau),
    ));
    let seam = b.add_edge(Curve3d::arc(
        Point3::origin(),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
        r,
        (v0, top),
    ));
    let pole = b.add_degenerated_edge(Point3::new(0.0, 0.0, r), (0.0, tau));
    let w = b.add_wire(vec![
        (bottom, false, Curve2d::line(p2(0.0, v0), p2(1.0, 0.0))),
        (seam, false, Curve2d::line(p2(tau, 0.0), p2(0.0, 1.0))),
        (pole, true, Curve2d::line(p2(0.0, top), p2(1.0, 0.0))),
        (seam, true, Curve2d::line(p2(0.0, 0.0), p2(0.0, 1.0))),
    ]);
    let f = b.add_face(Surface::sphere(Point3::origin(), r), vec![w], true);
    (b.build(), f)
}

/// Quarter cylinder of radius 5 and height 3.
pub fn quarter_cylinder() -> (Shape, FaceId) {
    let (r, h, q) = (5.0, 3.0, FRAC_PI_2);
    let mut b = Shape::builder();
    let x = Vector3::new(1.0, 0.0, 0.0);
    let y = Vector3::new(0.0, 1.0, 0.0);
    let bottom = b.add_edge(Curve3d::arc(Point3::origin(), x, y, r, (0.0, q)));
    let top = b.add_edge(Curve3d::arc(Point3::new(0.0, 0.0, h), x, y, r, (0.0, q)));
    let right = b.add_segment(Point3::new(0.0, r, 0.0), Point3::new(0.0, r, h));
    let left = b.add_segment(Point3::new(r, 0.0, 0.0), Point3::new(r, 0.0, h));
    let w = b.add_wire(vec![
        (bottom, false, Curve2d::line(p2(0.0, 0.0), p2(1.0, 0.0))),
        (right, false, Curve2d::segment(p2(q, 0.0), p2(q, h))),
        (top, true, Curve2d::line(p2(0.0, h), p2(1.0, 0.0))),
        (left, true, Curve2d::segment(p2(0.0, 0.0), p2(0.0, h))),
    ]);
    let f = b.add_face(Surface::cylinder(Point3::origin(), r), vec![w], true);
    (b.build(), f)
}

/// Model-space points of `mesh` matching `keep`, sorted lexicographically.
pub fn points_where(mesh: &Triangulation, keep: impl Fn(&Point3) -> bool) -> Vec<Point3> {
    let mut out: Vec<Point3> = mesh.positions().filter(|p| keep(p)).copied().collect();
    out.sort_by(|a, b| {
        a.x.total_cmp(&b.x)
            .then(a.y.total_cmp(&b.y))
            .then(a.z.total_cmp(&b.z))
    });
    out.dedup();
    out
}

/// Largest distance between a triangle's centroid on the surface and its
/// planar centroid.
pub fn max_centroid_deviation(shape: &Shape, face: FaceId, mesh: &Triangulation) -> f64 {
    let surface = shape.surface(face);
    mesh.triangles
        .iter()
        .map(|t| {
            let uv: Vec<Point2> = t.iter().map(|&i| mesh.vertices[i].uv.unwrap()).collect();
            let g = p2(
                (uv[0].x + uv[1].x + uv[2].x) / 3.0,
                (uv[0].y + uv[1].y + uv[2].y) / 3.0,
            );
            let s = surface.point(g.x, g.y).unwrap();
            let c = Point3::centroid(
                &mesh.vertices[t[0]].position,
                &mesh.vertices[t[1]].position,
                &mesh.vertices[t[2]].position,
            );
            s.distance_to(&c)
        })
        .fold(0.0, f64::max)
}

/// Signed parametric area of each triangle.
pub fn uv_areas(mesh: &Triangulation) -> Vec<f64> {
    mesh.triangles
        .iter()
        .map(|t| {
            let a = mesh.vertices[t[0]].uv.unwrap();
            let b = mesh.vertices[t[1]].uv.unwrap();
            let c = mesh.vertices[t[2]].uv.unwrap();
            0.5 * cgmesh::kernel::orient2d(&a, &b, &c)
        })
        .collect()
}
