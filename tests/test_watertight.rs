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

mod common;

use cgmesh::geometry::Point3;
use cgmesh::{Discretizer, MeshParameters, StatusFlags, Topology, perform};

use common::*;

#[test]
fn abutting_rectangles_share_edge_samples() {
    init_tracing();
    let (shape, lower, upper, _) = abutting_rectangles();
    let report = perform(&shape, MeshParameters::default().with_linear_deflection(0.01)).unwrap();
    assert!(report.flags.is_ok(), "{:?}", report.flags);

    let on_edge = |p: &Point3| p.y == 2.0;
    let a = points_where(&shape.triangulation(lower).unwrap(), on_edge);
    let b = points_where(&shape.triangulation(upper).unwrap(), on_edge);
    assert_eq!(a, b);
    assert_eq!(a.first(), Some(&p3(0.0, 2.0)));
    assert_eq!(a.last(), Some(&p3(5.0, 2.0)));
}

#[test]
fn shared_arc_is_identical_on_both_faces() {
    let (shape, disk, rest, arc) = disk_in_rectangle();
    let mut disc =
        Discretizer::new(&shape, MeshParameters::default().with_linear_deflection(0.001)).unwrap();
    disc.perform_all().unwrap();

    let on_arc = |p: &Point3| (p.x.hypot(p.y) - 2.0).abs() < 1e-9;
    let a = points_where(&shape.triangulation(disk).unwrap(), on_arc);
    let b = points_where(&shape.triangulation(rest).unwrap(), on_arc);
    let cached = disc.context().cache.get(arc).unwrap();
    assert!(cached.len() > 8);
    assert_eq!(a.len(), cached.len());
    assert_eq!(a, b);

    // Same registry ids on both sides.
    let ids = |f| {
        let m = shape.triangulation(f).unwrap();
        let mut ids: Vec<usize> = m
            .vertices
            .iter()
            .filter(|v| on_arc(&v.position))
            .filter_map(|v| v.id)
            .collect();
        ids.sort_unstable();
        ids
    };
    assert_eq!(ids(disk), ids(rest));
}

#[test]
fn finer_later_add_is_picked_up_by_earlier_face() {
    let (shape, disk, rest, arc) = disk_in_rectangle();
    let mut disc = Discretizer::new(&shape, MeshParameters::default()).unwrap();

    disc.add_with_deflection(disk, 0.1).unwrap();
    let coarse = disc.context().cache.get(arc).unwrap();
    disc.add_with_deflection(rest, 0.0005).unwrap();
    let fine = disc.context().cache.get(arc).unwrap();
    assert!(fine.len() > coarse.len());
    assert!(fine.generation > coarse.generation);

    disc.process(disk).unwrap();
    disc.process(rest).unwrap();

    let on_arc = |p: &Point3| (p.x.hypot(p.y) - 2.0).abs() < 1e-9;
    let a = points_where(&shape.triangulation(disk).unwrap(), on_arc);
    let b = points_where(&shape.triangulation(rest).unwrap(), on_arc);
    assert_eq!(a.len(), fine.len());
    assert_eq!(a, b);
}

#[test]
fn processed_face_pins_its_shared_edge() {
    let (shape, disk, rest, arc) = disk_in_rectangle();
    let mut disc = Discretizer::new(&shape, MeshParameters::default()).unwrap();

    disc.add_with_deflection(disk, 0.1).unwrap();
    disc.process(disk).unwrap();
    assert!(disc.context().cache.is_frozen(arc));
    let committed = disc.context().cache.get(arc).unwrap();

    // A stricter request after the commit keeps the committed samples.
    disc.add_with_deflection(rest, 0.0005).unwrap();
    let after = disc.context().cache.get(arc).unwrap();
    assert_eq!(after.generation, committed.generation);
    let report = disc.process(rest).unwrap();
    assert!(report.flags.is_ok(), "{:?}", report.flags);

    let on_arc = |p: &Point3| (p.x.hypot(p.y) - 2.0).abs() < 1e-9;
    let a = points_where(&shape.triangulation(disk).unwrap(), on_arc);
    let b = points_where(&shape.triangulation(rest).unwrap(), on_arc);
    assert_eq!(a.len(), committed.len());
    assert_eq!(a, b);
}

#[test]
fn coarser_request_reuses_cached_edge() {
    let (shape, disk, rest, arc) = disk_in_rectangle();
    let mut disc = Discretizer::new(&shape, MeshParameters::default()).unwrap();
    disc.add_with_deflection(disk, 0.001).unwrap();
    let first = disc.context().cache.get(arc).unwrap();
    disc.add_with_deflection(rest, 0.5).unwrap();
    let second = disc.context().cache.get(arc).unwrap();
    assert_eq!(first.generation, second.generation);
    assert_eq!(first.points, second.points);
}

#[test]
fn sphere_cap_refines_with_deflection() {
    init_tracing();
    let (shape, f) = sphere_cap(10.0);
    let mut counts = Vec::new();
    for d in [1.0, 0.1, 0.01] {
        let params = MeshParameters::default()
            .with_angular_deflection(0.5)
            .with_linear_deflection(d);
        let report = perform(&shape, params).unwrap();
        let face = report.face(f).unwrap();
        assert!(!face.flags.is_fatal(), "{:?}", face.flags);
        assert!(!face.flags.contains(StatusFlags::LOCAL_FAILURE), "{:?}", face.flags);
        counts.push(shape.triangulation(f).unwrap().nb_triangles());
    }
    assert!(counts[0] < counts[1] && counts[1] < counts[2], "{counts:?}");
}

#[test]
fn sphere_cap_seam_and_pole_collapse_to_shared_ids() {
    let (shape, f) = sphere_cap(10.0);
    let mut disc =
        Discretizer::new(&shape, MeshParameters::default().with_linear_deflection(0.1)).unwrap();
    disc.add(f).unwrap();
    disc.process(f).unwrap();
    let mesh = shape.triangulation(f).unwrap();

    // Pole samples: many parameters, one model point, one id.
    let pole: Vec<_> = mesh
        .vertices
        .iter()
        .filter(|v| v.position == Point3::new(0.0, 0.0, 10.0))
        .collect();
    assert!(pole.len() > 2);
    assert!(pole.iter().all(|v| v.id == pole[0].id));

    // Both sides of the seam carry the same ids at different u.
    let mut left: Vec<usize> = mesh
        .vertices
        .iter()
        .filter(|v| v.uv.unwrap().x == 0.0)
        .filter_map(|v| v.id)
        .collect();
    let mut right: Vec<usize> = mesh
        .vertices
        .iter()
        .filter(|v| v.uv.unwrap().x == 2.0 * std::f64::consts::PI)
        .filter_map(|v| v.id)
        .collect();
    left.sort_unstable();
    right.sort_unstable();
    assert!(!left.is_empty());
    assert_eq!(left, right);
}
