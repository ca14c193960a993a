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

use tracing::{debug, warn};

use crate::discretization::StatusFlags;
use crate::geometry::{Aabb2, Aabb3, Point2, Point3};
use crate::kernel::{CONFUSION, PCONFUSION, segments_intersect};
use crate::mesh::{BoundaryCache, VertexRegistry};
use crate::operations::tessellation::{TessellationSettings, tessellate_edge};
use crate::topology::{EdgeId, FaceId, Topology};

/// A segment between two face-local vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    /// Must survive in the final triangulation.
    pub frontier: bool,
}

/// A closed loop of face-local vertices `start..start + len`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryLoop {
    pub start: usize,
    pub len: usize,
    pub outer: bool,
}

impl BoundaryLoop {
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Everything needed to triangulate one face, captured at `add` time.
#[derive(Clone, Debug)]
pub struct FaceWorkingSet {
    pub face: FaceId,
    /// Face-local boundary vertices: parameters, positions and registry ids.
    pub uv: Vec<Point2>,
    pub positions: Vec<Point3>,
    pub vertex_ids: Vec<usize>,
    pub links: Vec<Link>,
    pub loops: Vec<BoundaryLoop>,
    /// Smallest distinguishable distance in the face's parameter space.
    pub param_tolerance: f64,
    /// Absolute surface deflection for this face.
    pub deflection: f64,
    /// Deflection as requested, before any relative scaling.
    pub requested_deflection: f64,
    pub flags: StatusFlags,
    /// Cache generation of every edge tessellation used.
    pub edge_generations: Vec<(EdgeId, u64)>,
}

impl FaceWorkingSet {
    pub fn nb_vertices(&self) -> usize {
        self.uv.len()
    }

    /// Whether any edge behind this boundary was re-tessellated since.
    pub fn is_stale(&self, cache: &BoundaryCache) -> bool {
        self.edge_generations
            .iter()
            .any(|&(e, g)| cache.get(e).is_some_and(|t| t.generation != g))
    }
}

struct Sample {
    uv: Point2,
    position: Point3,
    id: usize,
}

/// Walks the wires of `face`, tessellates every edge through `cache` and
/// registers every sample in `registry`. The outer loop comes out
/// counter-clockwise in (u, v), holes clockwise.
pub fn build_polygon<M: Topology + ?Sized>(
    model: &M,
    face: FaceId,
    settings: &TessellationSettings,
    adaptive_min: bool,
    registry: &VertexRegistry,
    cache: &BoundaryCache,
) -> FaceWorkingSet {
    let mut flags = StatusFlags::OK;
    let mut edge_generations = Vec::new();
    let mut loops: Vec<Vec<Sample>> = Vec::new();

    for wire in model.wires(face) {
        let mut samples: Vec<Sample> = Vec::new();
        for coedge in model.edges_of(wire) {
            let tess = cache.get_or_compute(coedge.edge, settings.deflection, || {
                tessellate_edge(model, coedge.edge, settings, registry)
            });
            edge_generations.push((coedge.edge, tess.generation));
            if tess.deflection > settings.deflection {
                debug!(?face, edge = ?coedge.edge, "edge kept coarser by a processed face");
            }
            if tess.degenerate_segments > 0 || tess.is_empty() {
                flags |= StatusFlags::DEGENERATE_SEGMENT;
            }

            let pcurve = model.pcurve(coedge.id);
            let order: Box<dyn Iterator<Item = usize>> = if coedge.reversed {
                Box::new((0..tess.len()).rev())
            } else {
                Box::new(0..tess.len())
            };
            for i in order {
                let Some(uv) = pcurve.point(tess.params[i]) else {
                    flags |= StatusFlags::DEGENERATE_SEGMENT;
                    continue;
                };
                if samples.last().is_some_and(|s| same_uv(&s.uv, &uv)) {
                    continue;
                }
                samples.push(Sample {
                    uv,
                    position: tess.points[i],
                    id: tess.vertex_ids[i],
                });
            }
        }
        while samples.len() > 1 && same_uv(&samples[0].uv, &samples[samples.len() - 1].uv) {
            samples.pop();
        }
        if samples.len() < 3 {
            debug!(?face, ?wire, samples = samples.len(), "dropping collapsed wire");
            if !samples.is_empty() {
                flags |= StatusFlags::DEGENERATE_SEGMENT;
            }
            continue;
        }
        loops.push(samples);
    }

    // The loop enclosing the largest area is the outer one.
    let areas: Vec<f64> = loops
        .iter()
        .map(|l| signed_area(l.iter().map(|s| &s.uv)))
        .collect();
    let outer = areas
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map(|(i, _)| i);

    let mut ws = FaceWorkingSet {
        face,
        uv: Vec::new(),
        positions: Vec::new(),
        vertex_ids: Vec::new(),
        links: Vec::new(),
        loops: Vec::new(),
        param_tolerance: PCONFUSION,
        deflection: settings.deflection,
        requested_deflection: settings.deflection,
        flags,
        edge_generations,
    };

    for (li, mut samples) in loops.into_iter().enumerate() {
        let is_outer = Some(li) == outer;
        if (areas[li] > 0.0) != is_outer {
            samples.reverse();
        }
        let start = ws.uv.len();
        let len = samples.len();
        for s in samples {
            ws.uv.push(s.uv);
            ws.positions.push(s.position);
            ws.vertex_ids.push(s.id);
        }
        for k in 0..len {
            ws.links.push(Link {
                a: start + k,
                b: start + (k + 1) % len,
                frontier: true,
            });
        }
        ws.loops.push(BoundaryLoop {
            start,
            len,
            outer: is_outer,
        });
    }

    if ws.loops.iter().all(|l| !l.outer) || ws.uv.len() < 3 {
        warn!(?face, vertices = ws.uv.len(), "face boundary is degenerate");
        ws.flags |= StatusFlags::DEGENERATE;
        return ws;
    }

    if settings.relative {
        let extent = Aabb3::from_points(&ws.positions).max_extent();
        ws.deflection = (settings.deflection * extent).max(CONFUSION);
    }

    let uv_box = Aabb2::from_points(&ws.uv);
    ws.param_tolerance = PCONFUSION * uv_box.diagonal().max(1.0);
    if adaptive_min {
        if let Some(d) = min_spacing(&ws) {
            ws.param_tolerance = (0.1 * d).max(PCONFUSION);
        }
    }

    if has_crossing_links(&ws) {
        warn!(?face, "frontier links cross each other");
        ws.flags |= StatusFlags::SELF_INTERSECTING;
    }

    debug!(
        ?face,
        vertices = ws.uv.len(),
        loops = ws.loops.len(),
        flags = ?ws.flags,
        "boundary assembled"
    );
    ws
}

fn same_uv(a: &Point2, b: &Point2) -> bool {
    let scale = 1.0 + a.x.abs().max(a.y.abs());
    a.distance_squared_to(b) <= (PCONFUSION * scale).powi(2)
}

/// Shoelace area, positive for counter-clockwise loops.
pub fn signed_area<'a>(points: impl IntoIterator<Item = &'a Point2>) -> f64 {
    let pts: Vec<&Point2> = points.into_iter().collect();
    let n = pts.len();
    let mut twice = 0.0;
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    0.5 * twice
}

fn min_spacing(ws: &FaceWorkingSet) -> Option<f64> {
    ws.links
        .iter()
        .map(|l| ws.uv[l.a].distance_to(&ws.uv[l.b]))
        .filter(|d| *d > 0.0)
        .min_by(f64::total_cmp)
}

/// Sweep over the links sorted by their smallest u; links sharing a vertex
/// are not tested against each other.
fn has_crossing_links(ws: &FaceWorkingSet) -> bool {
    let boxes: Vec<Aabb2> = ws
        .links
        .iter()
        .map(|l| Aabb2::from_points([&ws.uv[l.a], &ws.uv[l.b]]))
        .collect();
    let mut order: Vec<usize> = (0..ws.links.len()).collect();
    order.sort_by(|&i, &j| boxes[i].min.x.total_cmp(&boxes[j].min.x));

    for (k, &i) in order.iter().enumerate() {
        let li = ws.links[i];
        for &j in &order[k + 1..] {
            if boxes[j].min.x > boxes[i].max.x {
                break;
            }
            let lj = ws.links[j];
            if li.a == lj.a || li.a == lj.b || li.b == lj.a || li.b == lj.b {
                continue;
            }
            if !boxes[i].intersects(&boxes[j]) {
                continue;
            }
            if segments_intersect(&ws.uv[li.a], &ws.uv[li.b], &ws.uv[lj.a], &ws.uv[lj.b]) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{Curve2d, Shape, Surface};

    fn settings() -> TessellationSettings {
        TessellationSettings {
            deflection: 0.01,
            angular_deflection: 0.1,
            min_size: 1e-3,
            relative: false,
        }
    }

    fn square_with_hole(hole_ccw: bool) -> (Shape, FaceId) {
        let mut b = Shape::builder();
        let outer = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        let mut hole = vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)];
        if !hole_ccw {
            hole.reverse();
        }
        let mut wires = Vec::new();
        // Outer given clockwise on purpose.
        for pts in [outer.iter().rev().copied().collect::<Vec<_>>(), hole] {
            let n = pts.len();
            let uses: Vec<_> = (0..n)
                .map(|i| {
                    let a = Point2::new(pts[i].0, pts[i].1);
                    let c = Point2::new(pts[(i + 1) % n].0, pts[(i + 1) % n].1);
                    let e = b.add_segment(Point3::new(a.x, a.y, 0.0), Point3::new(c.x, c.y, 0.0));
                    (e, false, Curve2d::segment(a, c))
                })
                .collect();
            wires.push(b.add_wire(uses));
        }
        let f = b.add_face(Surface::xy_plane(), wires, true);
        (b.build(), f)
    }

    #[test]
    fn loops_are_normalized() {
        let (shape, f) = square_with_hole(true);
        let registry = VertexRegistry::new(CONFUSION);
        let cache = BoundaryCache::new();
        let ws = build_polygon(&shape, f, &settings(), false, &registry, &cache);
        assert!(ws.flags.is_ok(), "{:?}", ws.flags);
        assert_eq!(ws.loops.len(), 2);
        assert_eq!(ws.nb_vertices(), 8);
        assert_eq!(ws.links.len(), 8);
        for l in &ws.loops {
            let area = signed_area(ws.uv[l.indices()].iter());
            if l.outer {
                assert!((area - 16.0).abs() < 1e-12);
            } else {
                assert!((area + 1.0).abs() < 1e-12);
            }
        }
        assert_eq!(registry.len(), 8);
        assert!(!ws.is_stale(&cache));
    }

    #[test]
    fn adaptive_min_follows_the_shortest_link() {
        let (shape, f) = square_with_hole(true);
        let run = |adaptive| {
            build_polygon(
                &shape,
                f,
                &settings(),
                adaptive,
                &VertexRegistry::new(CONFUSION),
                &BoundaryCache::new(),
            )
        };

        let fixed = run(false).param_tolerance;
        let expected = PCONFUSION * 32f64.sqrt();
        assert!((fixed - expected).abs() <= 1e-12 * expected);

        // The hole sides are the shortest links, one unit long.
        let adaptive = run(true).param_tolerance;
        assert!((adaptive - 0.1).abs() < 1e-12, "{adaptive}");
    }

    #[test]
    fn crossing_wire_is_flagged() {
        let mut b = Shape::builder();
        let pts = [(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)];
        let uses: Vec<_> = (0..4)
            .map(|i| {
                let a = Point2::new(pts[i].0, pts[i].1);
                let c = Point2::new(pts[(i + 1) % 4].0, pts[(i + 1) % 4].1);
                let e = b.add_segment(Point3::new(a.x, a.y, 0.0), Point3::new(c.x, c.y, 0.0));
                (e, false, Curve2d::segment(a, c))
            })
            .collect();
        let w = b.add_wire(uses);
        let f = b.add_face(Surface::xy_plane(), vec![w], true);
        let shape = b.build();
        let ws = build_polygon(
            &shape,
            f,
            &settings(),
            false,
            &VertexRegistry::new(CONFUSION),
            &BoundaryCache::new(),
        );
        assert!(ws.flags.contains(StatusFlags::SELF_INTERSECTING));
        assert!(!ws.flags.is_fatal());
    }
}
