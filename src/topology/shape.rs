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

use parking_lot::RwLock;

use crate::geometry::{Point2, Point3};
use crate::kernel::CONFUSION;
use crate::mesh::Triangulation;
use crate::topology::{
    CoEdge, CoEdgeId, Curve2d, Curve2dEvaluator, Curve3d, CurveEvaluator, EdgeId, FaceId,
    SurfaceEvaluator, Topology, WireId,
};

struct EdgeData {
    curve: Box<dyn CurveEvaluator>,
    tolerance: f64,
    degenerated: bool,
}

struct CoEdgeData {
    edge: EdgeId,
    reversed: bool,
    pcurve: Box<dyn Curve2dEvaluator>,
}

struct FaceData {
    surface: Box<dyn SurfaceEvaluator>,
    wires: Vec<WireId>,
    forward: bool,
    triangulation: RwLock<Option<Triangulation>>,
}

/// In-memory boundary representation: faces bounded by wires of shared
/// edges. Built with [`ShapeBuilder`].
pub struct Shape {
    edges: Vec<EdgeData>,
    coedges: Vec<CoEdgeData>,
    wires: Vec<Vec<CoEdgeId>>,
    faces: Vec<FaceData>,
}

impl Shape {
    pub fn builder() -> ShapeBuilder {
        ShapeBuilder::default()
    }

    pub fn nb_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn nb_edges(&self) -> usize {
        self.edges.len()
    }

    /// Drops every committed triangulation.
    pub fn clear_triangulations(&self) {
        for f in &self.faces {
            *f.triangulation.write() = None;
        }
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shape")
            .field("faces", &self.faces.len())
            .field("wires", &self.wires.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

impl Topology for Shape {
    fn faces(&self) -> Vec<FaceId> {
        (0..self.faces.len()).map(FaceId).collect()
    }

    fn wires(&self, face: FaceId) -> Vec<WireId> {
        self.faces
            .get(face.0)
            .map(|f| f.wires.clone())
            .unwrap_or_default()
    }

    fn edges_of(&self, wire: WireId) -> Vec<CoEdge> {
        self.wires
            .get(wire.0)
            .map(|uses| {
                uses.iter()
                    .map(|&id| {
                        let c = &self.coedges[id.0];
                        CoEdge {
                            id,
                            edge: c.edge,
                            reversed: c.reversed,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn curve(&self, edge: EdgeId) -> &dyn CurveEvaluator {
        self.edges[edge.0].curve.as_ref()
    }

    fn pcurve(&self, coedge: CoEdgeId) -> &dyn Curve2dEvaluator {
        self.coedges[coedge.0].pcurve.as_ref()
    }

    fn surface(&self, face: FaceId) -> &dyn SurfaceEvaluator {
        self.faces[face.0].surface.as_ref()
    }

    fn edge_tolerance(&self, edge: EdgeId) -> f64 {
        self.edges[edge.0].tolerance
    }

    fn is_degenerated(&self, edge: EdgeId) -> bool {
        self.edges[edge.0].degenerated
    }

    fn face_orientation(&self, face: FaceId) -> bool {
        self.faces[face.0].forward
    }

    fn set_triangulation(&self, face: FaceId, triangulation: Triangulation) {
        if let Some(f) = self.faces.get(face.0) {
            *f.triangulation.write() = Some(triangulation);
        }
    }

    fn triangulation(&self, face: FaceId) -> Option<Triangulation> {
        self.faces.get(face.0)?.triangulation.read().clone()
    }
}

#[derive(Default)]
pub struct ShapeBuilder {
    edges: Vec<EdgeData>,
    coedges: Vec<CoEdgeData>,
    wires: Vec<Vec<CoEdgeId>>,
    faces: Vec<FaceData>,
}

impl ShapeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, curve: impl CurveEvaluator + 'static) -> EdgeId {
        self.add_edge_with_tolerance(curve, CONFUSION)
    }

    pub fn add_edge_with_tolerance(
        &mut self,
        curve: impl CurveEvaluator + 'static,
        tolerance: f64,
    ) -> EdgeId {
        self.edges.push(EdgeData {
            curve: Box::new(curve),
            tolerance,
            degenerated: false,
        });
        EdgeId(self.edges.len() - 1)
    }

    /// An edge collapsed to `point` over `range`, e.g. a sphere pole.
    pub fn add_degenerated_edge(&mut self, point: Point3, range: (f64, f64)) -> EdgeId {
        self.edges.push(EdgeData {
            curve: Box::new(Curve3d::Degenerate { point, range }),
            tolerance: CONFUSION,
            degenerated: true,
        });
        EdgeId(self.edges.len() - 1)
    }

    /// Straight edge between two points.
    pub fn add_segment(&mut self, a: Point3, b: Point3) -> EdgeId {
        self.add_edge(Curve3d::segment(a, b))
    }

    /// A wire from `(edge, reversed, pcurve)` uses, in traversal order.
    pub fn add_wire<I, C>(&mut self, uses: I) -> WireId
    where
        I: IntoIterator<Item = (EdgeId, bool, C)>,
        C: Curve2dEvaluator + 'static,
    {
        let ids = uses
            .into_iter()
            .map(|(edge, reversed, pcurve)| {
                self.coedges.push(CoEdgeData {
                    edge,
                    reversed,
                    pcurve: Box::new(pcurve),
                });
                CoEdgeId(self.coedges.len() - 1)
            })
            .collect();
        self.wires.push(ids);
        WireId(self.wires.len() - 1)
    }

    pub fn add_face(
        &mut self,
        surface: impl SurfaceEvaluator + 'static,
        wires: Vec<WireId>,
        forward: bool,
    ) -> FaceId {
        self.faces.push(FaceData {
            surface: Box::new(surface),
            wires,
            forward,
            triangulation: RwLock::new(None),
        });
        FaceId(self.faces.len() - 1)
    }

    /// A planar polygonal face on `surface` (a plane whose parameters map
    /// `corners` to model space), creating one segment edge per side.
    /// Returns the face and its edges, side `i` running from corner `i` to
    /// corner `i + 1`.
    pub fn add_polygon_face(
        &mut self,
        surface: crate::topology::Surface,
        corners: &[Point2],
    ) -> (FaceId, Vec<EdgeId>) {
        let n = corners.len();
        let mut edges = Vec::with_capacity(n);
        let mut uses = Vec::with_capacity(n);
        for i in 0..n {
            let a = corners[i];
            let b = corners[(i + 1) % n];
            let pa = surface.point(a.x, a.y).unwrap_or_default();
            let pb = surface.point(b.x, b.y).unwrap_or_default();
            let e = self.add_segment(pa, pb);
            edges.push(e);
            uses.push((e, false, Curve2d::segment(a, b)));
        }
        let w = self.add_wire(uses);
        (self.add_face(surface, vec![w], true), edges)
    }

    pub fn build(self) -> Shape {
        Shape {
            edges: self.edges,
            coedges: self.coedges,
            wires: self.wires,
            faces: self.faces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Surface;

    #[test]
    fn polygon_face_wires_and_edges() {
        let mut b = Shape::builder();
        let (f, edges) = b.add_polygon_face(
            Surface::xy_plane(),
            &[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
        );
        let shape = b.build();
        assert_eq!(shape.faces(), vec![f]);
        let wires = shape.wires(f);
        assert_eq!(wires.len(), 1);
        let uses = shape.edges_of(wires[0]);
        assert_eq!(uses.iter().map(|c| c.edge).collect::<Vec<_>>(), edges);
        assert_eq!(
            shape.curve(edges[1]).point(0.0),
            Some(Point3::new(1.0, 0.0, 0.0))
        );
        assert!(shape.triangulation(f).is_none());
    }
}
