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

//! Query interface of the boundary-representation layer the mesher runs on.
//!
//! The mesher never owns topology. It asks for wires, edges and evaluators
//! through [`Topology`] and hands finished meshes back through
//! [`Topology::set_triangulation`]. [`Shape`] is a small in-memory
//! implementation.

pub mod curve;
pub mod shape;
pub mod surface;

pub use curve::{Curve2d, Curve2dEvaluator, Curve3d, CurveEvaluator};
pub use shape::{Shape, ShapeBuilder};
pub use surface::{Surface, SurfaceEvaluator};

use crate::mesh::Triangulation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WireId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(pub usize);

/// One use of an edge inside a wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoEdgeId(pub usize);

/// An edge as it appears in a wire: which edge, in which direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoEdge {
    pub id: CoEdgeId,
    pub edge: EdgeId,
    /// Traversed from the last parameter to the first.
    pub reversed: bool,
}

pub trait Topology: Sync {
    fn faces(&self) -> Vec<FaceId>;

    fn wires(&self, face: FaceId) -> Vec<WireId>;

    /// Ordered, oriented edges of a wire.
    fn edges_of(&self, wire: WireId) -> Vec<CoEdge>;

    fn curve(&self, edge: EdgeId) -> &dyn CurveEvaluator;

    /// Curve of a co-edge in the parameter space of its face.
    fn pcurve(&self, coedge: CoEdgeId) -> &dyn Curve2dEvaluator;

    fn surface(&self, face: FaceId) -> &dyn SurfaceEvaluator;

    fn edge_tolerance(&self, edge: EdgeId) -> f64;

    /// Edges whose model-space curve collapses to a point.
    fn is_degenerated(&self, _edge: EdgeId) -> bool {
        false
    }

    /// `true` when the face normal agrees with the surface normal.
    fn face_orientation(&self, face: FaceId) -> bool;

    fn set_triangulation(&self, face: FaceId, triangulation: Triangulation);

    fn triangulation(&self, face: FaceId) -> Option<Triangulation>;
}
