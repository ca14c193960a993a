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

//! Surface discretization: turns the faces of a boundary representation
//! into triangle meshes whose deviation from the geometry stays under a
//! given deflection, with identical samples along edges shared by faces.
//!
//! ```no_run
//! use cgmesh::{MeshParameters, Topology, perform};
//! # fn run(shape: &cgmesh::Shape) -> cgmesh::Result<()> {
//! let report = perform(shape, MeshParameters::default().with_linear_deflection(0.01))?;
//! for face in shape.faces() {
//!     let mesh = shape.triangulation(face);
//!     println!("{face:?}: {:?}", mesh.map(|m| m.nb_triangles()));
//! }
//! assert!(!report.flags.is_fatal());
//! # Ok(())
//! # }
//! ```

pub mod discretization;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod mesh;
pub mod operations;
pub mod topology;

pub use discretization::{
    Discretizer, FaceCoordinator, FaceReport, FaceState, MeshContext, MeshParameters, MeshReport,
    StatusFlags, StopSignal, perform,
};
pub use error::{MeshError, Result};
pub use mesh::{Triangulation, Vertex};
pub use topology::{Shape, ShapeBuilder, Topology};
