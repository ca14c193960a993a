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

use tracing::debug;

use crate::discretization::MeshParameters;
use crate::error::Result;
use crate::kernel::CONFUSION;
use crate::mesh::{BoundaryCache, VertexRegistry};
use crate::topology::Topology;

/// State shared by every face of one run: the vertex registry, the edge
/// tessellation cache and the parameters.
#[derive(Debug)]
pub struct MeshContext {
    pub registry: VertexRegistry,
    pub cache: BoundaryCache,
    pub params: MeshParameters,
}

impl MeshContext {
    /// Registry tolerance is the largest edge tolerance of the model, and at
    /// least [`CONFUSION`].
    pub fn new<M: Topology + ?Sized>(model: &M, params: MeshParameters) -> Result<Self> {
        params.validate()?;
        let tolerance = model
            .faces()
            .into_iter()
            .flat_map(|f| model.wires(f))
            .flat_map(|w| model.edges_of(w))
            .map(|c| model.edge_tolerance(c.edge))
            .filter(|t| t.is_finite())
            .fold(CONFUSION, f64::max);
        debug!(tolerance, "mesh context created");
        Ok(Self {
            registry: VertexRegistry::new(tolerance),
            cache: BoundaryCache::new(),
            params,
        })
    }
}
