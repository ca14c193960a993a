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

use crate::geometry::{Point2, Point3};

/// A mesh node of one face's triangulation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub position: Point3,
    /// Parameter of the node on the face it belongs to.
    pub uv: Option<Point2>,
    /// Run-wide id handed out by the vertex registry. Only boundary nodes are
    /// registered; interior nodes are local to their face.
    pub id: Option<usize>,
    pub on_boundary: bool,
}

impl Vertex {
    pub fn boundary(position: Point3, uv: Point2, id: usize) -> Self {
        Self {
            position,
            uv: Some(uv),
            id: Some(id),
            on_boundary: true,
        }
    }

    pub fn interior(position: Point3, uv: Point2) -> Self {
        Self {
            position,
            uv: Some(uv),
            id: None,
            on_boundary: false,
        }
    }
}
