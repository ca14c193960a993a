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

use ahash::AHashMap;

use crate::geometry::Point3;
use crate::mesh::vertex::Vertex;

/// The persistent mesh of one face: nodes and counter-clockwise triangles
/// (relative to the face's outward side).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangulation {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<[usize; 3]>,
    /// Largest centroid deviation from the surface measured on commit.
    pub deflection: f64,
}

impl Triangulation {
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<[usize; 3]>, deflection: f64) -> Self {
        Self {
            vertices,
            triangles,
            deflection,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn nb_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn nb_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn positions(&self) -> impl Iterator<Item = &Point3> {
        self.vertices.iter().map(|v| &v.position)
    }

    /// Directed edges that belong to exactly one triangle.
    pub fn boundary_edges(&self) -> Vec<[usize; 2]> {
        let mut count: AHashMap<(usize, usize), (usize, [usize; 2])> = AHashMap::default();
        for t in &self.triangles {
            for k in 0..3 {
                let (a, b) = (t[k], t[(k + 1) % 3]);
                let key = (a.min(b), a.max(b));
                count.entry(key).or_insert((0, [a, b])).0 += 1;
            }
        }
        let mut edges: Vec<[usize; 2]> = count
            .into_values()
            .filter_map(|(n, e)| (n == 1).then_some(e))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Positions of the nodes touched by [`Self::boundary_edges`].
    pub fn boundary_points(&self) -> Vec<Point3> {
        let mut seen = vec![false; self.vertices.len()];
        let mut out = Vec::new();
        for [a, b] in self.boundary_edges() {
            for v in [a, b] {
                if !seen[v] {
                    seen[v] = true;
                    out.push(self.vertices[v].position);
                }
            }
        }
        out
    }

    /// Total area of the triangles in model space.
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let a = &self.vertices[t[0]].position;
                let b = &self.vertices[t[1]].position;
                let c = &self.vertices[t[2]].position;
                0.5 * (b - a).cross(&(c - a)).norm()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2;

    fn square() -> Triangulation {
        let pts = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let vertices = pts
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Vertex::boundary(Point3::new(x, y, 0.0), Point2::new(x, y), i))
            .collect();
        Triangulation::new(vertices, vec![[0, 1, 2], [0, 2, 3]], 0.0)
    }

    #[test]
    fn boundary_of_two_triangle_square() {
        let t = square();
        assert_eq!(t.boundary_edges(), vec![[0, 1], [1, 2], [2, 3], [3, 0]]);
        assert_eq!(t.boundary_points().len(), 4);
        assert!((t.area() - 1.0).abs() < 1e-12);
    }
}
