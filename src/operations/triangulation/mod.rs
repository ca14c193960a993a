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

//! Face triangulation in the parameter plane: constrained Delaunay
//! bootstrap over the boundary, domain classification, then refinement
//! against the surface.

pub mod delaunay;
pub mod refine;

use tracing::{debug, warn};

use crate::discretization::StatusFlags;
use crate::geometry::{Point2, Point3};
use crate::operations::boundary::FaceWorkingSet;
use crate::topology::SurfaceEvaluator;

use delaunay::Delaunay;
use refine::{RefineSettings, centroid_deviation, refine};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoreSettings {
    pub min_size: f64,
    pub max_steps: usize,
    /// Refine the interior against the surface.
    pub refine: bool,
}

/// Triangulated face in face-local indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceMesh {
    pub uv: Vec<Point2>,
    pub positions: Vec<Point3>,
    /// Registry id of boundary nodes, `None` for interior ones.
    pub ids: Vec<Option<usize>>,
    /// Counter-clockwise in the parameter plane.
    pub triangles: Vec<[usize; 3]>,
    pub flags: StatusFlags,
    pub deviation: f64,
    pub inserted: usize,
}

pub fn triangulate(
    ws: &FaceWorkingSet,
    surface: &dyn SurfaceEvaluator,
    settings: &CoreSettings,
) -> FaceMesh {
    let mut flags = StatusFlags::OK;
    let n = ws.nb_vertices();

    let (mut dt, failed) = Delaunay::from_points(ws.uv.clone());
    if failed > 0 {
        warn!(face = ?ws.face, failed, "boundary vertices could not be inserted");
        flags |= StatusFlags::LOCAL_FAILURE;
    }
    let mut positions = ws.positions.clone();
    positions.extend([Point3::origin(); 3]);

    let mut locked = Vec::with_capacity(ws.links.len());
    let mut lost = 0;
    for link in ws.links.iter().filter(|l| l.frontier) {
        if !dt.enforce_constraint(link.a, link.b, &mut locked) {
            lost += 1;
        }
    }
    if lost > 0 {
        warn!(face = ?ws.face, lost, "frontier links could not be recovered");
        flags |= StatusFlags::LOCAL_FAILURE;
    }

    if dt.classify_domain(&locked) == 0 {
        warn!(face = ?ws.face, "no triangle left inside the boundary");
        flags |= StatusFlags::LOCAL_FAILURE;
    }

    let mut inserted = 0;
    let deviation = if settings.refine {
        let outcome = refine(
            &mut dt,
            &mut positions,
            surface,
            &RefineSettings {
                deflection: ws.deflection,
                min_size: settings.min_size,
                param_tolerance: ws.param_tolerance,
                max_steps: settings.max_steps,
            },
        );
        inserted = outcome.inserted;
        if outcome.local_failures > 0 {
            flags |= StatusFlags::LOCAL_FAILURE;
        }
        if outcome.max_deviation > ws.deflection {
            warn!(
                face = ?ws.face,
                reached = outcome.max_deviation,
                wanted = ws.deflection,
                cap_hit = outcome.cap_hit,
                "deflection not reached"
            );
            flags |= StatusFlags::TOLERANCE_UNREACHABLE;
        }
        outcome.max_deviation
    } else {
        dt.live()
            .filter_map(|t| {
                let (v, _) = dt.triangle(t)?;
                let uv = [dt.point(v[0]), dt.point(v[1]), dt.point(v[2])];
                centroid_deviation(
                    surface,
                    [&uv[0], &uv[1], &uv[2]],
                    [&positions[v[0]], &positions[v[1]], &positions[v[2]]],
                )
                .map(|(_, _, d)| d)
            })
            .fold(0.0, f64::max)
    };

    // Compact to the vertices actually used.
    let mut remap = vec![usize::MAX; dt.points().len()];
    let mut mesh = FaceMesh {
        flags,
        deviation,
        inserted,
        ..FaceMesh::default()
    };
    for tri in dt.triangles() {
        let mut out = [0; 3];
        for (k, &v) in tri.iter().enumerate() {
            if remap[v] == usize::MAX {
                remap[v] = mesh.uv.len();
                mesh.uv.push(dt.point(v));
                mesh.positions.push(positions[v]);
                mesh.ids.push((v < n).then(|| ws.vertex_ids[v]));
            }
            out[k] = remap[v];
        }
        mesh.triangles.push(out);
    }
    debug!(
        face = ?ws.face,
        triangles = mesh.triangles.len(),
        inserted,
        deviation,
        "face triangulated"
    );
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::boundary::{BoundaryLoop, Link};
    use crate::topology::FaceId;

    /// Paraboloid `z = u^2 + v^2`.
    struct Bowl;

    impl SurfaceEvaluator for Bowl {
        fn point(&self, u: f64, v: f64) -> Option<Point3> {
            Some(Point3::new(u, v, u * u + v * v))
        }
    }

    /// Sliver whose apex sits one ulp above its base, so the parametric
    /// centroid rounds onto the base.
    fn sliver() -> FaceWorkingSet {
        let uv = vec![
            Point2::new(0.0, 1.0),
            Point2::new(3.0, 1.0),
            Point2::new(1.5, 1.0 + f64::EPSILON),
        ];
        let positions: Vec<Point3> = uv.iter().map(|p| Bowl.point(p.x, p.y).unwrap()).collect();
        FaceWorkingSet {
            face: FaceId(0),
            uv,
            positions,
            vertex_ids: vec![0, 1, 2],
            links: (0..3)
                .map(|k| Link {
                    a: k,
                    b: (k + 1) % 3,
                    frontier: true,
                })
                .collect(),
            loops: vec![BoundaryLoop {
                start: 0,
                len: 3,
                outer: true,
            }],
            param_tolerance: 0.0,
            deflection: 0.01,
            requested_deflection: 0.01,
            flags: StatusFlags::OK,
            edge_generations: Vec::new(),
        }
    }

    #[test]
    fn backed_out_insertion_is_a_local_failure() {
        let ws = sliver();
        let settings = CoreSettings {
            min_size: 0.0,
            max_steps: 100,
            refine: true,
        };
        let mesh = triangulate(&ws, &Bowl, &settings);
        assert!(mesh.flags.contains(StatusFlags::LOCAL_FAILURE), "{:?}", mesh.flags);
        assert!(mesh.flags.contains(StatusFlags::TOLERANCE_UNREACHABLE));
        assert_eq!(mesh.triangles.len(), 1);
        assert_eq!(mesh.inserted, 0);
        assert!(mesh.deviation > 1.0, "{}", mesh.deviation);
        let mut ids: Vec<usize> = mesh.ids.iter().flatten().copied().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
