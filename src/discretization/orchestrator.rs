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

use ahash::{AHashMap, AHashSet};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::discretization::parallel::FaceCoordinator;
use crate::discretization::{FaceReport, MeshContext, MeshParameters, MeshReport, StatusFlags};
use crate::error::{MeshError, Result};
use crate::mesh::{Triangulation, Vertex};
use crate::operations::{CoreSettings, FaceWorkingSet, build_polygon, triangulate};
use crate::topology::{FaceId, Topology};

/// Where a face stands in a [`Discretizer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceState {
    Unregistered,
    Added,
    Processing,
    Processed,
}

#[derive(Debug, Default)]
enum FaceSlot {
    #[default]
    Processing,
    Added(Box<FaceWorkingSet>),
    Processed(FaceReport),
}

/// Drives the meshing of the faces of one model.
///
/// Faces go through `add` (boundary tessellation, registering shared
/// vertices) and then `process` (triangulation and commit). `process` takes
/// `&self` and may run concurrently for different faces.
pub struct Discretizer<'m, M: Topology + ?Sized> {
    model: &'m M,
    ctx: MeshContext,
    known: AHashSet<FaceId>,
    faces: AHashMap<FaceId, Mutex<FaceSlot>>,
}

impl<'m, M: Topology + ?Sized> Discretizer<'m, M> {
    pub fn new(model: &'m M, params: MeshParameters) -> Result<Self> {
        let ctx = MeshContext::new(model, params)?;
        Ok(Self {
            known: model.faces().into_iter().collect(),
            model,
            ctx,
            faces: AHashMap::default(),
        })
    }

    pub fn model(&self) -> &'m M {
        self.model
    }

    pub fn parameters(&self) -> &MeshParameters {
        &self.ctx.params
    }

    pub fn context(&self) -> &MeshContext {
        &self.ctx
    }

    pub fn state(&self, face: FaceId) -> FaceState {
        match self.faces.get(&face) {
            None => FaceState::Unregistered,
            Some(slot) => match &*slot.lock() {
                FaceSlot::Added(_) => FaceState::Added,
                FaceSlot::Processed(_) => FaceState::Processed,
                FaceSlot::Processing => FaceState::Processing,
            },
        }
    }

    /// Faces currently waiting for `process`, in id order.
    pub fn added_faces(&self) -> Vec<FaceId> {
        let mut out: Vec<FaceId> = self
            .faces
            .keys()
            .copied()
            .filter(|&f| self.state(f) == FaceState::Added)
            .collect();
        out.sort_unstable();
        out
    }

    pub fn report(&self, face: FaceId) -> Option<FaceReport> {
        match &*self.faces.get(&face)?.lock() {
            FaceSlot::Processed(r) => Some(r.clone()),
            _ => None,
        }
    }

    /// Tessellates the boundary of `face` at the run's linear deflection.
    pub fn add(&mut self, face: FaceId) -> Result<StatusFlags> {
        let deflection = self.ctx.params.linear_deflection;
        self.add_with_deflection(face, deflection)
    }

    /// Tessellates the boundary of `face` at `deflection`. Edges already
    /// cached at a coarser deflection are re-tessellated; faces added
    /// earlier pick the new samples up when processed. Edges of processed
    /// faces keep their samples.
    pub fn add_with_deflection(&mut self, face: FaceId, deflection: f64) -> Result<StatusFlags> {
        if !self.known.contains(&face) {
            return Err(MeshError::UnknownFace(face));
        }
        if !(deflection.is_finite() && deflection > 0.0) {
            return Err(MeshError::invalid(
                "deflection",
                format!("must be finite and positive, got {deflection}"),
            ));
        }
        match self.faces.get(&face).map(|s| s.lock()).as_deref() {
            Some(FaceSlot::Processed(_)) => return Err(MeshError::FaceAlreadyProcessed(face)),
            Some(FaceSlot::Processing) => return Err(MeshError::FaceBusy(face)),
            _ => {}
        }

        let ws = self.build(face, deflection);
        let flags = ws.flags;
        self.faces
            .insert(face, Mutex::new(FaceSlot::Added(Box::new(ws))));
        Ok(flags)
    }

    fn build(&self, face: FaceId, deflection: f64) -> FaceWorkingSet {
        let settings = self.ctx.params.tessellation(deflection);
        build_polygon(
            self.model,
            face,
            &settings,
            self.ctx.params.adaptive_min,
            &self.ctx.registry,
            &self.ctx.cache,
        )
    }

    /// Triangulates an added face and commits the result to the model.
    pub fn process(&self, face: FaceId) -> Result<FaceReport> {
        let slot = self.faces.get(&face).ok_or(MeshError::FaceNotAdded(face))?;
        let ws = {
            let mut guard = slot.lock();
            match std::mem::take(&mut *guard) {
                FaceSlot::Added(ws) => ws,
                FaceSlot::Processed(report) => {
                    *guard = FaceSlot::Processed(report);
                    return Err(MeshError::FaceAlreadyProcessed(face));
                }
                FaceSlot::Processing => return Err(MeshError::FaceBusy(face)),
            }
        };

        let report = self.run_face(ws);
        *slot.lock() = FaceSlot::Processed(report.clone());
        Ok(report)
    }

    fn run_face(&self, ws: Box<FaceWorkingSet>) -> FaceReport {
        let face = ws.face;
        let ws = if ws.is_stale(&self.ctx.cache) {
            debug!(?face, "boundary edges re-tessellated since add, rebuilding");
            Box::new(self.build(face, ws.requested_deflection))
        } else {
            ws
        };
        if ws.flags.contains(StatusFlags::DEGENERATE) {
            warn!(?face, "skipping degenerate face");
            return FaceReport::failed(face, ws.flags);
        }

        let params = &self.ctx.params;
        let mesh = triangulate(
            &ws,
            self.model.surface(face),
            &CoreSettings {
                min_size: params.resolved_min_size(),
                max_steps: params.max_refinement_steps,
                refine: params.control_surface_deflection,
            },
        );

        let vertices: Vec<Vertex> = (0..mesh.uv.len())
            .map(|i| match mesh.ids[i] {
                Some(id) => Vertex::boundary(mesh.positions[i], mesh.uv[i], id),
                None => Vertex::interior(mesh.positions[i], mesh.uv[i]),
            })
            .collect();
        let forward = self.model.face_orientation(face);
        let triangles: Vec<[usize; 3]> = mesh
            .triangles
            .iter()
            .map(|&[a, b, c]| if forward { [a, b, c] } else { [a, c, b] })
            .collect();

        let report = FaceReport {
            face,
            flags: ws.flags | mesh.flags,
            deviation: mesh.deviation,
            triangles: triangles.len(),
            vertices: vertices.len(),
            inserted: mesh.inserted,
        };
        self.model
            .set_triangulation(face, Triangulation::new(vertices, triangles, mesh.deviation));
        self.ctx
            .cache
            .freeze(ws.edge_generations.iter().map(|&(edge, _)| edge));
        debug!(?face, flags = ?report.flags, triangles = report.triangles, "face committed");
        report
    }

    /// Forgets everything about `face` so it can be added again. The
    /// committed triangulation stays until the face is processed anew.
    pub fn reset(&mut self, face: FaceId) -> Result<()> {
        if !self.known.contains(&face) {
            return Err(MeshError::UnknownFace(face));
        }
        if self.state(face) == FaceState::Processing {
            return Err(MeshError::FaceBusy(face));
        }
        self.faces.remove(&face);
        Ok(())
    }

    /// Adds every face not yet added, then processes every added face,
    /// on a worker pool when the parameters ask for one.
    pub fn perform_all(&mut self) -> Result<MeshReport> {
        let coordinator = FaceCoordinator::new(&self.ctx.params)?;
        self.perform_with(&coordinator)
    }

    pub fn perform_with(&mut self, coordinator: &FaceCoordinator) -> Result<MeshReport> {
        let mut faces: Vec<FaceId> = self.known.iter().copied().collect();
        faces.sort_unstable();
        for &face in &faces {
            if self.state(face) == FaceState::Unregistered {
                self.add(face)?;
            }
        }
        let pending = self.added_faces();
        let report = coordinator.run(&*self, &pending);
        info!(
            faces = report.faces.len(),
            triangles = report.nb_triangles(),
            flags = ?report.flags,
            "discretization finished"
        );
        Ok(report)
    }
}

/// Meshes every face of `model` in one run.
pub fn perform<M: Topology + ?Sized>(model: &M, params: MeshParameters) -> Result<MeshReport> {
    Discretizer::new(model, params)?.perform_all()
}
