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

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::discretization::{Discretizer, FaceReport, MeshParameters, MeshReport, StatusFlags};
use crate::error::Result;
use crate::topology::{FaceId, Topology};

/// Cooperative stop request, checked before each face starts.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs `process` over a set of added faces, sequentially or on a fixed
/// size rayon pool. A face that fails does not stop the others.
pub struct FaceCoordinator {
    pool: Option<rayon::ThreadPool>,
    stop: StopSignal,
}

impl FaceCoordinator {
    /// Sequential unless `params.parallel` is set.
    pub fn new(params: &MeshParameters) -> Result<Self> {
        if !params.parallel {
            return Ok(Self::sequential());
        }
        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("mesh-face-{i}"));
        if let Some(n) = params.threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build()?;
        debug!(threads = pool.current_num_threads(), "face worker pool ready");
        Ok(Self {
            pool: Some(pool),
            stop: StopSignal::new(),
        })
    }

    pub fn sequential() -> Self {
        Self {
            pool: None,
            stop: StopSignal::new(),
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Processes `faces`; the report lists them in the given order.
    pub fn run<M: Topology + ?Sized>(
        &self,
        discretizer: &Discretizer<'_, M>,
        faces: &[FaceId],
    ) -> MeshReport {
        let one = |&face: &FaceId| -> Option<FaceReport> {
            if self.stop.is_stopped() {
                return Some(FaceReport::failed(face, StatusFlags::CANCELLED));
            }
            match discretizer.process(face) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(?face, error = %e, "face not processed");
                    None
                }
            }
        };
        let reports: Vec<Option<FaceReport>> = match &self.pool {
            Some(pool) => pool.install(|| faces.par_iter().map(one).collect()),
            None => faces.iter().map(one).collect(),
        };

        let mut out = MeshReport::default();
        for report in reports.into_iter().flatten() {
            out.push(report);
        }
        out
    }
}
