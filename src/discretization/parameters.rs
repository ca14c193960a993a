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

use crate::error::{MeshError, Result};
use crate::kernel::CONFUSION;
use crate::operations::tessellation::TessellationSettings;

/// Knobs of one discretization run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeshParameters {
    /// Largest tangent turn across one boundary chord, in radians.
    pub angular_deflection: f64,
    /// Largest distance between the mesh and the geometry.
    pub linear_deflection: f64,
    /// Smallest element size; derived from `linear_deflection` when unset.
    pub min_size: Option<f64>,
    /// Process faces on a worker pool.
    pub parallel: bool,
    /// Read `linear_deflection` as a fraction of each shape's extent.
    pub relative_deflection: bool,
    /// Refine face interiors against the surface. Off means boundary-only
    /// triangulations.
    pub control_surface_deflection: bool,
    /// Derive each face's parametric tolerance from its boundary spacing.
    pub adaptive_min: bool,
    /// Interior insertions per face before refinement gives up.
    pub max_refinement_steps: usize,
    /// Worker count; `None` lets the pool decide.
    pub threads: Option<usize>,
}

impl Default for MeshParameters {
    fn default() -> Self {
        Self {
            angular_deflection: 0.1,
            linear_deflection: 0.001,
            min_size: None,
            parallel: false,
            relative_deflection: false,
            control_surface_deflection: true,
            adaptive_min: false,
            max_refinement_steps: 20_000,
            threads: None,
        }
    }
}

impl MeshParameters {
    pub fn with_linear_deflection(mut self, deflection: f64) -> Self {
        self.linear_deflection = deflection;
        self
    }

    pub fn with_angular_deflection(mut self, angle: f64) -> Self {
        self.angular_deflection = angle;
        self
    }

    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = Some(min_size);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_relative_deflection(mut self, relative: bool) -> Self {
        self.relative_deflection = relative;
        self
    }

    pub fn with_control_surface_deflection(mut self, control: bool) -> Self {
        self.control_surface_deflection = control;
        self
    }

    pub fn with_adaptive_min(mut self, adaptive: bool) -> Self {
        self.adaptive_min = adaptive;
        self
    }

    pub fn with_max_refinement_steps(mut self, steps: usize) -> Self {
        self.max_refinement_steps = steps;
        self
    }

    /// `min_size` if set, else a tenth of the linear deflection.
    pub fn resolved_min_size(&self) -> f64 {
        self.min_size
            .unwrap_or(0.1 * self.linear_deflection)
            .max(CONFUSION)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.linear_deflection.is_finite() && self.linear_deflection > 0.0) {
            return Err(MeshError::invalid(
                "linear_deflection",
                format!("must be finite and positive, got {}", self.linear_deflection),
            ));
        }
        if !(self.angular_deflection.is_finite() && self.angular_deflection > 0.0) {
            return Err(MeshError::invalid(
                "angular_deflection",
                format!("must be finite and positive, got {}", self.angular_deflection),
            ));
        }
        if let Some(m) = self.min_size {
            if !(m.is_finite() && m > 0.0) {
                return Err(MeshError::invalid(
                    "min_size",
                    format!("must be finite and positive, got {m}"),
                ));
            }
        }
        if self.threads == Some(0) {
            return Err(MeshError::invalid("threads", "must be at least 1"));
        }
        Ok(())
    }

    pub(crate) fn tessellation(&self, deflection: f64) -> TessellationSettings {
        TessellationSettings {
            deflection,
            angular_deflection: self.angular_deflection,
            min_size: self.resolved_min_size().min(0.5 * deflection).max(CONFUSION),
            relative: self.relative_deflection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_validation() {
        let p = MeshParameters::default();
        assert!(p.validate().is_ok());
        assert!((p.resolved_min_size() - 1e-4).abs() < 1e-15);

        let bad = MeshParameters::default().with_linear_deflection(0.0);
        assert!(matches!(
            bad.validate(),
            Err(MeshError::InvalidParameter { name: "linear_deflection", .. })
        ));
        assert!(MeshParameters::default().with_threads(0).validate().is_err());
    }
}
