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

use tracing::trace;

use crate::geometry::{Aabb3, Point3, distance_to_segment, lerp};
use crate::kernel::{CONFUSION, PCONFUSION};
use crate::mesh::{EdgeTessellation, VertexRegistry};
use crate::topology::{CurveEvaluator, EdgeId, Topology};

/// Bisection depth at which a segment is accepted whatever its deviation.
const MAX_DEPTH: u32 = 32;

/// Samples per degenerated edge are bounded to this many segments.
const MAX_DEGENERATED_SEGMENTS: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TessellationSettings {
    /// Largest distance between the curve and a chord.
    pub deflection: f64,
    /// Largest tangent turn across one chord, in radians.
    pub angular_deflection: f64,
    /// Chords shorter than this are never split.
    pub min_size: f64,
    /// Scale `deflection` by the extent of the curve.
    pub relative: bool,
}

/// Ordered samples of one curve, endpoints included.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    pub params: Vec<f64>,
    pub points: Vec<Point3>,
    /// Chords kept because the curve could not be evaluated inside them.
    pub degenerate_segments: usize,
}

impl Polyline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn push(&mut self, t: f64, p: Point3) {
        self.params.push(t);
        self.points.push(p);
    }
}

/// Adaptive tessellation of `curve` over its whole range.
///
/// Each chord is bisected while the curve point at its parametric middle
/// lies farther than the deflection from it, or while the curve turns by
/// more than the angular deflection along it. A chord is accepted as is
/// once it is shorter than `min_size`, once its parametric step reaches
/// the floor, or at [`MAX_DEPTH`].
pub fn tessellate(curve: &dyn CurveEvaluator, settings: &TessellationSettings) -> Polyline {
    let (first, last) = curve.range();
    let mut out = Polyline::default();

    let (Some(p0), Some(p1)) = (curve.point(first), curve.point(last)) else {
        out.degenerate_segments = 1;
        return out;
    };

    let mut deflection = settings.deflection;
    if settings.relative {
        deflection *= curve_extent(curve, first, last).max(CONFUSION);
    }
    let deflection = deflection.max(CONFUSION);

    let mut walker = Bisector {
        curve,
        deflection,
        angular: settings.angular_deflection,
        min_size: settings.min_size,
        param_floor: ((last - first).abs() * 1e-12).max(PCONFUSION * 1e-3),
        out,
    };
    walker.out.push(first, p0);
    walker.split(first, p0, last, p1, 0);
    trace!(
        samples = walker.out.len(),
        degenerate = walker.out.degenerate_segments,
        "curve tessellated"
    );
    walker.out
}

/// Uniform parametric samples of a curve collapsed to one point. The 3D
/// points all coincide; the parameters keep the face boundary well shaped.
pub fn tessellate_degenerated(curve: &dyn CurveEvaluator, angular_deflection: f64) -> Polyline {
    let (first, last) = curve.range();
    let mut out = Polyline::default();
    let Some(p) = curve.point(first).or_else(|| curve.point(last)) else {
        out.degenerate_segments = 1;
        return out;
    };
    let span = (last - first).abs();
    let n = if angular_deflection > 0.0 {
        ((span / angular_deflection).ceil() as usize).clamp(1, MAX_DEGENERATED_SEGMENTS)
    } else {
        1
    };
    for i in 0..=n {
        let t = lerp(first, last, i as f64 / n as f64);
        out.push(t, p);
    }
    out
}

/// Tessellates one edge of `model` and registers every sample.
pub fn tessellate_edge<M: Topology + ?Sized>(
    model: &M,
    edge: EdgeId,
    settings: &TessellationSettings,
    registry: &VertexRegistry,
) -> EdgeTessellation {
    let curve = model.curve(edge);
    let polyline = if model.is_degenerated(edge) {
        tessellate_degenerated(curve, settings.angular_deflection)
    } else {
        tessellate(curve, settings)
    };
    let vertex_ids = polyline.points.iter().map(|p| registry.insert(*p)).collect();
    EdgeTessellation {
        deflection: settings.deflection,
        params: polyline.params,
        points: polyline.points,
        vertex_ids,
        degenerate_segments: polyline.degenerate_segments,
        generation: 0,
    }
}

fn curve_extent(curve: &dyn CurveEvaluator, first: f64, last: f64) -> f64 {
    const PROBES: usize = 8;
    let mut bbox = Aabb3::empty();
    for i in 0..=PROBES {
        let t = lerp(first, last, i as f64 / PROBES as f64);
        if let Some(p) = curve.point(t) {
            bbox.add(&p);
        }
    }
    if bbox.is_empty() { 0.0 } else { bbox.max_extent() }
}

struct Bisector<'a> {
    curve: &'a dyn CurveEvaluator,
    deflection: f64,
    angular: f64,
    min_size: f64,
    param_floor: f64,
    out: Polyline,
}

impl Bisector<'_> {
    /// Emits the samples of `(t0, t1]`.
    fn split(&mut self, t0: f64, p0: Point3, t1: f64, p1: Point3, depth: u32) {
        let tm = lerp(t0, t1, 0.5);
        if depth >= MAX_DEPTH || (t1 - t0).abs() <= self.param_floor {
            self.out.push(t1, p1);
            return;
        }
        let Some(pm) = self.curve.point(tm) else {
            self.out.degenerate_segments += 1;
            self.out.push(t1, p1);
            return;
        };

        let span = p0.distance_to(&pm).max(pm.distance_to(&p1));
        if span < self.min_size {
            self.out.push(t1, p1);
            return;
        }

        if self.needs_split(t0, &p0, t1, &p1, &pm) {
            self.split(t0, p0, tm, pm, depth + 1);
            self.split(tm, pm, t1, p1, depth + 1);
        } else {
            self.out.push(t1, p1);
        }
    }

    fn needs_split(&self, t0: f64, p0: &Point3, t1: f64, p1: &Point3, pm: &Point3) -> bool {
        if distance_to_segment(pm, p0, p1) > self.deflection {
            return true;
        }
        if self.angular <= 0.0 {
            return false;
        }
        let turn = match (self.curve.tangent(t0), self.curve.tangent(t1)) {
            (Some(a), Some(b)) => a.angle_to(&b),
            _ => (pm - p0).angle_to(&(p1 - pm)),
        };
        turn.is_some_and(|a| a > self.angular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector3;
    use crate::topology::Curve3d;
    use std::f64::consts::PI;

    fn settings(deflection: f64) -> TessellationSettings {
        TessellationSettings {
            deflection,
            angular_deflection: 0.5,
            min_size: 1e-6,
            relative: false,
        }
    }

    #[test]
    fn straight_segment_keeps_endpoints_only() {
        let c = Curve3d::segment(Point3::origin(), Point3::new(5.0, 0.0, 0.0));
        let pl = tessellate(&c, &settings(0.01));
        assert_eq!(pl.params, vec![0.0, 1.0]);
        assert_eq!(pl.points[1], Point3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn circle_chords_respect_deflection() {
        let c = Curve3d::arc(
            Point3::origin(),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            2.0,
            (0.0, PI),
        );
        let coarse = tessellate(&c, &settings(0.1));
        let fine = tessellate(&c, &settings(0.001));
        assert!(fine.len() > coarse.len());
        for w in fine.params.windows(2) {
            let mid = c.point(0.5 * (w[0] + w[1])).unwrap();
            let a = c.point(w[0]).unwrap();
            let b = c.point(w[1]).unwrap();
            assert!(distance_to_segment(&mid, &a, &b) <= 0.001 + 1e-12);
        }
    }

    #[test]
    fn degenerated_edge_spreads_parameters() {
        let c = Curve3d::Degenerate {
            point: Point3::new(0.0, 0.0, 1.0),
            range: (0.0, 2.0 * PI),
        };
        let pl = tessellate_degenerated(&c, 0.5);
        assert_eq!(pl.len(), 14);
        assert!(pl.points.iter().all(|p| *p == Point3::new(0.0, 0.0, 1.0)));
        assert_eq!(*pl.params.last().unwrap(), 2.0 * PI);
    }
}
