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

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use crate::geometry::{Point2, Point3};
use crate::operations::triangulation::delaunay::{Delaunay, Insertion};
use crate::topology::SurfaceEvaluator;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefineSettings {
    /// Largest accepted centroid deviation.
    pub deflection: f64,
    /// No vertex is inserted closer than this to an existing one.
    pub min_size: f64,
    /// Same floor in the parameter plane.
    pub param_tolerance: f64,
    pub max_steps: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RefineOutcome {
    pub inserted: usize,
    /// Largest centroid deviation left in the mesh.
    pub max_deviation: f64,
    /// Stopped on the step bound with violations left.
    pub cap_hit: bool,
    /// Insertions backed out because their cavity was invalid.
    pub local_failures: usize,
}

#[derive(Debug)]
struct Candidate {
    deviation: f64,
    triangle: usize,
    stamp: u64,
    uv: Point2,
    position: Point3,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deviation
            .total_cmp(&other.deviation)
            .then_with(|| other.triangle.cmp(&self.triangle))
            .then_with(|| self.stamp.cmp(&other.stamp))
    }
}

/// Surface point at the parametric centroid of a triangle, and its distance
/// to the triangle's plane interpolation there.
pub fn centroid_deviation(
    surface: &dyn SurfaceEvaluator,
    uv: [&Point2; 3],
    positions: [&Point3; 3],
) -> Option<(Point2, Point3, f64)> {
    let g = Point2::new(
        (uv[0].x + uv[1].x + uv[2].x) / 3.0,
        (uv[0].y + uv[1].y + uv[2].y) / 3.0,
    );
    let on_surface = surface.point(g.x, g.y)?;
    let planar = Point3::centroid(positions[0], positions[1], positions[2]);
    Some((g, on_surface, on_surface.distance_to(&planar)))
}

/// Inserts parametric centroids of the worst triangles until every
/// triangle of `dt` deviates from `surface` by at most the deflection.
///
/// `positions` runs parallel to the points of `dt` and receives the model
/// space position of every inserted vertex.
pub fn refine(
    dt: &mut Delaunay,
    positions: &mut Vec<Point3>,
    surface: &dyn SurfaceEvaluator,
    settings: &RefineSettings,
) -> RefineOutcome {
    let mut outcome = RefineOutcome::default();
    let mut heap = BinaryHeap::new();
    let live: Vec<usize> = dt.live().collect();
    for t in live {
        push_candidate(dt, positions, surface, settings, t, &mut heap);
    }
    let _ = dt.take_touched();

    while let Some(c) = heap.pop() {
        if outcome.inserted >= settings.max_steps {
            outcome.cap_hit = true;
            debug!(steps = outcome.inserted, "refinement step bound reached");
            break;
        }
        let Some((v, stamp)) = dt.triangle(c.triangle) else {
            continue;
        };
        if stamp != c.stamp {
            continue;
        }

        let too_close = v.iter().any(|&x| {
            positions[x].distance_to(&c.position) < settings.min_size
                || dt.point(x).distance_to(&c.uv) < settings.param_tolerance
        });
        if too_close {
            trace!(triangle = c.triangle, deviation = c.deviation, "insertion refused");
            continue;
        }

        let idx = dt.push_point(c.uv);
        positions.push(c.position);
        dt.set_hint(c.triangle);
        match dt.insert(idx) {
            Insertion::Inserted => {
                outcome.inserted += 1;
                let fan = dt.take_touched();
                let seeds: Vec<(usize, usize)> = fan
                    .iter()
                    .filter_map(|&t| dt.triangle(t).map(|(tv, _)| (t, tv[2])))
                    .collect();
                dt.legalize(seeds);
                let mut touched = fan;
                touched.extend(dt.take_touched());
                touched.sort_unstable();
                touched.dedup();
                for t in touched {
                    push_candidate(dt, positions, surface, settings, t, &mut heap);
                }
            }
            Insertion::Duplicate(_) => {}
            Insertion::Failed => {
                outcome.local_failures += 1;
                trace!(triangle = c.triangle, "cavity backed out");
            }
        }
    }

    outcome.max_deviation = dt
        .live()
        .filter_map(|t| deviation_of(dt, positions, surface, t).map(|(_, _, d)| d))
        .fold(0.0, f64::max);
    debug!(
        inserted = outcome.inserted,
        max_deviation = outcome.max_deviation,
        failures = outcome.local_failures,
        "refinement finished"
    );
    outcome
}

fn deviation_of(
    dt: &Delaunay,
    positions: &[Point3],
    surface: &dyn SurfaceEvaluator,
    t: usize,
) -> Option<(Point2, Point3, f64)> {
    let (v, _) = dt.triangle(t)?;
    let (a, b, c) = (dt.point(v[0]), dt.point(v[1]), dt.point(v[2]));
    centroid_deviation(
        surface,
        [&a, &b, &c],
        [&positions[v[0]], &positions[v[1]], &positions[v[2]]],
    )
}

fn push_candidate(
    dt: &Delaunay,
    positions: &[Point3],
    surface: &dyn SurfaceEvaluator,
    settings: &RefineSettings,
    t: usize,
    heap: &mut BinaryHeap<Candidate>,
) {
    let Some((_, stamp)) = dt.triangle(t) else {
        return;
    };
    if let Some((uv, position, deviation)) = deviation_of(dt, positions, surface, t) {
        if deviation > settings.deflection {
            heap.push(Candidate {
                deviation,
                triangle: t,
                stamp,
                uv,
                position,
            });
        }
    }
}
