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
use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::geometry::Point3;
use crate::kernel::CONFUSION;

/// Run-wide store of boundary points: positions closer than the tolerance
/// share one id, which is what keeps adjacent faces watertight.
#[derive(Debug)]
pub struct VertexRegistry {
    tolerance: f64,
    inner: Mutex<RegistryInner>,
}

#[derive(Debug)]
struct RegistryInner {
    hash_inv: f64,
    positions: Vec<Point3>,
    grid: AHashMap<(i64, i64, i64), SmallVec<[usize; 4]>>,
}

impl VertexRegistry {
    pub fn new(tolerance: f64) -> Self {
        // The cell must not be smaller than the tolerance so that the
        // 27-cell probe sees every candidate.
        let mut cell = tolerance.max(1e-12);
        if !cell.is_finite() {
            cell = CONFUSION;
        }
        Self {
            tolerance: cell,
            inner: Mutex::new(RegistryInner {
                hash_inv: 1.0 / cell,
                positions: Vec::new(),
                grid: AHashMap::default(),
            }),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Id of the registered point nearest to `p` within the tolerance, or a
    /// fresh id for `p`.
    pub fn insert(&self, p: Point3) -> usize {
        let tol2 = self.tolerance * self.tolerance;
        let mut inner = self.inner.lock();
        let (kx, ky, kz) = inner.key(&p);

        let mut best: Option<(f64, usize)> = None;
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                for dz in -1i64..=1 {
                    let key = (kx.saturating_add(dx), ky.saturating_add(dy), kz.saturating_add(dz));
                    let Some(bucket) = inner.grid.get(&key) else {
                        continue;
                    };
                    for &vi in bucket {
                        let d2 = inner.positions[vi].distance_squared_to(&p);
                        if d2 <= tol2 && best.is_none_or(|(bd, bi)| d2 < bd || (d2 == bd && vi < bi)) {
                            best = Some((d2, vi));
                        }
                    }
                }
            }
        }
        if let Some((_, vi)) = best {
            return vi;
        }

        let idx = inner.positions.len();
        inner.positions.push(p);
        inner.grid.entry((kx, ky, kz)).or_default().push(idx);
        idx
    }

    pub fn at(&self, id: usize) -> Option<Point3> {
        self.inner.lock().positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RegistryInner {
    #[inline(always)]
    fn floor_sat_i64(x: f64) -> i64 {
        if !x.is_finite() {
            return if x.is_sign_positive() { i64::MAX } else { i64::MIN };
        }
        let xf = x.floor();
        if xf >= i64::MAX as f64 {
            i64::MAX
        } else if xf <= i64::MIN as f64 {
            i64::MIN
        } else {
            xf as i64
        }
    }

    #[inline(always)]
    fn key(&self, p: &Point3) -> (i64, i64, i64) {
        (
            Self::floor_sat_i64(p.x * self.hash_inv),
            Self::floor_sat_i64(p.y * self.hash_inv),
            Self::floor_sat_i64(p.z * self.hash_inv),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_points_collapse_across_cells() {
        let reg = VertexRegistry::new(1e-3);
        let a = reg.insert(Point3::new(0.9999, 0.0, 0.0));
        let b = reg.insert(Point3::new(1.0004, 0.0, 0.0));
        let c = reg.insert(Point3::new(1.01, 0.0, 0.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.at(a), Some(Point3::new(0.9999, 0.0, 0.0)));
        assert_eq!(reg.at(7), None);
    }
}
