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
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::geometry::Point3;
use crate::topology::EdgeId;

/// Tessellation of one edge as shared by every face that uses the edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeTessellation {
    /// Linear deflection the samples were computed with.
    pub deflection: f64,
    pub params: Vec<f64>,
    pub points: Vec<Point3>,
    /// Registry ids of `points`, index for index.
    pub vertex_ids: Vec<usize>,
    /// Sub-segments whose midpoint could not be evaluated.
    pub degenerate_segments: usize,
    /// Stamp of the cache write that produced this entry.
    pub generation: u64,
}

impl EdgeTessellation {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug)]
struct CacheSlot {
    entry: Arc<EdgeTessellation>,
    /// A committed face uses `entry`; it is never replaced again.
    frozen: bool,
}

impl CacheSlot {
    fn answers(&self, deflection: f64) -> bool {
        self.frozen || self.entry.deflection <= deflection
    }
}

/// Run-wide cache of edge tessellations keyed by edge identity.
///
/// An entry computed at deflection `d` answers every request with a
/// deflection of at least `d`; a stricter request replaces it. Once
/// [`BoundaryCache::freeze`] was called for an edge, its entry answers
/// every request.
#[derive(Debug, Default)]
pub struct BoundaryCache {
    entries: Mutex<AHashMap<EdgeId, CacheSlot>>,
    generation: AtomicU64,
}

impl BoundaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, edge: EdgeId) -> Option<Arc<EdgeTessellation>> {
        self.entries.lock().get(&edge).map(|s| s.entry.clone())
    }

    /// Cached entry fine enough for `deflection`, or frozen, if any.
    pub fn lookup(&self, edge: EdgeId, deflection: f64) -> Option<Arc<EdgeTessellation>> {
        self.entries
            .lock()
            .get(&edge)
            .filter(|s| s.answers(deflection))
            .map(|s| s.entry.clone())
    }

    /// Returns the entry for `edge` valid at `deflection`, running `compute`
    /// outside the lock when there is none. If another caller stored a fine
    /// enough entry in the meantime, that one wins.
    pub fn get_or_compute(
        &self,
        edge: EdgeId,
        deflection: f64,
        compute: impl FnOnce() -> EdgeTessellation,
    ) -> Arc<EdgeTessellation> {
        if let Some(hit) = self.lookup(edge, deflection) {
            return hit;
        }
        let mut fresh = compute();
        fresh.deflection = deflection;

        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(&edge) {
            if existing.answers(deflection) {
                return existing.entry.clone();
            }
        }
        fresh.generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let fresh = Arc::new(fresh);
        entries.insert(
            edge,
            CacheSlot {
                entry: fresh.clone(),
                frozen: false,
            },
        );
        fresh
    }

    /// Pins the current entries of `edges`. Called once a face built on
    /// them is committed.
    pub fn freeze(&self, edges: impl IntoIterator<Item = EdgeId>) {
        let mut entries = self.entries.lock();
        for edge in edges {
            if let Some(slot) = entries.get_mut(&edge) {
                slot.frozen = true;
            }
        }
    }

    pub fn is_frozen(&self, edge: EdgeId) -> bool {
        self.entries.lock().get(&edge).is_some_and(|s| s.frozen)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
