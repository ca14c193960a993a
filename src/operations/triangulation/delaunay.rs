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

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace};

use crate::geometry::{Aabb2, Point2};
use crate::kernel::{
    Sign, TrianglePoint, incircle_sign, is_point_inside_segment, locate_in_triangle,
    orient2d_sign, param_t, segments_properly_intersect,
};

pub const SQRT_3: f64 = 1.7320508075688772;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        if a < b { Edge(a, b) } else { Edge(b, a) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circumcircle {
    pub center: Point2,
    pub radius2: f64,
}

impl Circumcircle {
    pub fn of(a: &Point2, b: &Point2, c: &Point2) -> Self {
        let (bx, by) = (b.x - a.x, b.y - a.y);
        let (cx, cy) = (c.x - a.x, c.y - a.y);
        let d = 2.0 * (bx * cy - by * cx);
        if d == 0.0 || !d.is_finite() {
            return Self {
                center: Point2::new(f64::INFINITY, f64::INFINITY),
                radius2: f64::INFINITY,
            };
        }
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        Self {
            center: Point2::new(a.x + ux, a.y + uy),
            radius2: ux * ux + uy * uy,
        }
    }

    /// `p` is certainly outside, with a relative margin for rounding.
    #[inline]
    fn surely_excludes(&self, p: &Point2) -> bool {
        self.radius2.is_finite() && self.center.distance_squared_to(p) > self.radius2 * (1.0 + 1e-9)
    }
}

/// `adj[i]` is the neighbour across the edge opposite `v[i]`.
#[derive(Clone, Debug)]
struct Triangle {
    v: [usize; 3],
    adj: [Option<usize>; 3],
    circle: Circumcircle,
    alive: bool,
    stamp: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    /// The point coincides with this existing vertex.
    Duplicate(usize),
    /// The cavity could not be re-triangulated; nothing was changed.
    Failed,
}

/// Constrained Delaunay triangulation in the parameter plane.
///
/// Points `0..n` are the caller's; the three vertices of the enclosing
/// super-triangle follow them, and points added later come after those.
#[derive(Clone, Debug)]
pub struct Delaunay {
    points: Vec<Point2>,
    tris: Vec<Triangle>,
    free: Vec<usize>,
    constrained: AHashSet<Edge>,
    vertex_tri: Vec<Option<usize>>,
    alias: AHashMap<usize, usize>,
    super_start: usize,
    hint: usize,
    clock: u64,
    touched: Vec<usize>,
}

impl Delaunay {
    /// Super-triangle around `points`; none of them is inserted yet.
    pub fn new(points: Vec<Point2>) -> Self {
        let bbox = Aabb2::from_points(&points);
        let (center, delta) = if bbox.is_empty() {
            (Point2::new(0.0, 0.0), 1.0)
        } else {
            (bbox.center(), bbox.width().max(bbox.height()).max(1e-9))
        };
        let r = 64.0 * delta + 1.0;

        let super_start = points.len();
        let mut points = points;
        points.push(Point2::new(center.x - SQRT_3 * r, center.y - r));
        points.push(Point2::new(center.x + SQRT_3 * r, center.y - r));
        points.push(Point2::new(center.x, center.y + 2.0 * r));

        let mut dt = Self {
            vertex_tri: vec![None; points.len()],
            points,
            tris: Vec::new(),
            free: Vec::new(),
            constrained: AHashSet::default(),
            alias: AHashMap::default(),
            super_start,
            hint: 0,
            clock: 0,
            touched: Vec::new(),
        };
        let t = dt.alloc([super_start, super_start + 1, super_start + 2]);
        for k in 0..3 {
            dt.vertex_tri[super_start + k] = Some(t);
        }
        dt
    }

    /// Builds the triangulation of `points` by incremental insertion.
    /// Returns it with the number of points that could not be inserted.
    pub fn from_points(points: Vec<Point2>) -> (Self, usize) {
        let n = points.len();
        let mut dt = Self::new(points);
        let mut failed = 0;
        for v in 0..n {
            if dt.insert(v) == Insertion::Failed {
                failed += 1;
            }
        }
        (dt, failed)
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn point(&self, v: usize) -> Point2 {
        self.points[v]
    }

    #[inline]
    pub fn is_super(&self, v: usize) -> bool {
        v >= self.super_start && v < self.super_start + 3
    }

    /// Vertex `v` stands for, following duplicates.
    pub fn resolve(&self, v: usize) -> usize {
        let mut v = v;
        while let Some(&w) = self.alias.get(&v) {
            v = w;
        }
        v
    }

    pub fn is_constrained(&self, a: usize, b: usize) -> bool {
        self.constrained.contains(&Edge::new(a, b))
    }

    pub fn push_point(&mut self, p: Point2) -> usize {
        self.points.push(p);
        self.vertex_tri.push(None);
        self.points.len() - 1
    }

    /// Indices of the live triangles.
    pub fn live(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.tris.len()).filter(|&t| self.tris[t].alive)
    }

    pub fn nb_triangles(&self) -> usize {
        self.tris.iter().filter(|t| t.alive).count()
    }

    /// Corners and change stamp of a live triangle.
    pub fn triangle(&self, t: usize) -> Option<([usize; 3], u64)> {
        self.tris
            .get(t)
            .filter(|tri| tri.alive)
            .map(|tri| (tri.v, tri.stamp))
    }

    pub fn circumcircle(&self, t: usize) -> Option<Circumcircle> {
        self.tris.get(t).filter(|tri| tri.alive).map(|tri| tri.circle)
    }

    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.tris.iter().filter(|t| t.alive).map(|t| t.v).collect()
    }

    /// Triangles created or reshaped since the last call.
    pub fn take_touched(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.touched)
    }

    pub fn set_hint(&mut self, t: usize) {
        self.hint = t;
    }

    fn corners(&self, t: usize) -> [&Point2; 3] {
        let v = self.tris[t].v;
        [&self.points[v[0]], &self.points[v[1]], &self.points[v[2]]]
    }

    fn alloc(&mut self, v: [usize; 3]) -> usize {
        self.clock += 1;
        let tri = Triangle {
            v,
            adj: [None; 3],
            circle: Circumcircle::of(&self.points[v[0]], &self.points[v[1]], &self.points[v[2]]),
            alive: true,
            stamp: self.clock,
        };
        let t = match self.free.pop() {
            Some(i) => {
                self.tris[i] = tri;
                i
            }
            None => {
                self.tris.push(tri);
                self.tris.len() - 1
            }
        };
        self.touched.push(t);
        t
    }

    fn refresh(&mut self, t: usize) {
        self.clock += 1;
        let v = self.tris[t].v;
        self.tris[t].circle =
            Circumcircle::of(&self.points[v[0]], &self.points[v[1]], &self.points[v[2]]);
        self.tris[t].stamp = self.clock;
        self.touched.push(t);
    }

    fn kill(&mut self, t: usize) {
        self.tris[t].alive = false;
        self.free.push(t);
    }

    /// Index in `t` of the vertex opposite edge `{a, b}`.
    fn opposite_index(&self, t: usize, a: usize, b: usize) -> Option<usize> {
        let v = self.tris[t].v;
        (0..3).find(|&k| {
            let (x, y) = (v[(k + 1) % 3], v[(k + 2) % 3]);
            (x == a && y == b) || (x == b && y == a)
        })
    }

    fn redirect(&mut self, t: usize, from: usize, to: usize) {
        for k in 0..3 {
            if self.tris[t].adj[k] == Some(from) {
                self.tris[t].adj[k] = Some(to);
                return;
            }
        }
    }

    /// Triangles incident to `u`, rotating counter-clockwise.
    fn star(&self, u: usize) -> SmallVec<[usize; 16]> {
        let mut out = SmallVec::new();
        let Some(start) = self.vertex_tri.get(u).copied().flatten() else {
            return out;
        };
        let mut t = start;
        loop {
            out.push(t);
            let Some(k) = self.tris[t].v.iter().position(|&x| x == u) else {
                return out;
            };
            match self.tris[t].adj[(k + 1) % 3] {
                Some(n) if n == start => return out,
                Some(n) if out.len() <= self.tris.len() => t = n,
                _ => break,
            }
        }
        // Open fan: sweep the other way from the start.
        let mut t = start;
        loop {
            let Some(k) = self.tris[t].v.iter().position(|&x| x == u) else {
                break;
            };
            match self.tris[t].adj[(k + 2) % 3] {
                Some(n) if !out.contains(&n) => {
                    out.push(n);
                    t = n;
                }
                _ => break,
            }
        }
        out
    }

    /// Triangle holding edge `{a, b}` and the index of its third vertex.
    pub fn find_edge(&self, a: usize, b: usize) -> Option<(usize, usize)> {
        self.star(a)
            .into_iter()
            .find_map(|t| self.opposite_index(t, a, b).map(|i| (t, i)))
    }

    /// Triangle in which `a -> b` is a counter-clockwise edge.
    fn find_directed(&self, a: usize, b: usize) -> Option<usize> {
        self.star(a).into_iter().find(|&t| {
            let v = self.tris[t].v;
            (0..3).any(|k| v[k] == a && v[(k + 1) % 3] == b)
        })
    }

    /// Triangle containing `p` (inside or on its boundary).
    fn locate(&self, p: &Point2) -> Option<usize> {
        let start = if self.tris.get(self.hint).is_some_and(|t| t.alive) {
            Some(self.hint)
        } else {
            self.live().next()
        };
        if let Some(mut t) = start {
            let limit = self.tris.len() + 16;
            'walk: for step in 0..limit {
                let tri = &self.tris[t];
                for r in 0..3 {
                    let i = (r + step) % 3;
                    let a = &self.points[tri.v[(i + 1) % 3]];
                    let b = &self.points[tri.v[(i + 2) % 3]];
                    if orient2d_sign(a, b, p).is_negative() {
                        match tri.adj[i] {
                            Some(n) => {
                                t = n;
                                continue 'walk;
                            }
                            None => break 'walk,
                        }
                    }
                }
                return Some(t);
            }
        }
        self.live()
            .find(|&t| locate_in_triangle(p, self.corners(t)) != TrianglePoint::Outside)
    }

    fn in_circumcircle(&self, t: usize, p: &Point2) -> bool {
        if self.tris[t].circle.surely_excludes(p) {
            return false;
        }
        let [a, b, c] = self.corners(t);
        incircle_sign(a, b, c, p).is_positive()
    }

    /// Bowyer–Watson insertion of point `v`. The cavity grows across
    /// unconstrained edges only.
    pub fn insert(&mut self, v: usize) -> Insertion {
        let p = self.points[v];
        let Some(t0) = self.locate(&p) else {
            return Insertion::Failed;
        };

        let mut seeds: SmallVec<[usize; 2]> = smallvec![t0];
        match locate_in_triangle(&p, self.corners(t0)) {
            TrianglePoint::OnVertex(k) => {
                let existing = self.tris[t0].v[k];
                self.alias.insert(v, existing);
                return Insertion::Duplicate(existing);
            }
            TrianglePoint::OnEdge(i) => {
                let tri = &self.tris[t0];
                if self.is_constrained(tri.v[(i + 1) % 3], tri.v[(i + 2) % 3]) {
                    return Insertion::Failed;
                }
                if let Some(n) = tri.adj[i] {
                    seeds.push(n);
                }
            }
            TrianglePoint::Outside => return Insertion::Failed,
            TrianglePoint::Inside => {}
        }

        let mut cavity: Vec<usize> = seeds.to_vec();
        let mut in_cavity: AHashSet<usize> = seeds.iter().copied().collect();
        let mut rejected: AHashSet<usize> = AHashSet::default();
        let mut k = 0;
        while k < cavity.len() {
            let t = cavity[k];
            k += 1;
            for i in 0..3 {
                let tri = &self.tris[t];
                let Some(n) = tri.adj[i] else { continue };
                if in_cavity.contains(&n) || rejected.contains(&n) {
                    continue;
                }
                if self.is_constrained(tri.v[(i + 1) % 3], tri.v[(i + 2) % 3]) {
                    continue;
                }
                if self.in_circumcircle(n, &p) {
                    in_cavity.insert(n);
                    cavity.push(n);
                } else {
                    rejected.insert(n);
                }
            }
        }

        // Cavity boundary, counter-clockwise as seen from inside.
        let mut boundary: Vec<(usize, usize, Option<usize>)> = Vec::with_capacity(cavity.len() + 2);
        for &t in &cavity {
            let tri = &self.tris[t];
            for i in 0..3 {
                let n = tri.adj[i];
                if n.is_some_and(|n| in_cavity.contains(&n)) {
                    continue;
                }
                boundary.push((tri.v[(i + 1) % 3], tri.v[(i + 2) % 3], n));
            }
        }
        if !self.is_star_shaped(&cavity, &boundary, &p) {
            trace!(vertex = v, cavity = cavity.len(), "cavity rejected");
            return Insertion::Failed;
        }

        for &t in &cavity {
            self.kill(t);
        }
        let mut by_start: AHashMap<usize, usize> = AHashMap::with_capacity(boundary.len());
        let mut by_end: AHashMap<usize, usize> = AHashMap::with_capacity(boundary.len());
        let mut fan: SmallVec<[usize; 16]> = SmallVec::with_capacity(boundary.len());
        for &(a, b, outer) in &boundary {
            let nt = self.alloc([a, b, v]);
            self.tris[nt].adj[2] = outer;
            if let Some(o) = outer {
                if let Some(j) = self.opposite_index(o, a, b) {
                    self.tris[o].adj[j] = Some(nt);
                }
            }
            by_start.insert(a, nt);
            by_end.insert(b, nt);
            fan.push(nt);
        }
        for &nt in &fan {
            let [a, b, _] = self.tris[nt].v;
            self.tris[nt].adj[0] = by_start.get(&b).copied();
            self.tris[nt].adj[1] = by_end.get(&a).copied();
            for x in [a, b, v] {
                self.vertex_tri[x] = Some(nt);
            }
        }
        self.hint = fan[0];
        Insertion::Inserted
    }

    /// Every boundary edge sees `p` on its left, the edges form one simple
    /// cycle, and no vertex is swallowed by the cavity.
    fn is_star_shaped(
        &self,
        cavity: &[usize],
        boundary: &[(usize, usize, Option<usize>)],
        p: &Point2,
    ) -> bool {
        let mut next: AHashMap<usize, usize> = AHashMap::with_capacity(boundary.len());
        for &(a, b, _) in boundary {
            if !orient2d_sign(&self.points[a], &self.points[b], p).is_positive() {
                return false;
            }
            if next.insert(a, b).is_some() {
                return false;
            }
        }
        let Some(&(first, _, _)) = boundary.first() else {
            return false;
        };
        let mut cur = first;
        for _ in 0..boundary.len() {
            match next.get(&cur) {
                Some(&n) => cur = n,
                None => return false,
            }
        }
        if cur != first {
            return false;
        }
        let mut steps = 0;
        loop {
            cur = next[&cur];
            steps += 1;
            if cur == first {
                break;
            }
        }
        if steps != boundary.len() {
            return false;
        }
        cavity
            .iter()
            .flat_map(|&t| self.tris[t].v)
            .all(|x| next.contains_key(&x))
    }

    /// Replaces the edge opposite `v[i]` of `t` by the other diagonal of
    /// the quadrilateral it forms with its neighbour. Afterwards `t` is
    /// `[c, a, d]` and the neighbour `[d, b, c]`, where `c` was the apex of
    /// `t`, `a -> b` the flipped edge and `d` the neighbour's apex.
    fn flip(&mut self, t: usize, i: usize) -> Option<usize> {
        let n = self.tris[t].adj[i]?;
        let tv = self.tris[t].v;
        let (c, a, b) = (tv[i], tv[(i + 1) % 3], tv[(i + 2) % 3]);
        if self.is_constrained(a, b) {
            return None;
        }
        let j = self.opposite_index(n, a, b)?;
        let d = self.tris[n].v[j];
        {
            let (pc, pa, pb, pd) = (
                &self.points[c],
                &self.points[a],
                &self.points[b],
                &self.points[d],
            );
            if !orient2d_sign(pc, pa, pd).is_positive() || !orient2d_sign(pd, pb, pc).is_positive()
            {
                return None;
            }
        }
        let t_bc = self.tris[t].adj[(i + 1) % 3];
        let t_ca = self.tris[t].adj[(i + 2) % 3];
        let n_ad = self.tris[n].adj[(j + 1) % 3];
        let n_db = self.tris[n].adj[(j + 2) % 3];

        self.tris[t].v = [c, a, d];
        self.tris[t].adj = [n_ad, Some(n), t_ca];
        self.tris[n].v = [d, b, c];
        self.tris[n].adj = [t_bc, Some(t), n_db];
        if let Some(x) = n_ad {
            self.redirect(x, n, t);
        }
        if let Some(x) = t_bc {
            self.redirect(x, t, n);
        }
        for x in [a, c, d] {
            self.vertex_tri[x] = Some(t);
        }
        self.vertex_tri[b] = Some(n);
        self.refresh(t);
        self.refresh(n);
        Some(n)
    }

    /// Lawson flips from the queued `(triangle, apex)` pairs; each names the
    /// edge of the triangle opposite that apex. Returns the number of flips.
    pub fn legalize(&mut self, seeds: impl IntoIterator<Item = (usize, usize)>) -> usize {
        let mut queue: VecDeque<(usize, usize)> = seeds.into_iter().collect();
        let cap = 16 * self.tris.len() + 1024;
        let mut flips = 0;
        while let Some((t, apex)) = queue.pop_front() {
            if flips >= cap {
                debug!(flips, "legalization cap reached");
                break;
            }
            let tri = &self.tris[t];
            if !tri.alive {
                continue;
            }
            let Some(i) = tri.v.iter().position(|&x| x == apex) else {
                continue;
            };
            let Some(n) = tri.adj[i] else { continue };
            let (a, b) = (tri.v[(i + 1) % 3], tri.v[(i + 2) % 3]);
            if self.is_constrained(a, b) {
                continue;
            }
            let Some(j) = self.opposite_index(n, a, b) else {
                continue;
            };
            let d = self.tris[n].v[j];
            let [pa, pb, pc] = self.corners(t);
            let wants = match incircle_sign(pa, pb, pc, &self.points[d]) {
                Sign::Positive => true,
                Sign::Zero => self.flip_improves(apex, a, b, d),
                Sign::Negative => false,
            };
            if wants && self.flip(t, i).is_some() {
                flips += 1;
                queue.extend([(t, apex), (t, d), (n, d), (n, apex)]);
            }
        }
        flips
    }

    /// For co-circular quadrilaterals: whether diagonal `c-d` gives a larger
    /// smallest angle than `a-b`.
    fn flip_improves(&self, c: usize, a: usize, b: usize, d: usize) -> bool {
        let p = |v: usize| &self.points[v];
        let before = min_angle(p(c), p(a), p(b)).min(min_angle(p(d), p(b), p(a)));
        let after = min_angle(p(c), p(a), p(d)).min(min_angle(p(d), p(b), p(c)));
        after > before + 1e-12
    }

    fn crossing_edges(&self, a: usize, b: usize) -> VecDeque<Edge> {
        let (pa, pb) = (&self.points[a], &self.points[b]);
        let mut out = VecDeque::new();
        for t in self.live() {
            let tri = &self.tris[t];
            for i in 0..3 {
                if tri.adj[i].is_some_and(|n| n < t) {
                    continue;
                }
                let (x, y) = (tri.v[(i + 1) % 3], tri.v[(i + 2) % 3]);
                if x == a || x == b || y == a || y == b {
                    continue;
                }
                if segments_properly_intersect(pa, pb, &self.points[x], &self.points[y]) {
                    out.push_back(Edge::new(x, y));
                }
            }
        }
        out
    }

    /// Vertex lying exactly on the open segment `a-b`, closest to `a`.
    fn vertex_on_segment(&self, a: usize, b: usize) -> Option<usize> {
        let (pa, pb) = (&self.points[a], &self.points[b]);
        (0..self.points.len())
            .filter(|&v| v != a && v != b && !self.is_super(v) && self.vertex_tri[v].is_some())
            .filter(|&v| is_point_inside_segment(&self.points[v], pa, pb))
            .min_by(|&x, &y| {
                param_t(pa, pb, &self.points[x]).total_cmp(&param_t(pa, pb, &self.points[y]))
            })
    }

    /// Makes `a-b` an edge of the triangulation and locks it. A segment
    /// running through other vertices is split there. The directed
    /// sub-edges now locked are appended to `out`.
    pub fn enforce_constraint(&mut self, a: usize, b: usize, out: &mut Vec<(usize, usize)>) -> bool {
        let (a, b) = (self.resolve(a), self.resolve(b));
        if a == b {
            return true;
        }
        if self.find_edge(a, b).is_some() {
            self.constrained.insert(Edge::new(a, b));
            out.push((a, b));
            return true;
        }
        if let Some(v) = self.vertex_on_segment(a, b) {
            trace!(a, b, v, "splitting constraint at collinear vertex");
            return self.enforce_constraint(a, v, out) && self.enforce_constraint(v, b, out);
        }

        let mut queue = self.crossing_edges(a, b);
        if queue.iter().any(|e| self.constrained.contains(e)) {
            return false;
        }
        let cap = 64 * queue.len() + 256;
        let mut fresh: Vec<Edge> = Vec::new();
        let mut iterations = 0;
        while let Some(e) = queue.pop_front() {
            iterations += 1;
            if iterations > cap {
                debug!(a, b, "constraint recovery did not converge");
                return false;
            }
            let Some((t, i)) = self.find_edge(e.0, e.1) else {
                continue;
            };
            if self.flip(t, i).is_some() {
                let [c, _, d] = self.tris[t].v;
                let diag = Edge::new(c, d);
                let touches = c == a || c == b || d == a || d == b;
                if !touches
                    && segments_properly_intersect(
                        &self.points[a],
                        &self.points[b],
                        &self.points[c],
                        &self.points[d],
                    )
                {
                    queue.push_back(diag);
                } else {
                    fresh.push(diag);
                }
            } else {
                queue.push_back(e);
            }
        }
        if self.find_edge(a, b).is_none() {
            return false;
        }
        self.constrained.insert(Edge::new(a, b));
        out.push((a, b));

        let seeds: Vec<(usize, usize)> = fresh
            .into_iter()
            .filter(|e| *e != Edge::new(a, b))
            .filter_map(|e| self.find_edge(e.0, e.1))
            .map(|(t, i)| (t, self.tris[t].v[i]))
            .collect();
        self.legalize(seeds);
        true
    }

    /// Keeps the triangles on the left of the directed `frontier` edges and
    /// everything reachable from them without crossing a constrained edge.
    /// Returns the number of triangles kept.
    pub fn classify_domain(&mut self, frontier: &[(usize, usize)]) -> usize {
        let mut inside = vec![false; self.tris.len()];
        let mut stack = Vec::new();
        for &(a, b) in frontier {
            if let Some(t) = self.find_directed(a, b) {
                if !inside[t] {
                    inside[t] = true;
                    stack.push(t);
                }
            }
        }
        while let Some(t) = stack.pop() {
            let tri = &self.tris[t];
            for i in 0..3 {
                let Some(n) = tri.adj[i] else { continue };
                if inside[n] || self.is_constrained(tri.v[(i + 1) % 3], tri.v[(i + 2) % 3]) {
                    continue;
                }
                inside[n] = true;
                stack.push(n);
            }
        }

        let doomed: Vec<usize> = self
            .live()
            .filter(|&t| !inside[t] || self.tris[t].v.iter().any(|&v| self.is_super(v)))
            .collect();
        for t in doomed {
            self.kill(t);
        }
        for t in 0..self.tris.len() {
            if !self.tris[t].alive {
                continue;
            }
            for k in 0..3 {
                if self.tris[t].adj[k].is_some_and(|n| !self.tris[n].alive) {
                    self.tris[t].adj[k] = None;
                }
            }
        }
        self.vertex_tri.iter_mut().for_each(|x| *x = None);
        for t in 0..self.tris.len() {
            if self.tris[t].alive {
                for v in self.tris[t].v {
                    self.vertex_tri[v] = Some(t);
                }
            }
        }
        let first = self.live().next();
        self.hint = first.unwrap_or(0);
        let kept = self.nb_triangles();
        debug!(kept, "domain classified");
        kept
    }
}

/// Smallest interior angle of a triangle, in radians.
pub fn min_angle(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let angle = |p: &Point2, q: &Point2, r: &Point2| {
        let (ux, uy) = (q.x - p.x, q.y - p.y);
        let (vx, vy) = (r.x - p.x, r.y - p.y);
        (ux * vy - uy * vx).abs().atan2(ux * vx + uy * vy)
    };
    angle(a, b, c).min(angle(b, c, a)).min(angle(c, a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point2> {
        raw.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn is_delaunay(dt: &Delaunay) -> bool {
        dt.live().all(|t| {
            let [a, b, c] = dt.corners(t);
            (0..dt.super_start).all(|v| {
                dt.tris[t].v.contains(&v) || !incircle_sign(a, b, c, &dt.points[v]).is_positive()
            })
        })
    }

    #[test]
    fn unit_square_gives_two_triangles() {
        let (mut dt, failed) =
            Delaunay::from_points(pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]));
        assert_eq!(failed, 0);
        let mut locked = Vec::new();
        for k in 0..4 {
            assert!(dt.enforce_constraint(k, (k + 1) % 4, &mut locked));
        }
        assert_eq!(dt.classify_domain(&locked), 2);
        for [a, b, c] in dt.triangles() {
            assert!(orient2d_sign(&dt.points[a], &dt.points[b], &dt.points[c]).is_positive());
        }
    }

    #[test]
    fn duplicate_points_alias() {
        let (dt, failed) =
            Delaunay::from_points(pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 0.0)]));
        assert_eq!(failed, 0);
        assert_eq!(dt.resolve(3), 1);
    }

    #[test]
    fn random_cloud_is_delaunay() {
        let raw: Vec<(f64, f64)> = (0..60)
            .map(|i| {
                let t = i as f64 * 0.618_033_988_75;
                ((t * 7.3).fract() * 10.0, (t * 3.1).fract() * 10.0)
            })
            .collect();
        let (dt, failed) = Delaunay::from_points(pts(&raw));
        assert_eq!(failed, 0);
        assert!(is_delaunay(&dt));
    }

    #[test]
    fn constraint_recovered_by_flips() {
        // A long horizontal segment crossed by the edges of a fan of points
        // just above and below it.
        let mut raw = vec![(0.0, 0.0), (10.0, 0.0)];
        for i in 1..10 {
            raw.push((i as f64, 0.3));
            raw.push((i as f64 + 0.5, -0.3));
        }
        let (mut dt, _) = Delaunay::from_points(pts(&raw));
        let mut locked = Vec::new();
        assert!(dt.enforce_constraint(0, 1, &mut locked));
        assert_eq!(locked, vec![(0, 1)]);
        assert!(dt.find_edge(0, 1).is_some());
        assert!(dt.is_constrained(1, 0));
    }

    #[test]
    fn constraint_split_at_collinear_vertex() {
        let (mut dt, _) = Delaunay::from_points(pts(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (1.0, -1.0),
        ]));
        let mut locked = Vec::new();
        assert!(dt.enforce_constraint(0, 1, &mut locked));
        assert_eq!(locked, vec![(0, 2), (2, 1)]);
    }

    #[test]
    fn concave_domain_drops_outside_triangles() {
        // L-shape, counter-clockwise.
        let raw = [(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)];
        let (mut dt, _) = Delaunay::from_points(pts(&raw));
        let mut locked = Vec::new();
        for k in 0..6 {
            assert!(dt.enforce_constraint(k, (k + 1) % 6, &mut locked));
        }
        assert_eq!(dt.classify_domain(&locked), 4);
        let area: f64 = dt
            .triangles()
            .iter()
            .map(|&[a, b, c]| 0.5 * crate::kernel::orient2d(&dt.points[a], &dt.points[b], &dt.points[c]))
            .sum();
        assert!((area - 3.0).abs() < 1e-12);
    }

    #[test]
    fn point_on_constrained_edge_is_backed_out() {
        let (mut dt, _) =
            Delaunay::from_points(pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]));
        let mut locked = Vec::new();
        for k in 0..4 {
            assert!(dt.enforce_constraint(k, (k + 1) % 4, &mut locked));
        }
        dt.classify_domain(&locked);
        let before = dt.triangles();

        let v = dt.push_point(Point2::new(1.0, 0.0));
        assert_eq!(dt.insert(v), Insertion::Failed);
        assert_eq!(dt.triangles(), before);

        let w = dt.push_point(Point2::new(1.0, 1.5));
        assert_eq!(dt.insert(w), Insertion::Inserted);
        assert_eq!(dt.nb_triangles(), before.len() + 2);
    }

    #[test]
    fn cavity_checks_reject_bad_boundaries() {
        let (dt, _) = Delaunay::from_points(pts(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]));
        let t = dt
            .live()
            .find(|&t| dt.tris[t].v.iter().all(|&x| x < 3))
            .unwrap();
        let [a, b, c] = dt.tris[t].v;
        let p = Point2::new(1.0, 1.0);

        let ccw = [(a, b, None), (b, c, None), (c, a, None)];
        assert!(dt.is_star_shaped(&[t], &ccw, &p));

        // Wrong winding: every edge sees the point on its right.
        let cw = [(b, a, None), (c, b, None), (a, c, None)];
        assert!(!dt.is_star_shaped(&[t], &cw, &p));

        // Not closed.
        assert!(!dt.is_star_shaped(&[t], &ccw[..2], &p));

        // Point outside the boundary.
        assert!(!dt.is_star_shaped(&[t], &ccw, &Point2::new(5.0, 5.0)));
    }

    #[test]
    fn min_angle_of_right_isoceles() {
        let a = min_angle(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
        );
        assert!((a - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }
}
