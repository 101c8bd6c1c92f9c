// src/utils/hull.rs
//! General 3-D convex hull (quickhull with per-face conflict lists).
//!
//! The mesh lives in two arenas: faces and half-edges, addressed by
//! [`FaceIdx`] / [`EdgeIdx`]. `twin`, `next` and `prev` are plain index
//! lookups, so there are no reference cycles and a deleted face is just a
//! tombstone (`Mark::Deleted`) left in the arena.
//!
//! # Algorithm
//!
//! 1. Seed a tetrahedron from the axis extremes (farthest pair, farthest
//!    point from their line, farthest point from their plane).
//! 2. Assign every other point to the face it is farthest outside of.
//! 3. Repeatedly take the globally farthest conflict point (the eye), delete
//!    every face visible from it, collect the horizon loop, fan new faces
//!    from the eye to the horizon and redistribute the orphaned points.
//!
//! One tolerance, [`RELATIVE_TOLERANCE`] times the bounding-box diagonal of
//! the input, decides both "outside" and "coplanar/collinear".

use nalgebra::Vector3;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

use super::geometry::{to_point, to_vector, Point3};

pub const RELATIVE_TOLERANCE: f64 = 1e-10;

/// One hull face. `indices` point into the input slice; vertices are wound
/// counter-clockwise seen from outside, so `normal` points outward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Triangle {
    pub indices: [usize; 3],
    pub vertices: [Point3; 3],
    pub normal: Point3,
}

impl Triangle {
    /// Positive outside, negative inside.
    pub fn signed_distance(&self, p: Point3) -> f64 {
        to_vector(self.normal).dot(&(to_vector(p) - to_vector(self.vertices[0])))
    }

    pub fn area(&self) -> f64 {
        let [a, b, c] = self.vertices.map(to_vector);
        0.5 * (b - a).cross(&(c - a)).norm()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HullResult {
    Faces(Vec<Triangle>),
    /// Fewer than 4 points, or all of them coplanar/collinear.
    Degenerate,
}

impl HullResult {
    pub fn faces(&self) -> Option<&[Triangle]> {
        match self {
            HullResult::Faces(faces) => Some(faces),
            HullResult::Degenerate => None,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, HullResult::Degenerate)
    }
}

/// Hull of `points`. See the module docs for the tolerance policy.
pub fn build(points: &[Point3]) -> HullResult {
    ConvexHull::new(points).run()
}

/// The absolute tolerance [`build`] uses for this point set.
pub fn tolerance_for(points: &[Point3]) -> f64 {
    let vectors: Vec<Vector3<f64>> = points.iter().map(|p| to_vector(*p)).collect();
    RELATIVE_TOLERANCE * bounding_diagonal(&vectors)
}

fn bounding_diagonal(points: &[Vector3<f64>]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    let (min, max) = points.iter().fold((*first, *first), |(lo, hi), p| {
        (lo.inf(p), hi.sup(p))
    });
    (max - min).norm()
}

// --- Arena types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FaceIdx(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeIdx(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Live,
    Deleted,
}

#[derive(Debug, Clone)]
struct HalfEdge {
    /// Point index this edge points to. The tail is `prev.head`.
    head: usize,
    prev: EdgeIdx,
    next: EdgeIdx,
    twin: Option<EdgeIdx>,
    face: FaceIdx,
}

#[derive(Debug, Clone)]
struct Face {
    edge: EdgeIdx,
    normal: Vector3<f64>,
    offset: f64,
    /// Conflict list. The front is always the farthest point.
    outside: VecDeque<usize>,
    mark: Mark,
}

impl Face {
    fn distance(&self, p: &Vector3<f64>) -> f64 {
        self.normal.dot(p) - self.offset
    }
}

/// Working state for one hull computation. Built, run, discarded.
struct ConvexHull {
    points: Vec<Vector3<f64>>,
    tolerance: f64,
    faces: Vec<Face>,
    edges: Vec<HalfEdge>,
    /// Live faces, in creation order.
    active: Vec<FaceIdx>,
    /// Distance of each point to the face whose conflict list holds it.
    conflict_distance: Vec<f64>,
    unassigned: Vec<usize>,
}

impl ConvexHull {
    fn new(points: &[Point3]) -> Self {
        let points: Vec<Vector3<f64>> = points.iter().map(|p| to_vector(*p)).collect();
        let tolerance = RELATIVE_TOLERANCE * bounding_diagonal(&points);
        let n = points.len();
        Self {
            points,
            tolerance,
            faces: Vec::new(),
            edges: Vec::new(),
            active: Vec::new(),
            conflict_distance: vec![0.0; n],
            unassigned: Vec::new(),
        }
    }

    fn run(mut self) -> HullResult {
        if self.points.len() < 4 || !self.points.iter().all(|p| p.iter().all(|c| c.is_finite())) {
            return HullResult::Degenerate;
        }
        let Some(seed) = self.find_seed() else {
            return HullResult::Degenerate;
        };

        self.build_tetrahedron(seed);

        while let Some((eye, face)) = self.next_eye() {
            self.add_point(eye, face);
            let faces = &self.faces;
            self.active.retain(|f| faces[f.0].mark == Mark::Live);
        }

        HullResult::Faces(self.triangles())
    }

    // --- Seeding ---

    fn find_seed(&self) -> Option<[usize; 4]> {
        let pts = &self.points;
        let mut min_idx = [0usize; 3];
        let mut max_idx = [0usize; 3];
        for (i, p) in pts.iter().enumerate() {
            for k in 0..3 {
                if p[k] < pts[min_idx[k]][k] {
                    min_idx[k] = i;
                }
                if p[k] > pts[max_idx[k]][k] {
                    max_idx[k] = i;
                }
            }
        }

        let extent = |k: usize| pts[max_idx[k]][k] - pts[min_idx[k]][k];
        let axis = (0..3).max_by(|&a, &b| extent(a).total_cmp(&extent(b)))?;
        if extent(axis) <= self.tolerance {
            return None;
        }
        let (v0, v1) = (min_idx[axis], max_idx[axis]);
        let origin = pts[v0];
        let dir = (pts[v1] - origin).normalize();

        let (v2, d2) = farthest(pts.len(), |i| (pts[i] - origin).cross(&dir).norm())?;
        if d2 <= self.tolerance {
            return None;
        }

        let normal = (pts[v1] - origin).cross(&(pts[v2] - origin)).normalize();
        let (v3, d3) = farthest(pts.len(), |i| normal.dot(&(pts[i] - origin)).abs())?;
        if d3 <= self.tolerance {
            return None;
        }

        Some([v0, v1, v2, v3])
    }

    fn build_tetrahedron(&mut self, seed: [usize; 4]) {
        let [v0, v1, v2, v3] = seed;
        let interior = seed.iter().map(|&i| self.points[i]).sum::<Vector3<f64>>() / 4.0;

        let mut tetra = Vec::with_capacity(4);
        for [a, b, c] in [[v0, v1, v2], [v0, v1, v3], [v0, v2, v3], [v1, v2, v3]] {
            let (pa, pb, pc) = (self.points[a], self.points[b], self.points[c]);
            let inward = (pb - pa).cross(&(pc - pa)).dot(&(interior - pa)) > 0.0;
            let face = if inward {
                self.create_face(a, c, b)
            } else {
                self.create_face(a, b, c)
            };
            tetra.push(face);
        }

        let mut by_endpoints: HashMap<(usize, usize), EdgeIdx> = HashMap::new();
        for &face in &tetra {
            for e in self.face_edges(face) {
                by_endpoints.insert((self.tail(e), self.edges[e.0].head), e);
            }
        }
        for (&(tail, head), &e) in &by_endpoints {
            if let Some(&twin) = by_endpoints.get(&(head, tail)) {
                self.edges[e.0].twin = Some(twin);
            }
        }

        self.unassigned = (0..self.points.len()).filter(|i| !seed.contains(i)).collect();
        self.resolve_unassigned(&tetra);
    }

    // --- Mesh primitives ---

    /// Triangle `a, b, c` with edges `c->a`, `a->b`, `b->c` (in that order).
    fn create_face(&mut self, a: usize, b: usize, c: usize) -> FaceIdx {
        let face = FaceIdx(self.faces.len());
        let base = self.edges.len();
        let ids = [EdgeIdx(base), EdgeIdx(base + 1), EdgeIdx(base + 2)];
        for (k, head) in [a, b, c].into_iter().enumerate() {
            self.edges.push(HalfEdge {
                head,
                prev: ids[(k + 2) % 3],
                next: ids[(k + 1) % 3],
                twin: None,
                face,
            });
        }

        let (pa, pb, pc) = (self.points[a], self.points[b], self.points[c]);
        let cross = (pb - pa).cross(&(pc - pa));
        let len = cross.norm();
        let normal = if len > 0.0 { cross / len } else { Vector3::zeros() };
        let offset = normal.dot(&((pa + pb + pc) / 3.0));

        self.faces.push(Face {
            edge: ids[0],
            normal,
            offset,
            outside: VecDeque::new(),
            mark: Mark::Live,
        });
        self.active.push(face);
        face
    }

    fn face_edges(&self, face: FaceIdx) -> [EdgeIdx; 3] {
        let e0 = self.faces[face.0].edge;
        let e1 = self.edges[e0.0].next;
        let e2 = self.edges[e1.0].next;
        [e0, e1, e2]
    }

    fn tail(&self, edge: EdgeIdx) -> usize {
        self.edges[self.edges[edge.0].prev.0].head
    }

    fn link(&mut self, a: EdgeIdx, b: EdgeIdx) {
        self.edges[a.0].twin = Some(b);
        self.edges[b.0].twin = Some(a);
    }

    // --- Conflict lists ---

    fn add_conflict(&mut self, point: usize, face: FaceIdx, distance: f64) {
        self.conflict_distance[point] = distance;
        let outside = &mut self.faces[face.0].outside;
        match outside.front() {
            Some(&head) if self.conflict_distance[head] >= distance => outside.push_back(point),
            _ => outside.push_front(point),
        }
    }

    /// Orphan every conflict point of `face` into the unassigned pool.
    fn release_conflicts(&mut self, face: FaceIdx) {
        let outside = std::mem::take(&mut self.faces[face.0].outside);
        self.unassigned.extend(outside);
    }

    /// Hand each pooled point to the new face it is farthest outside of.
    /// Points outside none of them are interior and dropped for good.
    fn resolve_unassigned(&mut self, new_faces: &[FaceIdx]) {
        for point in std::mem::take(&mut self.unassigned) {
            let p = self.points[point];
            let mut best: Option<(FaceIdx, f64)> = None;
            for &face in new_faces {
                if self.faces[face.0].mark != Mark::Live {
                    continue;
                }
                let d = self.faces[face.0].distance(&p);
                if d > self.tolerance && best.map_or(true, |(_, bd)| d > bd) {
                    best = Some((face, d));
                }
            }
            if let Some((face, d)) = best {
                self.add_conflict(point, face, d);
            }
        }
    }

    fn next_eye(&self) -> Option<(usize, FaceIdx)> {
        self.active
            .iter()
            .filter(|f| self.faces[f.0].mark == Mark::Live)
            .filter_map(|&f| self.faces[f.0].outside.front().map(|&p| (p, f)))
            .max_by(|a, b| self.conflict_distance[a.0].total_cmp(&self.conflict_distance[b.0]))
    }

    // --- Insertion ---

    fn add_point(&mut self, eye: usize, face: FaceIdx) {
        // The eye is the head of its face's list; it becomes a hull vertex.
        self.faces[face.0].outside.pop_front();

        let eye_point = self.points[eye];
        let mut horizon = Vec::new();
        self.compute_horizon(&eye_point, None, face, &mut horizon);

        let new_faces = self.add_new_faces(eye, &horizon);
        self.resolve_unassigned(&new_faces);
    }

    /// Depth-first walk over faces visible from `eye`, deleting them and
    /// recording, in loop order, the edges whose far side stays on the hull.
    fn compute_horizon(
        &mut self,
        eye: &Vector3<f64>,
        cross_edge: Option<EdgeIdx>,
        face: FaceIdx,
        horizon: &mut Vec<EdgeIdx>,
    ) {
        self.release_conflicts(face);
        self.faces[face.0].mark = Mark::Deleted;

        let start = match cross_edge {
            Some(e) => self.edges[e.0].next,
            None => self.faces[face.0].edge,
        };
        let mut edge = start;
        loop {
            if let Some(twin) = self.edges[edge.0].twin {
                let opposite = self.edges[twin.0].face;
                if self.faces[opposite.0].mark == Mark::Live {
                    if self.faces[opposite.0].distance(eye) > self.tolerance {
                        self.compute_horizon(eye, Some(twin), opposite, horizon);
                    } else {
                        horizon.push(edge);
                    }
                }
            }
            edge = self.edges[edge.0].next;
            if edge == start {
                break;
            }
        }
    }

    /// Fan of triangles `eye, tail, head` over the horizon, stitched to the
    /// kept faces and to each other.
    fn add_new_faces(&mut self, eye: usize, horizon: &[EdgeIdx]) -> Vec<FaceIdx> {
        let mut new_faces = Vec::with_capacity(horizon.len());
        let mut first_side: Option<EdgeIdx> = None;
        let mut prev_side: Option<EdgeIdx> = None;

        for &h in horizon {
            let (tail, head) = (self.tail(h), self.edges[h.0].head);
            let face = self.create_face(eye, tail, head);
            // e0: head -> eye, e1: eye -> tail, e2: tail -> head
            let [e0, e1, e2] = self.face_edges(face);

            if let Some(kept) = self.edges[h.0].twin {
                self.link(e2, kept);
            }
            match prev_side {
                Some(prev) => self.link(e1, prev),
                None => first_side = Some(e1),
            }
            prev_side = Some(e0);
            new_faces.push(face);
        }

        if let (Some(first), Some(last)) = (first_side, prev_side) {
            self.link(first, last);
        }
        new_faces
    }

    fn triangles(&self) -> Vec<Triangle> {
        self.active
            .iter()
            .filter(|f| self.faces[f.0].mark == Mark::Live)
            .map(|&f| {
                let indices = self.face_edges(f).map(|e| self.edges[e.0].head);
                Triangle {
                    indices,
                    vertices: indices.map(|i| to_point(&self.points[i])),
                    normal: to_point(&self.faces[f.0].normal),
                }
            })
            .collect()
    }
}

fn farthest(n: usize, metric: impl Fn(usize) -> f64) -> Option<(usize, f64)> {
    (0..n)
        .map(|i| (i, metric(i)))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
}
