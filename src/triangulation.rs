//! Planar triangulation of a point set, exposed as half-edge arrays.
//!
//! `triangles[3t..3t + 3]` are the point indices of triangle `t` in
//! counter-clockwise order. Half-edge `e` runs from `triangles[e]` to
//! `triangles[next_halfedge(e)]`; `halfedges[e]` is its twin in the
//! neighbouring triangle, or [`EMPTY`] on the convex hull.

use crate::error::{Error, Result};
use crate::geometry::Point;
use spade::handles::FixedDirectedEdgeHandle;
use spade::{DelaunayTriangulation, Point2, Triangulation as _};
use std::collections::HashMap;

/// Twin of a half-edge that lies on the hull.
pub const EMPTY: usize = usize::MAX;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Triangulation {
    pub triangles: Vec<usize>,
    pub halfedges: Vec<usize>,
}

impl Triangulation {
    #[inline]
    pub fn next_halfedge(e: usize) -> usize {
        if e % 3 == 2 {
            e - 2
        } else {
            e + 1
        }
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Every undirected edge once, as `(from, to)` point indices. Of two
    /// twins only the half-edge with the larger index is kept; hull
    /// half-edges have no twin and are always kept.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.halfedges
            .iter()
            .enumerate()
            .filter(|&(e, &twin)| twin == EMPTY || e > twin)
            .map(|(e, _)| (self.triangles[e], self.triangles[Self::next_halfedge(e)]))
            .collect()
    }
}

/// Source of candidate edges for the spanning tree
pub trait Triangulator {
    /// Triangulate `points`; indices in the result refer to positions in
    /// `points`.
    fn triangulate(&self, points: &[Point]) -> Result<Triangulation>;
}

/// Delaunay triangulation backed by `spade`
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayTriangulator;

impl DelaunayTriangulator {
    pub fn new() -> Self {
        DelaunayTriangulator
    }
}

impl Triangulator for DelaunayTriangulator {
    fn triangulate(&self, points: &[Point]) -> Result<Triangulation> {
        if points.len() < 3 {
            return Err(Error::triangulation(format!(
                "at least 3 points are required, got {}",
                points.len()
            )));
        }

        let mut delaunay = DelaunayTriangulation::<Point2<f64>>::new();
        for p in points {
            delaunay
                .insert(Point2::new(p.x, p.y))
                .map_err(|e| Error::triangulation(format!("cannot insert point {}: {:?}", p.id, e)))?;
        }

        // spade merges coincident positions, which would shift every index
        if delaunay.num_vertices() != points.len() {
            return Err(Error::triangulation(format!(
                "{} points share coordinates with another point",
                points.len() - delaunay.num_vertices()
            )));
        }
        if delaunay.num_inner_faces() == 0 {
            return Err(Error::triangulation("all points are colinear"));
        }

        let mut triangles = Vec::with_capacity(delaunay.num_inner_faces() * 3);
        let mut twins: Vec<FixedDirectedEdgeHandle> = Vec::with_capacity(triangles.capacity());
        let mut slot: HashMap<FixedDirectedEdgeHandle, usize> = HashMap::with_capacity(triangles.capacity());

        for face in delaunay.inner_faces() {
            // adjacent edges come in ccw order, each starting where the previous ends
            for edge in face.adjacent_edges() {
                slot.insert(edge.fix(), triangles.len());
                twins.push(edge.rev().fix());
                triangles.push(edge.from().fix().index());
            }
        }

        let halfedges = twins
            .iter()
            .map(|twin| slot.get(twin).copied().unwrap_or(EMPTY))
            .collect();

        log::debug!(
            "Triangulated {} points into {} triangles",
            points.len(),
            triangles.len() / 3
        );

        Ok(Triangulation { triangles, halfedges })
    }
}
