//! Minimum spanning tree over the edges of a planar triangulation.
//!
//! Kruskal's algorithm with plain group relabelling: every point starts in
//! the group named after its own id, and a merge renames the larger group
//! id to the smaller one. Candidate edges are visited in ascending length
//! with a stable sort, so equal-length edges keep triangulation order and
//! the kept edge set is reproducible.

use crate::error::{Error, Result};
use crate::geometry::{Edge, Point, PointId};
use crate::pool::Pool;
use crate::triangulation::{DelaunayTriangulator, Triangulation, Triangulator};
use ordered_float::OrderedFloat;
use std::collections::HashMap;

/// Turn the deduplicated triangulation edges into point edges.
pub fn candidate_edges(points: &[Point], triangulation: &Triangulation) -> Vec<Edge> {
    triangulation
        .edges()
        .into_iter()
        .map(|(from, to)| Edge::new(points[from], points[to]))
        .collect()
}

/// Kruskal over `candidates`. Returns the kept edges in the order they were
/// accepted.
pub fn minimum_spanning_tree(points: &[Point], mut candidates: Vec<Edge>) -> Result<Vec<Edge>> {
    let index: HashMap<PointId, usize> = points.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
    let mut group: Vec<PointId> = points.iter().map(|p| p.id).collect();

    // sort_by_key is stable
    candidates.sort_by_key(|e| OrderedFloat(e.distance()));

    let target = points.len().saturating_sub(1);
    let mut tree = Vec::with_capacity(target);

    for edge in candidates {
        if tree.len() == target {
            // single component: every remaining edge would close a cycle
            break;
        }
        let a = *index.get(&edge.fst.id).ok_or_else(|| Error::id_not_found(edge.fst.id))?;
        let b = *index.get(&edge.snd.id).ok_or_else(|| Error::id_not_found(edge.snd.id))?;

        let (ga, gb) = (group[a], group[b]);
        if ga == gb {
            continue;
        }
        let (keep, replace) = if ga < gb { (ga, gb) } else { (gb, ga) };
        for g in group.iter_mut() {
            if *g == replace {
                *g = keep;
            }
        }
        tree.push(edge);
    }

    Ok(tree)
}

/// Triangulates a pool and reduces the triangulation to its minimum
/// spanning tree.
pub struct SpanningTreeBuilder<T: Triangulator = DelaunayTriangulator> {
    pub triangulator: T,
}

impl SpanningTreeBuilder<DelaunayTriangulator> {
    pub fn new() -> Self {
        SpanningTreeBuilder { triangulator: DelaunayTriangulator::new() }
    }
}

impl Default for SpanningTreeBuilder<DelaunayTriangulator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Triangulator> SpanningTreeBuilder<T> {
    pub fn with_triangulator(triangulator: T) -> Self {
        SpanningTreeBuilder { triangulator }
    }

    /// Spanning tree of the pool: exactly `n - 1` edges, one component.
    pub fn build(&self, pool: &Pool) -> Result<Vec<Edge>> {
        self.build_with_triangulation(pool).map(|(_, tree)| tree)
    }

    /// Like [`SpanningTreeBuilder::build`], also returning the triangulation
    /// the candidate edges came from.
    pub fn build_with_triangulation(&self, pool: &Pool) -> Result<(Triangulation, Vec<Edge>)> {
        log::info!("Triangulating {} points", pool.len());
        let triangulation = self.triangulator.triangulate(pool.points())?;
        let candidates = candidate_edges(pool.points(), &triangulation);
        log::debug!("{} candidate edges", candidates.len());

        let tree = minimum_spanning_tree(pool.points(), candidates)?;
        if tree.len() + 1 != pool.len() {
            return Err(Error::triangulation(format!(
                "candidate edges connect only {} of {} points",
                tree.len() + 1,
                pool.len()
            )));
        }
        log::info!(
            "Spanning tree built: {} edges, total length {:.2}",
            tree.len(),
            tree.iter().map(Edge::distance).sum::<f64>()
        );
        Ok((triangulation, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::distance;
    use proptest::prelude::*;

    fn jittered_grid(offsets: &[(f64, f64)]) -> Pool {
        Pool::from_points(offsets.iter().enumerate().map(|(i, &(dx, dy))| {
            let (col, row) = ((i % 8) as f64, (i / 8) as f64);
            Point::new(i as PointId, col * 10.0 + dx, row * 10.0 + dy)
        }))
        .unwrap()
    }

    /// Union-find check: `tree` connects all points without a cycle.
    fn is_spanning_tree(points: &[Point], tree: &[Edge]) -> bool {
        let index: HashMap<PointId, usize> = points.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
        let mut parent: Vec<usize> = (0..points.len()).collect();
        fn find(parent: &mut Vec<usize>, mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }
        for edge in tree {
            let a = find(&mut parent, index[&edge.fst.id]);
            let b = find(&mut parent, index[&edge.snd.id]);
            if a == b {
                return false;
            }
            parent[a] = b;
        }
        tree.len() + 1 == points.len()
    }

    /// Prim over the complete graph.
    fn brute_force_mst_weight(points: &[Point]) -> f64 {
        let n = points.len();
        let mut in_tree = vec![false; n];
        let mut best = vec![f64::INFINITY; n];
        best[0] = 0.0;
        let mut total = 0.0;
        for _ in 0..n {
            let u = (0..n)
                .filter(|&i| !in_tree[i])
                .min_by_key(|&i| OrderedFloat(best[i]))
                .unwrap();
            in_tree[u] = true;
            total += best[u];
            for v in 0..n {
                let d = distance(&points[u], &points[v]);
                if !in_tree[v] && d < best[v] {
                    best[v] = d;
                }
            }
        }
        total
    }

    #[test]
    fn test_square_drops_diagonal_and_one_side() {
        let pool = Pool::from_points(vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 1.0, 0.0),
            Point::new(2, 1.0, 1.0),
            Point::new(3, 0.0, 1.0),
        ])
        .unwrap();
        let tree = SpanningTreeBuilder::new().build(&pool).unwrap();

        assert_eq!(tree.len(), 3);
        assert!(tree.iter().all(|e| e.distance() == 1.0));
        assert!(is_spanning_tree(pool.points(), &tree));
    }

    #[test]
    fn test_relabelling_keeps_cheapest_edges() {
        let points = vec![
            Point::new(10, 0.0, 0.0),
            Point::new(20, 3.0, 0.0),
            Point::new(30, 3.0, 1.0),
            Point::new(40, 0.0, 1.2),
        ];
        let p = |i: usize| points[i];
        let candidates = vec![
            Edge::new(p(0), p(1)),
            Edge::new(p(1), p(2)),
            Edge::new(p(2), p(3)),
            Edge::new(p(3), p(0)),
            Edge::new(p(0), p(2)),
        ];
        let tree = minimum_spanning_tree(&points, candidates).unwrap();

        assert_eq!(tree, vec![Edge::new(p(1), p(2)), Edge::new(p(3), p(0)), Edge::new(p(0), p(1))]);
    }

    #[test]
    fn test_ties_follow_candidate_order() {
        let points = vec![Point::new(0, 0.0, 0.0), Point::new(1, 1.0, 0.0), Point::new(2, 0.0, 1.0)];
        let candidates = vec![
            Edge::new(points[1], points[2]),
            Edge::new(points[0], points[2]),
            Edge::new(points[0], points[1]),
        ];
        let tree = minimum_spanning_tree(&points, candidates).unwrap();
        assert_eq!(tree, vec![Edge::new(points[0], points[2]), Edge::new(points[0], points[1])]);
    }

    #[test]
    fn test_unknown_endpoint() {
        let points = vec![Point::new(0, 0.0, 0.0), Point::new(1, 1.0, 0.0)];
        let stray = Edge::new(points[0], Point::new(9, 5.0, 5.0));
        assert!(matches!(minimum_spanning_tree(&points, vec![stray]), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_too_few_points() {
        let pool = Pool::from_points(vec![Point::new(0, 0.0, 0.0), Point::new(1, 1.0, 0.0)]).unwrap();
        assert!(matches!(SpanningTreeBuilder::new().build(&pool), Err(Error::Triangulation(_))));
    }

    proptest! {
        #[test]
        fn prop_spanning_tree_shape_and_weight(
            offsets in prop::collection::vec((0.0_f64..5.0, 0.0_f64..5.0), 3..60)
        ) {
            let pool = jittered_grid(&offsets);
            let tree = SpanningTreeBuilder::new().build(&pool).unwrap();

            prop_assert_eq!(tree.len(), pool.len() - 1);
            prop_assert!(is_spanning_tree(pool.points(), &tree));

            // the Delaunay triangulation contains a Euclidean MST
            let weight: f64 = tree.iter().map(Edge::distance).sum();
            prop_assert!((weight - brute_force_mst_weight(pool.points())).abs() < 1e-6);
        }
    }
}
