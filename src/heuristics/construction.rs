use crate::error::{Error, Result};
use crate::geometry::{Edge, Point, PointId};
use crate::heuristics::spanning_tree::SpanningTreeBuilder;
use crate::pool::Pool;
use crate::tour::Tour;
use crate::triangulation::{DelaunayTriangulator, Triangulator};
use ordered_float::OrderedFloat;
use std::collections::{HashMap, HashSet};

pub trait ConstructionHeuristic {
    fn construct(&self, pool: &Pool) -> Result<Tour>;
    fn name(&self) -> &str;
}

/// Neighbour lists of a spanning tree, each sorted by the neighbour's polar
/// angle around the coordinate origin.
struct TreeAdjacency {
    neighbours: HashMap<PointId, Vec<Point>>,
}

impl TreeAdjacency {
    fn new(tree: &[Edge]) -> Self {
        let mut neighbours: HashMap<PointId, Vec<Point>> = HashMap::new();
        for edge in tree {
            neighbours.entry(edge.fst.id).or_default().push(edge.snd);
            neighbours.entry(edge.snd.id).or_default().push(edge.fst);
        }
        // angle from the origin, not from the point itself; stable on ties
        for list in neighbours.values_mut() {
            list.sort_by_key(|p| OrderedFloat(p.origin_angle()));
        }
        TreeAdjacency { neighbours }
    }

    /// The neighbour of `current` that follows `previous` in angular order,
    /// or the first neighbour when there is no previous point.
    fn next(&self, previous: Option<PointId>, current: PointId) -> Result<Point> {
        let list = self
            .neighbours
            .get(&current)
            .filter(|list| !list.is_empty())
            .ok_or_else(|| Error::graph_consistency(format!("point {} has no tree neighbours", current)))?;

        let index = match previous {
            None => 0,
            Some(prev) => {
                let at = list.iter().position(|p| p.id == prev).ok_or_else(|| {
                    Error::graph_consistency(format!("point {} is not a neighbour of point {}", prev, current))
                })?;
                (at + 1) % list.len()
            }
        };
        Ok(list[index])
    }
}

/// Walk around the spanning tree from the pool's start and keep the first
/// visit of every point (double-tree shortcutting).
///
/// The walk crosses every tree edge once in each direction and stops when it
/// is about to leave the start towards its first neighbour again. A tree
/// without exactly `len - 1` edges, or a walk that needs more than two steps
/// per edge, is a `GraphConsistency` error.
pub fn extract_tour(pool: &Pool, tree: &[Edge]) -> Result<Tour> {
    let start = pool.start()?;
    if tree.len() + 1 != pool.len() {
        return Err(Error::graph_consistency(format!(
            "{} edges cannot span {} points",
            tree.len(),
            pool.len()
        )));
    }
    if pool.len() == 1 {
        return Tour::new(vec![start]);
    }

    let adjacency = TreeAdjacency::new(tree);
    let first = adjacency.next(None, start.id)?;

    let max_steps = 2 * tree.len();
    let mut steps = 0;
    let mut walk = vec![start];
    let mut current = first;
    let mut next = adjacency.next(Some(start.id), current.id)?;
    while !(current.id == start.id && next.id == first.id) {
        if steps == max_steps {
            return Err(Error::graph_consistency(format!(
                "walk did not return to point {} within {} steps",
                start.id, max_steps
            )));
        }
        steps += 1;
        walk.push(current);
        let following = adjacency.next(Some(current.id), next.id)?;
        current = next;
        next = following;
    }
    log::debug!("Boundary walk: {} steps over {} tree edges", walk.len(), tree.len());

    let mut seen = HashSet::with_capacity(pool.len());
    let points: Vec<Point> = walk.into_iter().filter(|p| seen.insert(p.id)).collect();

    let tour = Tour::new(points)?;
    if !tour.is_complete(pool) {
        return Err(Error::graph_consistency(format!(
            "walk reached {} of {} points",
            tour.len(),
            pool.len()
        )));
    }
    Ok(tour)
}

/// Minimum spanning tree over the triangulation, walked into a tour
pub struct SpanningTreeTour<T: Triangulator = DelaunayTriangulator> {
    pub builder: SpanningTreeBuilder<T>,
}

impl SpanningTreeTour<DelaunayTriangulator> {
    pub fn new() -> Self {
        SpanningTreeTour { builder: SpanningTreeBuilder::new() }
    }
}

impl Default for SpanningTreeTour<DelaunayTriangulator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Triangulator> SpanningTreeTour<T> {
    pub fn with_triangulator(triangulator: T) -> Self {
        SpanningTreeTour { builder: SpanningTreeBuilder::with_triangulator(triangulator) }
    }
}

impl<T: Triangulator> ConstructionHeuristic for SpanningTreeTour<T> {
    fn construct(&self, pool: &Pool) -> Result<Tour> {
        let tree = self.builder.build(pool)?;
        let tour = extract_tour(pool, &tree)?;
        log::info!("Spanning tree tour: distance {:.2}", tour.distance());
        Ok(tour)
    }

    fn name(&self) -> &str {
        "SpanningTree"
    }
}

/// Nearest Neighbor Heuristic
///
/// Builds a tour by repeatedly moving to the closest remaining point.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborHeuristic;

impl NearestNeighborHeuristic {
    pub fn new() -> Self {
        NearestNeighborHeuristic
    }
}

impl ConstructionHeuristic for NearestNeighborHeuristic {
    fn construct(&self, pool: &Pool) -> Result<Tour> {
        let mut remaining = pool.clone();
        let start = remaining.start()?;
        remaining.remove_by_id(start.id)?;

        let mut tour = Vec::with_capacity(pool.len());
        tour.push(start);
        let mut current = start;
        while !remaining.is_empty() {
            let next = remaining.nearest(&current)?;
            remaining.remove_by_id(next.id)?;
            tour.push(next);
            current = next;
        }

        let tour = Tour::new(tour)?;
        log::info!("Nearest neighbour tour: distance {:.2}", tour.distance());
        Ok(tour)
    }

    fn name(&self) -> &str {
        "NearestNeighbor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::local_search::TwoOptSearch;
    use proptest::prelude::*;

    fn square() -> Pool {
        Pool::from_points(vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 1.0, 0.0),
            Point::new(2, 1.0, 1.0),
            Point::new(3, 0.0, 1.0),
        ])
        .unwrap()
    }

    fn edge(pool: &Pool, a: PointId, b: PointId) -> Edge {
        Edge::new(pool.get(a).unwrap(), pool.get(b).unwrap())
    }

    #[test]
    fn test_square_path_tree() {
        let pool = square();
        let tree = vec![edge(&pool, 0, 1), edge(&pool, 1, 2), edge(&pool, 2, 3)];
        let tour = extract_tour(&pool, &tree).unwrap();

        assert_eq!(tour.ids(), vec![0, 1, 2, 3]);
        assert_eq!(tour.distance(), 4.0);
    }

    #[test]
    fn test_walk_from_interior_point() {
        // path 3 - 0 - 1 - 2 with the start in the middle
        let pool = Pool::from_points(vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 3.0, 0.0),
            Point::new(2, 3.0, 1.0),
            Point::new(3, 0.0, 1.2),
        ])
        .unwrap();
        let tree = vec![edge(&pool, 1, 2), edge(&pool, 3, 0), edge(&pool, 0, 1)];
        let tour = extract_tour(&pool, &tree).unwrap();
        assert_eq!(tour.ids(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_star_tree_visits_leaves_in_angular_order() {
        let pool = Pool::from_points(vec![
            Point::new(0, 10.0, 10.0),
            Point::new(1, 12.0, 10.5),
            Point::new(2, 10.0, 14.0),
            Point::new(3, 14.0, 11.0),
        ])
        .unwrap();
        let tree = vec![edge(&pool, 0, 2), edge(&pool, 0, 1), edge(&pool, 0, 3)];
        let tour = extract_tour(&pool, &tree).unwrap();

        // origin angles: 3 (0.67) < 1 (0.72) < 2 (0.95)
        assert_eq!(tour.ids(), vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_single_point() {
        let pool = Pool::from_points(vec![Point::new(5, 1.0, 1.0)]).unwrap();
        assert_eq!(extract_tour(&pool, &[]).unwrap().ids(), vec![5]);
    }

    #[test]
    fn test_disconnected_tree_is_rejected() {
        let pool = square();
        let tree = vec![edge(&pool, 0, 1), edge(&pool, 2, 3)];
        assert!(matches!(extract_tour(&pool, &tree), Err(Error::GraphConsistency(_))));

        let isolated_start = vec![edge(&pool, 1, 2), edge(&pool, 2, 3)];
        assert!(matches!(extract_tour(&pool, &isolated_start), Err(Error::GraphConsistency(_))));
    }

    #[test]
    fn test_edge_count_must_span_pool() {
        let pool = square();
        let repeated = vec![edge(&pool, 0, 1), edge(&pool, 1, 2), edge(&pool, 1, 2), edge(&pool, 2, 3)];
        assert!(matches!(extract_tour(&pool, &repeated), Err(Error::GraphConsistency(_))));

        let single = Pool::from_points(vec![Point::new(5, 1.0, 1.0)]).unwrap();
        let loop_edge = vec![edge(&single, 5, 5)];
        assert!(matches!(extract_tour(&single, &loop_edge), Err(Error::GraphConsistency(_))));
    }

    #[test]
    fn test_cyclic_walk_is_cut_off() {
        // right edge count, but 0-2 repeated: the walk bounces between 0 and
        // 2 forever and never returns to leave 0 towards 1
        let pool = Pool::from_points(vec![
            Point::new(0, 1.0, 1.0),
            Point::new(1, 3.0, 1.0),
            Point::new(2, 3.0, 3.0),
            Point::new(3, 1.0, 3.0),
            Point::new(4, 2.0, 5.0),
        ])
        .unwrap();
        let tree = vec![edge(&pool, 0, 1), edge(&pool, 0, 2), edge(&pool, 0, 2), edge(&pool, 0, 2)];
        let err = extract_tour(&pool, &tree).unwrap_err();
        assert!(matches!(err, Error::GraphConsistency(ref msg) if msg.contains("within 8 steps")));
    }

    #[test]
    fn test_spanning_tree_tour_end_to_end() {
        let pool = Pool::from_points(vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 3.0, 0.0),
            Point::new(2, 3.0, 1.0),
            Point::new(3, 0.0, 1.2),
        ])
        .unwrap();
        let tour = SpanningTreeTour::new().construct(&pool).unwrap();

        assert_eq!(tour.ids(), vec![0, 1, 2, 3]);
        let perimeter = 3.0 + 1.0 + (9.0_f64 + 0.04).sqrt() + 1.2;
        assert!((tour.distance() - perimeter).abs() < 1e-9);
    }

    #[test]
    fn test_square_end_to_end_is_complete() {
        let pool = square();
        let tree = SpanningTreeBuilder::new().build(&pool).unwrap();
        assert_eq!(tree.len(), 3);
        assert!(tree.iter().all(|e| e.distance() == 1.0));

        let tour = SpanningTreeTour::new().construct(&pool).unwrap();
        assert!(tour.is_complete(&pool));
        assert_eq!(tour.ids(), vec![0, 1, 2, 3]);
        assert_eq!(tour.distance(), 4.0);

        // already the optimal perimeter, 2-opt finds nothing to swap
        let mut improved = tour.clone();
        TwoOptSearch::new().optimize(&mut improved).unwrap();
        assert_eq!(improved, tour);
    }

    #[test]
    fn test_nearest_neighbor() {
        let pool = Pool::from_points(vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 5.0, 0.0),
            Point::new(2, 1.0, 0.0),
            Point::new(3, 2.5, 0.0),
        ])
        .unwrap();
        let tour = NearestNeighborHeuristic::new().construct(&pool).unwrap();
        assert_eq!(tour.ids(), vec![0, 2, 3, 1]);
        assert!(matches!(NearestNeighborHeuristic::new().construct(&Pool::new()), Err(Error::EmptyPool)));
    }

    proptest! {
        #[test]
        fn prop_extracted_tour_is_permutation(
            offsets in prop::collection::vec((0.0_f64..5.0, 0.0_f64..5.0), 3..60),
            start in 0_usize..60,
        ) {
            let mut pool = Pool::from_points(offsets.iter().enumerate().map(|(i, &(dx, dy))| {
                let (col, row) = ((i % 8) as f64, (i / 8) as f64);
                Point::new(100 + i as PointId, col * 10.0 + dx, row * 10.0 + dy)
            }))
            .unwrap();
            let start_id = pool.points()[start % pool.len()].id;
            pool.set_start(start_id).unwrap();

            let tour = SpanningTreeTour::new().construct(&pool).unwrap();
            prop_assert!(tour.is_complete(&pool));
            prop_assert_eq!(tour.start().id, start_id);
        }
    }
}
