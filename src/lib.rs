//! MST-TSP Solver Library
//!
//! Approximate tours for the Euclidean Travelling Salesman Problem.
//!
//! # Features
//!
//! - Delaunay-restricted minimum spanning tree (Kruskal)
//! - Tour extraction by walking around the tree
//! - Nearest neighbour construction
//! - 2-opt local search and simulated annealing
//! - CSV ingestion and tour export, SVG/PNG rendering, benchmarking
//!
//! Tours are scored with a biased metric: every tenth step costs 10% more
//! unless it leaves a point whose id is prime.
//!
//! # Example
//!
//! ```no_run
//! use mst_tsp_solver::heuristics::construction::{ConstructionHeuristic, SpanningTreeTour};
//! use mst_tsp_solver::heuristics::local_search::TwoOptSearch;
//! use mst_tsp_solver::io::read_pool;
//!
//! # fn main() -> mst_tsp_solver::Result<()> {
//! let pool = read_pool("cities.csv")?;
//!
//! let mut tour = SpanningTreeTour::new().construct(&pool)?;
//! TwoOptSearch::new().optimize(&mut tour)?;
//!
//! println!("Tour distance: {:.2}", tour.distance());
//! # Ok(())
//! # }
//! ```

pub mod benchmark;
pub mod error;
pub mod geometry;
pub mod heuristics;
pub mod io;
pub mod pool;
pub mod solution;
pub mod solver;
pub mod tour;
pub mod triangulation;
pub mod visualization;

pub use error::{Error, Result};
pub use geometry::{Edge, Point, PointId};
pub use pool::Pool;
pub use solution::Solution;
pub use solver::{solve, Algorithm, SolverConfig};
pub use tour::Tour;
