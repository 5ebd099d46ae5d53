//! Tour heuristics.
//!
//! Spanning-tree and nearest-neighbour construction, plus the 2-opt and
//! simulated annealing improvers.

pub mod construction;
pub mod local_search;
pub mod spanning_tree;

pub use construction::*;
pub use local_search::*;
pub use spanning_tree::*;
