//! Solution record: a finished tour plus how it was obtained.

use crate::pool::Pool;
use crate::tour::Tour;
use serde::Serialize;

/// Represents a solved tour
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    /// The tour, start first; the closing edge back to the start is implicit
    pub tour: Tour,
    /// Closed-tour length under the biased metric
    pub distance: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Optimizer iterations or passes (if applicable)
    pub iterations: Option<usize>,
}

impl Solution {
    /// Create a solution from a tour
    pub fn from_tour(tour: Tour, algorithm: &str) -> Self {
        let distance = tour.distance();
        Solution {
            tour,
            distance,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Check if all pool points are visited exactly once
    pub fn is_complete(&self, pool: &Pool) -> bool {
        self.tour.is_complete(pool)
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Points: {}", self.tour.len())?;
        writeln!(f, "  Distance: {:.2}", self.distance)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        Ok(())
    }
}
