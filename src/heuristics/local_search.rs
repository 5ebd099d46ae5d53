//! Local search improvement heuristics.
//!
//! This module implements:
//! - 2-opt descent to a local optimum
//! - Simulated annealing with linear cooling
//!
//! 2-opt accepts a reversal when the two new edges are strictly shorter
//! than the two they replace; [`MoveScore::Biased`] scores with the biased
//! metric instead. Annealing always scores with [`Tour::reversal_delta`].
//! Neither moves the start.

use crate::error::Result;
use crate::geometry::distance;
use crate::pool::Pool;
use crate::tour::Tour;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Smallest distance reduction counted as an improvement
pub const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Trait for local search improvement methods
pub trait LocalSearch {
    /// Improve `tour` in place; returns whether it found an improvement.
    fn improve(&self, tour: &mut Tour) -> Result<bool>;
    fn name(&self) -> &str;
}

/// How 2-opt decides whether a reversal improves the tour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveScore {
    /// Plain lengths of the two replaced edges against the two new ones
    #[default]
    FourPoint,
    /// Exact change of the biased tour distance, see [`Tour::reversal_delta`]
    Biased,
}

/// 2-Opt Local Search
///
/// Full first-improvement passes over every segment `[i, k]` with
/// `1 <= i < k <= n - 2`, repeated until a pass makes no swap.
#[derive(Debug, Clone, Default)]
pub struct TwoOptSearch {
    /// Stop after this many passes even if the last one improved
    pub max_passes: Option<usize>,
    pub score: MoveScore,
}

/// Change in plain length when `(a1, a2)` and `(b1, b2)` become `(a1, b1)`
/// and `(a2, b2)`, with `a1, a2 = points[i-1], points[i]` and
/// `b1, b2 = points[k], points[k+1]`.
pub fn four_point_delta(tour: &Tour, i: usize, k: usize) -> f64 {
    let p = tour.points();
    let (a1, a2, b1, b2) = (&p[i - 1], &p[i], &p[k], &p[k + 1]);
    (distance(a1, b1) + distance(a2, b2)) - (distance(a1, a2) + distance(b1, b2))
}

impl TwoOptSearch {
    pub fn new() -> Self {
        TwoOptSearch { max_passes: None, score: MoveScore::FourPoint }
    }

    pub fn with_max_passes(max_passes: usize) -> Self {
        TwoOptSearch { max_passes: Some(max_passes), ..Self::new() }
    }

    /// Score moves with the biased metric instead of plain edge lengths.
    pub fn biased() -> Self {
        TwoOptSearch { score: MoveScore::Biased, ..Self::new() }
    }

    /// Whether reversing `[i, k]` is accepted.
    fn improves(&self, tour: &Tour, i: usize, k: usize) -> bool {
        match self.score {
            // strict comparison on the new edge pair
            MoveScore::FourPoint => four_point_delta(tour, i, k) < 0.0,
            MoveScore::Biased => tour.reversal_delta(i, k) < -IMPROVEMENT_EPSILON,
        }
    }

    /// Run to a local optimum. Returns the number of passes performed,
    /// including the final pass that found nothing.
    pub fn optimize(&self, tour: &mut Tour) -> Result<usize> {
        let n = tour.len();
        if n < 4 {
            return Ok(0);
        }

        let mut passes = 0;
        let mut improved = true;
        while improved && self.max_passes.map_or(true, |max| passes < max) {
            improved = false;
            passes += 1;

            for i in 1..n - 2 {
                for k in i + 1..n - 1 {
                    if self.improves(tour, i, k) {
                        tour.reverse_segment(i, k)?;
                        improved = true;
                    }
                }
            }
            log::debug!("2-opt pass {}: distance {:.2}", passes, tour.distance());
        }

        log::info!("2-opt done after {} passes", passes);
        Ok(passes)
    }
}

impl LocalSearch for TwoOptSearch {
    /// Returns whether any swap was made.
    fn improve(&self, tour: &mut Tour) -> Result<bool> {
        let before = tour.clone();
        self.optimize(tour)?;
        Ok(*tour != before)
    }

    fn name(&self) -> &str {
        "2-Opt"
    }
}

/// Simulated Annealing
///
/// Random segment reversals under a linearly falling temperature, accepted
/// by the Metropolis rule. Runs the whole iteration budget and returns the
/// final state, not the best one seen.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    /// Temperature at iteration 0; it reaches 0 at the last iteration
    pub max_temperature: f64,
    /// Number of proposals
    pub iterations: usize,
    /// Seed used by [`LocalSearch::improve`]
    pub seed: u64,
}

impl SimulatedAnnealing {
    pub const DEFAULT_MAX_TEMPERATURE: f64 = 1500.0;
    pub const DEFAULT_ITERATIONS: usize = 1_000_000;

    pub fn new() -> Self {
        SimulatedAnnealing {
            max_temperature: Self::DEFAULT_MAX_TEMPERATURE,
            iterations: Self::DEFAULT_ITERATIONS,
            seed: 42,
        }
    }

    pub fn with_params(max_temperature: f64, iterations: usize) -> Self {
        SimulatedAnnealing {
            max_temperature,
            iterations,
            seed: 42,
        }
    }

    /// Temperature at 1-based iteration `i`
    pub fn temperature(&self, i: usize) -> f64 {
        self.max_temperature * (1.0 - i as f64 / self.iterations as f64)
    }

    /// Anneal the pool's points, starting from insertion order.
    pub fn run<R: Rng>(&self, pool: &Pool, rng: &mut R) -> Result<Tour> {
        let initial = Tour::from_pool(pool)?;
        self.anneal(&initial, rng)
    }

    pub fn anneal<R: Rng>(&self, initial: &Tour, rng: &mut R) -> Result<Tour> {
        self.anneal_with_progress(initial, rng, |_, _| {})
    }

    /// Anneal a copy of `initial`. `progress(iteration, distance)` is called
    /// every thousandth of the budget.
    pub fn anneal_with_progress<R, F>(&self, initial: &Tour, rng: &mut R, mut progress: F) -> Result<Tour>
    where
        R: Rng,
        F: FnMut(usize, f64),
    {
        let mut current = initial.clone();
        let n = current.len();
        if n < 3 || self.iterations == 0 {
            return Ok(current);
        }

        // cut points are drawn on the cycle written out with the start
        // repeated at the end, whose last position is fixed
        let closed = n + 1;
        let tick = (self.iterations / 1000).max(1);
        let mut accepted = 0usize;

        for step in 1..=self.iterations {
            let temperature = self.temperature(step);

            let cut = rng.gen_range(0..closed - 2);
            let span = rng.gen_range(0..closed - 2 - cut);
            let (i, k) = (cut + 1, cut + 1 + span);

            let delta = current.reversal_delta(i, k);
            let accept = delta < 0.0 || (-delta / temperature).exp() > rng.gen::<f64>();
            if accept {
                current.reverse_span(i, k)?;
                accepted += 1;
            }

            if step % tick == 0 {
                progress(step, current.distance());
            }
        }

        log::info!(
            "Annealing done: {} of {} moves accepted, distance {:.2}",
            accepted,
            self.iterations,
            current.distance()
        );
        Ok(current)
    }
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for SimulatedAnnealing {
    fn improve(&self, tour: &mut Tour) -> Result<bool> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let before = tour.distance();
        *tour = self.anneal(tour, &mut rng)?;
        Ok(tour.distance() < before - IMPROVEMENT_EPSILON)
    }

    fn name(&self) -> &str {
        "SimulatedAnnealing"
    }
}
