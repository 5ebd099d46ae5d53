//! Benchmarking module: run every pipeline on a pool and compare them.
//!
//! Deterministic pipelines run once; simulated annealing runs once per seed.

use crate::error::Result;
use crate::heuristics::local_search::SimulatedAnnealing;
use crate::pool::Pool;
use crate::solution::Solution;
use crate::solver::{solve, Algorithm, SolverConfig};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Result of running a single algorithm once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Algorithm name
    pub algorithm: String,
    /// Number of points in the pool
    pub points: usize,
    /// Closed-tour distance
    pub distance: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Number of iterations or passes (if applicable)
    pub iterations: Option<usize>,
    /// Annealing seed (stochastic runs only)
    pub seed: Option<u64>,
}

impl AlgorithmResult {
    fn from_solution(solution: &Solution, points: usize, seed: Option<u64>) -> Self {
        AlgorithmResult {
            algorithm: solution.algorithm.clone(),
            points,
            distance: solution.distance,
            time: solution.computation_time,
            iterations: solution.iterations,
            seed,
        }
    }
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    pub runs: usize,
    pub avg_distance: f64,
    pub best_distance: f64,
    pub worst_distance: f64,
    pub std_distance: f64,
    pub avg_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of annealing runs, one seed each
    pub runs: usize,
    /// Seed of the first run; run `r` uses `seed + r`
    pub seed: u64,
    /// Annealing iterations per run
    pub iterations: usize,
    /// Annealing starting temperature
    pub max_temperature: f64,
    /// Output directory
    pub output_dir: String,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            runs: 5,
            seed: 0,
            iterations: SimulatedAnnealing::DEFAULT_ITERATIONS,
            max_temperature: SimulatedAnnealing::DEFAULT_MAX_TEMPERATURE,
            output_dir: "results".to_string(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run every algorithm on the pool and record the results
    pub fn run(&mut self, pool: &Pool) -> Result<()> {
        log::info!("Running benchmark on {} points", pool.len());

        for algorithm in Algorithm::ALL {
            if algorithm.is_stochastic() {
                for run in 0..self.config.runs {
                    let seed = self.config.seed.wrapping_add(run as u64);
                    let config = SolverConfig {
                        seed: Some(seed),
                        iterations: self.config.iterations,
                        max_temperature: self.config.max_temperature,
                    };
                    let solution = solve(pool, algorithm, &config)?;
                    self.results.push(AlgorithmResult::from_solution(&solution, pool.len(), Some(seed)));
                }
            } else {
                let solution = solve(pool, algorithm, &SolverConfig::default())?;
                self.results.push(AlgorithmResult::from_solution(&solution, pool.len(), None));
            }
        }
        Ok(())
    }

    /// Compute statistics for each algorithm, best average first
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut stats_map: HashMap<&str, Vec<&AlgorithmResult>> = HashMap::new();
        for result in &self.results {
            stats_map.entry(result.algorithm.as_str()).or_default().push(result);
        }

        let mut statistics: Vec<AlgorithmStatistics> = stats_map
            .into_iter()
            .map(|(algo, results)| {
                let distances: Vec<f64> = results.iter().map(|r| r.distance).collect();
                let count = distances.len() as f64;

                let avg_distance = distances.iter().sum::<f64>() / count;
                let best_distance = distances.iter().cloned().fold(f64::INFINITY, f64::min);
                let worst_distance = distances.iter().cloned().fold(0.0, f64::max);
                let variance = distances.iter().map(|d| (d - avg_distance).powi(2)).sum::<f64>() / count;

                AlgorithmStatistics {
                    algorithm: algo.to_string(),
                    runs: results.len(),
                    avg_distance,
                    best_distance,
                    worst_distance,
                    std_distance: variance.sqrt(),
                    avg_time: results.iter().map(|r| r.time).sum::<f64>() / count,
                }
            })
            .collect();

        statistics.sort_by_key(|s| OrderedFloat(s.avg_distance));
        statistics
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        log::info!("Benchmark results written to {:?}", path.as_ref());
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("          TSP Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str("Algorithm Performance Summary:\n");
        report.push_str("-".repeat(86).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<26} {:>6} {:>12} {:>12} {:>12} {:>12}\n",
            "Algorithm", "Runs", "Avg Dist", "Best Dist", "Worst Dist", "Avg Time"
        ));
        report.push_str("-".repeat(86).as_str());
        report.push('\n');

        for stat in &self.compute_statistics() {
            report.push_str(&format!(
                "{:<26} {:>6} {:>12.2} {:>12.2} {:>12.2} {:>12.4}\n",
                stat.algorithm, stat.runs, stat.avg_distance, stat.best_distance, stat.worst_distance, stat.avg_time
            ));
        }

        report.push_str("-".repeat(86).as_str());
        report.push('\n');

        if let Some(best) = self.results.iter().min_by_key(|r| OrderedFloat(r.distance)) {
            report.push_str(&format!("\nBest tour: {:.2} ({})\n", best.distance, best.algorithm));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, PointId};

    fn small_benchmark() -> Benchmark {
        Benchmark::new(BenchmarkConfig {
            runs: 3,
            seed: 11,
            iterations: 2_000,
            max_temperature: 5.0,
            output_dir: "results".to_string(),
        })
    }

    fn pool() -> Pool {
        Pool::from_points((0..15).map(|i| {
            let angle = (i * 4 % 15) as f64 / 15.0 * std::f64::consts::TAU;
            Point::new(i as PointId, 100.0 + 40.0 * angle.cos(), 100.0 + 25.0 * angle.sin())
        }))
        .unwrap()
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.runs, 5);
        assert_eq!(config.iterations, 1_000_000);
    }

    #[test]
    fn test_run_records_every_algorithm() {
        let mut bench = small_benchmark();
        bench.run(&pool()).unwrap();

        // four deterministic pipelines plus one result per annealing seed
        assert_eq!(bench.results().len(), 4 + 3);
        let seeds: Vec<_> = bench.results().iter().filter_map(|r| r.seed).collect();
        assert_eq!(seeds, vec![11, 12, 13]);
        assert!(bench.results().iter().all(|r| r.points == 15));
    }

    #[test]
    fn test_statistics_sorted_by_average() {
        let mut bench = small_benchmark();
        bench.run(&pool()).unwrap();
        let stats = bench.compute_statistics();

        assert_eq!(stats.len(), Algorithm::ALL.len());
        assert!(stats.windows(2).all(|w| w[0].avg_distance <= w[1].avg_distance));
        let annealing = stats.iter().find(|s| s.algorithm == Algorithm::Annealing.name()).unwrap();
        assert_eq!(annealing.runs, 3);
        assert!(annealing.best_distance <= annealing.avg_distance);
        assert!(annealing.avg_distance <= annealing.worst_distance);
    }

    #[test]
    fn test_report_lists_algorithms() {
        let mut bench = small_benchmark();
        bench.run(&pool()).unwrap();
        let report = bench.generate_report();
        for algorithm in Algorithm::ALL {
            assert!(report.contains(algorithm.name()));
        }
        assert!(report.contains("Best tour:"));
    }
}
