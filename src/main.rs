//! MST-TSP Solver - Command Line Interface
//!
//! Builds Euclidean TSP tours from a CSV of `id,x,y` points.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use mst_tsp_solver::benchmark::{Benchmark, BenchmarkConfig};
use mst_tsp_solver::heuristics::construction::extract_tour;
use mst_tsp_solver::heuristics::local_search::SimulatedAnnealing;
use mst_tsp_solver::heuristics::spanning_tree::SpanningTreeBuilder;
use mst_tsp_solver::io::{read_pool, write_summary, write_tour, TourFormat};
use mst_tsp_solver::solver::{solve_with_progress, Algorithm, SolverConfig};
use mst_tsp_solver::visualization::Visualizer;
use mst_tsp_solver::{Edge, Result};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mst-tsp-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Euclidean TSP tours from a Delaunay minimum spanning tree")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a tour for a point file
    Solve {
        /// CSV file of id,x,y records
        #[arg(short, long)]
        input: PathBuf,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "mst-two-opt")]
        algorithm: AlgorithmArg,

        /// Write the tour to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tour file layout
        #[arg(short, long, value_enum, default_value = "ids")]
        format: FormatArg,

        /// Annealing seed (defaults to the clock)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Annealing iterations
        #[arg(long, default_value_t = SimulatedAnnealing::DEFAULT_ITERATIONS)]
        iterations: usize,

        /// Annealing starting temperature
        #[arg(long, default_value_t = SimulatedAnnealing::DEFAULT_MAX_TEMPERATURE)]
        max_temperature: f64,

        /// Directory for tour images
        #[arg(long)]
        visualize: Option<PathBuf>,

        /// Write a JSON summary of the solution
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Triangulation and spanning tree statistics for a point file
    Inspect {
        /// CSV file of id,x,y records
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for triangulation and spanning tree images
        #[arg(long)]
        visualize: Option<PathBuf>,
    },

    /// Compare every algorithm on a point file
    Compare {
        /// CSV file of id,x,y records
        #[arg(short, long)]
        input: PathBuf,

        /// Number of annealing runs
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Seed of the first annealing run
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Annealing iterations per run
        #[arg(long, default_value_t = SimulatedAnnealing::DEFAULT_ITERATIONS)]
        iterations: usize,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum AlgorithmArg {
    /// Spanning tree walk
    Mst,
    /// Spanning tree walk + 2-opt
    MstTwoOpt,
    /// Nearest Neighbor construction
    Nn,
    /// Nearest Neighbor + 2-opt
    NnTwoOpt,
    /// Simulated Annealing
    Sa,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Mst => Algorithm::Mst,
            AlgorithmArg::MstTwoOpt => Algorithm::MstTwoOpt,
            AlgorithmArg::Nn => Algorithm::Nearest,
            AlgorithmArg::NnTwoOpt => Algorithm::NearestTwoOpt,
            AlgorithmArg::Sa => Algorithm::Annealing,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum FormatArg {
    /// One id per line
    Ids,
    /// id,x,y per line
    Coordinates,
}

impl From<FormatArg> for TourFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Ids => TourFormat::Ids,
            FormatArg::Coordinates => TourFormat::Coordinates,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Solve { input, algorithm, output, format, seed, iterations, max_temperature, visualize, summary } => {
            let config = SolverConfig { seed, iterations, max_temperature };
            solve_points(&input, algorithm.into(), &config, output, format.into(), visualize, summary)
        }

        Commands::Inspect { input, visualize } => inspect_points(&input, visualize),

        Commands::Compare { input, runs, seed, iterations, output } => {
            let config = BenchmarkConfig {
                runs,
                seed,
                iterations,
                output_dir: output.to_string_lossy().to_string(),
                ..Default::default()
            };
            compare_algorithms(&input, config)
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn solve_points(
    path: &Path,
    algorithm: Algorithm,
    config: &SolverConfig,
    output: Option<PathBuf>,
    format: TourFormat,
    visualize: Option<PathBuf>,
    summary: Option<PathBuf>,
) -> Result<()> {
    println!("Loading points from {:?}...", path);
    let pool = read_pool(path)?;

    println!("Solving {} points with {}...", pool.len(), algorithm);
    let solution = if algorithm.is_stochastic() {
        let bar = ProgressBar::new(config.iterations as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        let solution = solve_with_progress(&pool, algorithm, config, |step, distance| {
            bar.set_position(step as u64);
            bar.set_message(format!("dist {:.2}", distance));
        });
        bar.finish_and_clear();
        solution?
    } else {
        solve_with_progress(&pool, algorithm, config, |_, _| {})?
    };

    println!("\n========== Results ==========");
    print!("{}", solution);

    if let Some(out_path) = output {
        write_tour(&out_path, &solution.tour, format)?;
        println!("\nTour saved to {:?}", out_path);
    }

    if let Some(summary_path) = summary {
        write_summary(&summary_path, &solution)?;
        println!("Summary saved to {:?}", summary_path);
    }

    if let Some(dir) = visualize {
        std::fs::create_dir_all(&dir)?;
        let viz = Visualizer::new();
        save_image(&viz, &viz.tour_svg(&solution.tour), &dir.join("path.png"))?;
    }

    Ok(())
}

fn inspect_points(path: &Path, visualize: Option<PathBuf>) -> Result<()> {
    let pool = read_pool(path)?;
    let (triangulation, tree) = SpanningTreeBuilder::new().build_with_triangulation(&pool)?;
    let tour = extract_tour(&pool, &tree)?;

    let tree_length: f64 = tree.iter().map(Edge::distance).sum();

    println!("========== Point Set Analysis ==========\n");
    println!("Points: {}", pool.len());
    println!("Start: {}", pool.start()?.id);
    println!("Triangles: {}", triangulation.num_triangles());
    println!("Triangulation edges: {}", triangulation.edges().len());
    println!("\nSpanning Tree:");
    println!("  Edges: {}", tree.len());
    println!("  Total length: {:.2}", tree_length);
    println!("\nTree Walk Tour:");
    println!("  Distance: {:.2}", tour.distance());
    println!("  Ratio to tree length: {:.3}", tour.distance() / tree_length.max(f64::EPSILON));

    if let Some(dir) = visualize {
        std::fs::create_dir_all(&dir)?;
        let viz = Visualizer::new();
        save_image(&viz, &viz.triangulation_svg(pool.points(), &triangulation), &dir.join("triangle.png"))?;
        save_image(&viz, &viz.edges_svg(&tree), &dir.join("tree.png"))?;
    }

    Ok(())
}

fn compare_algorithms(path: &Path, config: BenchmarkConfig) -> Result<()> {
    let pool = read_pool(path)?;
    println!("Comparing algorithms on {} points ({} annealing runs)...\n", pool.len(), config.runs);

    let output = PathBuf::from(&config.output_dir);
    std::fs::create_dir_all(&output)?;

    let mut benchmark = Benchmark::new(config);
    benchmark.run(&pool)?;

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("Results exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}

/// Save as PNG, falling back to SVG when rasterisation fails.
fn save_image(viz: &Visualizer, svg: &str, png_path: &Path) -> Result<()> {
    match viz.save_png(svg, png_path) {
        Ok(()) => println!("Visualization saved to {:?}", png_path),
        Err(e) => {
            let svg_path = png_path.with_extension("svg");
            viz.save_svg(svg, &svg_path)?;
            println!("PNG conversion failed ({}). Saved SVG to {:?}", e, svg_path);
        }
    }
    Ok(())
}
