//! Benchmark of sequential against parallel line encoding
//!
//! Builds hint sets from generated pictures, then encodes and solves each one
//! with both encoding modes on the in-process CaDiCaL backend.

use anyhow::{Context, Result};
use picross_sat::{
    config::{Settings, SolverBackend},
    puzzle::{lines::line_runs, Grid, Hint, Puzzle, Puzzle2D},
    solve::PicrossProblem,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct BenchmarkResult {
    label: String,
    parallel: bool,
    encode_times: Vec<Duration>,
    total_times: Vec<Duration>,
    clauses: usize,
    success: bool,
}

impl BenchmarkResult {
    fn new(label: &str, parallel: bool) -> Self {
        Self {
            label: label.to_string(),
            parallel,
            encode_times: Vec::new(),
            total_times: Vec::new(),
            clauses: 0,
            success: true,
        }
    }

    fn average(times: &[Duration]) -> Duration {
        if times.is_empty() {
            return Duration::ZERO;
        }
        times.iter().sum::<Duration>() / times.len() as u32
    }

    fn format_time(duration: Duration) -> String {
        format!("{:.3}s", duration.as_secs_f64())
    }

    fn display(&self) -> String {
        format!(
            "  {} ({}):\n    Encode avg: {} | Total avg: {} | Clauses: {} | Success: {}",
            self.label,
            if self.parallel { "parallel" } else { "sequential" },
            Self::format_time(Self::average(&self.encode_times)),
            Self::format_time(Self::average(&self.total_times)),
            self.clauses,
            if self.success { "✅" } else { "❌" }
        )
    }
}

/// Concentric rings, dense enough to give every line several blocks
fn rings(size: usize) -> Result<Grid> {
    let centre = (size as f64 - 1.0) / 2.0;
    let cells = (0..size)
        .map(|r| {
            (0..size)
                .map(|c| {
                    let d = ((r as f64 - centre).powi(2) + (c as f64 - centre).powi(2)).sqrt();
                    (d as usize) % 3 != 0
                })
                .collect()
        })
        .collect();
    Grid::from_cells(cells)
}

/// Diagonal stripes, loose hints with many placements per line
fn stripes(size: usize) -> Result<Grid> {
    let cells = (0..size)
        .map(|r| (0..size).map(|c| (r + 2 * c) % 5 == 0).collect())
        .collect();
    Grid::from_cells(cells)
}

fn hints_for(grid: &Grid) -> Result<Puzzle> {
    let to_hint = |line: Vec<bool>| Hint::new(line_runs(&line)).map_err(anyhow::Error::msg);
    let rows = (0..grid.height).map(|r| to_hint(grid.row(r))).collect::<Result<Vec<_>>>()?;
    let cols = (0..grid.width).map(|c| to_hint(grid.column(c))).collect::<Result<Vec<_>>>()?;
    Ok(Puzzle::TwoD(Puzzle2D::new(rows, cols)))
}

fn run_single(puzzle: &Puzzle, parallel: bool) -> Result<(Duration, Duration, usize)> {
    let mut settings = Settings::default();
    settings.solver.backend = SolverBackend::Cadical;
    settings.encoding.parallel = parallel;

    let start_time = Instant::now();
    let mut problem = PicrossProblem::with_puzzle(settings, puzzle.clone()).context("Failed to create problem")?;
    let outcome = problem.solve().context("Failed to solve problem")?;
    let total = start_time.elapsed();

    if outcome.is_unsatisfiable() {
        anyhow::bail!("generated hints must be satisfiable");
    }
    let stats = problem.encoding_statistics();
    Ok((stats.encode_time, total, stats.total_clauses))
}

fn main() -> Result<()> {
    let runs_per_config = 3;
    let cases = vec![("rings 30x30", rings(30)?), ("stripes 40x40", stripes(40)?)];

    println!("🚀 Starting Encoding Benchmark ({} runs per config)\n", runs_per_config);

    let mut results = Vec::new();
    for (label, grid) in &cases {
        let puzzle = hints_for(grid)?;
        for parallel in [false, true] {
            println!("🔄 Testing {} ({})...", label, if parallel { "parallel" } else { "sequential" });
            let mut result = BenchmarkResult::new(label, parallel);

            for run in 1..=runs_per_config {
                match run_single(&puzzle, parallel) {
                    Ok((encode, total, clauses)) => {
                        println!("  Run {}/{}: ✅ {}", run, runs_per_config, BenchmarkResult::format_time(total));
                        result.encode_times.push(encode);
                        result.total_times.push(total);
                        result.clauses = clauses;
                    }
                    Err(e) => {
                        println!("  Run {}/{}: ❌ Failed: {}", run, runs_per_config, e);
                        result.success = false;
                    }
                }
            }
            results.push(result);
            println!();
        }
    }

    println!("═══════════════════════════════════════════════════════════");
    println!("📊 ENCODING BENCHMARK RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    for result in &results {
        println!("{}", result.display());
    }

    println!();
    for pair in results.chunks(2) {
        if let [sequential, parallel] = pair {
            let seq = BenchmarkResult::average(&sequential.encode_times).as_secs_f64();
            let par = BenchmarkResult::average(&parallel.encode_times).as_secs_f64();
            if par > 0.0 {
                println!("🧵 {}: encoding speedup {:.2}x", sequential.label, seq / par);
            }
        }
    }

    Ok(())
}
