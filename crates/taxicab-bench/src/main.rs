//! taxicab-bench: compare the nearest-source assignment strategies.
//!
//! Generates one set of random sources per run, assigns the grid with both
//! the spatial index and brute force, and reports per-strategy timings
//! together with how many cells the two results disagree on. Disagreement
//! is only legitimate on tie cells, where several sources share the
//! minimum distance, so the tool fails if any other cell differs.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin taxicab-bench -- [OPTIONS]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use taxicab_voronoi::diagnostics::Clock;
use taxicab_voronoi::{
    Assigner, AssignerKind, AssignmentGrid, SourcePoint, VoronoiConfig, VoronoiError,
    count_disagreements, generate_sources, tie_cells,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Timing and agreement check for the two assignment strategies.
///
/// Each run draws fresh sources from `seed + run`, so a given seed always
/// replays the same sequence of grids.
#[derive(Parser)]
#[command(name = "taxicab-bench", version)]
struct Cli {
    /// Grid side length in cells.
    #[arg(long, default_value_t = VoronoiConfig::DEFAULT_SIZE)]
    size: u32,

    /// Number of random source points.
    #[arg(long, default_value_t = VoronoiConfig::DEFAULT_NUM_POINTS)]
    points: u32,

    /// Base seed for source placement.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output results as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

/// One strategy's timing within a run.
#[derive(Debug, Clone, Serialize)]
struct StrategyTiming {
    strategy: AssignerKind,
    duration_ms: f64,
}

/// Results of a single comparison run.
#[derive(Debug, Clone, Serialize)]
struct RunComparison {
    seed: u64,
    size: u32,
    source_count: usize,
    timings: [StrategyTiming; 2],
    disagreements: usize,
    tie_cells: usize,
}

impl RunComparison {
    /// Whether every disagreement falls on a tie cell.
    const fn is_consistent(&self) -> bool {
        self.disagreements <= self.tie_cells
    }

    fn report(&self) -> String {
        let mut out = format!(
            "Seed {}: {}x{} grid, {} sources\n",
            self.seed, self.size, self.size, self.source_count,
        );
        for timing in &self.timings {
            out.push_str(&format!(
                "  {:<16} {:>10.3}ms\n",
                timing.strategy.name(),
                timing.duration_ms,
            ));
        }
        out.push_str(&format!(
            "  disagreements: {} (tie cells: {})",
            self.disagreements, self.tie_cells,
        ));
        out
    }
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn timed_assign<C: Clock>(
    kind: AssignerKind,
    size: u32,
    sources: &[SourcePoint],
    clock: &C,
) -> Result<(AssignmentGrid, StrategyTiming), VoronoiError> {
    let start = clock.now();
    let assignment = kind.assign(size, sources)?;
    let timing = StrategyTiming {
        strategy: kind,
        duration_ms: duration_ms(clock.elapsed(&start)),
    };
    Ok((assignment, timing))
}

/// Run both strategies over the same random sources.
fn compare<C: Clock>(
    size: u32,
    points: u32,
    seed: u64,
    clock: &C,
) -> Result<RunComparison, VoronoiError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let sources = generate_sources(size, points, &mut rng)?;

    let (indexed, indexed_timing) = timed_assign(AssignerKind::Indexed, size, &sources, clock)?;
    let (brute, brute_timing) = timed_assign(AssignerKind::BruteForce, size, &sources, clock)?;

    // Both grids come from the same size, so the comparison always succeeds.
    let disagreements = count_disagreements(&indexed, &brute).unwrap_or(usize::MAX);

    Ok(RunComparison {
        seed,
        size,
        source_count: sources.len(),
        timings: [indexed_timing, brute_timing],
        disagreements,
        tie_cells: tie_cells(size, &sources).len(),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    eprintln!("Grid: {0}x{0}, {1} sources", cli.size, cli.points);
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut comparisons = Vec::with_capacity(cli.runs);
    for run in 0..cli.runs {
        let seed = cli.seed.wrapping_add(u64::try_from(run).unwrap_or_default());
        match compare(cli.size, cli.points, seed, &StdClock) {
            Ok(comparison) => {
                if !cli.json {
                    println!("{}", comparison.report());
                }
                comparisons.push(comparison);
            }
            Err(e) => {
                eprintln!("Voronoi error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if cli.json {
        match serde_json::to_string_pretty(&comparisons) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing results: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else if cli.runs > 1 {
        print_multi_run_summary(&comparisons);
    }

    let inconsistent: Vec<u64> = comparisons
        .iter()
        .filter(|c| !c.is_consistent())
        .map(|c| c.seed)
        .collect();
    if !inconsistent.is_empty() {
        eprintln!("Strategies disagree off tie cells for seeds {inconsistent:?}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Print per-strategy min/mean/max across runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(comparisons: &[RunComparison]) {
    println!();
    println!(
        "Summary ({} runs)\n{}",
        comparisons.len(),
        "=".repeat(60),
    );

    if comparisons.is_empty() {
        println!("Warning: no runs to summarize");
        return;
    }

    println!(
        "{:<16} {:>12} {:>12} {:>12}",
        "Strategy", "Min (ms)", "Mean (ms)", "Max (ms)"
    );
    println!("{}", "-".repeat(56));

    for (slot, kind) in [AssignerKind::Indexed, AssignerKind::BruteForce]
        .into_iter()
        .enumerate()
    {
        let durations: Vec<f64> = comparisons
            .iter()
            .map(|c| c.timings[slot].duration_ms)
            .collect();
        let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
        let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
        let mean = durations.iter().sum::<f64>() / durations.len() as f64;
        println!(
            "{:<16} {min:>10.3}ms {mean:>10.3}ms {max:>10.3}ms",
            kind.name()
        );
    }

    let disagreements: usize = comparisons.iter().map(|c| c.disagreements).sum();
    let ties: usize = comparisons.iter().map(|c| c.tie_cells).sum();
    println!();
    println!("Disagreements: {disagreements} over {ties} tie cells");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Advances one millisecond per reading.
    struct TickClock(Cell<u64>);

    impl Clock for TickClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let t = self.0.get();
            self.0.set(t + 1);
            t
        }

        fn elapsed(&self, since: &u64) -> Duration {
            Duration::from_millis(self.now() - since)
        }
    }

    #[test]
    fn comparison_is_consistent() {
        let clock = TickClock(Cell::new(0));
        let comparison = compare(40, 6, 7, &clock).unwrap();
        assert_eq!(comparison.source_count, 6);
        assert!(comparison.is_consistent());
        assert_eq!(comparison.timings[0].strategy, AssignerKind::Indexed);
        assert_eq!(comparison.timings[1].strategy, AssignerKind::BruteForce);
        assert!((comparison.timings[0].duration_ms - 1.0).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_comparison() {
        let clock = TickClock(Cell::new(0));
        let a = compare(30, 5, 3, &clock).unwrap();
        let b = compare(30, 5, 3, &clock).unwrap();
        assert_eq!(a.disagreements, b.disagreements);
        assert_eq!(a.tie_cells, b.tie_cells);
    }

    #[test]
    fn invalid_grid_is_an_error() {
        let clock = TickClock(Cell::new(0));
        assert!(matches!(
            compare(0, 5, 3, &clock),
            Err(VoronoiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn report_names_both_strategies() {
        let clock = TickClock(Cell::new(0));
        let report = compare(10, 2, 1, &clock).unwrap().report();
        assert!(report.contains("spatial index"));
        assert!(report.contains("brute force"));
        assert!(report.contains("disagreements"));
    }

    #[test]
    fn json_output_is_an_array_of_runs() {
        let clock = TickClock(Cell::new(0));
        let runs = vec![compare(10, 2, 1, &clock).unwrap()];
        let json = serde_json::to_value(&runs).unwrap();
        assert_eq!(json[0]["timings"][0]["strategy"], "Indexed");
        assert_eq!(json[0]["size"], 10);
    }
}
