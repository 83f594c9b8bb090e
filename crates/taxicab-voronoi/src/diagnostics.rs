//! Run diagnostics: timing and counts for each stage of a Voronoi run.
//!
//! Time is read through the [`Clock`] trait so the core stays free of
//! platform clocks; binaries supply an implementation backed by
//! [`std::time::Instant`].
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assign::{Assigner, AssignerKind};
use crate::grid::{AssignmentGrid, MarkerGrid};
use crate::types::{SourcePoint, VoronoiConfig, VoronoiError, VoronoiResult};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Capture the current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// Source generation.
    pub generate: StageDiagnostics,
    /// Marker grid construction.
    pub mark: StageDiagnostics,
    /// Nearest-source assignment.
    pub assign: StageDiagnostics,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: RunSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Source generation metrics.
    Generate {
        /// Number of sources drawn.
        source_count: usize,
        /// Number of distinct cells the sources landed on.
        distinct_cells: usize,
    },
    /// Marker grid metrics.
    Mark {
        /// Number of marked cells.
        marked_cells: usize,
    },
    /// Assignment metrics.
    Assign {
        /// Strategy that produced the grid.
        strategy: AssignerKind,
        /// Number of cells assigned (`size²`).
        cell_count: usize,
        /// Number of sources that own at least one cell.
        nonempty_regions: usize,
    },
}

/// High-level summary counts for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Grid side length.
    pub size: u32,
    /// Number of cells.
    pub cell_count: usize,
    /// Number of sources.
    pub source_count: usize,
    /// Cells in the smallest region (0 when a source owns no cell).
    pub smallest_region: usize,
    /// Cells in the largest region.
    pub largest_region: usize,
}

impl RunDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Voronoi Run Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Grid: {0}x{0} ({1} cells), {2} sources",
            self.summary.size, self.summary.cell_count, self.summary.source_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Generate", &self.generate),
            ("Mark", &self.mark),
            ("Assign", &self.assign),
        ];
        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Region sizes: smallest {}  |  largest {}",
            self.summary.smallest_region, self.summary.largest_region,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
pub(crate) fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Generate {
            source_count,
            distinct_cells,
        } => format!("{source_count} sources on {distinct_cells} distinct cells"),
        StageMetrics::Mark { marked_cells } => format!("{marked_cells} marked cells"),
        StageMetrics::Assign {
            strategy,
            cell_count,
            nonempty_regions,
        } => format!("{strategy}: {cell_count} cells, {nonempty_regions} non-empty regions"),
    }
}

/// Number of distinct cells occupied by `sources`.
fn distinct_cells(sources: &[SourcePoint]) -> usize {
    sources.iter().collect::<HashSet<_>>().len()
}

fn summarize(assignment: &AssignmentGrid) -> RunSummary {
    let sizes = assignment.region_sizes();
    RunSummary {
        size: assignment.size(),
        cell_count: assignment.regions().cell_count(),
        source_count: assignment.source_count(),
        smallest_region: sizes.iter().copied().min().unwrap_or(0),
        largest_region: sizes.iter().copied().max().unwrap_or(0),
    }
}

/// Run generation and assignment like [`crate::random_voronoi`],
/// timing each stage.
///
/// # Errors
///
/// Same as [`crate::random_voronoi`].
pub fn random_voronoi_with_diagnostics<R, C>(
    config: &VoronoiConfig,
    rng: &mut R,
    clock: &C,
) -> Result<(VoronoiResult, RunDiagnostics), VoronoiError>
where
    R: Rng + ?Sized,
    C: Clock,
{
    config.validate()?;
    let start = clock.now();

    let stage = clock.now();
    let sources = crate::generate::generate_sources(config.size, config.num_points, rng)?;
    let generate_duration = clock.elapsed(&stage);
    let distinct_cells = distinct_cells(&sources);

    let stage = clock.now();
    let markers = MarkerGrid::new(config.size, &sources)?;
    let mark_duration = clock.elapsed(&stage);

    let stage = clock.now();
    let assignment = config.strategy.assign(config.size, &sources)?;
    let assign_duration = clock.elapsed(&stage);

    let total_duration = clock.elapsed(&start);

    let nonempty_regions = assignment
        .region_sizes()
        .iter()
        .filter(|&&n| n > 0)
        .count();
    let diagnostics = RunDiagnostics {
        generate: StageDiagnostics {
            duration: generate_duration,
            metrics: StageMetrics::Generate {
                source_count: sources.len(),
                distinct_cells,
            },
        },
        mark: StageDiagnostics {
            duration: mark_duration,
            metrics: StageMetrics::Mark {
                marked_cells: markers.marked_count(),
            },
        },
        assign: StageDiagnostics {
            duration: assign_duration,
            metrics: StageMetrics::Assign {
                strategy: config.strategy,
                cell_count: assignment.regions().cell_count(),
                nonempty_regions,
            },
        },
        total_duration,
        summary: summarize(&assignment),
    };

    tracing::info!(
        strategy = %config.strategy,
        total_ms = duration_ms(total_duration),
        "run complete"
    );

    Ok((
        VoronoiResult {
            strategy: config.strategy,
            sources,
            markers,
            assignment,
        },
        diagnostics,
    ))
}
