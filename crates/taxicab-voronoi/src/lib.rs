//! taxicab-voronoi: discrete Manhattan-distance Voronoi diagrams (sans-IO).
//!
//! Assigns every cell of a square grid to its nearest source point under
//! L1 distance:
//! random sources -> marker grid -> nearest-source assignment.
//!
//! Two interchangeable assignment strategies are provided, selected via
//! [`AssignerKind`]: an R\*-tree spatial index (default) and a brute-force
//! scan. They agree everywhere except on cells with equidistant sources.
//!
//! This crate has **no I/O dependencies**: randomness and time are
//! injected, and rendering lives in `taxicab-render`.

pub mod assign;
pub mod brute_force;
pub mod diagnostics;
pub mod generate;
pub mod grid;
pub mod indexed;
pub mod types;

pub use assign::{Assigner, AssignerKind, nearest_sources, tie_cells};
pub use diagnostics::{Clock, RunDiagnostics, random_voronoi_with_diagnostics};
pub use generate::generate_sources;
pub use grid::{AssignmentGrid, COLOR_SCALE_MAX, Grid, MarkerGrid, color_level, count_disagreements};
pub use indexed::SourceIndex;
pub use types::{MAX_GRID_SIZE, SourcePoint, VoronoiConfig, VoronoiError, VoronoiResult};

use rand::Rng;

/// Generate random sources and compute their Voronoi regions.
///
/// # Steps
///
/// 1. Validate `config`
/// 2. Draw `num_points` sources uniformly from the grid
/// 3. Mark source cells
/// 4. Assign every cell to its nearest source (configured strategy)
///
/// # Errors
///
/// Returns [`VoronoiError::InvalidArgument`] if the size or source count
/// is unusable, before any computation starts. Strategy failures are
/// reported as [`VoronoiError::IndexBuild`] or [`VoronoiError::Query`].
pub fn random_voronoi<R: Rng + ?Sized>(
    config: &VoronoiConfig,
    rng: &mut R,
) -> Result<VoronoiResult, VoronoiError> {
    config.validate()?;
    let sources = generate_sources(config.size, config.num_points, rng)?;
    compute(config.size, sources, config.strategy)
}

/// Compute the Voronoi regions of a fixed source set.
///
/// # Errors
///
/// Returns [`VoronoiError::InvalidArgument`] if `size` is unusable,
/// `sources` is empty, or a source lies outside the grid.
pub fn compute(
    size: u32,
    sources: Vec<SourcePoint>,
    strategy: AssignerKind,
) -> Result<VoronoiResult, VoronoiError> {
    let markers = MarkerGrid::new(size, &sources)?;
    let assignment = strategy.assign(size, &sources)?;
    Ok(VoronoiResult {
        strategy,
        sources,
        markers,
        assignment,
    })
}
