//! Shared types for the taxicab Voronoi core.

use serde::{Deserialize, Serialize};

use crate::assign::AssignerKind;
use crate::grid::{AssignmentGrid, MarkerGrid};

/// Largest accepted grid side length.
///
/// Bounds a run to `2^24` cells, so each per-cell buffer (region indices,
/// color levels) stays at 128 MiB. Squared L1 distances in the spatial
/// index stay far inside `i64`.
pub const MAX_GRID_SIZE: u32 = 1 << 12;

/// A source (seed) point on the grid.
///
/// Sources are identified by their position in the generated sequence,
/// not by their coordinates: two sources may share a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePoint {
    /// Row index (`0 <= row < size`).
    pub row: u32,
    /// Column index (`0 <= col < size`).
    pub col: u32,
}

impl SourcePoint {
    /// Create a new source point.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Manhattan (L1) distance from this source to the cell `(row, col)`.
    #[must_use]
    pub fn manhattan_distance(self, row: u32, col: u32) -> u64 {
        u64::from(self.row.abs_diff(row)) + u64::from(self.col.abs_diff(col))
    }

    /// Returns `true` if the point lies inside a `size × size` grid.
    #[must_use]
    pub const fn is_within(self, size: u32) -> bool {
        self.row < size && self.col < size
    }
}

impl From<(u32, u32)> for SourcePoint {
    fn from((row, col): (u32, u32)) -> Self {
        Self::new(row, col)
    }
}

/// Configuration for a random Voronoi run.
///
/// Defaults match the classic demo: a 200×200 grid with 20 sources,
/// assigned through the spatial index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoronoiConfig {
    /// Grid side length in cells.
    pub size: u32,

    /// Number of random sources to generate.
    pub num_points: u32,

    /// Which nearest-source strategy to run.
    pub strategy: AssignerKind,
}

impl VoronoiConfig {
    /// Default grid side length.
    pub const DEFAULT_SIZE: u32 = 200;

    /// Default number of sources.
    pub const DEFAULT_NUM_POINTS: u32 = 20;

    /// Default assignment strategy.
    pub const DEFAULT_STRATEGY: AssignerKind = AssignerKind::Indexed;

    /// Build a config from the `use_kd` flag of the classic entry point.
    #[must_use]
    pub const fn new(size: u32, num_points: u32, use_kd: bool) -> Self {
        Self {
            size,
            num_points,
            strategy: AssignerKind::from_use_kd(use_kd),
        }
    }

    /// Check that the grid size and source count are usable.
    ///
    /// # Errors
    ///
    /// Returns [`VoronoiError::InvalidArgument`] if `size` or `num_points`
    /// is zero, or `size` exceeds [`MAX_GRID_SIZE`].
    pub fn validate(&self) -> Result<(), VoronoiError> {
        validate_size(self.size)?;
        if self.num_points == 0 {
            return Err(VoronoiError::InvalidArgument(
                "number of source points must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            num_points: Self::DEFAULT_NUM_POINTS,
            strategy: Self::DEFAULT_STRATEGY,
        }
    }
}

/// Reject grid sizes the core cannot handle.
pub(crate) fn validate_size(size: u32) -> Result<(), VoronoiError> {
    if size == 0 {
        return Err(VoronoiError::InvalidArgument(
            "grid size must be positive".to_string(),
        ));
    }
    if size > MAX_GRID_SIZE {
        return Err(VoronoiError::InvalidArgument(format!(
            "grid size {size} exceeds the maximum of {MAX_GRID_SIZE}"
        )));
    }
    Ok(())
}

/// Output of a complete run: the sources and both grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoronoiResult {
    /// Strategy that produced `assignment`.
    pub strategy: AssignerKind,
    /// Sources in generation order; the position is the region id.
    pub sources: Vec<SourcePoint>,
    /// `255` at every source cell, `0` elsewhere.
    pub markers: MarkerGrid,
    /// Nearest-source region for every cell.
    pub assignment: AssignmentGrid,
}

impl VoronoiResult {
    /// Grid side length.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.assignment.size()
    }
}

/// Errors raised by generation and assignment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoronoiError {
    /// A size, count, or source set was rejected before computing.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The spatial index could not be built over the sources.
    #[error("failed to build spatial index: {0}")]
    IndexBuild(String),

    /// The spatial index returned no neighbour for a cell.
    #[error("nearest-source query failed at ({row}, {col})")]
    Query {
        /// Row of the failing cell.
        row: u32,
        /// Column of the failing cell.
        col: u32,
    },
}
