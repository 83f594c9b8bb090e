//! Nearest-source assignment: map every grid cell to its closest source
//! under Manhattan (L1) distance.
//!
//! This module defines the [`Assigner`] trait for pluggable assignment
//! strategies and the [`AssignerKind`] enum for selecting one at runtime.
//!
//! # Strategy pattern
//!
//! Both strategies produce grids of the same shape and value range. They
//! agree on every cell whose nearest source is unique; on cells where two
//! or more sources are equidistant each strategy applies its own
//! tie-break (see the variant docs).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{AssignmentGrid, Grid, validate_sources};
use crate::types::{SourcePoint, VoronoiError};

/// Selects which nearest-source strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssignerKind {
    /// Bulk-load an R\*-tree over the sources once, then issue one L1
    /// nearest-neighbour query per cell.
    ///
    /// Ties go to whichever equidistant source the tree's best-first
    /// search reaches first. That order depends on the tree layout, not
    /// on source index, so it may differ from [`BruteForce`](Self::BruteForce).
    #[default]
    Indexed,

    /// Scan every source for every cell, keeping the first source that
    /// reaches the minimum distance.
    ///
    /// Ties go to the lowest source index. Deterministic.
    BruteForce,
}

impl AssignerKind {
    /// Map the classic `use_kd` flag onto a strategy.
    #[must_use]
    pub const fn from_use_kd(use_kd: bool) -> Self {
        if use_kd { Self::Indexed } else { Self::BruteForce }
    }

    /// Human-readable strategy name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Indexed => "spatial index",
            Self::BruteForce => "brute force",
        }
    }
}

impl fmt::Display for AssignerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for nearest-source assignment strategies.
///
/// Input: grid side length and the source list (index = region id).
/// Output: an [`AssignmentGrid`] with exactly one region per cell.
pub trait Assigner {
    /// Assign every cell of a `size × size` grid to its nearest source.
    ///
    /// # Errors
    ///
    /// Returns [`VoronoiError::InvalidArgument`] if `size` is zero or too
    /// large, `sources` is empty, or a source lies outside the grid.
    /// Strategy-specific failures are reported as
    /// [`VoronoiError::IndexBuild`] or [`VoronoiError::Query`].
    fn assign(&self, size: u32, sources: &[SourcePoint]) -> Result<AssignmentGrid, VoronoiError>;
}

impl Assigner for AssignerKind {
    fn assign(&self, size: u32, sources: &[SourcePoint]) -> Result<AssignmentGrid, VoronoiError> {
        validate_sources(size, sources)?;
        tracing::info!(strategy = %self, size, sources = sources.len(), "assigning regions");
        let regions = match *self {
            Self::Indexed => crate::indexed::assign_regions(size, sources)?,
            Self::BruteForce => crate::brute_force::assign_regions(size, sources),
        };
        Ok(AssignmentGrid::new(regions, sources.len()))
    }
}

/// Sweep every cell in row-major order, emitting one progress event per
/// cell.
pub(crate) fn sweep<E>(
    size: u32,
    mut nearest: impl FnMut(u32, u32) -> Result<usize, E>,
) -> Result<Grid<usize>, E> {
    Grid::try_from_fn(size, |row, col| {
        tracing::trace!(row, col, "processing location");
        nearest(row, col)
    })
}

/// All source indices at minimum L1 distance from `(row, col)`, in
/// ascending order.
#[must_use]
pub fn nearest_sources(row: u32, col: u32, sources: &[SourcePoint]) -> Vec<usize> {
    let Some(best) = sources
        .iter()
        .map(|s| s.manhattan_distance(row, col))
        .min()
    else {
        return Vec::new();
    };
    sources
        .iter()
        .enumerate()
        .filter(|(_, s)| s.manhattan_distance(row, col) == best)
        .map(|(i, _)| i)
        .collect()
}

/// Cells with two or more equidistant nearest sources.
///
/// Only these cells can differ between strategies.
#[must_use]
pub fn tie_cells(size: u32, sources: &[SourcePoint]) -> Vec<(u32, u32)> {
    (0..size)
        .flat_map(|row| (0..size).map(move |col| (row, col)))
        .filter(|&(row, col)| nearest_sources(row, col, sources).len() > 1)
        .collect()
}
