//! Square grids holding per-cell data.
//!
//! [`Grid`] is a row-major `size × size` buffer. Two specialised wrappers
//! sit on top of it:
//!
//! - [`MarkerGrid`]: `255` at every source cell, `0` elsewhere. Display only.
//! - [`AssignmentGrid`]: the nearest-source index of every cell, exposed
//!   as a color level `index * (255 / N)` for rendering.

use serde::{Deserialize, Serialize};

use crate::types::{SourcePoint, VoronoiError, validate_size};

/// Upper bound (exclusive) of the color scale shared by both grids.
pub const COLOR_SCALE_MAX: f64 = 255.0;

/// A row-major `size × size` grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    size: u32,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f(row, col)` for every cell in
    /// row-major order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `f`.
    pub fn try_from_fn<E>(
        size: u32,
        mut f: impl FnMut(u32, u32) -> Result<T, E>,
    ) -> Result<Self, E> {
        let side = size as usize;
        let mut cells = Vec::with_capacity(side * side);
        for row in 0..size {
            for col in 0..size {
                cells.push(f(row, col)?);
            }
        }
        Ok(Self { size, cells })
    }

    /// Side length in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Total number of cells (`size²`).
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell value at `(row, col)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> Option<&T> {
        self.offset(row, col).map(|i| &self.cells[i])
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks_exact((self.size as usize).max(1))
    }

    fn offset(&self, row: u32, col: u32) -> Option<usize> {
        (row < self.size && col < self.size)
            .then(|| row as usize * self.size as usize + col as usize)
    }
}

impl<T: Clone> Grid<T> {
    /// A grid with every cell set to `value`.
    #[must_use]
    pub fn filled(size: u32, value: T) -> Self {
        let side = size as usize;
        Self {
            size,
            cells: vec![value; side * side],
        }
    }

    /// Overwrite the cell at `(row, col)`. Returns `false` when out of bounds.
    pub fn set(&mut self, row: u32, col: u32, value: T) -> bool {
        match self.offset(row, col) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }
}

/// Check that a source set is non-empty and fits inside the grid.
pub(crate) fn validate_sources(size: u32, sources: &[SourcePoint]) -> Result<(), VoronoiError> {
    validate_size(size)?;
    if sources.is_empty() {
        return Err(VoronoiError::InvalidArgument(
            "source set is empty".to_string(),
        ));
    }
    if let Some((index, source)) = sources
        .iter()
        .enumerate()
        .find(|(_, s)| !s.is_within(size))
    {
        return Err(VoronoiError::InvalidArgument(format!(
            "source {index} at ({}, {}) lies outside the {size}x{size} grid",
            source.row, source.col,
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MarkerGrid
// ---------------------------------------------------------------------------

/// Source locations: [`MarkerGrid::PRESENT`] at every source cell,
/// [`MarkerGrid::BACKGROUND`] elsewhere.
///
/// Colliding sources mark their shared cell once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerGrid(Grid<u8>);

impl MarkerGrid {
    /// Value written at source cells.
    pub const PRESENT: u8 = 255;

    /// Value of every other cell.
    pub const BACKGROUND: u8 = 0;

    /// Mark every source on an otherwise empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`VoronoiError::InvalidArgument`] if the size is unusable,
    /// the source set is empty, or a source lies outside the grid.
    pub fn new(size: u32, sources: &[SourcePoint]) -> Result<Self, VoronoiError> {
        validate_sources(size, sources)?;
        let mut grid = Grid::filled(size, Self::BACKGROUND);
        for source in sources {
            grid.set(source.row, source.col, Self::PRESENT);
        }
        Ok(Self(grid))
    }

    /// Side length in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.0.size()
    }

    /// Raw marker value at `(row, col)`.
    #[must_use]
    pub fn value(&self, row: u32, col: u32) -> Option<u8> {
        self.0.get(row, col).copied()
    }

    /// Returns `true` if a source sits at `(row, col)`.
    #[must_use]
    pub fn is_marked(&self, row: u32, col: u32) -> bool {
        self.value(row, col) == Some(Self::PRESENT)
    }

    /// Number of distinct cells holding at least one source.
    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.0.cells().iter().filter(|&&v| v == Self::PRESENT).count()
    }

    /// The underlying grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid<u8> {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// AssignmentGrid
// ---------------------------------------------------------------------------

/// Color level of region `index` out of `source_count` regions.
///
/// Levels are `index * (255 / N)`: evenly spaced in `[0, 255)` and
/// monotonic in the source index.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn color_level(index: usize, source_count: usize) -> f64 {
    (COLOR_SCALE_MAX / source_count as f64) * index as f64
}

/// Nearest-source region of every cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentGrid {
    regions: Grid<usize>,
    source_count: usize,
}

impl AssignmentGrid {
    /// Wrap a fully populated region grid.
    pub(crate) const fn new(regions: Grid<usize>, source_count: usize) -> Self {
        Self {
            regions,
            source_count,
        }
    }

    /// Side length in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.regions.size()
    }

    /// Number of sources (`N`) the grid was assigned against.
    #[must_use]
    pub const fn source_count(&self) -> usize {
        self.source_count
    }

    /// Source index nearest to `(row, col)`.
    #[must_use]
    pub fn region(&self, row: u32, col: u32) -> Option<usize> {
        self.regions.get(row, col).copied()
    }

    /// Color level of the cell at `(row, col)`.
    #[must_use]
    pub fn value(&self, row: u32, col: u32) -> Option<f64> {
        self.region(row, col)
            .map(|index| color_level(index, self.source_count))
    }

    /// Color levels of all cells in row-major order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.regions
            .cells()
            .iter()
            .map(|&index| color_level(index, self.source_count))
            .collect()
    }

    /// The underlying region-index grid.
    #[must_use]
    pub const fn regions(&self) -> &Grid<usize> {
        &self.regions
    }

    /// Number of cells assigned to each source, indexed by source.
    #[must_use]
    pub fn region_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.source_count];
        for &index in self.regions.cells() {
            if let Some(count) = sizes.get_mut(index) {
                *count += 1;
            }
        }
        sizes
    }
}

/// Number of cells whose region differs between two assignments.
///
/// Returns `None` if the grids have different shapes.
#[must_use]
pub fn count_disagreements(a: &AssignmentGrid, b: &AssignmentGrid) -> Option<usize> {
    if a.size() != b.size() {
        return None;
    }
    Some(
        a.regions
            .cells()
            .iter()
            .zip(b.regions.cells())
            .filter(|(x, y)| x != y)
            .count(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sources(points: &[(u32, u32)]) -> Vec<SourcePoint> {
        points.iter().copied().map(SourcePoint::from).collect()
    }

    #[test]
    fn try_from_fn_visits_row_major() {
        let grid: Grid<(u32, u32)> =
            Grid::try_from_fn(3, |r, c| Ok::<_, ()>((r, c))).unwrap();
        assert_eq!(grid.cell_count(), 9);
        assert_eq!(grid.cells()[0], (0, 0));
        assert_eq!(grid.cells()[1], (0, 1));
        assert_eq!(grid.cells()[3], (1, 0));
        assert_eq!(grid.get(2, 1), Some(&(2, 1)));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn try_from_fn_stops_at_first_error() {
        let mut visited = 0;
        let result: Result<Grid<u8>, (u32, u32)> = Grid::try_from_fn(4, |r, c| {
            visited += 1;
            if (r, c) == (1, 2) { Err((r, c)) } else { Ok(0) }
        });
        assert_eq!(result, Err((1, 2)));
        assert_eq!(visited, 7);
    }

    #[test]
    fn rows_have_grid_width() {
        let grid = Grid::filled(5, 1_u8);
        assert_eq!(grid.rows().count(), 5);
        assert!(grid.rows().all(|row| row.len() == 5));
    }

    #[test]
    fn set_out_of_bounds_is_rejected() {
        let mut grid = Grid::filled(2, 0_u8);
        assert!(grid.set(1, 1, 9));
        assert!(!grid.set(2, 0, 9));
        assert_eq!(grid.get(1, 1), Some(&9));
    }

    #[test]
    fn marker_grid_marks_sources() {
        let markers = MarkerGrid::new(4, &sources(&[(0, 0), (3, 3)])).unwrap();
        assert!(markers.is_marked(0, 0));
        assert!(markers.is_marked(3, 3));
        assert!(!markers.is_marked(1, 1));
        assert_eq!(markers.value(1, 1), Some(MarkerGrid::BACKGROUND));
        assert_eq!(markers.marked_count(), 2);
    }

    #[test]
    fn marker_grid_collapses_duplicates() {
        let markers = MarkerGrid::new(4, &sources(&[(2, 2), (2, 2), (0, 1)])).unwrap();
        assert_eq!(markers.marked_count(), 2);
    }

    #[test]
    fn marker_grid_rejects_out_of_range_source() {
        let result = MarkerGrid::new(4, &sources(&[(4, 0)]));
        assert!(matches!(result, Err(VoronoiError::InvalidArgument(_))));
    }

    #[test]
    fn marker_grid_rejects_empty_sources() {
        let result = MarkerGrid::new(4, &[]);
        assert!(matches!(result, Err(VoronoiError::InvalidArgument(_))));
    }

    #[test]
    fn color_levels_are_evenly_spaced() {
        assert!((color_level(0, 4) - 0.0).abs() < f64::EPSILON);
        assert!((color_level(1, 4) - 63.75).abs() < 1e-9);
        assert!((color_level(3, 4) - 191.25).abs() < 1e-9);
        assert!(color_level(19, 20) < COLOR_SCALE_MAX);
    }

    #[test]
    fn region_sizes_count_cells() {
        let regions = Grid::try_from_fn(2, |r, _| Ok::<_, ()>(r as usize)).unwrap();
        let grid = AssignmentGrid::new(regions, 3);
        assert_eq!(grid.region_sizes(), vec![2, 2, 0]);
        assert!((grid.value(1, 0).unwrap() - 85.0).abs() < 1e-9);
    }

    #[test]
    fn disagreements_require_same_shape() {
        let a = AssignmentGrid::new(Grid::filled(2, 0), 2);
        let b = AssignmentGrid::new(Grid::filled(3, 0), 2);
        assert_eq!(count_disagreements(&a, &b), None);

        let mut regions = Grid::filled(2, 0);
        regions.set(0, 1, 1);
        let c = AssignmentGrid::new(regions, 2);
        assert_eq!(count_disagreements(&a, &c), Some(1));
    }
}
