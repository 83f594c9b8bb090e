//! Brute-force nearest-source assignment.
//!
//! Every cell folds over all sources in index order with a
//! `(best_index, best_distance)` accumulator. Only a strictly smaller
//! distance replaces the accumulator, so the lowest index wins ties.
//! Cost is `O(size² · N)` with no preprocessing.

use std::convert::Infallible;

use crate::assign::sweep;
use crate::grid::Grid;
use crate::types::SourcePoint;

/// Index and distance of the nearest source to `(row, col)`.
///
/// Returns `None` only when `sources` is empty.
#[must_use]
pub fn nearest_source(row: u32, col: u32, sources: &[SourcePoint]) -> Option<(usize, u64)> {
    sources
        .iter()
        .enumerate()
        .fold(None, |best, (index, source)| {
            let distance = source.manhattan_distance(row, col);
            match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((index, distance)),
            }
        })
}

/// Assign every cell by scanning all sources. `sources` must be non-empty.
pub(crate) fn assign_regions(size: u32, sources: &[SourcePoint]) -> Grid<usize> {
    let Ok(grid) = sweep(size, |row, col| {
        Ok::<_, Infallible>(nearest_source(row, col, sources).map_or(0, |(index, _)| index))
    });
    grid
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_sources_have_no_nearest() {
        assert_eq!(nearest_source(0, 0, &[]), None);
    }

    #[test]
    fn strictly_closer_source_wins() {
        let sources = [SourcePoint::new(0, 0), SourcePoint::new(5, 5)];
        assert_eq!(nearest_source(4, 4, &sources), Some((1, 2)));
    }

    #[test]
    fn lowest_index_wins_ties() {
        let sources = [
            SourcePoint::new(0, 2),
            SourcePoint::new(2, 0),
            SourcePoint::new(4, 2),
        ];
        // (2, 2) is at distance 2 from all three.
        assert_eq!(nearest_source(2, 2, &sources), Some((0, 2)));
    }

    #[test]
    fn duplicate_sources_resolve_to_first() {
        let sources = [
            SourcePoint::new(9, 9),
            SourcePoint::new(1, 1),
            SourcePoint::new(1, 1),
        ];
        assert_eq!(nearest_source(1, 1, &sources), Some((1, 0)));
        let grid = assign_regions(10, &sources);
        assert!(grid.cells().iter().all(|&index| index != 2));
    }

    #[test]
    fn every_cell_is_assigned() {
        let sources = [SourcePoint::new(2, 7), SourcePoint::new(6, 1)];
        let grid = assign_regions(8, &sources);
        assert_eq!(grid.cell_count(), 64);
        assert!(grid.cells().iter().all(|&index| index < sources.len()));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let sources = [
            SourcePoint::new(3, 3),
            SourcePoint::new(0, 6),
            SourcePoint::new(6, 0),
            SourcePoint::new(3, 3),
        ];
        assert_eq!(assign_regions(7, &sources), assign_regions(7, &sources));
    }
}
