//! Spatial-index nearest-source assignment.
//!
//! The sources are bulk-loaded into an R\*-tree once; every cell then
//! issues a single nearest-neighbour query.
//!
//! # L1 queries on an R\*-tree
//!
//! `rstar` orders its best-first search by `distance_2`, comparing node
//! envelopes (squared Euclidean distance to the bounding box) against
//! leaf objects. Leaves here report the *squared L1* distance. For any
//! point inside a box, `dx² + dy² <= (dx + dy)²`, so an envelope key never
//! exceeds the key of a leaf it contains and the first leaf popped is an
//! L1-nearest source. Only the unpruned iterator is used; the
//! min-max pruning of `RTree::nearest_neighbor` assumes Euclidean leaves.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::assign::sweep;
use crate::grid::Grid;
use crate::types::{SourcePoint, VoronoiError};

/// A source position tagged with its index, stored in the R\*-tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexedSource {
    position: [i64; 2],
    index: usize,
}

impl IndexedSource {
    fn new(index: usize, source: SourcePoint) -> Self {
        Self {
            position: cell_position(source.row, source.col),
            index,
        }
    }
}

fn cell_position(row: u32, col: u32) -> [i64; 2] {
    [i64::from(row), i64::from(col)]
}

impl RTreeObject for IndexedSource {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedSource {
    fn distance_2(&self, point: &[i64; 2]) -> i64 {
        let l1 = (self.position[0] - point[0]).abs() + (self.position[1] - point[1]).abs();
        l1 * l1
    }

    fn contains_point(&self, point: &[i64; 2]) -> bool {
        self.position == *point
    }
}

/// An immutable R\*-tree over a fixed source set, answering L1
/// nearest-source queries.
pub struct SourceIndex {
    tree: RTree<IndexedSource>,
}

impl std::fmt::Debug for SourceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceIndex")
            .field("sources", &self.tree.size())
            .finish()
    }
}

impl SourceIndex {
    /// Bulk-load every source into a new tree.
    ///
    /// # Errors
    ///
    /// Returns [`VoronoiError::IndexBuild`] if `sources` is empty or the
    /// tree does not end up holding every source.
    pub fn build(sources: &[SourcePoint]) -> Result<Self, VoronoiError> {
        if sources.is_empty() {
            return Err(VoronoiError::IndexBuild(
                "no sources to index".to_string(),
            ));
        }
        let entries: Vec<IndexedSource> = sources
            .iter()
            .enumerate()
            .map(|(index, &source)| IndexedSource::new(index, source))
            .collect();
        let tree = RTree::bulk_load(entries);
        if tree.size() != sources.len() {
            return Err(VoronoiError::IndexBuild(format!(
                "index holds {} of {} sources",
                tree.size(),
                sources.len(),
            )));
        }
        tracing::debug!(sources = tree.size(), "built source index");
        Ok(Self { tree })
    }

    /// Number of indexed sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns `true` if the index holds no sources.
    ///
    /// Always `false` for an index from [`SourceIndex::build`], which
    /// rejects empty input. Kept as the counterpart of [`SourceIndex::len`]
    /// (`clippy::len_without_is_empty`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Index of an L1-nearest source to `(row, col)`.
    ///
    /// Among equidistant sources the tree's search order decides.
    ///
    /// # Errors
    ///
    /// Returns [`VoronoiError::Query`] if the search yields nothing.
    pub fn nearest(&self, row: u32, col: u32) -> Result<usize, VoronoiError> {
        self.tree
            .nearest_neighbor_iter(&cell_position(row, col))
            .next()
            .map(|entry| entry.index)
            .ok_or(VoronoiError::Query { row, col })
    }
}

/// Assign every cell through a freshly built [`SourceIndex`].
pub(crate) fn assign_regions(
    size: u32,
    sources: &[SourcePoint],
) -> Result<Grid<usize>, VoronoiError> {
    let index = SourceIndex::build(sources)?;
    sweep(size, |row, col| index.nearest(row, col))
}
