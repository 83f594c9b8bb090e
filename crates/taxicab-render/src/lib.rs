//! taxicab-render: two-panel renderers for Voronoi grids (sans-IO).
//!
//! Both renderers draw the same pair of panels on the shared `[0, 255]`
//! viridis scale:
//!
//! 1. "Source points": the [`MarkerGrid`]
//! 2. "Voronoi regions": the [`AssignmentGrid`]
//!
//! Output formats: PNG bytes ([`to_png`]) and an SVG string ([`to_svg`]),
//! both captioned with the panel titles. Neither touches the filesystem.

pub mod colormap;
mod font;
pub mod png;
pub mod svg;

pub use png::{PngOptions, render_image, to_png};
pub use svg::{SvgOptions, to_svg};

use taxicab_voronoi::{AssignmentGrid, MarkerGrid};

/// Title of the marker panel.
pub const SOURCES_TITLE: &str = "Source points";

/// Title of the region panel.
pub const REGIONS_TITLE: &str = "Voronoi regions";

/// Errors that can occur while rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The marker and assignment grids have different sizes.
    #[error("grid size mismatch: markers are {markers}x{markers}, regions are {regions}x{regions}")]
    SizeMismatch {
        /// Marker grid side length.
        markers: u32,
        /// Assignment grid side length.
        regions: u32,
    },

    /// A render option was rejected.
    #[error("invalid render option: {0}")]
    InvalidOption(String),

    /// The image would not fit in memory or in `u32` pixel coordinates.
    #[error("rendered image is too large: {0}")]
    TooLarge(String),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// One titled panel: a square grid of values on the `[0, 255]` scale.
///
/// Only built by [`panels`], which guarantees `size²` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    title: &'static str,
    size: u32,
    values: Vec<f64>,
}

impl Panel {
    /// Caption shown above the panel.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.title
    }

    /// Side length in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Value at `(row, col)`, or `None` when out of bounds.
    #[must_use]
    pub fn value(&self, row: u32, col: u32) -> Option<f64> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.values
            .get(row as usize * self.size as usize + col as usize)
            .copied()
    }
}

/// Build the two display panels from a marker grid and an assignment grid.
///
/// # Errors
///
/// Returns [`RenderError::SizeMismatch`] if the grids differ in size.
pub fn panels(
    markers: &MarkerGrid,
    assignment: &AssignmentGrid,
) -> Result<[Panel; 2], RenderError> {
    if markers.size() != assignment.size() {
        return Err(RenderError::SizeMismatch {
            markers: markers.size(),
            regions: assignment.size(),
        });
    }
    let size = markers.size();
    Ok([
        Panel {
            title: SOURCES_TITLE,
            size,
            values: markers.grid().cells().iter().map(|&v| f64::from(v)).collect(),
        },
        Panel {
            title: REGIONS_TITLE,
            size,
            values: assignment.values(),
        },
    ])
}
