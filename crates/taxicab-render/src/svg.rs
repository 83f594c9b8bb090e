//! SVG renderer.
//!
//! Emits one `<g>` per panel, headed by a `<text>` caption. Each grid row
//! is run-length encoded: consecutive cells of the same color collapse into
//! a single `<rect>`, which keeps Voronoi regions compact.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::{Group, Rectangle, Text, Title};
use taxicab_voronoi::{AssignmentGrid, MarkerGrid};

use crate::colormap::{color_for_value, hex};
use crate::{Panel, RenderError, panels};

/// Layout options for the SVG renderer, in user units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgOptions {
    /// Side length of one grid cell. Must be positive.
    pub cell_size: u32,
    /// Space around and between panels.
    pub margin: u32,
    /// Height reserved above each panel for its caption.
    pub caption_height: u32,
    /// Optional document `<title>`.
    pub title: Option<String>,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            cell_size: 2,
            margin: 16,
            caption_height: 24,
            title: None,
        }
    }
}

/// A horizontal run of same-colored cells within one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    start: u32,
    len: u32,
    color: [u8; 3],
}

/// Collapse one panel row into runs of equal color.
fn row_runs(panel: &Panel, row: u32) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for col in 0..panel.size() {
        let Some(value) = panel.value(row, col) else {
            continue;
        };
        let color = color_for_value(value);
        match runs.last_mut() {
            Some(run) if run.color == color => run.len += 1,
            _ => runs.push(Run {
                start: col,
                len: 1,
                color,
            }),
        }
    }
    runs
}

fn panel_group(panel: &Panel, id: &str, x: u32, y: u32, options: &SvgOptions) -> Group {
    let cell = options.cell_size;
    let panel_px = panel.size() * cell;

    let caption = Text::new(panel.title())
        .set("x", panel_px / 2)
        .set("y", options.caption_height / 2)
        .set("text-anchor", "middle")
        .set("dominant-baseline", "middle")
        .set("font-family", "sans-serif")
        .set("font-size", 16);

    let mut cells = Group::new()
        .set("transform", format!("translate(0,{})", options.caption_height))
        .set("shape-rendering", "crispEdges");
    for row in 0..panel.size() {
        for run in row_runs(panel, row) {
            cells = cells.add(
                Rectangle::new()
                    .set("x", run.start * cell)
                    .set("y", row * cell)
                    .set("width", run.len * cell)
                    .set("height", cell)
                    .set("fill", hex(run.color)),
            );
        }
    }

    Group::new()
        .set("id", id)
        .set("transform", format!("translate({x},{y})"))
        .add(caption)
        .add(cells)
}

/// Render both panels as a standalone SVG document.
///
/// # Errors
///
/// Returns [`RenderError::InvalidOption`] if `cell_size` is zero,
/// [`RenderError::SizeMismatch`] if the grids differ in size, and
/// [`RenderError::TooLarge`] if the document exceeds `u32` coordinates.
pub fn to_svg(
    markers: &MarkerGrid,
    assignment: &AssignmentGrid,
    options: &SvgOptions,
) -> Result<String, RenderError> {
    if options.cell_size == 0 {
        return Err(RenderError::InvalidOption(
            "cell size must be positive".to_string(),
        ));
    }
    let [sources_panel, regions_panel] = panels(markers, assignment)?;

    let panel_px = u64::from(sources_panel.size()) * u64::from(options.cell_size);
    let margin = u64::from(options.margin);
    let width = 2 * panel_px + 3 * margin;
    let height = panel_px + u64::from(options.caption_height) + 2 * margin;
    let too_large = || RenderError::TooLarge(format!("{width}x{height} user units"));
    let width = u32::try_from(width).map_err(|_| too_large())?;
    let height = u32::try_from(height).map_err(|_| too_large())?;
    let panel_px = u32::try_from(panel_px).map_err(|_| too_large())?;

    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0, 0, width, height));

    if let Some(ref title) = options.title {
        doc = doc.add(Title::new(title.as_str()));
    }

    let m = options.margin;
    doc = doc
        .add(panel_group(&sources_panel, "sources", m, m, options))
        .add(panel_group(
            &regions_panel,
            "regions",
            2 * m + panel_px,
            m,
            options,
        ));

    // The svg crate omits the XML declaration, so we prepend it.
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n"))
}
