//! PNG renderer.
//!
//! Lays the two panels out side by side, each cell drawn as a
//! `scale × scale` block, separated and framed by a plain gutter. Each
//! panel's title sits in a caption band above it, drawn with the built-in
//! 5×7 bitmap font:
//!
//! ```text
//! gutter | "Source points"  | gutter | "Voronoi regions" | gutter
//! gutter | sources panel    | gutter | regions panel     | gutter
//! ```

use image::{ImageEncoder, Rgb, RgbImage};
use taxicab_voronoi::{AssignmentGrid, MarkerGrid};

use crate::colormap::color_for_value;
use crate::font::{self, GLYPH_HEIGHT};
use crate::{Panel, RenderError, panels};

/// Layout options for the PNG renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngOptions {
    /// Pixels per grid cell along each axis. Must be positive.
    pub scale: u32,
    /// Pixels between and around the panels.
    pub gutter: u32,
    /// Gutter and caption band color.
    pub background: [u8; 3],
    /// Image pixels per font pixel in the panel captions. `0` omits the
    /// caption band.
    pub caption_scale: u32,
    /// Caption text color.
    pub text_color: [u8; 3],
}

impl PngOptions {
    /// Default pixels per cell.
    pub const DEFAULT_SCALE: u32 = 2;

    /// Default gutter width in pixels.
    pub const DEFAULT_GUTTER: u32 = 16;

    /// Default caption font scale.
    pub const DEFAULT_CAPTION_SCALE: u32 = 2;

    /// Height of the caption band above the panels: the glyph height plus
    /// one font pixel of padding on each side.
    #[must_use]
    pub const fn caption_band(&self) -> u32 {
        (GLYPH_HEIGHT + 2).saturating_mul(self.caption_scale)
    }
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
            gutter: Self::DEFAULT_GUTTER,
            background: [255, 255, 255],
            caption_scale: Self::DEFAULT_CAPTION_SCALE,
            text_color: [0, 0, 0],
        }
    }
}

/// Width and height of the composed image, checked against `u32`.
fn image_dimensions(size: u32, options: &PngOptions) -> Result<(u32, u32), RenderError> {
    let panel = u64::from(size) * u64::from(options.scale);
    let gutter = u64::from(options.gutter);
    let band = u64::from(GLYPH_HEIGHT + 2) * u64::from(options.caption_scale);
    let width = 2 * panel + 3 * gutter;
    let height = panel + 2 * gutter + band;
    let too_large = || RenderError::TooLarge(format!("{width}x{height} pixels"));
    Ok((
        u32::try_from(width).map_err(|_| too_large())?,
        u32::try_from(height).map_err(|_| too_large())?,
    ))
}

/// Paint one panel with its top-left corner at `(x0, y0)`.
fn draw_panel(image: &mut RgbImage, panel: &Panel, x0: u32, y0: u32, scale: u32) {
    for row in 0..panel.size() {
        for col in 0..panel.size() {
            let Some(value) = panel.value(row, col) else {
                continue;
            };
            let color = Rgb(color_for_value(value));
            let x = x0 + col * scale;
            let y = y0 + row * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    image.put_pixel(x + dx, y + dy, color);
                }
            }
        }
    }
}

/// Center `panel`'s title above a panel of width `panel_px` at `x0`.
fn draw_caption(
    image: &mut RgbImage,
    panel: &Panel,
    x0: u32,
    y0: u32,
    panel_px: u32,
    options: &PngOptions,
) {
    let scale = options.caption_scale;
    let text_px = font::text_width(panel.title(), scale);
    let x = x0 + panel_px.saturating_sub(text_px) / 2;
    font::draw_text(
        image,
        panel.title(),
        (x, y0 + scale),
        panel_px,
        scale,
        Rgb(options.text_color),
    );
}

/// Compose both panels, captioned, into an RGB image.
///
/// # Errors
///
/// Returns [`RenderError::InvalidOption`] if `scale` is zero,
/// [`RenderError::SizeMismatch`] if the grids differ in size, and
/// [`RenderError::TooLarge`] if the image exceeds `u32` dimensions.
pub fn render_image(
    markers: &MarkerGrid,
    assignment: &AssignmentGrid,
    options: &PngOptions,
) -> Result<RgbImage, RenderError> {
    if options.scale == 0 {
        return Err(RenderError::InvalidOption(
            "scale must be at least 1 pixel per cell".to_string(),
        ));
    }
    let [sources_panel, regions_panel] = panels(markers, assignment)?;
    let (width, height) = image_dimensions(sources_panel.size(), options)?;

    let mut image = RgbImage::from_pixel(width, height, Rgb(options.background));
    let panel_px = sources_panel.size() * options.scale;
    let gutter = options.gutter;
    let top = gutter + options.caption_band();
    for (panel, x0) in [
        (&sources_panel, gutter),
        (&regions_panel, 2 * gutter + panel_px),
    ] {
        if options.caption_scale > 0 {
            draw_caption(&mut image, panel, x0, gutter, panel_px, options);
        }
        draw_panel(&mut image, panel, x0, top, options.scale);
    }
    Ok(image)
}

/// Render both panels and encode them as PNG bytes.
///
/// # Errors
///
/// Same as [`render_image`], plus [`RenderError::PngEncode`] if encoding
/// fails.
pub fn to_png(
    markers: &MarkerGrid,
    assignment: &AssignmentGrid,
    options: &PngOptions,
) -> Result<Vec<u8>, RenderError> {
    let image = render_image(markers, assignment, options)?;
    let mut bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use taxicab_voronoi::{AssignerKind, SourcePoint, compute};

    use super::*;
    use crate::colormap::viridis;
    use crate::{REGIONS_TITLE, SOURCES_TITLE};

    fn corners() -> taxicab_voronoi::VoronoiResult {
        let sources = vec![SourcePoint::new(0, 0), SourcePoint::new(3, 3)];
        compute(4, sources, AssignerKind::BruteForce).unwrap()
    }

    #[test]
    fn layout_dimensions() {
        let result = corners();
        let options = PngOptions {
            scale: 3,
            gutter: 2,
            caption_scale: 0,
            ..PngOptions::default()
        };
        let image = render_image(&result.markers, &result.assignment, &options).unwrap();
        // 2 panels of 12px + 3 gutters of 2px wide, 12px + 2 gutters high.
        assert_eq!(image.dimensions(), (30, 16));
    }

    #[test]
    fn caption_band_adds_height() {
        let result = corners();
        let options = PngOptions {
            scale: 3,
            gutter: 2,
            caption_scale: 1,
            ..PngOptions::default()
        };
        assert_eq!(options.caption_band(), 9);
        let image = render_image(&result.markers, &result.assignment, &options).unwrap();
        assert_eq!(image.dimensions(), (30, 16 + 9));
    }

    #[test]
    fn default_image_draws_both_titles() {
        let sources = vec![SourcePoint::new(10, 10), SourcePoint::new(80, 50)];
        let result = compute(100, sources, AssignerKind::BruteForce).unwrap();
        let options = PngOptions::default();
        let image = render_image(&result.markers, &result.assignment, &options).unwrap();

        let ink = Rgb(options.text_color);
        let band = options.gutter..options.gutter + options.caption_band();
        let panel_px = 100 * options.scale;
        let left = options.gutter..options.gutter + panel_px;
        let right = 2 * options.gutter + panel_px..2 * options.gutter + 2 * panel_px;
        let ink_in = |xs: std::ops::Range<u32>| {
            xs.flat_map(|x| band.clone().map(move |y| (x, y)))
                .filter(|&(x, y)| *image.get_pixel(x, y) == ink)
                .count()
        };

        let mut expected_left = RgbImage::from_pixel(panel_px, 30, Rgb([255, 255, 255]));
        font::draw_text(&mut expected_left, SOURCES_TITLE, (0, 0), panel_px, 2, ink);
        let mut expected_right = RgbImage::from_pixel(panel_px, 30, Rgb([255, 255, 255]));
        font::draw_text(&mut expected_right, REGIONS_TITLE, (0, 0), panel_px, 2, ink);
        let count = |img: &RgbImage| img.pixels().filter(|&&p| p == ink).count();

        assert_eq!(ink_in(left), count(&expected_left));
        assert_eq!(ink_in(right), count(&expected_right));
        // Panels start below the band.
        let top = options.gutter + options.caption_band();
        assert_eq!(image.get_pixel(options.gutter + 20, top + 20).0, viridis(1.0));
    }

    #[test]
    fn pixels_follow_the_color_scale() {
        let result = corners();
        let options = PngOptions {
            scale: 1,
            gutter: 1,
            background: [1, 2, 3],
            caption_scale: 0,
            text_color: [0, 0, 0],
        };
        let image = render_image(&result.markers, &result.assignment, &options).unwrap();

        // Gutter.
        assert_eq!(image.get_pixel(0, 0).0, [1, 2, 3]);
        // Sources panel: (0, 0) is marked, (1, 1) is background.
        assert_eq!(image.get_pixel(1, 1).0, viridis(1.0));
        assert_eq!(image.get_pixel(2, 2).0, viridis(0.0));
        // Regions panel starts at x = 2 * gutter + 4.
        assert_eq!(image.get_pixel(6, 1).0, viridis(0.0));
        assert_eq!(image.get_pixel(6 + 3, 1 + 3).0, color_for_value(127.5));
    }

    #[test]
    fn zero_scale_is_rejected() {
        let result = corners();
        let options = PngOptions {
            scale: 0,
            ..PngOptions::default()
        };
        assert!(matches!(
            render_image(&result.markers, &result.assignment, &options),
            Err(RenderError::InvalidOption(_))
        ));
    }

    #[test]
    fn png_bytes_have_signature() {
        let result = corners();
        let bytes = to_png(&result.markers, &result.assignment, &PngOptions::default()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn oversized_layout_is_rejected() {
        let options = PngOptions {
            scale: u32::MAX,
            ..PngOptions::default()
        };
        assert!(matches!(
            image_dimensions(4, &options),
            Err(RenderError::TooLarge(_))
        ));
    }
}
