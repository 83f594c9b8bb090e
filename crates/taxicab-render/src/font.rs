//! 5×7 bitmap font for raster captions.
//!
//! Each glyph is seven rows of five bits, most significant bit on the
//! left. Covers space, ASCII digits and ASCII letters; anything else
//! renders as a hollow box.

use image::{Rgb, RgbImage};

/// Glyph width in font pixels.
pub const GLYPH_WIDTH: u32 = 5;

/// Glyph height in font pixels.
pub const GLYPH_HEIGHT: u32 = 7;

/// Horizontal distance between glyph origins, including the one-pixel gap.
pub const ADVANCE: u32 = GLYPH_WIDTH + 1;

type Glyph = [u8; 7];

const BLANK: Glyph = [0x00; 7];
const MISSING: Glyph = [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F];

const DIGITS: [Glyph; 10] = [
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
];

const UPPER: [Glyph; 26] = [
    [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
    [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
    [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
    [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
    [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
    [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
    [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11],
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
    [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
];

const LOWER: [Glyph; 26] = [
    [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F],
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E],
    [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E],
    [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F],
    [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
    [0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08],
    [0x00, 0x00, 0x0F, 0x11, 0x0F, 0x01, 0x0E],
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11],
    [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
    [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0C],
    [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12],
    [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11],
    [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
    [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E],
    [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10],
    [0x00, 0x00, 0x0D, 0x13, 0x0F, 0x01, 0x01],
    [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
    [0x00, 0x00, 0x0E, 0x10, 0x0E, 0x01, 0x1E],
    [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06],
    [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D],
    [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04],
    [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A],
    [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11],
    [0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x0E],
    [0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F],
];

/// Bitmap for `ch`, or `None` if the font has no glyph for it.
fn glyph(ch: char) -> Option<&'static Glyph> {
    let offset = |base: char| (u32::from(ch) - u32::from(base)) as usize;
    match ch {
        ' ' => Some(&BLANK),
        '0'..='9' => DIGITS.get(offset('0')),
        'A'..='Z' => UPPER.get(offset('A')),
        'a'..='z' => LOWER.get(offset('a')),
        _ => None,
    }
}

/// Returns `true` if every character of `text` has a glyph.
#[must_use]
pub fn covers(text: &str) -> bool {
    text.chars().all(|ch| glyph(ch).is_some())
}

/// Width in image pixels of `text` drawn at `scale`.
#[must_use]
pub fn text_width(text: &str, scale: u32) -> u32 {
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    chars
        .saturating_mul(ADVANCE)
        .saturating_sub(1)
        .saturating_mul(scale)
}

/// Draw `text` with its top-left corner at `(x, y)`, each font pixel
/// becoming a `scale × scale` block.
///
/// Glyphs that would cross `x + max_width` are dropped, as are pixels
/// outside the image.
pub fn draw_text(
    image: &mut RgbImage,
    text: &str,
    (x, y): (u32, u32),
    max_width: u32,
    scale: u32,
    color: Rgb<u8>,
) {
    let step = ADVANCE * scale;
    let glyph_px = GLYPH_WIDTH * scale;
    let mut origin = x;
    for ch in text.chars() {
        if origin.saturating_add(glyph_px) > x.saturating_add(max_width) {
            break;
        }
        let bits = glyph(ch).unwrap_or(&MISSING);
        for (row, &line) in (0..GLYPH_HEIGHT).zip(bits) {
            for col in (0..GLYPH_WIDTH).filter(|&col| line & (0x10 >> col) != 0) {
                fill_block(image, origin + col * scale, y + row * scale, scale, color);
            }
        }
        origin = origin.saturating_add(step);
    }
}

fn fill_block(image: &mut RgbImage, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    for dy in 0..scale {
        for dx in 0..scale {
            if let Some(pixel) = image.get_pixel_mut_checked(x + dx, y + dy) {
                *pixel = color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{REGIONS_TITLE, SOURCES_TITLE};

    const INK: Rgb<u8> = Rgb([0, 0, 0]);
    const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

    fn ink_count(image: &RgbImage) -> usize {
        image.pixels().filter(|&&p| p == INK).count()
    }

    #[test]
    fn panel_titles_are_covered() {
        assert!(covers(SOURCES_TITLE));
        assert!(covers(REGIONS_TITLE));
        assert!(!covers("région"));
    }

    #[test]
    fn width_accounts_for_gaps() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("a", 1), 5);
        assert_eq!(text_width("ab", 2), 22);
    }

    #[test]
    fn letter_t_crossbar() {
        let mut image = RgbImage::from_pixel(5, 7, PAPER);
        draw_text(&mut image, "T", (0, 0), 5, 1, INK);
        for x in 0..5 {
            assert_eq!(*image.get_pixel(x, 0), INK);
        }
        assert_eq!(*image.get_pixel(2, 6), INK);
        assert_eq!(*image.get_pixel(0, 6), PAPER);
    }

    #[test]
    fn scale_multiplies_ink() {
        let mut small = RgbImage::from_pixel(40, 20, PAPER);
        let mut large = RgbImage::from_pixel(40, 20, PAPER);
        draw_text(&mut small, "Vo", (0, 0), 40, 1, INK);
        draw_text(&mut large, "Vo", (0, 0), 40, 2, INK);
        assert_eq!(ink_count(&large), 4 * ink_count(&small));
    }

    #[test]
    fn glyphs_past_max_width_are_dropped() {
        let mut image = RgbImage::from_pixel(40, 7, PAPER);
        draw_text(&mut image, "HH", (0, 0), 8, 1, INK);
        assert!(ink_count(&image) > 0);
        for y in 0..7 {
            for x in 5..40 {
                assert_eq!(*image.get_pixel(x, y), PAPER, "({x}, {y})");
            }
        }
    }

    #[test]
    fn drawing_off_the_image_is_clipped() {
        let mut image = RgbImage::from_pixel(3, 3, PAPER);
        draw_text(&mut image, "M", (1, 1), 100, 1, INK);
        assert!(ink_count(&image) > 0);
    }

    #[test]
    fn unknown_characters_draw_a_box() {
        let mut image = RgbImage::from_pixel(5, 7, PAPER);
        draw_text(&mut image, "?", (0, 0), 5, 1, INK);
        assert_eq!(ink_count(&image), 20);
    }
}
