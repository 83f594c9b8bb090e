//! Viridis color scale over the fixed `[0, 255]` value range.

/// Lower bound of the shared color scale.
pub const VALUE_MIN: f64 = 0.0;

/// Upper bound of the shared color scale.
pub const VALUE_MAX: f64 = 255.0;

/// Viridis control points, evenly spaced from `t = 0` to `t = 1`.
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

/// Viridis color at `t`, clamped to `[0, 1]`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn viridis(t: f64) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let segments = (VIRIDIS.len() - 1) as f64;
    let x = t * segments;
    let i = (x.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = x - i as f64;

    let lo = VIRIDIS[i];
    let hi = VIRIDIS[i + 1];
    let lerp = |a: u8, b: u8| -> u8 {
        (f64::from(b) - f64::from(a))
            .mul_add(frac, f64::from(a))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    [lerp(lo[0], hi[0]), lerp(lo[1], hi[1]), lerp(lo[2], hi[2])]
}

/// Color for a grid value on the shared `[VALUE_MIN, VALUE_MAX]` scale.
#[must_use]
pub fn color_for_value(value: f64) -> [u8; 3] {
    viridis((value - VALUE_MIN) / (VALUE_MAX - VALUE_MIN))
}

/// Format a color as a `#rrggbb` hex string.
#[must_use]
pub fn hex(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}
