//! Channel-wise layer blending.
//!
//! Every mode is a pure `(bottom, top) -> u8` function over one channel,
//! dispatched through a closed enum. Buffer-level operations iterate the
//! intersection of the two extents, so unequal shapes clamp instead of
//! erroring or reading out of bounds.

use crate::buffer::PixelBuffer;
use crate::pixel::Pixel;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    Xor,
    Overlay,
    Screen,
    Multiply,
    Add,
    Subtract,
    Difference,
    DarkenOnly,
    LightenOnly,
    ColorDodge,
    ColorBurn,
    SoftLight,
}

impl BlendMode {
    /// Combines one `bottom` (destination) and one `top` (source) channel
    /// value.
    pub fn apply(self, bottom: u8, top: u8) -> u8 {
        let b = u32::from(bottom);
        let t = u32::from(top);
        match self {
            BlendMode::Xor => bottom ^ top,
            BlendMode::Overlay => {
                if b < 128 {
                    (2 * t * b / 255) as u8
                } else {
                    (255 - 2 * (255 - t) * (255 - b) / 255) as u8
                }
            }
            BlendMode::Screen => (255 - (255 - t) * (255 - b) / 255) as u8,
            BlendMode::Multiply => (t * b / 255) as u8,
            BlendMode::Add => bottom.saturating_add(top),
            BlendMode::Subtract => bottom.saturating_sub(top),
            BlendMode::Difference => bottom.abs_diff(top),
            BlendMode::DarkenOnly => bottom.min(top),
            BlendMode::LightenOnly => bottom.max(top),
            BlendMode::ColorDodge => {
                if top == 255 {
                    255
                } else {
                    (b / (255 - t)).min(255) as u8
                }
            }
            BlendMode::ColorBurn => {
                if top == 0 {
                    0
                } else {
                    255u32.saturating_sub((255 - b) / t) as u8
                }
            }
            BlendMode::SoftLight => {
                // Both branches delegate to multiply with shifted operands;
                // continuous at top = 128.
                if top < 128 {
                    BlendMode::Multiply.apply(bottom, top + 128)
                } else {
                    255 - BlendMode::Multiply.apply(255 - bottom, (255 - top) + 128)
                }
            }
        }
    }
}

/// Blends `source` over `dest` in place, channel by channel, over the
/// intersection of the two extents.
pub fn blend_mode(dest: &mut PixelBuffer, source: &PixelBuffer, mode: BlendMode) {
    let width = dest.width().min(source.width());
    let height = dest.height().min(source.height());
    for row in 0..height {
        for col in 0..width {
            let d = dest.get(row, col);
            let s = source.get(row, col);
            dest.set(
                row,
                col,
                Pixel::new(
                    mode.apply(d.r, s.r),
                    mode.apply(d.g, s.g),
                    mode.apply(d.b, s.b),
                ),
            );
        }
    }
}

/// Opacity-weighted linear combine over the intersection of the two
/// extents: `d += trunc((s - d) * opacity)` per channel. The caller keeps
/// `opacity` in `[0, 1]`; the function does not clamp it.
pub fn combine(dest: &mut PixelBuffer, source: &PixelBuffer, opacity: f32) {
    fn lerp(d: u8, s: u8, opacity: f32) -> u8 {
        let delta = (f32::from(i16::from(s) - i16::from(d)) * opacity) as i16;
        (i16::from(d) + delta).clamp(0, 255) as u8
    }

    let width = dest.width().min(source.width());
    let height = dest.height().min(source.height());
    for row in 0..height {
        for col in 0..width {
            let d = dest.get(row, col);
            let s = source.get(row, col);
            dest.set(
                row,
                col,
                Pixel::new(
                    lerp(d.r, s.r, opacity),
                    lerp(d.g, s.g, opacity),
                    lerp(d.b, s.b, opacity),
                ),
            );
        }
    }
}
