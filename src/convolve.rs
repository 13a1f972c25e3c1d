//! Spatial convolution: separable Gaussian blur and a 3x3 unsharp sharpen.

use crate::buffer::PixelBuffer;
use crate::pixel::Pixel;

/// Raw 25-tap blur weights. They sum to ~0.961 and are normalized to 1.0
/// at kernel construction so a uniform field passes through unchanged.
const GAUSS_RAW: [f32; 25] = [
    0.0089, 0.0123, 0.0165, 0.0215, 0.0273, 0.0336, 0.0403, 0.0469, 0.0532, 0.0586, 0.0628,
    0.0655, 0.0664, 0.0655, 0.0628, 0.0586, 0.0532, 0.0469, 0.0403, 0.0336, 0.0273, 0.0215,
    0.0165, 0.0123, 0.0089,
];

const GAUSS_LEN: i64 = GAUSS_RAW.len() as i64;

fn gaussian_kernel() -> [f32; 25] {
    let sum: f32 = GAUSS_RAW.iter().sum();
    let mut k = GAUSS_RAW;
    for w in &mut k {
        *w /= sum;
    }
    k
}

/// Start index of the sampling window for a tap centered on `center` along
/// an axis of `axis_len` samples. Near either border the window is slid
/// inward so it stays fully inside the axis, advancing roughly one sample
/// every second step, rather than clamping per sample.
fn window_start(center: i64, axis_len: i64) -> i64 {
    let offset = if center + GAUSS_LEN > axis_len {
        (axis_len - center - 2 * GAUSS_LEN) / 2
    } else if center < GAUSS_LEN {
        -(center / 2)
    } else {
        -(GAUSS_LEN / 2)
    };
    (center + offset).clamp(0, (axis_len - GAUSS_LEN).max(0))
}

fn saturate(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Separable Gaussian blur: one pass along rows, then one pass along
/// columns of the row-blurred intermediate. Each pass writes a fresh
/// buffer; the source is never convolved in place.
pub fn gaussian_blur(src: &PixelBuffer) -> PixelBuffer {
    let kernel = gaussian_kernel();
    let width = i64::from(src.width());
    let height = i64::from(src.height());

    let mut rows = src.clone();
    for y in 0..src.height() {
        for x in 0..src.width() {
            let start = window_start(i64::from(x), width);
            let mut acc = [0.0f32; 3];
            for (k, &w) in kernel.iter().enumerate() {
                let sx = (start + k as i64).min(width - 1) as u32;
                let px = src.get(y, sx);
                acc[0] += w * f32::from(px.r);
                acc[1] += w * f32::from(px.g);
                acc[2] += w * f32::from(px.b);
            }
            rows.set(y, x, Pixel::new(saturate(acc[0]), saturate(acc[1]), saturate(acc[2])));
        }
    }

    let mut out = src.clone();
    for x in 0..src.width() {
        for y in 0..src.height() {
            let start = window_start(i64::from(y), height);
            let mut acc = [0.0f32; 3];
            for (k, &w) in kernel.iter().enumerate() {
                let sy = (start + k as i64).min(height - 1) as u32;
                let px = rows.get(sy, x);
                acc[0] += w * f32::from(px.r);
                acc[1] += w * f32::from(px.g);
                acc[2] += w * f32::from(px.b);
            }
            out.set(y, x, Pixel::new(saturate(acc[0]), saturate(acc[1]), saturate(acc[2])));
        }
    }

    out
}

/// Observed pre-rescale kernel sums across all channels of one sharpen run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SharpenStats {
    pub min_sum: f32,
    pub max_sum: f32,
}

const SHARPEN_KERNEL: [[f32; 3]; 3] = [
    [-0.0625, -0.125, -0.0625],
    [-0.125, 1.0, -0.125],
    [-0.0625, -0.125, -0.0625],
];

/// 3x3 unsharp sharpen. The kernel is evaluated wherever the full window
/// fits with its anchor at the output pixel, so the last two rows and
/// columns pass through unmodified. The rescaled sum `(sum + 80) * 0.2` is
/// added onto the original channel value, saturating.
pub fn sharpen(src: &PixelBuffer) -> (PixelBuffer, SharpenStats) {
    let mut out = src.clone();
    if src.width() < 3 || src.height() < 3 {
        return (out, SharpenStats::default());
    }

    let mut min_sum = f32::INFINITY;
    let mut max_sum = f32::NEG_INFINITY;

    for row in 0..src.height() - 2 {
        for col in 0..src.width() - 2 {
            let mut acc = [0.0f32; 3];
            for (dr, krow) in SHARPEN_KERNEL.iter().enumerate() {
                for (dc, &w) in krow.iter().enumerate() {
                    let px = src.get(row + dr as u32, col + dc as u32);
                    acc[0] += w * f32::from(px.r);
                    acc[1] += w * f32::from(px.g);
                    acc[2] += w * f32::from(px.b);
                }
            }

            let base = src.get(row, col);
            let mut channels = [base.r, base.g, base.b];
            for (c, &sum) in acc.iter().enumerate() {
                min_sum = min_sum.min(sum);
                max_sum = max_sum.max(sum);
                let rescaled = (sum + 80.0) * 0.2;
                channels[c] = saturate(f32::from(channels[c]) + rescaled);
            }
            out.set(row, col, Pixel::new(channels[0], channels[1], channels[2]));
        }
    }

    let stats = SharpenStats { min_sum, max_sum };
    tracing::debug!(min_sum = stats.min_sum, max_sum = stats.max_sum, "sharpen kernel sums");
    (out, stats)
}
