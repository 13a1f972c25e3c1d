/// One 24-bit pixel: three independent 8-bit channels, no alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel { r: 0, g: 0, b: 0 };
    pub const WHITE: Pixel = Pixel {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Transient HSL representation. `h` in degrees `[0, 360)`, `s` and `l` in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

pub fn invert(p: Pixel) -> Pixel {
    Pixel::new(255 - p.r, 255 - p.g, 255 - p.b)
}

/// Rec.709 luma, rounded, replicated into all three channels.
pub fn grayscale_luma(p: Pixel) -> Pixel {
    let luma = 0.2126 * f32::from(p.r) + 0.7152 * f32::from(p.g) + 0.0722 * f32::from(p.b);
    let luma = luma.round().clamp(0.0, 255.0) as u8;
    Pixel::new(luma, luma, luma)
}

/// Multiplies every channel by `factor`, truncating and clamping to `[0, 255]`.
pub fn contrast(p: Pixel, factor: f32) -> Pixel {
    fn scale(c: u8, factor: f32) -> u8 {
        (f32::from(c) * factor).clamp(0.0, 255.0) as u8
    }
    Pixel::new(scale(p.r, factor), scale(p.g, factor), scale(p.b, factor))
}

pub fn isolate_red(p: Pixel) -> Pixel {
    Pixel::new(p.r, 0, 0)
}

/// Bitwise "glitch" transform. Intentionally non-saturating, unlike every
/// other color op.
pub fn bit_transform(p: Pixel) -> Pixel {
    Pixel::new(p.r ^ 0xff, p.g & 0x32, p.b | 0x22)
}

pub fn rgb_to_hsl(p: Pixel) -> Hsl {
    let r = f32::from(p.r) / 255.0;
    let g = f32::from(p.g) / 255.0;
    let b = f32::from(p.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;

    let l = (max + min) / 2.0;

    if chroma == 0.0 {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    // Six-sector hue: which channel attains the max picks the sector.
    let hh = if max == r {
        ((g - b) / chroma).rem_euclid(6.0)
    } else if max == g {
        (b - r) / chroma + 2.0
    } else {
        (r - g) / chroma + 4.0
    };
    let h = (60.0 * hh).rem_euclid(360.0);

    let s = if 2.0 * l <= 1.0 {
        chroma / (2.0 * l)
    } else {
        chroma / (2.0 - 2.0 * l)
    };

    Hsl { h, s, l }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Pixel {
    let chroma = if 2.0 * hsl.l > 1.0 {
        (2.0 - 2.0 * hsl.l) * hsl.s
    } else {
        (2.0 * hsl.l) * hsl.s
    };

    let hh = hsl.h.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (hh.rem_euclid(2.0) - 1.0).abs());

    let (r, g, b) = match hh as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let m = hsl.l - chroma / 2.0;
    fn to_u8(v: f32) -> u8 {
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    }
    Pixel::new(to_u8(r + m), to_u8(g + m), to_u8(b + m))
}

/// Rotates hue by `degrees`, wrapping back into `[0, 360)`.
pub fn hue_rotate(p: Pixel, degrees: f32) -> Pixel {
    let mut hsl = rgb_to_hsl(p);
    hsl.h = (hsl.h + degrees).rem_euclid(360.0);
    hsl_to_rgb(hsl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_is_an_involution() {
        for c in [0u8, 1, 42, 127, 128, 254, 255] {
            let p = Pixel::new(c, 255 - c, c / 2);
            assert_eq!(invert(invert(p)), p);
        }
    }

    #[test]
    fn grayscale_white_stays_white() {
        assert_eq!(grayscale_luma(Pixel::WHITE), Pixel::WHITE);
    }

    #[test]
    fn grayscale_sets_all_channels_to_luma() {
        let p = grayscale_luma(Pixel::new(255, 0, 0));
        assert_eq!(p.r, p.g);
        assert_eq!(p.g, p.b);
        assert_eq!(p.r, 54); // round(0.2126 * 255)
    }

    #[test]
    fn contrast_truncates_and_saturates() {
        assert_eq!(contrast(Pixel::new(100, 200, 50), 1.5), Pixel::new(150, 255, 75));
        assert_eq!(contrast(Pixel::new(101, 0, 0), 0.5), Pixel::new(50, 0, 0));
    }

    #[test]
    fn isolate_red_zeroes_green_and_blue() {
        assert_eq!(isolate_red(Pixel::new(9, 8, 7)), Pixel::new(9, 0, 0));
    }

    #[test]
    fn bit_transform_matches_masks() {
        let p = bit_transform(Pixel::new(0xff, 0xff, 0x00));
        assert_eq!(p, Pixel::new(0x00, 0x32, 0x22));
    }

    #[test]
    fn hsl_primaries() {
        let red = rgb_to_hsl(Pixel::new(255, 0, 0));
        assert!(red.h.abs() < 1e-3);
        let green = rgb_to_hsl(Pixel::new(0, 255, 0));
        assert!((green.h - 120.0).abs() < 1e-3);
        let blue = rgb_to_hsl(Pixel::new(0, 0, 255));
        assert!((blue.h - 240.0).abs() < 1e-3);
    }

    #[test]
    fn hsl_achromatic_has_zero_hue_and_saturation() {
        let gray = rgb_to_hsl(Pixel::new(100, 100, 100));
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
        assert_eq!(hsl_to_rgb(gray), Pixel::new(100, 100, 100));
    }

    #[test]
    fn hsl_round_trip_within_one() {
        for r in (0u16..=255).step_by(17) {
            for g in (0u16..=255).step_by(17) {
                for b in (0u16..=255).step_by(17) {
                    let p = Pixel::new(r as u8, g as u8, b as u8);
                    let q = hsl_to_rgb(rgb_to_hsl(p));
                    assert!(
                        (i32::from(p.r) - i32::from(q.r)).abs() <= 1
                            && (i32::from(p.g) - i32::from(q.g)).abs() <= 1
                            && (i32::from(p.b) - i32::from(q.b)).abs() <= 1,
                        "{p:?} -> {q:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn hue_rotate_full_cycle_in_two_halves() {
        for p in [
            Pixel::new(200, 30, 90),
            Pixel::new(0, 255, 0),
            Pixel::new(13, 13, 200),
        ] {
            let q = hue_rotate(hue_rotate(p, 180.0), 180.0);
            assert!(
                (i32::from(p.r) - i32::from(q.r)).abs() <= 2
                    && (i32::from(p.g) - i32::from(q.g)).abs() <= 2
                    && (i32::from(p.b) - i32::from(q.b)).abs() <= 2,
                "{p:?} -> {q:?}"
            );
        }
    }
}
