use crate::error::{StrataError, StrataResult};
use crate::pixel::Pixel;

/// An owned rectangular grid of [`Pixel`]s, stored row-major as one flat
/// allocation indexed by `row * width + col`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<Pixel>,
}

impl PixelBuffer {
    /// Creates a buffer filled with black. Both dimensions must be nonzero.
    pub fn new(width: u32, height: u32) -> StrataResult<Self> {
        if width == 0 || height == 0 {
            return Err(StrataError::validation(
                "PixelBuffer dimensions must be nonzero",
            ));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| StrataError::validation("PixelBuffer size overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![Pixel::BLACK; len],
        })
    }

    pub fn filled(width: u32, height: u32, fill: Pixel) -> StrataResult<Self> {
        let mut buf = Self::new(width, height)?;
        buf.data.fill(fill);
        Ok(buf)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    #[inline]
    fn index(&self, row: u32, col: u32) -> usize {
        debug_assert!(row < self.height && col < self.width);
        row as usize * self.width as usize + col as usize
    }

    #[inline]
    pub fn get(&self, row: u32, col: u32) -> Pixel {
        self.data[self.index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: u32, col: u32, px: Pixel) {
        let i = self.index(row, col);
        self.data[i] = px;
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.data
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.data
    }

    /// Applies a pure per-pixel function across the whole buffer. Order of
    /// traversal does not affect the result.
    pub fn map(&mut self, f: impl Fn(Pixel) -> Pixel) {
        for px in &mut self.data {
            *px = f(*px);
        }
    }
}
