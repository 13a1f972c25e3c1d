use std::io::{Read, Seek, Write};

use crate::bmp::{self, DibHeader, FileHeader};
use crate::buffer::PixelBuffer;
use crate::error::{StrataError, StrataResult};
use crate::layers::{LayerId, LayerStack};

/// A decoded BMP: both headers plus an ordered stack of layers. The layer
/// stack starts empty for [`Image::new`] and holds the decoded raster as its
/// single layer after [`bmp::decode`].
#[derive(Debug)]
pub struct Image {
    pub file_header: FileHeader,
    pub dib_header: DibHeader,
    pub layers: LayerStack,
}

impl Image {
    /// Creates an empty image with synthesized headers: pixel data directly
    /// after the two headers, sizes computed for the row-padded raster.
    pub fn new(width: u32, height: u32) -> StrataResult<Self> {
        if width == 0 || height == 0 {
            return Err(StrataError::validation("Image dimensions must be nonzero"));
        }

        let offset = bmp::FILE_HEADER_LEN + bmp::DIB_HEADER_LEN;
        let row_bytes = u64::from(width) * 3 + u64::from(bmp::row_padding(width));
        let image_size = u32::try_from(row_bytes * u64::from(height))
            .ok()
            .filter(|size| size.checked_add(offset).is_some())
            .ok_or_else(|| StrataError::validation("image size exceeds the BMP u32 limit"))?;
        let file_header = FileHeader {
            file_size: offset + image_size,
            reserved: [0, 0],
            pixel_data_offset: offset,
        };
        let dib_header = DibHeader {
            header_size: bmp::DIB_HEADER_LEN,
            width: width as i32,
            height: height as i32,
            planes: 1,
            bits_per_pixel: 24,
            compression_method: 0,
            image_size,
            horizontal_res: 2835, // 72 dpi
            vertical_res: 2835,
            colors_in_palette: 0,
            important_colors: 0,
        };
        Ok(Self {
            file_header,
            dib_header,
            layers: LayerStack::new(),
        })
    }

    pub(crate) fn from_decoded(
        file_header: FileHeader,
        dib_header: DibHeader,
        buffer: PixelBuffer,
    ) -> StrataResult<Self> {
        let mut layers = LayerStack::new();
        layers.add(buffer)?;
        Ok(Self {
            file_header,
            dib_header,
            layers,
        })
    }

    pub fn decode<R: Read + Seek>(reader: &mut R) -> StrataResult<Self> {
        bmp::decode(reader)
    }

    pub fn encode<W: Write + Seek>(&self, writer: &mut W) -> StrataResult<()> {
        bmp::encode(self, writer)
    }

    /// Duplicates the layer identified by `id` and pushes the copy onto the
    /// top of the stack.
    pub fn duplicate_layer(&mut self, id: LayerId) -> StrataResult<LayerId> {
        let copy = self.layers.layer(id)?.clone();
        self.layers.add(copy)
    }
}
