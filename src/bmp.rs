//! 24-bit uncompressed BMP codec.
//!
//! Row data is stored in file order, B,G,R per pixel, each
//! row padded to a 4-byte boundary. Decoding keeps rows in file order; no
//! vertical flip is applied for positive heights.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::{StrataError, StrataResult};
use crate::image::Image;
use crate::pixel::Pixel;

pub const FILE_HEADER_LEN: u32 = 14;
pub const DIB_HEADER_LEN: u32 = 40;
pub const BMP_MAGIC: [u8; 2] = *b"BM";

/// BMP file header (14 bytes on the wire, little-endian). The magic is
/// validated on read and emitted on write; it is not stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub file_size: u32,
    pub reserved: [u16; 2],
    pub pixel_data_offset: u32,
}

/// BITMAPINFOHEADER (40 bytes on the wire, little-endian).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DibHeader {
    pub header_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression_method: u32,
    pub image_size: u32,
    pub horizontal_res: i32,
    pub vertical_res: i32,
    pub colors_in_palette: u32,
    pub important_colors: u32,
}

impl FileHeader {
    fn read<R: Read>(r: &mut R) -> StrataResult<Self> {
        let mut magic = [0u8; 2];
        read_header_bytes(r, &mut magic)?;
        if magic != BMP_MAGIC {
            return Err(StrataError::malformed_header(format!(
                "expected BM magic, found {:#04x} {:#04x}",
                magic[0], magic[1]
            )));
        }
        Ok(Self {
            file_size: read_u32(r)?,
            reserved: [read_u16(r)?, read_u16(r)?],
            pixel_data_offset: read_u32(r)?,
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> StrataResult<()> {
        w.write_all(&BMP_MAGIC)?;
        w.write_all(&self.file_size.to_le_bytes())?;
        w.write_all(&self.reserved[0].to_le_bytes())?;
        w.write_all(&self.reserved[1].to_le_bytes())?;
        w.write_all(&self.pixel_data_offset.to_le_bytes())?;
        Ok(())
    }
}

impl DibHeader {
    fn read<R: Read>(r: &mut R) -> StrataResult<Self> {
        Ok(Self {
            header_size: read_u32(r)?,
            width: read_i32(r)?,
            height: read_i32(r)?,
            planes: read_u16(r)?,
            bits_per_pixel: read_u16(r)?,
            compression_method: read_u32(r)?,
            image_size: read_u32(r)?,
            horizontal_res: read_i32(r)?,
            vertical_res: read_i32(r)?,
            colors_in_palette: read_u32(r)?,
            important_colors: read_u32(r)?,
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> StrataResult<()> {
        w.write_all(&self.header_size.to_le_bytes())?;
        w.write_all(&self.width.to_le_bytes())?;
        w.write_all(&self.height.to_le_bytes())?;
        w.write_all(&self.planes.to_le_bytes())?;
        w.write_all(&self.bits_per_pixel.to_le_bytes())?;
        w.write_all(&self.compression_method.to_le_bytes())?;
        w.write_all(&self.image_size.to_le_bytes())?;
        w.write_all(&self.horizontal_res.to_le_bytes())?;
        w.write_all(&self.vertical_res.to_le_bytes())?;
        w.write_all(&self.colors_in_palette.to_le_bytes())?;
        w.write_all(&self.important_colors.to_le_bytes())?;
        Ok(())
    }
}

/// Trailing filler bytes per row: BMP rows occupy a multiple of 4 bytes.
pub fn row_padding(width: u32) -> u32 {
    let rem = (u64::from(width) * 3 % 4) as u32;
    if rem == 0 { 0 } else { 4 - rem }
}

/// Decodes a 24bpp uncompressed BMP stream into an [`Image`] holding one
/// layer. Validation failures surface before any pixel is read; no partial
/// image is ever returned.
#[tracing::instrument(skip_all)]
pub fn decode<R: Read + Seek>(reader: &mut R) -> StrataResult<Image> {
    let file_header = FileHeader::read(reader)?;
    let dib_header = DibHeader::read(reader)?;

    if dib_header.compression_method != 0 {
        return Err(StrataError::UnsupportedCompression(
            dib_header.compression_method,
        ));
    }
    if dib_header.bits_per_pixel != 24 {
        return Err(StrataError::UnsupportedBitDepth(dib_header.bits_per_pixel));
    }
    if dib_header.width <= 0 || dib_header.height <= 0 {
        return Err(StrataError::malformed_header(format!(
            "non-positive dimensions {}x{}",
            dib_header.width, dib_header.height
        )));
    }

    let width = dib_header.width as u32;
    let height = dib_header.height as u32;
    let padding = row_padding(width) as usize;

    reader.seek(SeekFrom::Start(u64::from(file_header.pixel_data_offset)))?;

    let mut buffer = crate::buffer::PixelBuffer::new(width, height)?;
    let mut row_bytes = vec![0u8; width as usize * 3 + padding];
    for row in 0..height {
        reader.read_exact(&mut row_bytes)?;
        for col in 0..width {
            let i = col as usize * 3;
            // File order is B,G,R.
            buffer.set(
                row,
                col,
                Pixel::new(row_bytes[i + 2], row_bytes[i + 1], row_bytes[i]),
            );
        }
    }

    tracing::debug!(width, height, padding, "decoded bmp pixel data");
    Image::from_decoded(file_header, dib_header, buffer)
}

/// Encodes the top layer of `image` as 24bpp uncompressed BMP. The stored
/// headers are written verbatim; only width and height are refreshed from
/// the layer being written. Multi-layer flattening is the caller's
/// responsibility; only the top layer is serialized.
#[tracing::instrument(skip_all)]
pub fn encode<W: Write + Seek>(image: &Image, writer: &mut W) -> StrataResult<()> {
    let layer = image
        .layers
        .top()
        .ok_or_else(|| StrataError::layer_not_found("image has no layers to encode"))?;

    let width = layer.width();
    let height = layer.height();
    let padding = row_padding(width);

    let file_header = image.file_header;
    let mut dib_header = image.dib_header;
    dib_header.width = width as i32;
    dib_header.height = height as i32;

    file_header.write(writer)?;
    dib_header.write(writer)?;

    // Header and pixel regions may be non-adjacent per the declared offset.
    writer.seek(SeekFrom::Start(u64::from(file_header.pixel_data_offset)))?;

    let mut row_bytes = vec![0u8; width as usize * 3 + padding as usize];
    for row in 0..height {
        for col in 0..width {
            let px = layer.get(row, col);
            let i = col as usize * 3;
            row_bytes[i] = px.b;
            row_bytes[i + 1] = px.g;
            row_bytes[i + 2] = px.r;
        }
        // Padding stays zero-filled.
        writer.write_all(&row_bytes)?;
    }

    tracing::debug!(width, height, padding, "encoded bmp pixel data");
    Ok(())
}

fn read_header_bytes<R: Read>(r: &mut R, buf: &mut [u8]) -> StrataResult<()> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            StrataError::malformed_header("stream too short for BMP headers")
        } else {
            StrataError::Io(e)
        }
    })
}

fn read_u16<R: Read>(r: &mut R) -> StrataResult<u16> {
    let mut b = [0u8; 2];
    read_header_bytes(r, &mut b)?;
    Ok(u16::from_le_bytes(b))
}

fn read_u32<R: Read>(r: &mut R) -> StrataResult<u32> {
    let mut b = [0u8; 4];
    read_header_bytes(r, &mut b)?;
    Ok(u32::from_le_bytes(b))
}

fn read_i32<R: Read>(r: &mut R) -> StrataResult<i32> {
    let mut b = [0u8; 4];
    read_header_bytes(r, &mut b)?;
    Ok(i32::from_le_bytes(b))
}
