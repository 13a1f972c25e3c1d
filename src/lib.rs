//! Strata is a layered BMP image-processing engine.
//!
//! It decodes uncompressed 24-bit BMP rasters into owned pixel buffers,
//! applies per-pixel color transforms, separable convolution filters, and
//! channel-wise blend compositing over an ordered layer stack, then
//! re-encodes the result as BMP.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: byte stream -> [`Image`] (headers + one initial layer)
//! 2. **Transform**: [`pixel`] maps, [`convolve`] filters, [`blend`] ops
//!    over [`PixelBuffer`] layers in a [`LayerStack`]
//! 3. **Encode**: top layer -> byte stream (multi-layer flattening is the
//!    caller's responsibility)
//!
//! Every operation runs to completion on exclusively-owned buffers; the
//! crate never spawns threads, never retries, and never exits the process.
#![forbid(unsafe_code)]

pub mod blend;
pub mod bmp;
pub mod buffer;
pub mod convolve;
pub mod error;
pub mod image;
pub mod layers;
pub mod pipeline;
pub mod pixel;

pub use blend::{BlendMode, blend_mode, combine};
pub use bmp::{DibHeader, FileHeader, row_padding};
pub use buffer::PixelBuffer;
pub use convolve::{SharpenStats, gaussian_blur, sharpen};
pub use error::{StrataError, StrataResult};
pub use image::Image;
pub use layers::{LayerId, LayerStack};
pub use pipeline::{OpInstance, PipelineSpec, PixelOp, parse_op, parse_pipeline, run_pipeline};
pub use pixel::{Hsl, Pixel};
