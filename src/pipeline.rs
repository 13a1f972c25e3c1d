//! Caller-facing pipeline description: a JSON list of named operations with
//! parameters, parsed into a closed op enum and applied in order to one
//! pixel buffer. Composition (which ops, in which order, on which layers)
//! stays the caller's responsibility.

use crate::buffer::PixelBuffer;
use crate::convolve;
use crate::error::{StrataError, StrataResult};
use crate::pixel;

/// One operation as described by the caller, e.g. parsed from JSON:
/// `{ "kind": "contrast", "params": { "factor": 1.2 } }`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OpInstance {
    pub kind: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// A whole pipeline file: ops applied top to bottom.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct PipelineSpec {
    pub ops: Vec<OpInstance>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PixelOp {
    Invert,
    Grayscale,
    Contrast { factor: f32 },
    IsolateRed,
    Glitch,
    HueRotate { degrees: f32 },
    GaussianBlur,
    Sharpen,
}

pub fn parse_op(inst: &OpInstance) -> StrataResult<PixelOp> {
    let kind = inst.kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(StrataError::validation("op kind must be non-empty"));
    }

    match kind.as_str() {
        "invert" => Ok(PixelOp::Invert),
        "grayscale" | "grayscale_luma" | "bw" => Ok(PixelOp::Grayscale),
        "contrast" => {
            let factor = get_f32(&inst.params, "factor")?;
            if factor < 0.0 {
                return Err(StrataError::validation("contrast.factor must be >= 0"));
            }
            Ok(PixelOp::Contrast { factor })
        }
        "isolatered" | "isolate_red" | "isolate-red" => Ok(PixelOp::IsolateRed),
        "glitch" | "bit_transform" => Ok(PixelOp::Glitch),
        "huerotate" | "hue_rotate" | "hue-rotate" => {
            let degrees = get_f32(&inst.params, "degrees")?;
            Ok(PixelOp::HueRotate { degrees })
        }
        "blur" | "gaussian_blur" => Ok(PixelOp::GaussianBlur),
        "sharpen" => Ok(PixelOp::Sharpen),
        _ => Err(StrataError::validation(format!("unknown op kind '{kind}'"))),
    }
}

pub fn parse_pipeline(spec: &PipelineSpec) -> StrataResult<Vec<PixelOp>> {
    spec.ops.iter().map(parse_op).collect()
}

/// Applies `ops` in order to `buffer`.
#[tracing::instrument(skip_all, fields(ops = ops.len()))]
pub fn run_pipeline(buffer: &mut PixelBuffer, ops: &[PixelOp]) {
    for op in ops {
        match *op {
            PixelOp::Invert => buffer.map(pixel::invert),
            PixelOp::Grayscale => buffer.map(pixel::grayscale_luma),
            PixelOp::Contrast { factor } => buffer.map(|p| pixel::contrast(p, factor)),
            PixelOp::IsolateRed => buffer.map(pixel::isolate_red),
            PixelOp::Glitch => buffer.map(pixel::bit_transform),
            PixelOp::HueRotate { degrees } => buffer.map(|p| pixel::hue_rotate(p, degrees)),
            PixelOp::GaussianBlur => *buffer = convolve::gaussian_blur(buffer),
            PixelOp::Sharpen => {
                let (sharpened, _stats) = convolve::sharpen(buffer);
                *buffer = sharpened;
            }
        }
    }
}

fn get_f32(params: &serde_json::Value, key: &str) -> StrataResult<f32> {
    let Some(v) = params.get(key) else {
        return Err(StrataError::validation(format!("missing op param '{key}'")));
    };
    let Some(n) = v.as_f64() else {
        return Err(StrataError::validation(format!(
            "op param '{key}' must be a number"
        )));
    };
    let n = n as f32;
    if !n.is_finite() {
        return Err(StrataError::validation(format!(
            "op param '{key}' must be finite"
        )));
    }
    Ok(n)
}
