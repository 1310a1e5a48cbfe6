//! Fixed-point quantization of float arrays: `out[i] = round(in[i] * factor)`.
//!
//! Lossy by design; the reconstruction error is bounded by `1 / (2 * factor)`.

use crate::bridge::format::Encoding;
use crate::error::CifError;
use crate::types::{FloatDataType, TypedArray};
use crate::utils::round_half_up;

/// Scales and rounds every value, recording `factor` and the source float width.
pub fn encode(input: &TypedArray, factor: f64) -> Result<(Vec<i32>, Encoding), CifError> {
    let (values, src_type): (Vec<f64>, _) = match input {
        TypedArray::Float32(v) => (v.iter().map(|&x| x as f64).collect(), FloatDataType::Float32),
        TypedArray::Float64(v) => (v.clone(), FloatDataType::Float64),
        other => {
            return Err(CifError::UnsupportedType(format!(
                "FixedPoint requires a float array, got {}",
                other.kind()
            )))
        }
    };

    let out = values
        .iter()
        .map(|&v| round_half_up(v * factor) as i32)
        .collect();
    Ok((out, Encoding::FixedPoint { factor, src_type }))
}

pub fn decode(values: &[i32], factor: f64, src_type: FloatDataType) -> TypedArray {
    match src_type {
        FloatDataType::Float32 => {
            TypedArray::Float32(values.iter().map(|&v| (v as f64 / factor) as f32).collect())
        }
        FloatDataType::Float64 => {
            TypedArray::Float64(values.iter().map(|&v| v as f64 / factor).collect())
        }
    }
}
