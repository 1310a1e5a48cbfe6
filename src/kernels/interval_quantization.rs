//! This module contains the kernels for interval quantization: mapping floats
//! in `[min, max]` onto `num_steps` evenly spaced integer indices.
//!
//! Values at or below `min` map to `0` and values at or above `max` map to
//! `num_steps`. Decoding clamps back into `[min, max]`, so the out-of-range
//! sentinel never escapes the interval. This transform is lossy; `num_steps`
//! bounds the error.

use crate::bridge::format::Encoding;
use crate::error::CifError;
use crate::types::{FloatDataType, TypedArray};
use crate::utils::round_half_up;

//==================================================================================
// 1. Public API
//==================================================================================

pub fn encode(
    input: &TypedArray,
    min: f64,
    max: f64,
    num_steps: u32,
) -> Result<(Vec<i32>, Encoding), CifError> {
    let (values, src_type): (Vec<f64>, _) = match input {
        TypedArray::Float32(v) => (v.iter().map(|&x| x as f64).collect(), FloatDataType::Float32),
        TypedArray::Float64(v) => (v.clone(), FloatDataType::Float64),
        other => {
            return Err(CifError::UnsupportedType(format!(
                "IntervalQuantization requires a float array, got {}",
                other.kind()
            )))
        }
    };

    let (min, max) = if max < min { (max, min) } else { (min, max) };
    let descriptor = Encoding::IntervalQuantization {
        min,
        max,
        num_steps,
        src_type,
    };
    if values.is_empty() {
        return Ok((Vec::new(), descriptor));
    }

    let delta = (max - min) / (num_steps as f64 - 1.0);
    let out = values
        .iter()
        .map(|&v| {
            if v <= min {
                0
            } else if v >= max {
                num_steps as i32
            } else {
                round_half_up((v - min) / delta) as i32
            }
        })
        .collect();

    Ok((out, descriptor))
}

pub fn decode(
    values: &[i32],
    min: f64,
    max: f64,
    num_steps: u32,
    src_type: FloatDataType,
) -> Result<TypedArray, CifError> {
    if num_steps < 2 {
        return Err(CifError::MalformedEncoding(format!(
            "IntervalQuantization needs at least 2 steps, got {}",
            num_steps
        )));
    }
    let (min, max) = if max < min { (max, min) } else { (min, max) };
    let delta = (max - min) / (num_steps as f64 - 1.0);
    let restore = |idx: i32| (idx as f64 * delta + min).clamp(min, max);

    Ok(match src_type {
        FloatDataType::Float32 => {
            TypedArray::Float32(values.iter().map(|&i| restore(i) as f32).collect())
        }
        FloatDataType::Float64 => TypedArray::Float64(values.iter().map(|&i| restore(i)).collect()),
    })
}

//==================================================================================
// 2. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_values() {
        let (min, max, steps) = (1.0, 11.0, 101u32);
        let input = TypedArray::Float64(vec![min - 1.0, min, (min + max) / 2.0, max, max + 1.0]);
        let (out, _) = encode(&input, min, max, steps).unwrap();
        let mid = round_half_up((steps as f64 - 1.0) / 2.0) as i32;
        assert_eq!(out, vec![0, 0, mid, steps as i32, steps as i32]);
    }

    #[test]
    fn test_swapped_bounds_are_normalized() {
        let (out, enc) = encode(&TypedArray::Float64(vec![0.5]), 1.0, 0.0, 3).unwrap();
        assert_eq!(out, vec![1]);
        assert!(matches!(
            enc,
            Encoding::IntervalQuantization { min, max, .. } if min == 0.0 && max == 1.0
        ));
    }

    #[test]
    fn test_empty_input() {
        let (out, enc) = encode(&TypedArray::Float32(vec![]), 0.0, 1.0, 10).unwrap();
        assert!(out.is_empty());
        assert!(matches!(
            enc,
            Encoding::IntervalQuantization {
                src_type: FloatDataType::Float32,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_clamps_sentinel() {
        let restored = decode(&[0, 2, 4, 5], 0.0, 1.0, 5, FloatDataType::Float64).unwrap();
        assert_eq!(restored, TypedArray::Float64(vec![0.0, 0.5, 1.0, 1.0]));
    }

    #[test]
    fn test_decode_rejects_single_step() {
        assert!(decode(&[0], 0.0, 1.0, 1, FloatDataType::Float64).is_err());
    }
}
