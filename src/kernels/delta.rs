//! This module contains the pure, stateless kernels for delta encoding.
//!
//! The first element is moved into the descriptor as `origin` so the output
//! always starts at zero, which makes a following run-length step cheaper.
//! Arithmetic wraps at the width of the source type, exactly like a
//! fixed-width store, so every integer array round-trips bit-for-bit.

use crate::bridge::format::Encoding;
use crate::error::CifError;
use crate::types::{IntDataType, TypedArray};

//==================================================================================
// 1. Public API
//==================================================================================

pub fn encode(input: &TypedArray) -> Result<(TypedArray, Encoding), CifError> {
    let (values, src_type) = match (input.to_i32_vec(), input.kind().as_int_type()) {
        (Some(values), Some(src_type)) => (values, src_type),
        _ => {
            return Err(CifError::UnsupportedType(format!(
                "Delta requires an integer array, got {}",
                input.kind()
            )))
        }
    };

    let Some(&origin) = values.first() else {
        return Ok((
            TypedArray::from_i32_values(src_type, Vec::new()),
            Encoding::Delta {
                origin: 0,
                src_type,
            },
        ));
    };

    let mut out = Vec::with_capacity(values.len());
    out.push(0);
    out.extend(values.windows(2).map(|w| w[1].wrapping_sub(w[0])));

    Ok((
        TypedArray::from_i32_values(src_type, out),
        Encoding::Delta { origin, src_type },
    ))
}

/// Rebuilds the source array by a cumulative sum seeded with `origin`.
pub fn decode(
    input: &TypedArray,
    origin: i32,
    src_type: IntDataType,
) -> Result<TypedArray, CifError> {
    let deltas = input.to_i32_vec().ok_or_else(|| {
        CifError::MalformedEncoding(format!(
            "Delta expects integer data, got {}",
            input.kind()
        ))
    })?;
    if deltas.is_empty() {
        return Ok(TypedArray::from_i32_values(src_type, deltas));
    }

    let mut acc = origin;
    let mut out = Vec::with_capacity(deltas.len());
    out.push(acc);
    for &d in &deltas[1..] {
        acc = acc.wrapping_add(d);
        out.push(acc);
    }
    Ok(TypedArray::from_i32_values(src_type, out))
}
