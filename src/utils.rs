//! This module provides a set of shared, low-level utility functions used
//! throughout the bincif core.
//!
//! Its primary responsibilities include:
//! 1.  Providing validated conversions between raw little-endian byte slices and typed vectors.
//! 2.  Rounding with the same half-up policy the wire format was defined against.
//! 3.  Normalizing data block headers.

use crate::error::CifError;
use crate::traits::WireElement;

//==================================================================================
// 1. Core Utility Functions
//==================================================================================

/// Serializes a typed slice into a little-endian byte vector.
pub fn typed_slice_to_le_bytes<T: WireElement>(data: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * T::WIDTH);
    for &value in data {
        value.write_le(&mut out);
    }
    out
}

/// Reads a little-endian byte slice back into a typed vector.
///
/// # Errors
/// Returns `CifError::BufferMismatch` if the byte slice length is not
/// perfectly divisible by the width of the target type `T`.
pub fn le_bytes_to_vec<T: WireElement>(bytes: &[u8]) -> Result<Vec<T>, CifError> {
    if bytes.len() % T::WIDTH != 0 {
        return Err(CifError::BufferMismatch(T::WIDTH, bytes.len()));
    }
    Ok(bytes.chunks_exact(T::WIDTH).map(T::read_le).collect())
}

/// Rounds half-up (`floor(x + 0.5)`), so `-2.5` becomes `-2` rather than `-3`.
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Strips spaces, tabs and newlines from a data block header and upper-cases it.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n'))
        .collect::<String>()
        .to_uppercase()
}
