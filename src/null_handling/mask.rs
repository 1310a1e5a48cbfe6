//! Encoding of per-row presence codes.
//!
//! A mask is only written when at least one row is not present. It is
//! run-length encoded when that is strictly smaller than the raw codes, and
//! written as a plain byte array otherwise.

use crate::bridge::format::EncodedData;
use crate::error::CifError;
use crate::pipeline::{decode_data, Encoder, Operation};
use crate::types::{TypedArray, ValuePresence};

pub fn encode_mask(codes: &[u8]) -> Result<EncodedData, CifError> {
    let rle = Encoder::by(Operation::RunLength)
        .and(Operation::ByteArray)
        .build()?
        .encode(TypedArray::Uint8(codes.to_vec()))?;

    let use_rle = rle.data.len() < codes.len();
    crate::log_metric!(
        "event" = "mask_encoding",
        "rows" = codes.len(),
        "rle_bytes" = rle.data.len(),
        "form" = if use_rle { "run_length" } else { "byte_array" },
    );

    if use_rle {
        Ok(rle)
    } else {
        Encoder::by(Operation::ByteArray)
            .build()?
            .encode(TypedArray::Uint8(codes.to_vec()))
    }
}

/// Decodes a mask into one presence state per row.
///
/// # Errors
/// Returns `CifError::MalformedEncoding` if the mask does not decode to
/// integers or holds a code outside `0..=2`.
pub fn decode_mask(mask: &EncodedData) -> Result<Vec<ValuePresence>, CifError> {
    let codes = decode_data(mask)?.to_i32_vec().ok_or_else(|| {
        CifError::MalformedEncoding("presence mask did not decode to integers".to_string())
    })?;

    codes
        .into_iter()
        .map(|code| {
            u8::try_from(code)
                .ok()
                .and_then(ValuePresence::from_code)
                .ok_or_else(|| {
                    CifError::MalformedEncoding(format!("unknown presence code {}", code))
                })
        })
        .collect()
}
