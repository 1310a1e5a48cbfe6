//! This module contains the kernels for integer packing: storing an `Int32`
//! array in 1- or 2-byte words by splitting large values into chains of
//! saturated "carry" tokens followed by a remainder.
//!
//! The word width is chosen automatically from the exact packed sizes. The
//! comparison between candidates is made on byte counts and must stay that
//! way: readers of existing files rely on the same choice being made.
//!
//! A 4-byte choice performs no packing at all and emits a plain `Int32`
//! `ByteArray` with no `IntegerPacking` descriptor.

use crate::bridge::format::Encoding;
use crate::error::CifError;
use crate::kernels::byte_array;
use crate::types::TypedArray;

const INT8_UPPER: i32 = 0x7F;
const UINT8_UPPER: i32 = 0xFF;
const INT16_UPPER: i32 = 0x7FFF;
const UINT16_UPPER: i32 = 0xFFFF;

//==================================================================================
// 1. Width Selection
//==================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packing {
    pub is_signed: bool,
    /// Number of packed elements.
    pub size: usize,
    pub bytes_per_element: u8,
}

/// Token count of a chain: one saturated token per full `limit`, plus the remainder.
fn packed_size_unsigned(values: &[i32], upper: i32) -> usize {
    values.iter().map(|&v| (v / upper) as usize + 1).sum()
}

fn packed_size_signed(values: &[i32], upper: i32) -> usize {
    let lower = -upper - 1;
    values
        .iter()
        .map(|&v| {
            if v >= 0 {
                (v / upper) as usize + 1
            } else {
                (v / lower) as usize + 1
            }
        })
        .sum()
}

pub fn determine_packing(values: &[i32]) -> Packing {
    let is_signed = values.iter().any(|&v| v < 0);
    let (size8, size16) = if is_signed {
        (
            packed_size_signed(values, INT8_UPPER),
            packed_size_signed(values, INT16_UPPER),
        )
    } else {
        (
            packed_size_unsigned(values, UINT8_UPPER),
            packed_size_unsigned(values, UINT16_UPPER),
        )
    };

    let packing = if values.len() * 4 < size16 * 2 {
        Packing {
            is_signed,
            size: values.len(),
            bytes_per_element: 4,
        }
    } else if size16 * 2 < size8 {
        Packing {
            is_signed,
            size: size16,
            bytes_per_element: 2,
        }
    } else {
        Packing {
            is_signed,
            size: size8,
            bytes_per_element: 1,
        }
    };

    crate::log_metric!(
        "event" = "integer_packing",
        "values" = values.len(),
        "size8" = size8,
        "size16" = size16,
        "bytes_per_element" = packing.bytes_per_element,
        "signed" = is_signed,
    );
    packing
}

//==================================================================================
// 2. Core Logic
//==================================================================================

/// Emits each value as saturated tokens followed by the remainder.
fn pack_tokens(values: &[i32], upper: i32, signed: bool, size: usize) -> Vec<i32> {
    let lower = -upper - 1;
    let mut tokens = Vec::with_capacity(size);
    for &v in values {
        let mut value = v;
        if value >= 0 {
            while value >= upper {
                tokens.push(upper);
                value -= upper;
            }
        } else if signed {
            while value <= lower {
                tokens.push(lower);
                value -= lower;
            }
        }
        tokens.push(value);
    }
    tokens
}

/// Sums each chain of saturated tokens into one value.
fn unpack_tokens(
    tokens: &[i32],
    upper: i32,
    lower: Option<i32>,
    src_size: usize,
) -> Result<Vec<i32>, CifError> {
    let is_carry = |t: i32| t == upper || Some(t) == lower;
    // Every value ends in one non-carry token, so the tokens bound the output.
    let mut out = Vec::with_capacity(src_size.min(tokens.len()));
    let mut acc: i32 = 0;
    let mut open = false;
    for &t in tokens {
        acc = acc.wrapping_add(t);
        if is_carry(t) {
            open = true;
        } else {
            out.push(acc);
            acc = 0;
            open = false;
        }
    }

    if open {
        return Err(CifError::MalformedEncoding(
            "IntegerPacking data ends inside a carry chain".to_string(),
        ));
    }
    if out.len() != src_size {
        return Err(CifError::MalformedEncoding(format!(
            "IntegerPacking decoded {} values, but srcSize is {}",
            out.len(),
            src_size
        )));
    }
    Ok(out)
}

//==================================================================================
// 3. Public API
//==================================================================================

/// Packs `values` into bytes. The returned descriptors are in application
/// order: `IntegerPacking` then `ByteArray`, or a lone `ByteArray` for the
/// unpacked 4-byte case.
pub fn encode(values: &[i32]) -> Result<(Vec<u8>, Vec<Encoding>), CifError> {
    let packing = determine_packing(values);

    let packed = match (packing.bytes_per_element, packing.is_signed) {
        (4, _) => {
            let (bytes, enc) = byte_array::encode(&TypedArray::Int32(values.to_vec()))?;
            return Ok((bytes, vec![enc]));
        }
        (1, true) => TypedArray::Int8(
            pack_tokens(values, INT8_UPPER, true, packing.size)
                .into_iter()
                .map(|t| t as i8)
                .collect(),
        ),
        (1, false) => TypedArray::Uint8(
            pack_tokens(values, UINT8_UPPER, false, packing.size)
                .into_iter()
                .map(|t| t as u8)
                .collect(),
        ),
        (_, true) => TypedArray::Int16(
            pack_tokens(values, INT16_UPPER, true, packing.size)
                .into_iter()
                .map(|t| t as i16)
                .collect(),
        ),
        (_, false) => TypedArray::Uint16(
            pack_tokens(values, UINT16_UPPER, false, packing.size)
                .into_iter()
                .map(|t| t as u16)
                .collect(),
        ),
    };

    let (bytes, byte_enc) = byte_array::encode(&packed)?;
    Ok((
        bytes,
        vec![
            Encoding::IntegerPacking {
                byte_count: packing.bytes_per_element,
                is_unsigned: !packing.is_signed,
                src_size: values.len(),
            },
            byte_enc,
        ],
    ))
}

/// Restores the `Int32` array from packed words. The word width and
/// signedness come from the array produced by the preceding `ByteArray` step.
pub fn decode(input: &TypedArray, src_size: usize) -> Result<TypedArray, CifError> {
    let tokens = input.to_i32_vec().ok_or_else(|| {
        CifError::MalformedEncoding(format!(
            "IntegerPacking expects integer data, got {}",
            input.kind()
        ))
    })?;

    let out = match input {
        TypedArray::Int8(_) => unpack_tokens(&tokens, INT8_UPPER, Some(-INT8_UPPER - 1), src_size)?,
        TypedArray::Uint8(_) => unpack_tokens(&tokens, UINT8_UPPER, None, src_size)?,
        TypedArray::Int16(_) => {
            unpack_tokens(&tokens, INT16_UPPER, Some(-INT16_UPPER - 1), src_size)?
        }
        TypedArray::Uint16(_) => unpack_tokens(&tokens, UINT16_UPPER, None, src_size)?,
        _ => {
            if tokens.len() != src_size {
                return Err(CifError::MalformedEncoding(format!(
                    "IntegerPacking passthrough has {} values, but srcSize is {}",
                    tokens.len(),
                    src_size
                )));
            }
            tokens
        }
    };
    Ok(TypedArray::Int32(out))
}

//==================================================================================
// 4. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn roundtrip(values: &[i32]) -> TypedArray {
        let (bytes, encodings) = encode(values).unwrap();
        let Encoding::ByteArray { data_type } = encodings[encodings.len() - 1] else {
            panic!("last descriptor must be ByteArray");
        };
        let packed = byte_array::decode(data_type, &bytes).unwrap();
        match encodings[0] {
            Encoding::IntegerPacking { src_size, .. } => decode(&packed, src_size).unwrap(),
            _ => packed,
        }
    }

    #[test]
    fn test_all_zero_selects_unsigned_single_byte() {
        let values = vec![0; 1000];
        let packing = determine_packing(&values);
        assert_eq!(
            packing,
            Packing {
                is_signed: false,
                size: 1000,
                bytes_per_element: 1
            }
        );
        let (bytes, encodings) = encode(&values).unwrap();
        assert_eq!(bytes.len(), 1000);
        assert_eq!(
            encodings,
            vec![
                Encoding::IntegerPacking {
                    byte_count: 1,
                    is_unsigned: true,
                    src_size: 1000
                },
                Encoding::ByteArray {
                    data_type: DataType::Uint8
                }
            ]
        );
    }

    #[test]
    fn test_large_value_selects_plain_int32() {
        let values = vec![100_000_000, 0, 0, 0];
        assert_eq!(determine_packing(&values).bytes_per_element, 4);
        let (bytes, encodings) = encode(&values).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(
            encodings,
            vec![Encoding::ByteArray {
                data_type: DataType::Int32
            }]
        );
    }

    #[test]
    fn test_single_moderate_value_stays_packed() {
        // size8 = 393 + 999 tokens (1392 bytes) beats size16 = 2 + 999 tokens (2002 bytes).
        let mut values = vec![0; 1000];
        values[0] = 100_000;
        let packing = determine_packing(&values);
        assert_eq!(packing.bytes_per_element, 1);
        assert_eq!(packing.size, 1392);
        assert_eq!(roundtrip(&values), TypedArray::Int32(values));
    }

    #[test]
    fn test_wide_values_select_two_bytes() {
        let values: Vec<i32> = (0..100).map(|i| 1000 + i * 300).collect();
        let packing = determine_packing(&values);
        assert_eq!(packing.bytes_per_element, 2);
        assert!(!packing.is_signed);
        assert_eq!(roundtrip(&values), TypedArray::Int32(values));
    }

    #[test]
    fn test_carry_chain_tokens() {
        assert_eq!(pack_tokens(&[300], UINT8_UPPER, false, 2), vec![255, 45]);
        assert_eq!(pack_tokens(&[255], UINT8_UPPER, false, 2), vec![255, 0]);
        assert_eq!(pack_tokens(&[-300], INT8_UPPER, true, 4), vec![-128, -128, -44]);
        assert_eq!(packed_size_unsigned(&[255, 254, 510], UINT8_UPPER), 2 + 1 + 3);
        assert_eq!(packed_size_signed(&[-128, 127, -1], INT8_UPPER), 2 + 2 + 1);
    }

    #[test]
    fn test_roundtrip_mixed_signs_and_limits() {
        let values = vec![0, 127, -128, 128, -129, 32767, -32768, 65535, i32::MAX, i32::MIN];
        assert_eq!(roundtrip(&values), TypedArray::Int32(values));
    }

    #[test]
    fn test_roundtrip_random_small_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<i32> = (0..2000).map(|_| rng.random_range(-300..300)).collect();
        assert_eq!(roundtrip(&values), TypedArray::Int32(values));
    }

    #[test]
    fn test_decode_detects_truncated_chain() {
        let result = decode(&TypedArray::Uint8(vec![1, 255]), 2);
        assert!(matches!(result, Err(CifError::MalformedEncoding(_))));
        let result = decode(&TypedArray::Uint8(vec![1, 2]), 3);
        assert!(matches!(result, Err(CifError::MalformedEncoding(_))));
    }

    #[test]
    fn test_decode_oversized_src_size_is_an_error() {
        let result = decode(&TypedArray::Uint8(vec![1, 2]), usize::MAX / 2);
        assert!(matches!(result, Err(CifError::MalformedEncoding(_))));
        let result = decode(&TypedArray::Int16(vec![]), usize::MAX);
        assert!(matches!(result, Err(CifError::MalformedEncoding(_))));
    }
}
