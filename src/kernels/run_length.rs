//! This module contains the pure, stateless kernels for Run-Length Encoding.
//!
//! The output is a flat `Int32` sequence of `(value, count)` pairs. The source
//! integer type and the expanded length are recorded in the descriptor so the
//! decoder can restore the exact array and validate the pairs against it.
//! Non-integer sources are coerced to `Int32` first.

use crate::bridge::format::Encoding;
use crate::error::CifError;
use crate::types::{IntDataType, TypedArray};

//==================================================================================
// 1. Core Logic
//==================================================================================

fn runs(values: &[i32]) -> Vec<i32> {
    let mut out = Vec::new();
    let Some((&first, rest)) = values.split_first() else {
        return out;
    };

    let mut current = first;
    let mut run: i32 = 1;
    for &v in rest {
        if v == current {
            run += 1;
        } else {
            out.push(current);
            out.push(run);
            current = v;
            run = 1;
        }
    }
    out.push(current);
    out.push(run);
    out
}

//==================================================================================
// 2. Public API
//==================================================================================

pub fn encode(input: &TypedArray) -> Result<(Vec<i32>, Encoding), CifError> {
    let (values, src_type) = match input.kind().as_int_type() {
        Some(t) => (input.to_i32_vec().unwrap_or_default(), t),
        None => {
            let coerced = match input {
                TypedArray::Float32(v) => v.iter().map(|&x| x as i32).collect(),
                TypedArray::Float64(v) => v.iter().map(|&x| x as i32).collect(),
                other => {
                    return Err(CifError::UnsupportedType(format!(
                        "RunLength requires a numeric array, got {}",
                        other.kind()
                    )))
                }
            };
            (coerced, IntDataType::Int32)
        }
    };

    let descriptor = Encoding::RunLength {
        src_type,
        src_size: values.len(),
    };
    Ok((runs(&values), descriptor))
}

/// Expands `(value, count)` pairs back into an array of `src_type`.
///
/// # Errors
/// Returns `CifError::MalformedEncoding` if the pairs are odd in number, carry a
/// negative count, or expand to anything other than `src_size` values.
pub fn decode(
    pairs: &[i32],
    src_type: IntDataType,
    src_size: usize,
) -> Result<TypedArray, CifError> {
    if pairs.len() % 2 != 0 {
        return Err(CifError::MalformedEncoding(format!(
            "RunLength data has odd length {}",
            pairs.len()
        )));
    }

    // `src_size` comes off the wire; nothing is allocated until the pairs agree with it.
    let mut total: usize = 0;
    for pair in pairs.chunks_exact(2) {
        let count = pair[1];
        if count < 0 {
            return Err(CifError::MalformedEncoding(format!(
                "RunLength count {} is negative",
                count
            )));
        }
        total = total.saturating_add(count as usize);
        if total > src_size {
            return Err(CifError::MalformedEncoding(format!(
                "RunLength expands past srcSize {}",
                src_size
            )));
        }
    }
    if total != src_size {
        return Err(CifError::MalformedEncoding(format!(
            "RunLength decoded {} values, but srcSize is {}",
            total, src_size
        )));
    }

    let mut out = Vec::with_capacity(total);
    for pair in pairs.chunks_exact(2) {
        out.extend(std::iter::repeat(pair[0]).take(pair[1] as usize));
    }
    Ok(TypedArray::from_i32_values(src_type, out))
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_input_is_one_pair() {
        let (pairs, enc) = encode(&TypedArray::Int32(vec![7, 7, 7, 7])).unwrap();
        assert_eq!(pairs, vec![7, 4]);
        assert_eq!(
            enc,
            Encoding::RunLength {
                src_type: IntDataType::Int32,
                src_size: 4
            }
        );
        assert_eq!(
            decode(&pairs, IntDataType::Int32, 4).unwrap(),
            TypedArray::Int32(vec![7, 7, 7, 7])
        );
    }

    #[test]
    fn test_source_type_is_preserved() {
        let original = TypedArray::Uint8(vec![0, 0, 1, 2, 2, 2]);
        let (pairs, _) = encode(&original).unwrap();
        assert_eq!(pairs, vec![0, 2, 1, 1, 2, 3]);
        assert_eq!(decode(&pairs, IntDataType::Uint8, 6).unwrap(), original);
    }

    #[test]
    fn test_floats_are_coerced() {
        let (pairs, enc) = encode(&TypedArray::Float64(vec![1.9, 1.2, -3.0])).unwrap();
        assert_eq!(pairs, vec![1, 2, -3, 1]);
        assert!(matches!(
            enc,
            Encoding::RunLength {
                src_type: IntDataType::Int32,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_input() {
        let (pairs, enc) = encode(&TypedArray::Int16(vec![])).unwrap();
        assert!(pairs.is_empty());
        assert_eq!(
            enc,
            Encoding::RunLength {
                src_type: IntDataType::Int16,
                src_size: 0
            }
        );
        assert_eq!(
            decode(&[], IntDataType::Int16, 0).unwrap(),
            TypedArray::Int16(vec![])
        );
    }

    #[test]
    fn test_decode_size_mismatch_errors() {
        assert!(decode(&[5, 3], IntDataType::Int32, 4).is_err());
        assert!(decode(&[5, 3], IntDataType::Int32, 2).is_err());
        assert!(decode(&[5, -1], IntDataType::Int32, 0).is_err());
        assert!(decode(&[5], IntDataType::Int32, 1).is_err());
    }

    #[test]
    fn test_oversized_src_size_is_an_error() {
        assert!(matches!(
            decode(&[], IntDataType::Int32, usize::MAX / 2),
            Err(CifError::MalformedEncoding(_))
        ));
        assert!(matches!(
            decode(&[1, i32::MAX, 2, i32::MAX], IntDataType::Int32, usize::MAX),
            Err(CifError::MalformedEncoding(_))
        ));
    }
}
