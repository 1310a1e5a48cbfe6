//! This module contains the pure, stateless kernels for the terminal
//! `ByteArray` transform: little-endian fixed-width packing of a numeric array.
//!
//! Every encoder chain must end in a transform that produces bytes, and this
//! kernel is the one all the others ultimately delegate to.

use crate::bridge::format::Encoding;
use crate::error::CifError;
use crate::traits::WireElement;
use crate::types::{DataType, TypedArray};
use crate::utils::{le_bytes_to_vec, typed_slice_to_le_bytes};

//==================================================================================
// 1. Core Logic
//==================================================================================

fn pack<T: WireElement>(values: &[T]) -> (Vec<u8>, Encoding) {
    (
        typed_slice_to_le_bytes(values),
        Encoding::ByteArray {
            data_type: T::DATA_TYPE,
        },
    )
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Packs a numeric array into little-endian bytes and describes its element type.
pub fn encode(input: &TypedArray) -> Result<(Vec<u8>, Encoding), CifError> {
    match input {
        TypedArray::Int8(v) => Ok(pack(v)),
        TypedArray::Int16(v) => Ok(pack(v)),
        TypedArray::Int32(v) => Ok(pack(v)),
        TypedArray::Uint8(v) => Ok(pack(v)),
        TypedArray::Uint16(v) => Ok(pack(v)),
        TypedArray::Float32(v) => Ok(pack(v)),
        TypedArray::Float64(v) => Ok(pack(v)),
        TypedArray::Strings(_) => Err(CifError::UnsupportedType(
            "ByteArray requires a numeric array, got String".to_string(),
        )),
    }
}

/// Reinterprets `bytes` as an array of the declared element type.
///
/// # Errors
/// Returns `CifError::BufferMismatch` if the byte length is not a multiple of
/// the element width.
pub fn decode(data_type: DataType, bytes: &[u8]) -> Result<TypedArray, CifError> {
    Ok(match data_type {
        DataType::Int8 => TypedArray::Int8(le_bytes_to_vec::<i8>(bytes)?),
        DataType::Int16 => TypedArray::Int16(le_bytes_to_vec::<i16>(bytes)?),
        DataType::Int32 => TypedArray::Int32(le_bytes_to_vec::<i32>(bytes)?),
        DataType::Uint8 => TypedArray::Uint8(bytes.to_vec()),
        DataType::Uint16 => TypedArray::Uint16(le_bytes_to_vec::<u16>(bytes)?),
        DataType::Float32 => TypedArray::Float32(le_bytes_to_vec::<f32>(bytes)?),
        DataType::Float64 => TypedArray::Float64(le_bytes_to_vec::<f64>(bytes)?),
    })
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int16_is_packed_little_endian() {
        let (bytes, enc) = encode(&TypedArray::Int16(vec![1, -1])).unwrap();
        assert_eq!(bytes, vec![0x01, 0x00, 0xff, 0xff]);
        assert_eq!(
            enc,
            Encoding::ByteArray {
                data_type: DataType::Int16
            }
        );
    }

    #[test]
    fn test_float64_roundtrip() {
        let original = TypedArray::Float64(vec![1.5, -0.25, f64::MAX]);
        let (bytes, _) = encode(&original).unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(decode(DataType::Float64, &bytes).unwrap(), original);
    }

    #[test]
    fn test_decode_length_mismatch() {
        let result = decode(DataType::Int32, &[0, 0, 0]);
        assert!(matches!(result, Err(CifError::BufferMismatch(4, 3))));
    }

    #[test]
    fn test_strings_are_rejected() {
        let result = encode(&TypedArray::from(vec!["a"]));
        assert!(matches!(result, Err(CifError::UnsupportedType(_))));
    }
}
