//! This module serves as the public API and dispatcher for the collection of all
//! pure, stateless transform kernels.
//!
//! It declares all kernel sub-modules and provides one dispatcher for each
//! direction. `dispatch_encode` takes an `Operation` from an encoder chain and
//! the current array; `dispatch_decode` takes one wire `Encoding` descriptor and
//! the array produced by the step after it. These dispatchers are the sole entry
//! points for the `pipeline` module.

use crate::bridge::format::Encoding;
use crate::error::CifError;
use crate::pipeline::models::Operation;
use crate::types::TypedArray;

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Terminal transform: typed array to little-endian bytes.
pub mod byte_array;

/// Lossy float transforms.
pub mod fixed_point;
pub mod interval_quantization;

/// Integer value reduction.
pub mod delta;
pub mod run_length;

/// Width reduction.
pub mod integer_packing;

/// Dictionary encoding for strings.
pub mod string_array;

//==================================================================================
// 2. Public API (Unified Dispatchers)
//==================================================================================

/// Applies one operation, returning the transformed array and the descriptors
/// it emitted in application order.
pub fn dispatch_encode(
    op: &Operation,
    input: &TypedArray,
) -> Result<(TypedArray, Vec<Encoding>), CifError> {
    log::debug!(
        "encode step {:?} over {} {} values",
        op,
        input.len(),
        input.kind()
    );

    match op {
        Operation::ByteArray => {
            let (bytes, enc) = byte_array::encode(input)?;
            Ok((TypedArray::Uint8(bytes), vec![enc]))
        }
        Operation::FixedPoint { factor } => {
            let (out, enc) = fixed_point::encode(input, *factor)?;
            Ok((TypedArray::Int32(out), vec![enc]))
        }
        Operation::IntervalQuantization {
            min,
            max,
            num_steps,
        } => {
            let (out, enc) = interval_quantization::encode(input, *min, *max, *num_steps)?;
            Ok((TypedArray::Int32(out), vec![enc]))
        }
        Operation::RunLength => {
            let (out, enc) = run_length::encode(input)?;
            Ok((TypedArray::Int32(out), vec![enc]))
        }
        Operation::Delta => {
            let (out, enc) = delta::encode(input)?;
            Ok((out, vec![enc]))
        }
        Operation::IntegerPacking => {
            let TypedArray::Int32(values) = input else {
                return Err(CifError::UnsupportedType(format!(
                    "IntegerPacking requires an Int32 array, got {}",
                    input.kind()
                )));
            };
            let (bytes, encodings) = integer_packing::encode(values)?;
            Ok((TypedArray::Uint8(bytes), encodings))
        }
        Operation::StringArray => {
            let (bytes, enc) = string_array::encode(input)?;
            Ok((TypedArray::Uint8(bytes), vec![enc]))
        }
    }
}

/// Reverses one descriptor.
pub fn dispatch_decode(encoding: &Encoding, input: TypedArray) -> Result<TypedArray, CifError> {
    match encoding {
        Encoding::ByteArray { data_type } => {
            byte_array::decode(*data_type, &expect_bytes(encoding, input)?)
        }
        Encoding::FixedPoint { factor, src_type } => {
            Ok(fixed_point::decode(&expect_i32(encoding, input)?, *factor, *src_type))
        }
        Encoding::IntervalQuantization {
            min,
            max,
            num_steps,
            src_type,
        } => interval_quantization::decode(
            &expect_i32(encoding, input)?,
            *min,
            *max,
            *num_steps,
            *src_type,
        ),
        Encoding::RunLength { src_type, src_size } => {
            run_length::decode(&expect_i32(encoding, input)?, *src_type, *src_size)
        }
        Encoding::Delta { origin, src_type } => delta::decode(&input, *origin, *src_type),
        Encoding::IntegerPacking { src_size, .. } => integer_packing::decode(&input, *src_size),
        Encoding::StringArray {
            data_encoding,
            string_data,
            offset_encoding,
            offsets,
        } => string_array::decode(
            &expect_bytes(encoding, input)?,
            data_encoding,
            string_data,
            offset_encoding,
            offsets,
        ),
    }
}

/// Replays a descriptor list right-to-left over `data`.
pub fn decode_chain(encodings: &[Encoding], data: TypedArray) -> Result<TypedArray, CifError> {
    encodings
        .iter()
        .rev()
        .try_fold(data, |current, encoding| dispatch_decode(encoding, current))
}

//==================================================================================
// 3. Input Checks
//==================================================================================

fn expect_bytes(encoding: &Encoding, input: TypedArray) -> Result<Vec<u8>, CifError> {
    match input {
        TypedArray::Uint8(bytes) => Ok(bytes),
        other => Err(CifError::MalformedEncoding(format!(
            "{} expects a byte array, got {}",
            encoding.kind(),
            other.kind()
        ))),
    }
}

fn expect_i32(encoding: &Encoding, input: TypedArray) -> Result<Vec<i32>, CifError> {
    match input {
        TypedArray::Int32(values) => Ok(values),
        other => Err(CifError::MalformedEncoding(format!(
            "{} expects an Int32 array, got {}",
            encoding.kind(),
            other.kind()
        ))),
    }
}
