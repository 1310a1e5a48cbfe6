//! Reverses an `EncodedData` by replaying its descriptors right-to-left.

use crate::bridge::format::EncodedData;
use crate::error::CifError;
use crate::kernels;
use crate::types::TypedArray;

/// Reconstructs the typed array an encoder chain started from.
///
/// # Errors
/// Returns `CifError::MalformedEncoding` (or `BufferMismatch`) if the
/// descriptors do not match the data they describe.
pub fn decode_data(encoded: &EncodedData) -> Result<TypedArray, CifError> {
    if encoded.encoding.is_empty() {
        return Err(CifError::MalformedEncoding(
            "Encoded data carries no encoding descriptors".to_string(),
        ));
    }
    kernels::decode_chain(&encoded.encoding, TypedArray::Uint8(encoded.data.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::format::Encoding;
    use crate::pipeline::{Encoder, Operation};
    use crate::types::{DataType, IntDataType};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn int_chains() -> Vec<Vec<Operation>> {
        vec![
            vec![Operation::ByteArray],
            vec![Operation::Delta, Operation::ByteArray],
            vec![Operation::RunLength, Operation::ByteArray],
            vec![Operation::IntegerPacking],
            vec![Operation::Delta, Operation::IntegerPacking],
            vec![
                Operation::Delta,
                Operation::RunLength,
                Operation::IntegerPacking,
            ],
        ]
    }

    #[test]
    fn test_int32_roundtrip_identity_over_standard_chains() {
        let mut rng = StdRng::seed_from_u64(2016);
        let inputs: Vec<Vec<i32>> = vec![
            vec![],
            vec![0],
            vec![i32::MIN, -1, 0, 1, i32::MAX],
            (0..500).map(|_| rng.random_range(-70_000..70_000)).collect(),
            (0..500).map(|i| i / 7).collect(),
        ];

        for ops in int_chains() {
            let encoder = Encoder::new(ops.clone()).unwrap();
            for input in &inputs {
                let encoded = encoder.encode(TypedArray::Int32(input.clone())).unwrap();
                let decoded = decode_data(&encoded).unwrap();
                assert_eq!(decoded, TypedArray::Int32(input.clone()), "chain {:?}", ops);
            }
        }
    }

    #[test]
    fn test_fixed_point_error_bound() {
        let mut rng = StdRng::seed_from_u64(99);
        for factor in [1.0, 10.0, 1000.0] {
            let input: Vec<f64> = (0..200).map(|_| rng.random_range(-500.0..500.0)).collect();
            let encoder = Encoder::new(vec![
                Operation::FixedPoint { factor },
                Operation::IntegerPacking,
            ])
            .unwrap();
            let encoded = encoder.encode(TypedArray::Float64(input.clone())).unwrap();
            let TypedArray::Float64(decoded) = decode_data(&encoded).unwrap() else {
                panic!("expected Float64");
            };
            let worst = input
                .iter()
                .zip(&decoded)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            assert!(worst <= 1.0 / (2.0 * factor) + 1e-9, "factor {}", factor);
        }
    }

    #[test]
    fn test_descriptor_less_data_is_rejected() {
        let encoded = EncodedData {
            encoding: vec![],
            data: vec![1, 2, 3],
        };
        assert!(matches!(
            decode_data(&encoded),
            Err(CifError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_oversized_src_size_is_rejected() {
        let encoded = EncodedData {
            encoding: vec![
                Encoding::RunLength {
                    src_type: IntDataType::Int32,
                    src_size: usize::MAX / 2,
                },
                Encoding::ByteArray {
                    data_type: DataType::Int32,
                },
            ],
            data: vec![],
        };
        assert!(matches!(
            decode_data(&encoded),
            Err(CifError::MalformedEncoding(_))
        ));

        let encoded = EncodedData {
            encoding: vec![
                Encoding::IntegerPacking {
                    byte_count: 1,
                    is_unsigned: true,
                    src_size: usize::MAX,
                },
                Encoding::ByteArray {
                    data_type: DataType::Uint8,
                },
            ],
            data: vec![1, 2, 3],
        };
        assert!(matches!(
            decode_data(&encoded),
            Err(CifError::MalformedEncoding(_))
        ));
    }
}
