// In: src/pipeline/traits.rs

//! Defines the behavioral traits for pipeline operations.
//!
//! Every operation declares which classes of array it accepts and which class
//! it produces. `Encoder::new` walks a chain through these declarations, so a
//! float transform placed after an integer transform is rejected when the
//! chain is built rather than when it first runs.

use crate::error::CifError;
use crate::pipeline::models::Operation;
use crate::types::ArrayKind;

/// The coarse shape of the array flowing between two steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    /// The chain input, before any step has run.
    Unknown,
    /// Any of the five integer kinds.
    Integer,
    /// Specifically `Int32`, as produced by the quantizers and run-length.
    Int32,
    Float,
    String,
    /// A `Uint8` byte array: the only valid final output.
    Bytes,
}

impl From<ArrayKind> for ValueClass {
    fn from(kind: ArrayKind) -> Self {
        match kind {
            ArrayKind::Int32 => ValueClass::Int32,
            ArrayKind::Uint8 => ValueClass::Bytes,
            ArrayKind::Int8 | ArrayKind::Int16 | ArrayKind::Uint16 => ValueClass::Integer,
            ArrayKind::Float32 | ArrayKind::Float64 => ValueClass::Float,
            ArrayKind::String => ValueClass::String,
        }
    }
}

impl ValueClass {
    fn is_numeric(self) -> bool {
        !matches!(self, ValueClass::String)
    }

    fn is_integer(self) -> bool {
        matches!(
            self,
            ValueClass::Unknown | ValueClass::Integer | ValueClass::Int32 | ValueClass::Bytes
        )
    }
}

/// A trait implemented by every operation, declaring its class transformation.
pub trait OperationBehavior {
    /// Returns the output class for `input`, or a `CifError::Chain` if the
    /// operation cannot accept it or its parameters are invalid.
    fn transform_class(&self, input: ValueClass) -> Result<ValueClass, CifError>;
}

impl OperationBehavior for Operation {
    /// This implementation is the single source of truth for chain shapes.
    fn transform_class(&self, input: ValueClass) -> Result<ValueClass, CifError> {
        use ValueClass::*;

        let reject = |expected: &str| {
            Err(CifError::Chain(format!(
                "{:?} requires {} input, but the previous step produces {:?}",
                self, expected, input
            )))
        };

        match self {
            //======================================================================
            // Group 1: Terminal byte producers.
            //======================================================================
            Operation::ByteArray => {
                if input.is_numeric() {
                    Ok(Bytes)
                } else {
                    reject("numeric")
                }
            }
            Operation::IntegerPacking => match input {
                Unknown | Int32 => Ok(Bytes),
                _ => reject("Int32"),
            },
            Operation::StringArray => match input {
                Unknown | String => Ok(Bytes),
                _ => reject("string"),
            },

            //======================================================================
            // Group 2: Float quantizers.
            //======================================================================
            Operation::FixedPoint { factor } => {
                if !(factor.is_finite() && *factor > 0.0) {
                    return Err(CifError::Chain(format!(
                        "FixedPoint factor must be positive and finite, got {}",
                        factor
                    )));
                }
                match input {
                    Unknown | Float => Ok(Int32),
                    _ => reject("float"),
                }
            }
            Operation::IntervalQuantization {
                min,
                max,
                num_steps,
            } => {
                if *num_steps < 2 {
                    return Err(CifError::Chain(format!(
                        "IntervalQuantization needs at least 2 steps, got {}",
                        num_steps
                    )));
                }
                if *num_steps > i32::MAX as u32 {
                    return Err(CifError::Chain(format!(
                        "IntervalQuantization steps must fit in Int32, got {}",
                        num_steps
                    )));
                }
                if !(min.is_finite() && max.is_finite()) {
                    return Err(CifError::Chain(
                        "IntervalQuantization bounds must be finite".to_string(),
                    ));
                }
                match input {
                    Unknown | Float => Ok(Int32),
                    _ => reject("float"),
                }
            }

            //======================================================================
            // Group 3: Integer transforms.
            //======================================================================
            Operation::RunLength => {
                if input.is_numeric() {
                    Ok(Int32)
                } else {
                    reject("numeric")
                }
            }
            // The kind of an unknown input is only known at run time, so the
            // Int32 requirement of a following IntegerPacking is checked there.
            Operation::Delta => match input {
                Unknown => Ok(Unknown),
                Int32 => Ok(Int32),
                other if other.is_integer() => Ok(Integer),
                _ => reject("integer"),
            },
        }
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantizers_turn_floats_into_int32() {
        let op = Operation::FixedPoint { factor: 100.0 };
        assert_eq!(op.transform_class(ValueClass::Float).unwrap(), ValueClass::Int32);
        assert_eq!(op.transform_class(ValueClass::Unknown).unwrap(), ValueClass::Int32);
        assert!(matches!(
            op.transform_class(ValueClass::Int32),
            Err(CifError::Chain(_))
        ));
    }

    #[test]
    fn test_delta_preserves_int32_class() {
        assert_eq!(
            Operation::Delta.transform_class(ValueClass::Int32).unwrap(),
            ValueClass::Int32
        );
        assert_eq!(
            Operation::Delta.transform_class(ValueClass::Unknown).unwrap(),
            ValueClass::Unknown
        );
        assert_eq!(
            Operation::Delta.transform_class(ValueClass::Integer).unwrap(),
            ValueClass::Integer
        );
        assert!(Operation::Delta.transform_class(ValueClass::Float).is_err());
    }

    #[test]
    fn test_integer_packing_requires_int32() {
        assert!(Operation::IntegerPacking
            .transform_class(ValueClass::Integer)
            .is_err());
        assert_eq!(
            Operation::IntegerPacking
                .transform_class(ValueClass::Int32)
                .unwrap(),
            ValueClass::Bytes
        );
    }

    #[test]
    fn test_invalid_parameters_are_chain_errors() {
        let bad_steps = Operation::IntervalQuantization {
            min: 0.0,
            max: 1.0,
            num_steps: 1,
        };
        assert!(matches!(
            bad_steps.transform_class(ValueClass::Float),
            Err(CifError::Chain(_))
        ));
        let too_many_steps = Operation::IntervalQuantization {
            min: 0.0,
            max: 1.0,
            num_steps: i32::MAX as u32 + 1,
        };
        assert!(matches!(
            too_many_steps.transform_class(ValueClass::Float),
            Err(CifError::Chain(_))
        ));
        let bad_factor = Operation::FixedPoint { factor: 0.0 };
        assert!(bad_factor.transform_class(ValueClass::Float).is_err());
    }

    #[test]
    fn test_class_of_array_kinds() {
        assert_eq!(ValueClass::from(ArrayKind::Uint8), ValueClass::Bytes);
        assert_eq!(ValueClass::from(ArrayKind::Int16), ValueClass::Integer);
        assert_eq!(ValueClass::from(ArrayKind::Float32), ValueClass::Float);
    }
}
