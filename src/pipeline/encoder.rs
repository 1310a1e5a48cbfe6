//! This module contains the encoder chain: an ordered, validated list of
//! operations that turns one typed array into an `EncodedData`.
//!
//! It acts as a "pure byte engine". It threads the evolving array through each
//! step and concatenates every emitted descriptor into one flat list.

use crate::bridge::format::EncodedData;
use crate::error::CifError;
use crate::kernels;
use crate::pipeline::models::Operation;
use crate::pipeline::traits::{OperationBehavior, ValueClass};
use crate::types::TypedArray;

/// A chain of operations whose shape has been checked at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoder {
    operations: Vec<Operation>,
}

impl Encoder {
    /// Validates `operations` as a chain.
    ///
    /// # Errors
    /// Returns `CifError::Chain` if the list is empty, a step cannot accept
    /// the previous step's output, a parameter is invalid, or the last step
    /// does not produce bytes.
    pub fn new(operations: Vec<Operation>) -> Result<Self, CifError> {
        if operations.is_empty() {
            return Err(CifError::Chain("Encodings must be non-empty.".to_string()));
        }

        let output = operations
            .iter()
            .try_fold(ValueClass::Unknown, |class, op| op.transform_class(class))?;
        if output != ValueClass::Bytes {
            return Err(CifError::Chain(format!(
                "The encoding must result in a byte array, but the chain ends in {:?}.",
                output
            )));
        }

        Ok(Self { operations })
    }

    /// Starts a chain to be extended with `and` and checked by `build`.
    pub fn by(op: Operation) -> EncoderBuilder {
        EncoderBuilder {
            operations: vec![op],
        }
    }

    /// The default chain for string columns.
    pub fn string_array() -> Self {
        Self {
            operations: vec![Operation::StringArray],
        }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Runs the chain over `data`.
    ///
    /// # Errors
    /// Returns `CifError::Chain` if a step emits no descriptors or the final
    /// array is not `Uint8`, and propagates kernel errors for inputs of the
    /// wrong kind.
    pub fn encode(&self, data: TypedArray) -> Result<EncodedData, CifError> {
        let mut encoding = Vec::new();
        let mut current = data;

        for op in &self.operations {
            let (next, mut emitted) = kernels::dispatch_encode(op, &current)?;
            if emitted.is_empty() {
                return Err(CifError::Chain("Encodings must be non-empty.".to_string()));
            }
            encoding.append(&mut emitted);
            current = next;
        }

        match current {
            TypedArray::Uint8(data) => Ok(EncodedData { encoding, data }),
            other => Err(CifError::Chain(format!(
                "The encoding must result in a byte array, got {}. Fix your encoding chain.",
                other.kind()
            ))),
        }
    }
}

/// An unvalidated chain under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderBuilder {
    operations: Vec<Operation>,
}

impl EncoderBuilder {
    pub fn and(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    /// Validates the accumulated chain, see `Encoder::new`.
    pub fn build(self) -> Result<Encoder, CifError> {
        Encoder::new(self.operations)
    }
}
