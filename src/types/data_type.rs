//! This module defines the canonical, type-safe representation of the numeric
//! type tags recorded in encoding descriptors.
//!
//! The integer codes are part of the on-wire contract: they are serialized as
//! plain integers and must never be renumbered.

use crate::error::CifError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The element type of a typed array, as recorded by a `ByteArray` descriptor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum DataType {
    Int8,
    Int16,
    Int32,
    Uint8,
    Uint16,
    Float32,
    Float64,
}

/// The integer subset of `DataType`, used as `srcType` by integer transforms.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum IntDataType {
    Int8,
    Int16,
    Int32,
    Uint8,
    Uint16,
}

/// The float subset of `DataType`, used as `srcType` by float transforms.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum FloatDataType {
    Float32,
    Float64,
}

/// The in-memory kind of a `TypedArray`, including the non-wire `String` kind.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArrayKind {
    Int8,
    Int16,
    Int32,
    Uint8,
    Uint16,
    Float32,
    Float64,
    String,
}

//==================================================================================
// Wire Codes
//==================================================================================

impl From<DataType> for u8 {
    fn from(t: DataType) -> u8 {
        match t {
            DataType::Int8 => 0,
            DataType::Int16 => 1,
            DataType::Int32 => 2,
            DataType::Uint8 => 3,
            DataType::Uint16 => 4,
            DataType::Float32 => 5,
            DataType::Float64 => 6,
        }
    }
}

impl TryFrom<u8> for DataType {
    type Error = CifError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DataType::Int8),
            1 => Ok(DataType::Int16),
            2 => Ok(DataType::Int32),
            3 => Ok(DataType::Uint8),
            4 => Ok(DataType::Uint16),
            5 => Ok(DataType::Float32),
            6 => Ok(DataType::Float64),
            other => Err(CifError::MalformedEncoding(format!(
                "Unknown data type code {}",
                other
            ))),
        }
    }
}

impl From<IntDataType> for u8 {
    fn from(t: IntDataType) -> u8 {
        match t {
            IntDataType::Int8 => 0,
            IntDataType::Int16 => 1,
            IntDataType::Int32 => 2,
            IntDataType::Uint8 => 3,
            IntDataType::Uint16 => 4,
        }
    }
}

impl TryFrom<u8> for IntDataType {
    type Error = CifError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(IntDataType::Int8),
            1 => Ok(IntDataType::Int16),
            2 => Ok(IntDataType::Int32),
            3 => Ok(IntDataType::Uint8),
            4 => Ok(IntDataType::Uint16),
            other => Err(CifError::MalformedEncoding(format!(
                "Unknown integer data type code {}",
                other
            ))),
        }
    }
}

impl From<FloatDataType> for u8 {
    fn from(t: FloatDataType) -> u8 {
        match t {
            FloatDataType::Float32 => 0,
            FloatDataType::Float64 => 1,
        }
    }
}

impl TryFrom<u8> for FloatDataType {
    type Error = CifError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(FloatDataType::Float32),
            1 => Ok(FloatDataType::Float64),
            other => Err(CifError::MalformedEncoding(format!(
                "Unknown float data type code {}",
                other
            ))),
        }
    }
}

//==================================================================================
// Conversions Between Tags and Kinds
//==================================================================================

impl DataType {
    /// Returns the width in bytes of one element of this type.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    pub fn kind(&self) -> ArrayKind {
        match self {
            Self::Int8 => ArrayKind::Int8,
            Self::Int16 => ArrayKind::Int16,
            Self::Int32 => ArrayKind::Int32,
            Self::Uint8 => ArrayKind::Uint8,
            Self::Uint16 => ArrayKind::Uint16,
            Self::Float32 => ArrayKind::Float32,
            Self::Float64 => ArrayKind::Float64,
        }
    }
}

impl IntDataType {
    pub fn kind(&self) -> ArrayKind {
        match self {
            Self::Int8 => ArrayKind::Int8,
            Self::Int16 => ArrayKind::Int16,
            Self::Int32 => ArrayKind::Int32,
            Self::Uint8 => ArrayKind::Uint8,
            Self::Uint16 => ArrayKind::Uint16,
        }
    }
}

impl FloatDataType {
    pub fn kind(&self) -> ArrayKind {
        match self {
            Self::Float32 => ArrayKind::Float32,
            Self::Float64 => ArrayKind::Float64,
        }
    }
}

impl ArrayKind {
    /// Returns `true` for the five integer kinds.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Uint8 | Self::Uint16
        )
    }

    /// Returns `true` if the kind is a floating-point number.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    pub fn as_int_type(&self) -> Option<IntDataType> {
        match self {
            Self::Int8 => Some(IntDataType::Int8),
            Self::Int16 => Some(IntDataType::Int16),
            Self::Int32 => Some(IntDataType::Int32),
            Self::Uint8 => Some(IntDataType::Uint8),
            Self::Uint16 => Some(IntDataType::Uint16),
            _ => None,
        }
    }

    pub fn as_float_type(&self) -> Option<FloatDataType> {
        match self {
            Self::Float32 => Some(FloatDataType::Float32),
            Self::Float64 => Some(FloatDataType::Float64),
            _ => None,
        }
    }

    pub fn as_data_type(&self) -> Option<DataType> {
        match self {
            Self::Int8 => Some(DataType::Int8),
            Self::Int16 => Some(DataType::Int16),
            Self::Int32 => Some(DataType::Int32),
            Self::Uint8 => Some(DataType::Uint8),
            Self::Uint16 => Some(DataType::Uint16),
            Self::Float32 => Some(DataType::Float32),
            Self::Float64 => Some(DataType::Float64),
            Self::String => None,
        }
    }
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
