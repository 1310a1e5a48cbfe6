// In: src/bridge/format.rs

//! Defines all on-wire structures and constants for the BinaryCIF format.
//! This is the single source of truth for the nested file layout
//! (file → data block → category → column → encoded data) and for the
//! `Encoding` descriptors that make every column self-describing.
//!
//! Field names are camelCase on the wire and structs are written as
//! string-keyed MessagePack maps; byte buffers are written as `bin`.

use serde::{Deserialize, Serialize};

use crate::error::CifError;
use crate::types::{DataType, FloatDataType, IntDataType};

//==================================================================================
// I. File-Level Format
//==================================================================================

/// The format version written by this crate.
pub const VERSION: &str = "0.3.0";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedFile {
    pub version: String,
    pub encoder: String,
    #[serde(rename = "dataBlocks")]
    pub data_blocks: Vec<EncodedDataBlock>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedDataBlock {
    pub header: String,
    pub categories: Vec<EncodedCategory>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedCategory {
    pub name: String,
    #[serde(rename = "rowCount")]
    pub row_count: usize,
    pub columns: Vec<EncodedColumn>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedColumn {
    pub name: String,
    pub data: EncodedData,
    /// Per-row presence codes. Omitted when every row is present; a `nil`
    /// written by other producers reads back as `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<EncodedData>,
}

/// A byte buffer together with the descriptors needed to reconstruct its
/// typed array, in the order they were applied during encoding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncodedData {
    pub encoding: Vec<Encoding>,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

//==================================================================================
// II. Encoding Descriptors
//==================================================================================

/// One applied transform. Decoding replays a descriptor list in reverse.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind")]
pub enum Encoding {
    ByteArray {
        #[serde(rename = "type")]
        data_type: DataType,
    },
    FixedPoint {
        factor: f64,
        #[serde(rename = "srcType")]
        src_type: FloatDataType,
    },
    IntervalQuantization {
        min: f64,
        max: f64,
        #[serde(rename = "numSteps")]
        num_steps: u32,
        #[serde(rename = "srcType")]
        src_type: FloatDataType,
    },
    RunLength {
        #[serde(rename = "srcType")]
        src_type: IntDataType,
        #[serde(rename = "srcSize")]
        src_size: usize,
    },
    Delta {
        origin: i32,
        #[serde(rename = "srcType")]
        src_type: IntDataType,
    },
    IntegerPacking {
        #[serde(rename = "byteCount")]
        byte_count: u8,
        #[serde(rename = "isUnsigned")]
        is_unsigned: bool,
        #[serde(rename = "srcSize")]
        src_size: usize,
    },
    StringArray {
        #[serde(rename = "dataEncoding")]
        data_encoding: Vec<Encoding>,
        #[serde(rename = "stringData")]
        string_data: String,
        #[serde(rename = "offsetEncoding")]
        offset_encoding: Vec<Encoding>,
        #[serde(with = "serde_bytes")]
        offsets: Vec<u8>,
    },
}

impl Encoding {
    /// The wire `kind` tag of this descriptor.
    pub fn kind(&self) -> &'static str {
        match self {
            Encoding::ByteArray { .. } => "ByteArray",
            Encoding::FixedPoint { .. } => "FixedPoint",
            Encoding::IntervalQuantization { .. } => "IntervalQuantization",
            Encoding::RunLength { .. } => "RunLength",
            Encoding::Delta { .. } => "Delta",
            Encoding::IntegerPacking { .. } => "IntegerPacking",
            Encoding::StringArray { .. } => "StringArray",
        }
    }
}

//==================================================================================
// III. MessagePack Boundary
//==================================================================================

/// Just enough of a file to run the version gate before decoding the rest.
#[derive(Deserialize, Debug)]
pub struct VersionEnvelope {
    pub version: String,
}

/// Serializes a file as string-keyed MessagePack maps.
pub fn to_msgpack(file: &EncodedFile) -> Result<Vec<u8>, CifError> {
    Ok(rmp_serde::to_vec_named(file)?)
}

pub fn read_version(bytes: &[u8]) -> Result<String, CifError> {
    let envelope: VersionEnvelope = rmp_serde::from_slice(bytes)?;
    Ok(envelope.version)
}

pub fn from_msgpack(bytes: &[u8]) -> Result<EncodedFile, CifError> {
    Ok(rmp_serde::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> EncodedFile {
        EncodedFile {
            version: VERSION.to_string(),
            encoder: "test".to_string(),
            data_blocks: vec![EncodedDataBlock {
                header: "1ABC".to_string(),
                categories: vec![EncodedCategory {
                    name: "_entry".to_string(),
                    row_count: 2,
                    columns: vec![EncodedColumn {
                        name: "id".to_string(),
                        data: EncodedData {
                            encoding: vec![
                                Encoding::IntegerPacking {
                                    byte_count: 1,
                                    is_unsigned: true,
                                    src_size: 2,
                                },
                                Encoding::ByteArray {
                                    data_type: DataType::Uint8,
                                },
                            ],
                            data: vec![1, 2],
                        },
                        mask: None,
                    }],
                }],
            }],
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_msgpack_uses_named_fields_and_kind_tags() {
        let bytes = to_msgpack(&sample_file()).unwrap();
        for key in [
            &b"dataBlocks"[..],
            b"rowCount",
            b"kind",
            b"IntegerPacking",
            b"byteCount",
            b"isUnsigned",
            b"srcSize",
        ] {
            assert!(contains(&bytes, key), "missing {:?}", String::from_utf8_lossy(key));
        }
        assert!(!contains(&bytes, b"mask"));
        // The data buffer is a `bin 8` of length 2.
        assert!(contains(&bytes, &[0xc4, 0x02, 0x01, 0x02]));
    }

    #[test]
    fn test_msgpack_file_reads_back() {
        let file = sample_file();
        let bytes = to_msgpack(&file).unwrap();
        assert_eq!(read_version(&bytes).unwrap(), VERSION);
        assert_eq!(from_msgpack(&bytes).unwrap(), file);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let bogus = serde_json::json!({ "kind": "Huffman", "table": 3 });
        let bytes = rmp_serde::to_vec_named(&bogus).unwrap();
        assert!(rmp_serde::from_slice::<Encoding>(&bytes).is_err());
    }
}
