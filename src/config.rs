// In: src/config.rs

//! The single source of truth for all codec configuration.
//!
//! `CodecConfig` is created once at the application boundary (from JSON or
//! with `Default`) and passed down through the system as a shared,
//! read-only `Arc<CodecConfig>`. Every field has a default, so the default
//! config gives the stateless behaviour of the free functions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::bridge::format::VERSION;
use crate::error::CifError;
use crate::pipeline::{Encoder, Operation};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    /// Producer name written into every encoded file.
    #[serde(default = "default_encoder")]
    pub encoder: String,

    /// The oldest `major.minor` file version the parser will accept.
    #[serde(default = "default_minimum_version")]
    pub minimum_version: String,

    /// Number of string fragments the text `StringWriter` buffers per chunk.
    #[serde(default = "default_text_chunk_capacity")]
    pub text_chunk_capacity: usize,

    /// Per-column encoder chains keyed `"<category>.<field>"`. An entry
    /// replaces the chain declared by the field descriptor.
    #[serde(default)]
    pub column_encoders: HashMap<String, Vec<Operation>>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            encoder: default_encoder(),
            minimum_version: default_minimum_version(),
            text_chunk_capacity: default_text_chunk_capacity(),
            column_encoders: HashMap::new(),
        }
    }
}

impl CodecConfig {
    pub fn from_json(json: &str) -> Result<Self, CifError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Looks up and validates the override chain for one column.
    pub fn column_encoder(&self, category: &str, field: &str) -> Result<Option<Encoder>, CifError> {
        match self.column_encoders.get(&format!("{}.{}", category, field)) {
            Some(ops) => Encoder::new(ops.clone()).map(Some),
            None => Ok(None),
        }
    }
}

fn default_encoder() -> String {
    "bincif".to_string()
}

fn default_minimum_version() -> String {
    VERSION.to_string()
}

fn default_text_chunk_capacity() -> usize {
    512
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = CodecConfig::from_json("{}").unwrap();
        assert_eq!(config, CodecConfig::default());
        assert_eq!(config.encoder, "bincif");
        assert_eq!(config.minimum_version, "0.3.0");
        assert_eq!(config.text_chunk_capacity, 512);
    }

    #[test]
    fn test_column_encoder_override() {
        let config = CodecConfig::from_json(
            r#"{
                "encoder": "my-tool",
                "column_encoders": {
                    "_atom_site.Cartn_x": [
                        {"op": "FixedPoint", "params": {"factor": 1000.0}},
                        {"op": "Delta"},
                        {"op": "IntegerPacking"}
                    ],
                    "_atom_site.bad": [{"op": "Delta"}]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.encoder, "my-tool");

        let encoder = config.column_encoder("_atom_site", "Cartn_x").unwrap().unwrap();
        assert_eq!(encoder.operations().len(), 3);
        assert!(config.column_encoder("_atom_site", "id").unwrap().is_none());
        assert!(matches!(
            config.column_encoder("_atom_site", "bad"),
            Err(CifError::Chain(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_a_serde_error() {
        assert!(matches!(
            CodecConfig::from_json("{\"text_chunk_capacity\": \"lots\"}"),
            Err(CifError::SerdeJson(_))
        ));
    }
}
