//! The typed vocabulary of encoder chains.
//!
//! An `Operation` is one step a producer asks for; the `Encoding` descriptors
//! in `bridge::format` are what the steps record on the wire. Operations are
//! serde-tagged as `{"op": ..., "params": {...}}` so chains can be declared in
//! configuration.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", content = "params")]
pub enum Operation {
    /// Little-endian packing of a numeric array. Always yields bytes.
    ByteArray,
    /// `round(v * factor)` into `Int32`.
    FixedPoint { factor: f64 },
    /// Float interval onto `num_steps` integer indices.
    IntervalQuantization { min: f64, max: f64, num_steps: u32 },
    RunLength,
    Delta,
    /// Automatic 1/2/4-byte packing of an `Int32` array. Always yields bytes.
    IntegerPacking,
    /// Dictionary encoding of a string column. Always yields bytes.
    StringArray,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_json_shape() {
        let ops = vec![
            Operation::FixedPoint { factor: 1000.0 },
            Operation::Delta,
            Operation::IntegerPacking,
        ];
        let json = serde_json::to_value(&ops).unwrap();
        assert_eq!(json[0]["op"], "FixedPoint");
        assert_eq!(json[0]["params"]["factor"], 1000.0);
        assert_eq!(json[1], serde_json::json!({ "op": "Delta" }));

        let parsed: Vec<Operation> = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, ops);
    }

    #[test]
    fn test_interval_quantization_from_json() {
        let op: Operation = serde_json::from_str(
            r#"{"op": "IntervalQuantization", "params": {"min": 0.0, "max": 1.0, "num_steps": 64}}"#,
        )
        .unwrap();
        assert_eq!(
            op,
            Operation::IntervalQuantization {
                min: 0.0,
                max: 1.0,
                num_steps: 64
            }
        );
    }
}
