//! The encoder pipeline: typed operations, chain validation, and the engines
//! that run a chain forwards (`Encoder`) and backwards (`decode_data`).

pub mod decoder;
pub mod encoder;
pub mod models;
pub mod traits;

pub use decoder::decode_data;
pub use encoder::{Encoder, EncoderBuilder};
pub use models::Operation;
pub use traits::{OperationBehavior, ValueClass};
