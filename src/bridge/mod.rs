// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the public boundary of the bincif library. It owns the wire
// schema and the MessagePack framing, and it is the only layer that turns
// producer data into a file and a file back into queryable columns.
//
// Data Flow (Encoding):
//
//   1. [Binary Writer (writer::Writer)]       -> Receives a category provider + contexts
//         |
//         `-> calls `category_pipeline::encode_category` for each category ->
//
//   2. [Category Pipeline]                    -> One `Encoder` chain per field
//         |
//         `-> Returns `format::EncodedCategory`
//
//   3. [Writer::encode]                       -> `format::to_msgpack` -> bytes
//
//
// Data Flow (Decoding):
//
//   1. [parser::parse]                        -> Receives `&[u8]`
//         |
//         `-> a. Reads the version and applies the version gate
//         |
//         `-> b. Deserializes the full `EncodedFile`
//         |
//         `-> c. Decodes every column with `pipeline::decode_data` (+ its mask)
//
//   2. [file::File]                           -> Read-side data blocks, categories, columns
//
// ====================================================================================
pub mod file;
pub mod format;
pub mod parser;
pub mod writer;

pub use file::{BinaryColumn, Category, Column, DataBlock, File, UndefinedColumn, UNDEFINED_COLUMN};
pub use format::VERSION;
pub use parser::{parse, parse_with_config};
pub use writer::{CifWriter, OutputStream, Writer};
