//! CIF text output: the chunked `StringWriter` and the text `Writer` that
//! shares the category model with the binary writer.

pub mod string_writer;
pub mod writer;

pub use string_writer::StringWriter;
pub use writer::{quoting, Quoting, Writer};
