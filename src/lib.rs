//! This file is the root of the `bincif` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`pipeline`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types most callers need, so that writing and
//!     parsing a file does not require knowing the module layout.

//==================================================================================
// 0. Constants
//==================================================================================
/// The wire format version written into every encoded file.
pub use bridge::format::VERSION;

/// The crate version, automatically set from Cargo.toml at compile time.
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod category_pipeline;
pub mod config;
pub mod error;
pub mod kernels;
pub mod null_handling;
pub mod pipeline;
pub mod text;
pub mod types;

mod traits;
mod utils;

#[doc(hidden)]
pub use log as __log;

//==================================================================================
// 2. Public Surface
//==================================================================================
pub use bridge::{parse, parse_with_config, CifWriter, Column, File, OutputStream, Writer};
pub use category_pipeline::{CategoryDescriptor, CategoryInstance, FieldDescriptor};
pub use config::CodecConfig;
pub use error::{CifError, ParseError};
pub use observability::enable_verbose_logging;
pub use pipeline::{decode_data, Encoder, Operation};
pub use types::{ArrayKind, TypedArray, ValuePresence};
