//! This module defines the core, strongly-typed data representations used
//! throughout the bincif pipeline.
//!
//! It includes the wire type tags (`DataType` and its integer/float subsets),
//! the `TypedArray` value that flows between transforms, and the per-row
//! `ValuePresence` state.

pub mod data_type;
pub mod presence;
pub mod typed_array;

// Re-export the main type(s) for easier access.
pub use data_type::{ArrayKind, DataType, FloatDataType, IntDataType};
pub use presence::ValuePresence;
pub use typed_array::TypedArray;
