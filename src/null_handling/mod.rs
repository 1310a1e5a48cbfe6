//! This module serves as the public API for all presence-handling logic.
//!
//! It separates a column's values from its presence information. Values are
//! collected densely (only present rows) alongside a per-row validity bitmap,
//! and the per-row presence codes become their own small, separately encoded
//! mask stream. The row-aligned array the encoder chain sees is materialized
//! only at the end, by re-applying the bitmap.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Dense value collection and bitmap re-application.
pub mod bitmap;

/// Encoding and decoding of the per-row presence mask.
pub mod mask;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use bitmap::{ColumnBuffer, DenseValues};
pub use mask::{decode_mask, encode_mask};

//==================================================================================
// 3. Unit Tests (Module-level integration tests)
//==================================================================================
