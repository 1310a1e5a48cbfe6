// In: src/error.rs

//! This module defines the single, unified error type for the entire bincif library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! `ParseError` is the one exception: it is the typed result of the parse boundary
//! and wraps whatever `CifError` caused the failure.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CifError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// A malformed encoder chain: empty descriptor list, a non-byte final
    /// output, a shape mismatch between steps, or invalid step parameters.
    #[error("Encoder chain error: {0}")]
    Chain(String),

    /// Writer API misuse, e.g. writing after `encode()` or before a data block exists.
    #[error("Invalid writer state: {0}")]
    InvalidState(String),

    #[error("Unsupported file version {found}, minimum supported is {minimum}")]
    Version { found: String, minimum: String },

    #[error("Unsupported data type for this operation: {0}")]
    UnsupportedType(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === Low-Level Pipeline/Kernel Errors
    // =========================================================================
    #[error("Buffer length mismatch: expected a multiple of {0}, got {1}")]
    BufferMismatch(usize, usize),

    /// Raised by a kernel when the wire data does not match its descriptor.
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("Failed to decode column '{column}' of category '{category}': {source}")]
    Decode {
        category: String,
        column: String,
        #[source]
        source: Box<CifError>,
    },

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    #[error("MessagePack encoding failed: {0}")]
    MessagePackEncode(#[from] rmp_serde::encode::Error),

    #[error("MessagePack decoding failed: {0}")]
    MessagePackDecode(#[from] rmp_serde::decode::Error),

    /// An error from the Serde JSON library, typically while reading configuration.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CifError {
    /// Attaches the category/column location to a kernel-level failure.
    pub(crate) fn in_column(self, category: &str, column: &str) -> Self {
        CifError::Decode {
            category: category.to_string(),
            column: column.to_string(),
            source: Box::new(self),
        }
    }
}

//==================================================================================
// Parse Boundary Error
//==================================================================================

/// The error half of a parse result.
///
/// `line` is only populated by line-oriented text input; the binary path leaves it empty.
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub cause: Option<Box<CifError>>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            cause: None,
        }
    }

    pub fn at_line(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
            cause: None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[Line {}] {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<CifError> for ParseError {
    fn from(err: CifError) -> Self {
        ParseError {
            message: err.to_string(),
            line: None,
            cause: Some(Box::new(err)),
        }
    }
}
