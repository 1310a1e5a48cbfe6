//! A chunked string builder for CIF text output.
//!
//! Fragments are appended to the current chunk; once a chunk holds
//! `chunk_capacity` fragments it is sealed and a new one is started. Sealed
//! chunks are flushed to the output one at a time, so a large file never has
//! to be joined into a single string.

use std::borrow::Cow;
use std::sync::OnceLock;

use crate::bridge::writer::OutputStream;
use crate::error::CifError;
use crate::utils::round_half_up;

const PADDING_TABLE_SIZE: usize = 512;

static PADDING: OnceLock<Vec<String>> = OnceLock::new();

/// `len` spaces. Widths below 512 come from a shared table built on first use.
fn padding(len: usize) -> Cow<'static, str> {
    if len >= PADDING_TABLE_SIZE {
        return Cow::Owned(" ".repeat(len));
    }
    let table = PADDING.get_or_init(|| (0..PADDING_TABLE_SIZE).map(|n| " ".repeat(n)).collect());
    Cow::Borrowed(table[len].as_str())
}

/// Formats `val` rounded half-up to the precision of `precision_multiplier`
/// (`100.0` keeps two decimals).
fn format_float(val: f64, precision_multiplier: f64) -> String {
    (round_half_up(precision_multiplier * val) / precision_multiplier).to_string()
}

#[derive(Debug, Clone)]
pub struct StringWriter {
    chunk: String,
    chunk_fragments: usize,
    chunk_capacity: usize,
    data: Vec<String>,
}

impl Default for StringWriter {
    fn default() -> Self {
        Self::new(512)
    }
}

impl StringWriter {
    /// A capacity of zero is treated as one fragment per chunk.
    pub fn new(chunk_capacity: usize) -> Self {
        Self {
            chunk: String::new(),
            chunk_fragments: 0,
            chunk_capacity: chunk_capacity.max(1),
            data: Vec::new(),
        }
    }

    pub fn write(&mut self, val: &str) {
        if self.chunk_fragments == self.chunk_capacity {
            self.data.push(std::mem::take(&mut self.chunk));
            self.chunk_fragments = 0;
        }
        self.chunk.push_str(val);
        self.chunk_fragments += 1;
    }

    pub fn newline(&mut self) {
        self.write("\n");
    }

    pub fn whitespace(&mut self, len: usize) {
        self.write(&padding(len));
    }

    pub fn write_pad_left(&mut self, val: &str, total_width: usize) {
        let len = val.chars().count();
        if total_width > len {
            self.whitespace(total_width - len);
        }
        self.write(val);
    }

    pub fn write_pad_right(&mut self, val: &str, total_width: usize) {
        let len = val.chars().count();
        self.write(val);
        if total_width > len {
            self.whitespace(total_width - len);
        }
    }

    pub fn write_integer(&mut self, val: i64) {
        self.write(&val.to_string());
    }

    pub fn write_integer_pad_left(&mut self, val: i64, total_width: usize) {
        self.write_pad_left(&val.to_string(), total_width);
    }

    pub fn write_integer_pad_right(&mut self, val: i64, total_width: usize) {
        self.write_pad_right(&val.to_string(), total_width);
    }

    /// `write_float(123.2123, 100.0)` writes `123.21`.
    pub fn write_float(&mut self, val: f64, precision_multiplier: f64) {
        self.write(&format_float(val, precision_multiplier));
    }

    pub fn write_float_pad_left(&mut self, val: f64, precision_multiplier: f64, total_width: usize) {
        self.write_pad_left(&format_float(val, precision_multiplier), total_width);
    }

    pub fn write_float_pad_right(&mut self, val: f64, precision_multiplier: f64, total_width: usize) {
        self.write_pad_right(&format_float(val, precision_multiplier), total_width);
    }

    /// Number of sealed chunks, not counting the one being filled.
    pub fn sealed_chunks(&self) -> usize {
        self.data.len()
    }

    pub fn as_string(&self) -> String {
        let mut out = String::with_capacity(self.data.iter().map(String::len).sum::<usize>() + self.chunk.len());
        for chunk in &self.data {
            out.push_str(chunk);
        }
        out.push_str(&self.chunk);
        out
    }

    /// Writes every chunk to `stream` in order.
    pub fn write_to<S: OutputStream + ?Sized>(&self, stream: &mut S) -> Result<(), CifError> {
        for chunk in &self.data {
            stream.write_string(chunk)?;
        }
        if !self.chunk.is_empty() {
            stream.write_string(&self.chunk)?;
        }
        Ok(())
    }
}
