// --- IN: src/null_handling/bitmap.rs ---

//! Kernels for collecting a column's values densely under a validity bitmap
//! and re-applying that bitmap to produce the row-aligned array an encoder
//! chain consumes.
//!
//! Non-present rows never occupy a value slot while the column is being
//! built. When the row-aligned array is materialized, their slots are
//! zero-filled for numeric kinds and `None` for strings; the presence mask
//! is what tells a reader to ignore them.

use bitvec::vec::BitVec;

use crate::error::CifError;
use crate::types::{ArrayKind, TypedArray, ValuePresence};

//==================================================================================
// 1. Dense Values
//==================================================================================

/// The values of present rows only, in row order.
#[derive(Debug, Clone, PartialEq)]
pub enum DenseValues {
    Numbers(Vec<f64>),
    /// A present row may still carry `None` if its string accessor returned nothing.
    Strings(Vec<Option<String>>),
}

impl DenseValues {
    pub fn len(&self) -> usize {
        match self {
            DenseValues::Numbers(v) => v.len(),
            DenseValues::Strings(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scatters `dense` into a row-aligned array of `kind` at the set bits of `validity`.
///
/// # Errors
/// Returns `CifError::InternalError` if the number of dense values differs
/// from the number of set bits, or if string values meet a numeric kind.
pub fn reapply_bitmap(
    kind: ArrayKind,
    dense: DenseValues,
    validity: &BitVec,
) -> Result<TypedArray, CifError> {
    if dense.len() != validity.count_ones() {
        return Err(CifError::InternalError(format!(
            "{} dense values for {} valid rows",
            dense.len(),
            validity.count_ones()
        )));
    }

    match dense {
        DenseValues::Numbers(values) => {
            let mut out = TypedArray::zeroed(kind, validity.len());
            for (row, value) in validity.iter_ones().zip(values) {
                out.set_f64(row, value);
            }
            Ok(out)
        }
        DenseValues::Strings(values) => {
            if kind != ArrayKind::String {
                return Err(CifError::InternalError(format!(
                    "string values cannot fill a {} array",
                    kind
                )));
            }
            let mut out = vec![None; validity.len()];
            for (row, value) in validity.iter_ones().zip(values) {
                out[row] = value;
            }
            Ok(TypedArray::Strings(out))
        }
    }
}

//==================================================================================
// 2. Column Buffer
//==================================================================================

/// Accumulates one column across every context of a category.
#[derive(Debug, Clone)]
pub struct ColumnBuffer {
    kind: ArrayKind,
    values: DenseValues,
    validity: BitVec,
    presence: Vec<u8>,
    all_present: bool,
}

impl ColumnBuffer {
    /// Starts an empty buffer whose row-aligned output will be of `kind`.
    pub fn new(kind: ArrayKind, capacity: usize) -> Self {
        let values = if kind == ArrayKind::String {
            DenseValues::Strings(Vec::with_capacity(capacity))
        } else {
            DenseValues::Numbers(Vec::with_capacity(capacity))
        };
        Self {
            kind,
            values,
            validity: BitVec::with_capacity(capacity),
            presence: Vec::with_capacity(capacity),
            all_present: true,
        }
    }

    pub fn kind(&self) -> ArrayKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.presence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presence.is_empty()
    }

    pub fn all_present(&self) -> bool {
        self.all_present
    }

    fn mark_present(&mut self) {
        self.validity.push(true);
        self.presence.push(ValuePresence::Present.code());
    }

    /// Records a present numeric value. String columns store its decimal form.
    pub fn push_number(&mut self, value: f64) {
        self.mark_present();
        match &mut self.values {
            DenseValues::Numbers(v) => v.push(value),
            DenseValues::Strings(v) => v.push(Some(value.to_string())),
        }
    }

    /// Records a present string value. Numeric columns parse it; text that
    /// is not a number becomes NaN, which an integer column stores as zero.
    pub fn push_string(&mut self, value: Option<String>) {
        self.mark_present();
        match &mut self.values {
            DenseValues::Strings(v) => v.push(value),
            DenseValues::Numbers(v) => v.push(
                value
                    .as_deref()
                    .and_then(|s| s.trim().parse::<f64>().ok())
                    .unwrap_or(f64::NAN),
            ),
        }
    }

    /// Records a non-present row. A `Present` code is treated as a present
    /// row with no value.
    pub fn push_absent(&mut self, presence: ValuePresence) {
        if presence.is_present() {
            self.push_string(None);
            return;
        }
        self.validity.push(false);
        self.presence.push(presence.code());
        self.all_present = false;
    }

    /// Materializes the row-aligned array and, if any row was absent, the
    /// per-row presence codes.
    pub fn finish(self) -> Result<(TypedArray, Option<Vec<u8>>), CifError> {
        let array = reapply_bitmap(self.kind, self.values, &self.validity)?;
        let mask = if self.all_present {
            None
        } else {
            Some(self.presence)
        };
        Ok((array, mask))
    }
}
