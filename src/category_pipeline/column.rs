//! Encodes one field across every data context of a category.

use crate::bridge::format::EncodedColumn;
use crate::error::CifError;
use crate::null_handling::{encode_mask, ColumnBuffer};
use crate::pipeline::Encoder;
use crate::types::ArrayKind;

use super::FieldDescriptor;

/// Builds the wire column for `field` over `contexts`, each a data context
/// with its row count. `encoder` replaces the field's own chain when given.
///
/// # Errors
/// Returns `CifError::InvalidState` if the field has no value accessor, and
/// propagates encoder chain and kernel errors.
pub fn encode_field<D>(
    field: &FieldDescriptor<D>,
    contexts: &[(&D, usize)],
    total_count: usize,
    encoder: Option<&Encoder>,
) -> Result<EncodedColumn, CifError> {
    if field.string.is_none() && field.number.is_none() {
        return Err(CifError::InvalidState(format!(
            "field '{}' has neither a string nor a number accessor",
            field.name
        )));
    }

    let kind = field.typed_array.unwrap_or(ArrayKind::String);
    let mut buffer = ColumnBuffer::new(kind, total_count);

    for &(data, count) in contexts {
        for row in 0..count {
            let presence = field.presence_of(data, row);
            if !presence.is_present() {
                buffer.push_absent(presence);
            } else if let Some(number) = &field.number {
                buffer.push_number(number(data, row));
            } else if let Some(string) = &field.string {
                buffer.push_string(string(data, row));
            }
        }
    }

    let (array, mask_codes) = buffer.finish()?;
    let default_encoder;
    let encoder = match encoder.or(field.encoder.as_ref()) {
        Some(e) => e,
        None => {
            default_encoder = Encoder::string_array();
            &default_encoder
        }
    };

    let data = encoder.encode(array)?;
    let mask = mask_codes.map(|codes| encode_mask(&codes)).transpose()?;

    log::debug!(
        "encoded field '{}': {} rows, {} bytes, mask: {}",
        field.name,
        total_count,
        data.data.len(),
        mask.is_some()
    );

    Ok(EncodedColumn {
        name: field.name.clone(),
        data,
        mask,
    })
}
