//! This module contains the dictionary kernel for string columns.
//!
//! Distinct strings are stored once, in first-occurrence order, as one
//! concatenated blob plus cumulative end offsets. Each row becomes an index
//! into that dictionary, or `-1` for an absent value. The index stream is
//! compressed with Delta → RunLength → IntegerPacking and the offsets with
//! Delta → IntegerPacking, so the whole column is self-describing.
//!
//! Offsets count UTF-16 code units, which keeps files interchangeable with
//! readers that slice the blob as a UTF-16 string.

use hashbrown::HashMap;

use super::{decode_chain, delta, integer_packing, run_length};
use crate::bridge::format::Encoding;
use crate::error::CifError;
use crate::types::TypedArray;

//==================================================================================
// 1. Core Logic
//==================================================================================

struct Dictionary {
    indices: Vec<i32>,
    blob: String,
    offsets: Vec<i32>,
}

fn build_dictionary(values: &[Option<String>]) -> Dictionary {
    let mut lookup: HashMap<&str, i32> = HashMap::new();
    let mut blob = String::new();
    let mut offsets = vec![0i32];
    let mut end: i32 = 0;

    let indices = values
        .iter()
        .map(|value| {
            let Some(s) = value.as_deref() else {
                return -1;
            };
            *lookup.entry(s).or_insert_with(|| {
                let index = offsets.len() as i32 - 1;
                blob.push_str(s);
                end += s.encode_utf16().count() as i32;
                offsets.push(end);
                index
            })
        })
        .collect();

    Dictionary {
        indices,
        blob,
        offsets,
    }
}

/// Delta → IntegerPacking for offsets.
fn encode_offsets(offsets: Vec<i32>) -> Result<(Vec<u8>, Vec<Encoding>), CifError> {
    let (deltas, delta_enc) = delta::encode(&TypedArray::Int32(offsets))?;
    let (bytes, mut packing_enc) = integer_packing::encode(&deltas.to_i32_vec().unwrap_or_default())?;
    let mut encodings = vec![delta_enc];
    encodings.append(&mut packing_enc);
    Ok((bytes, encodings))
}

/// Delta → RunLength → IntegerPacking for row indices.
fn encode_indices(indices: Vec<i32>) -> Result<(Vec<u8>, Vec<Encoding>), CifError> {
    let (deltas, delta_enc) = delta::encode(&TypedArray::Int32(indices))?;
    let (pairs, rle_enc) = run_length::encode(&deltas)?;
    let (bytes, mut packing_enc) = integer_packing::encode(&pairs)?;
    let mut encodings = vec![delta_enc, rle_enc];
    encodings.append(&mut packing_enc);
    Ok((bytes, encodings))
}

fn decode_to_i32(encodings: &[Encoding], bytes: &[u8], what: &str) -> Result<Vec<i32>, CifError> {
    decode_chain(encodings, TypedArray::Uint8(bytes.to_vec()))?
        .to_i32_vec()
        .ok_or_else(|| {
            CifError::MalformedEncoding(format!("StringArray {} did not decode to integers", what))
        })
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Encodes a string column; the returned bytes are the packed row indices.
pub fn encode(input: &TypedArray) -> Result<(Vec<u8>, Encoding), CifError> {
    let TypedArray::Strings(values) = input else {
        return Err(CifError::UnsupportedType(format!(
            "StringArray requires a string array, got {}",
            input.kind()
        )));
    };

    let dict = build_dictionary(values);
    let (offset_bytes, offset_encoding) = encode_offsets(dict.offsets)?;
    let (index_bytes, data_encoding) = encode_indices(dict.indices)?;

    Ok((
        index_bytes,
        Encoding::StringArray {
            data_encoding,
            string_data: dict.blob,
            offset_encoding,
            offsets: offset_bytes,
        },
    ))
}

pub fn decode(
    data: &[u8],
    data_encoding: &[Encoding],
    string_data: &str,
    offset_encoding: &[Encoding],
    offsets: &[u8],
) -> Result<TypedArray, CifError> {
    let offsets = decode_to_i32(offset_encoding, offsets, "offsets")?;
    let indices = decode_to_i32(data_encoding, data, "indices")?;

    let units: Vec<u16> = string_data.encode_utf16().collect();
    let mut dictionary = Vec::with_capacity(offsets.len().saturating_sub(1));
    for pair in offsets.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        if start < 0 || end < start || end as usize > units.len() {
            return Err(CifError::MalformedEncoding(format!(
                "StringArray offsets {}..{} fall outside string data of length {}",
                start,
                end,
                units.len()
            )));
        }
        let entry = String::from_utf16(&units[start as usize..end as usize]).map_err(|_| {
            CifError::MalformedEncoding(format!(
                "StringArray offsets {}..{} split a surrogate pair",
                start, end
            ))
        })?;
        dictionary.push(entry);
    }

    let values = indices
        .into_iter()
        .map(|index| {
            if index < 0 {
                return Ok(None);
            }
            dictionary
                .get(index as usize)
                .cloned()
                .map(Some)
                .ok_or_else(|| {
                    CifError::MalformedEncoding(format!(
                        "StringArray index {} is out of range for a dictionary of {}",
                        index,
                        dictionary.len()
                    ))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypedArray::Strings(values))
}
