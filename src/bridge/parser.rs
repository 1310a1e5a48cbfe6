// In: src/bridge/parser.rs

use crate::bridge::file::{BinaryColumn, Category, DataBlock, File};
use crate::bridge::format::{self, EncodedCategory, EncodedColumn};
use crate::config::CodecConfig;
use crate::error::{CifError, ParseError};
use crate::null_handling::decode_mask;
use crate::pipeline::decode_data;

//==================================================================================
// I. Public Entry Points
//==================================================================================

/// Parses a BinaryCIF buffer with the default minimum version.
pub fn parse(bytes: &[u8]) -> Result<File, ParseError> {
    parse_with_config(bytes, &CodecConfig::default())
}

/// Parses a BinaryCIF buffer, rejecting files older than
/// `config.minimum_version` before any column is decoded.
pub fn parse_with_config(bytes: &[u8], config: &CodecConfig) -> Result<File, ParseError> {
    let file = read_file(bytes, config)?;
    log::info!(
        "parsed {} data block(s) from {} bytes",
        file.data_blocks().len(),
        bytes.len()
    );
    Ok(file)
}

//==================================================================================
// II. Version Gate
//==================================================================================

/// Extracts `(major, minor)` from a `major.minor[.patch]` string.
fn major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

/// Accepts `found` when its `major.minor` is at least `minimum`'s. The patch
/// component is ignored.
pub fn check_version(found: &str, minimum: &str) -> Result<(), CifError> {
    let version_error = || CifError::Version {
        found: found.to_string(),
        minimum: minimum.to_string(),
    };
    let required = major_minor(minimum).ok_or_else(|| {
        CifError::InvalidState(format!("invalid minimum version '{}'", minimum))
    })?;
    match major_minor(found) {
        Some(actual) if actual >= required => Ok(()),
        _ => Err(version_error()),
    }
}

//==================================================================================
// III. Eager Decoding
//==================================================================================

fn read_file(bytes: &[u8], config: &CodecConfig) -> Result<File, CifError> {
    let version = format::read_version(bytes)?;
    check_version(&version, &config.minimum_version)?;

    let encoded = format::from_msgpack(bytes)?;
    log::debug!(
        "file version {} written by '{}'",
        encoded.version,
        encoded.encoder
    );

    let blocks = encoded
        .data_blocks
        .iter()
        .map(|block| {
            let categories = block
                .categories
                .iter()
                .map(read_category)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DataBlock::new(block.header.clone(), categories))
        })
        .collect::<Result<Vec<_>, CifError>>()?;

    Ok(File::new(blocks))
}

fn read_category(category: &EncodedCategory) -> Result<Category, CifError> {
    let columns = category
        .columns
        .iter()
        .map(|column| {
            read_column(column, category.row_count)
                .map(|decoded| (column.name.clone(), decoded))
                .map_err(|e| e.in_column(&category.name, &column.name))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Category::new(
        category.name.clone(),
        category.row_count,
        columns,
    ))
}

fn read_column(column: &EncodedColumn, row_count: usize) -> Result<BinaryColumn, CifError> {
    let data = decode_data(&column.data)?;
    if data.len() != row_count {
        return Err(CifError::MalformedEncoding(format!(
            "decoded {} values for a category of {} rows",
            data.len(),
            row_count
        )));
    }

    let presence = column.mask.as_ref().map(decode_mask).transpose()?;
    if let Some(mask) = &presence {
        if mask.len() != row_count {
            return Err(CifError::MalformedEncoding(format!(
                "mask has {} rows, expected {}",
                mask.len(),
                row_count
            )));
        }
    }

    Ok(BinaryColumn::new(data, presence))
}
