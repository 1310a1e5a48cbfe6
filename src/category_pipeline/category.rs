//! Aggregates category instances into one wire category.

use crate::bridge::format::EncodedCategory;
use crate::config::CodecConfig;
use crate::error::CifError;

use super::{encode_field, CategoryInstance};

/// Calls `provider` once per context and keeps the instances that have rows.
pub fn collect_instances<'a, C, D, P>(provider: P, contexts: &'a [C]) -> Vec<CategoryInstance<'a, D>>
where
    P: Fn(&'a C) -> Option<CategoryInstance<'a, D>>,
{
    contexts
        .iter()
        .filter_map(provider)
        .filter(|instance| instance.count > 0)
        .collect()
}

/// Encodes same-shaped instances as a single category whose row count is the
/// sum of theirs. The field list of the first instance is authoritative.
///
/// Returns `Ok(None)` when there is nothing to write.
pub fn encode_category<D>(
    instances: &[CategoryInstance<'_, D>],
    config: &CodecConfig,
) -> Result<Option<EncodedCategory>, CifError> {
    let Some(first) = instances.iter().find(|i| i.count > 0) else {
        return Ok(None);
    };
    let contexts: Vec<(&D, usize)> = instances
        .iter()
        .filter(|i| i.count > 0)
        .map(|i| (i.data, i.count))
        .collect();
    let row_count: usize = contexts.iter().map(|&(_, count)| count).sum();

    let name = &first.desc.name;
    let mut columns = Vec::with_capacity(first.desc.fields.len());
    for field in &first.desc.fields {
        let override_encoder = config.column_encoder(name, &field.name)?;
        let column = encode_field(field, &contexts, row_count, override_encoder.as_ref())
            .map_err(|e| match e {
                CifError::Chain(msg) => {
                    CifError::Chain(format!("{}.{}: {}", name, field.name, msg))
                }
                other => other,
            })?;
        columns.push(column);
    }

    log::info!(
        "encoded category '{}' with {} rows in {} columns",
        name,
        row_count,
        columns.len()
    );

    Ok(Some(EncodedCategory {
        name: name.clone(),
        row_count,
        columns,
    }))
}
