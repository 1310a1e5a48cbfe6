//! Plain-text CIF output.
//!
//! A category with one row is written as `_name.field value` pairs; anything
//! larger becomes a `loop_` table. Each value is rendered as a bare token, a
//! quoted token or a `;`-delimited text field depending on its characters.

use std::sync::Arc;

use crate::bridge::writer::{CifWriter, OutputStream};
use crate::category_pipeline::{collect_instances, CategoryInstance, FieldDescriptor};
use crate::config::CodecConfig;
use crate::error::CifError;
use crate::types::ValuePresence;
use crate::utils::normalize_header;

use super::string_writer::StringWriter;

//==================================================================================
// 1. Value Quoting
//==================================================================================

/// How a non-empty value has to be written to survive tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    Bare,
    Single,
    Double,
    Multiline,
}

/// Picks the quoting for `val` in a single pass over its characters.
///
/// A newline, or both quote characters, force a text field. One kind of
/// quote selects the other kind as delimiter. Otherwise whitespace or a
/// leading `#`/`;` selects single quotes.
pub fn quoting(val: &str) -> Quoting {
    let mut has_whitespace = false;
    let mut has_single = false;
    let mut has_double = false;
    let mut quote = None;

    for c in val.chars() {
        match c {
            '\t' | ' ' => has_whitespace = true,
            '\n' => return Quoting::Multiline,
            '"' => {
                if has_single {
                    return Quoting::Multiline;
                }
                has_double = true;
                quote = Some(Quoting::Single);
            }
            '\'' => {
                if has_double {
                    return Quoting::Multiline;
                }
                has_single = true;
                quote = Some(Quoting::Double);
            }
            _ => {}
        }
    }

    if let Some(q) = quote {
        return q;
    }
    if has_whitespace || val.starts_with('#') || val.starts_with(';') {
        return Quoting::Single;
    }
    Quoting::Bare
}

fn write_multiline(writer: &mut StringWriter, val: &str) {
    writer.write("\n;");
    writer.write(val);
    writer.write("\n; ");
}

/// Writes `val` followed by its separating space.
fn write_checked(writer: &mut StringWriter, val: &str) {
    if val.is_empty() {
        writer.write(". ");
        return;
    }
    match quoting(val) {
        Quoting::Bare => {
            writer.write(val);
            writer.write(" ");
        }
        Quoting::Single => {
            writer.write("'");
            writer.write(val);
            writer.write("' ");
        }
        Quoting::Double => {
            writer.write("\"");
            writer.write(val);
            writer.write("\" ");
        }
        Quoting::Multiline => write_multiline(writer, val),
    }
}

fn write_value<D>(writer: &mut StringWriter, field: &FieldDescriptor<D>, data: &D, row: usize) {
    match field.presence_of(data, row) {
        ValuePresence::NotSpecified => writer.write(". "),
        ValuePresence::Unknown => writer.write("? "),
        ValuePresence::Present => match field.string_of(data, row) {
            Some(val) if val.contains('\n') => {
                write_multiline(writer, &val);
                writer.newline();
            }
            Some(val) => write_checked(writer, &val),
            None => writer.write(". "),
        },
    }
}

//==================================================================================
// 2. Category Layouts
//==================================================================================

fn write_single_record<D>(writer: &mut StringWriter, instance: &CategoryInstance<'_, D>) {
    let desc = instance.desc;
    let width = desc
        .fields
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0)
        + desc.name.chars().count()
        + 5;

    for field in &desc.fields {
        writer.write_pad_right(&format!("{}.{}", desc.name, field.name), width);
        write_value(writer, field, instance.data, 0);
        writer.newline();
    }
    writer.write("#\n");
}

fn write_loop<D>(writer: &mut StringWriter, instances: &[CategoryInstance<'_, D>]) {
    let Some(first) = instances.first() else {
        return;
    };
    writer.write("loop_");
    writer.newline();
    for field in &first.desc.fields {
        writer.write(&format!("{}.{}", first.desc.name, field.name));
        writer.newline();
    }

    for instance in instances {
        for row in 0..instance.count {
            for field in &first.desc.fields {
                write_value(writer, field, instance.data, row);
            }
            writer.newline();
        }
    }
    writer.write("#\n");
}

//==================================================================================
// 3. Writer
//==================================================================================

#[derive(Debug)]
pub struct Writer {
    writer: StringWriter,
    encoded: bool,
    data_block_created: bool,
}

impl Writer {
    pub fn new(config: Arc<CodecConfig>) -> Self {
        Self {
            writer: StringWriter::new(config.text_chunk_capacity),
            encoded: false,
            data_block_created: false,
        }
    }

    /// Everything written so far.
    pub fn as_string(&self) -> String {
        self.writer.as_string()
    }

    fn ensure_open(&self) -> Result<(), CifError> {
        if self.encoded {
            return Err(CifError::InvalidState(
                "writer already finalized".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new(Arc::new(CodecConfig::default()))
    }
}

impl CifWriter for Writer {
    fn start_data_block(&mut self, header: &str) -> Result<(), CifError> {
        self.ensure_open()?;
        self.data_block_created = true;
        self.writer.write("data_");
        self.writer.write(&normalize_header(header));
        self.writer.write("\n#\n");
        Ok(())
    }

    fn write_category<'a, C, D: 'a, P>(&mut self, provider: P, contexts: &'a [C]) -> Result<(), CifError>
    where
        P: Fn(&'a C) -> Option<CategoryInstance<'a, D>>,
    {
        self.ensure_open()?;
        if !self.data_block_created {
            return Err(CifError::InvalidState("No data block created.".to_string()));
        }

        let instances = collect_instances(provider, contexts);
        let count: usize = instances.iter().map(|i| i.count).sum();
        match (count, instances.first()) {
            (0, _) | (_, None) => {}
            (1, Some(single)) => write_single_record(&mut self.writer, single),
            (_, Some(first)) => {
                log::debug!("writing '{}' as a loop of {} rows", first.desc.name, count);
                write_loop(&mut self.writer, &instances);
            }
        }
        Ok(())
    }

    fn encode(&mut self) -> Result<(), CifError> {
        self.ensure_open()?;
        self.encoded = true;
        Ok(())
    }

    fn flush<S: OutputStream + ?Sized>(&self, stream: &mut S) -> Result<(), CifError> {
        if !self.encoded {
            return Err(CifError::InvalidState(
                "encode() must be called before flush()".to_string(),
            ));
        }
        self.writer.write_to(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category_pipeline::CategoryDescriptor;

    fn render(val: &str) -> String {
        let mut writer = StringWriter::default();
        write_checked(&mut writer, val);
        writer.as_string()
    }

    #[test]
    fn test_quoting_selection() {
        assert_eq!(render("hello world"), "'hello world' ");
        assert_eq!(render("ALA"), "ALA ");
        assert_eq!(render(""), ". ");
        assert_eq!(render("it's"), "\"it's\" ");
        assert_eq!(render("say \"hi\""), "'say \"hi\"' ");
        assert_eq!(render("it's \"x\""), "\n;it's \"x\"\n; ");
        assert_eq!(render("#comment"), "'#comment' ");
        assert_eq!(render(";x"), "';x' ");
        assert_eq!(render("a\tb"), "'a\tb' ");
    }

    #[test]
    fn test_trailing_quote_is_detected() {
        assert_eq!(quoting("5'"), Quoting::Double);
        assert_eq!(quoting("x\""), Quoting::Single);
    }

    struct Entity {
        ids: Vec<&'static str>,
        descriptions: Vec<Option<&'static str>>,
        weights: Vec<f64>,
    }

    fn entity_desc() -> CategoryDescriptor<Entity> {
        CategoryDescriptor::new(
            "_entity",
            vec![
                FieldDescriptor::string("id", |d: &Entity, i| Some(d.ids[i].to_string())),
                FieldDescriptor::string("pdbx_description", |d: &Entity, i| {
                    d.descriptions[i].map(str::to_string)
                })
                .with_presence(|d: &Entity, i| {
                    if d.descriptions[i].is_some() {
                        ValuePresence::Present
                    } else {
                        ValuePresence::Unknown
                    }
                }),
                FieldDescriptor::number("formula_weight", |d: &Entity, i| d.weights[i]),
            ],
        )
    }

    #[test]
    fn test_single_record_layout() {
        let desc = entity_desc();
        let data = [Entity {
            ids: vec!["1"],
            descriptions: vec![Some("water molecule")],
            weights: vec![18.015],
        }];
        let mut writer = Writer::default();
        writer.start_data_block("1abc").unwrap();
        writer
            .write_category(|d| Some(CategoryInstance::new(d, 1, &desc)), &data)
            .unwrap();
        writer.encode().unwrap();

        // Width: "pdbx_description" (16) + "_entity" (7) + 5.
        let expected = concat!(
            "data_1ABC\n#\n",
            "_entity.id                  1 \n",
            "_entity.pdbx_description    'water molecule' \n",
            "_entity.formula_weight      18.015 \n",
            "#\n",
        );
        let mut out = Vec::new();
        writer.flush(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_loop_layout_spans_instances() {
        let desc = entity_desc();
        let data = [
            Entity {
                ids: vec!["1", "2"],
                descriptions: vec![Some("PROTEIN"), None],
                weights: vec![1200.5, 18.0],
            },
            Entity {
                ids: vec!["3"],
                descriptions: vec![Some("multi\nline")],
                weights: vec![0.5],
            },
        ];
        let mut writer = Writer::default();
        writer.start_data_block("x").unwrap();
        writer
            .write_category(|d| Some(CategoryInstance::new(d, d.ids.len(), &desc)), &data)
            .unwrap();

        let expected = concat!(
            "data_X\n#\n",
            "loop_\n",
            "_entity.id\n",
            "_entity.pdbx_description\n",
            "_entity.formula_weight\n",
            "1 PROTEIN 1200.5 \n",
            "2 ? 18 \n",
            "3 \n;multi\nline\n; \n0.5 \n",
            "#\n",
        );
        assert_eq!(writer.as_string(), expected);
    }

    #[test]
    fn test_state_errors() {
        let desc = entity_desc();
        let data = [Entity {
            ids: vec!["1"],
            descriptions: vec![None],
            weights: vec![1.0],
        }];
        let mut writer = Writer::default();
        assert!(matches!(
            writer.write_category(|d| Some(CategoryInstance::new(d, 1, &desc)), &data),
            Err(CifError::InvalidState(_))
        ));

        let mut out = Vec::new();
        assert!(writer.flush(&mut out).is_err());

        writer.start_data_block("x").unwrap();
        writer.encode().unwrap();
        assert!(matches!(
            writer.write_category(|d| Some(CategoryInstance::new(d, 1, &desc)), &data),
            Err(CifError::InvalidState(_))
        ));
    }

    #[test]
    fn test_empty_category_writes_nothing() {
        let desc = entity_desc();
        let data: [Entity; 0] = [];
        let mut writer = Writer::default();
        writer.start_data_block("x").unwrap();
        writer
            .write_category(|d| Some(CategoryInstance::new(d, 1, &desc)), &data)
            .unwrap();
        assert_eq!(writer.as_string(), "data_X\n#\n");
    }
}
