//! This module defines the producer-facing description of categories and the
//! pipeline that turns them into wire categories.
//!
//! A producer describes each field once (`FieldDescriptor`) and hands the
//! writer one or more `CategoryInstance`s, each pairing a data context with a
//! row count. Instances of the same category are concatenated into one wire
//! category, which lets a producer stream several logical partitions as a
//! single table.

use std::fmt;
use std::sync::Arc;

use crate::pipeline::Encoder;
use crate::types::{ArrayKind, ValuePresence};

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod category;
pub mod column;

pub use category::{collect_instances, encode_category};
pub use column::encode_field;

//==================================================================================
// 2. Descriptors
//==================================================================================

pub type StringAccessor<D> = Arc<dyn Fn(&D, usize) -> Option<String> + Send + Sync>;
pub type NumberAccessor<D> = Arc<dyn Fn(&D, usize) -> f64 + Send + Sync>;
pub type PresenceAccessor<D> = Arc<dyn Fn(&D, usize) -> ValuePresence + Send + Sync>;

/// How to read one field out of a data context of type `D`.
pub struct FieldDescriptor<D> {
    pub name: String,
    pub string: Option<StringAccessor<D>>,
    pub number: Option<NumberAccessor<D>>,
    /// Defaults to every row being `Present`.
    pub presence: Option<PresenceAccessor<D>>,
    /// Row-aligned numeric kind for the encoder input. `None` collects the
    /// column as strings.
    pub typed_array: Option<ArrayKind>,
    /// Defaults to `Encoder::string_array()`.
    pub encoder: Option<Encoder>,
}

impl<D> FieldDescriptor<D> {
    /// A field read as text.
    pub fn string<F>(name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&D, usize) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            string: Some(Arc::new(accessor)),
            number: None,
            presence: None,
            typed_array: None,
            encoder: None,
        }
    }

    /// A field read as a number. Without `typed`, the values are still
    /// collected and dictionary-encoded as their decimal strings.
    pub fn number<F>(name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&D, usize) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            string: None,
            number: Some(Arc::new(accessor)),
            presence: None,
            typed_array: None,
            encoder: None,
        }
    }

    pub fn typed(mut self, kind: ArrayKind) -> Self {
        self.typed_array = Some(kind);
        self
    }

    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = Some(encoder);
        self
    }

    pub fn with_presence<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&D, usize) -> ValuePresence + Send + Sync + 'static,
    {
        self.presence = Some(Arc::new(accessor));
        self
    }

    /// Adds a string accessor to a numeric field, used by the text writer.
    pub fn with_string<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&D, usize) -> Option<String> + Send + Sync + 'static,
    {
        self.string = Some(Arc::new(accessor));
        self
    }

    pub fn presence_of(&self, data: &D, row: usize) -> ValuePresence {
        self.presence
            .as_ref()
            .map_or(ValuePresence::Present, |p| p(data, row))
    }

    /// The row's value as text: the string accessor if there is one,
    /// otherwise the number accessor's shortest round-trip form.
    pub fn string_of(&self, data: &D, row: usize) -> Option<String> {
        match (&self.string, &self.number) {
            (Some(s), _) => s(data, row),
            (None, Some(n)) => Some(n(data, row).to_string()),
            (None, None) => None,
        }
    }
}

impl<D> Clone for FieldDescriptor<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            string: self.string.clone(),
            number: self.number.clone(),
            presence: self.presence.clone(),
            typed_array: self.typed_array,
            encoder: self.encoder.clone(),
        }
    }
}

impl<D> fmt::Debug for FieldDescriptor<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("string", &self.string.is_some())
            .field("number", &self.number.is_some())
            .field("presence", &self.presence.is_some())
            .field("typed_array", &self.typed_array)
            .field("encoder", &self.encoder)
            .finish()
    }
}

#[derive(Debug)]
pub struct CategoryDescriptor<D> {
    pub name: String,
    pub fields: Vec<FieldDescriptor<D>>,
}

impl<D> Clone for CategoryDescriptor<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            fields: self.fields.clone(),
        }
    }
}

impl<D> CategoryDescriptor<D> {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor<D>>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// One producer-side contribution to a category.
#[derive(Debug)]
pub struct CategoryInstance<'a, D> {
    pub data: &'a D,
    pub count: usize,
    pub desc: &'a CategoryDescriptor<D>,
}

impl<'a, D> Clone for CategoryInstance<'a, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, D> Copy for CategoryInstance<'a, D> {}

impl<'a, D> CategoryInstance<'a, D> {
    pub fn new(data: &'a D, count: usize, desc: &'a CategoryDescriptor<D>) -> Self {
        Self { data, count, desc }
    }
}
