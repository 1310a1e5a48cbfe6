// In: src/bridge/file.rs

//! The read-side view of a decoded file.
//!
//! Columns are decoded eagerly by the parser, so every accessor here is a
//! plain lookup into an already materialized `TypedArray`.

use hashbrown::HashMap;
use serde_json::{json, Map, Value};

use crate::types::{TypedArray, ValuePresence};

//==================================================================================
// I. Column Contract
//==================================================================================

/// One field of a category, addressed by row.
pub trait Column {
    fn is_defined(&self) -> bool;

    /// The row's text, or `None` for a row that is not present.
    fn get_string(&self, row: usize) -> Option<String>;

    /// The row as an integer; `0` when absent or not numeric.
    fn get_integer(&self, row: usize) -> i64;

    /// The row as a float; `0.0` when absent or not numeric.
    fn get_float(&self, row: usize) -> f64;

    fn get_value_presence(&self, row: usize) -> ValuePresence;

    fn are_values_equal(&self, row_a: usize, row_b: usize) -> bool;

    fn string_equals(&self, row: usize, value: Option<&str>) -> bool;
}

/// A decoded column with its optional presence mask.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryColumn {
    data: TypedArray,
    presence: Option<Vec<ValuePresence>>,
}

impl BinaryColumn {
    pub fn new(data: TypedArray, presence: Option<Vec<ValuePresence>>) -> Self {
        Self { data, presence }
    }

    pub fn data(&self) -> &TypedArray {
        &self.data
    }

    fn is_present(&self, row: usize) -> bool {
        self.get_value_presence(row).is_present()
    }
}

impl Column for BinaryColumn {
    fn is_defined(&self) -> bool {
        true
    }

    fn get_string(&self, row: usize) -> Option<String> {
        if !self.is_present(row) {
            return None;
        }
        self.data.get_string(row)
    }

    fn get_integer(&self, row: usize) -> i64 {
        if !self.is_present(row) {
            return 0;
        }
        match &self.data {
            TypedArray::Strings(values) => values
                .get(row)
                .and_then(|s| s.as_deref())
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(0),
            other => other.get_f64(row).map_or(0, |v| v as i64),
        }
    }

    fn get_float(&self, row: usize) -> f64 {
        if !self.is_present(row) {
            return 0.0;
        }
        self.data.get_f64(row).unwrap_or(0.0)
    }

    fn get_value_presence(&self, row: usize) -> ValuePresence {
        match &self.presence {
            Some(mask) => mask.get(row).copied().unwrap_or(ValuePresence::NotSpecified),
            None => ValuePresence::Present,
        }
    }

    fn are_values_equal(&self, row_a: usize, row_b: usize) -> bool {
        match &self.data {
            TypedArray::Strings(_) => self.get_string(row_a) == self.get_string(row_b),
            data => data.get_f64(row_a) == data.get_f64(row_b),
        }
    }

    fn string_equals(&self, row: usize, value: Option<&str>) -> bool {
        self.get_string(row).as_deref() == value
    }
}

/// Stands in for a field the category does not have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndefinedColumn;

pub static UNDEFINED_COLUMN: UndefinedColumn = UndefinedColumn;

impl Column for UndefinedColumn {
    fn is_defined(&self) -> bool {
        false
    }
    fn get_string(&self, _row: usize) -> Option<String> {
        None
    }
    fn get_integer(&self, _row: usize) -> i64 {
        0
    }
    fn get_float(&self, _row: usize) -> f64 {
        0.0
    }
    fn get_value_presence(&self, _row: usize) -> ValuePresence {
        ValuePresence::NotSpecified
    }
    fn are_values_equal(&self, _row_a: usize, _row_b: usize) -> bool {
        true
    }
    fn string_equals(&self, _row: usize, value: Option<&str>) -> bool {
        value.is_none()
    }
}

//==================================================================================
// II. Category, Data Block, File
//==================================================================================

#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    row_count: usize,
    column_names: Vec<String>,
    columns: Vec<BinaryColumn>,
    index: HashMap<String, usize>,
}

impl Category {
    pub fn new(name: String, row_count: usize, columns: Vec<(String, BinaryColumn)>) -> Self {
        let mut column_names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        let mut index = HashMap::with_capacity(columns.len());
        for (i, (column_name, column)) in columns.into_iter().enumerate() {
            index.insert(column_name.clone(), i);
            column_names.push(column_name);
            values.push(column);
        }
        Self {
            name,
            row_count,
            column_names,
            columns: values,
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Looks a column up by field name (without the category prefix).
    /// Missing fields yield the `UndefinedColumn`.
    pub fn get_column(&self, name: &str) -> &dyn Column {
        match self.index.get(name) {
            Some(&i) => &self.columns[i] as &dyn Column,
            None => &UNDEFINED_COLUMN as &dyn Column,
        }
    }

    /// Reads `field[1][1]` .. `field[rows][cols]` at `row` as a matrix.
    pub fn get_matrix(&self, field: &str, rows: usize, cols: usize, row: usize) -> Vec<Vec<f64>> {
        (1..=rows)
            .map(|i| {
                (1..=cols)
                    .map(|j| self.get_column(&format!("{}[{}][{}]", field, i, j)).get_float(row))
                    .collect()
            })
            .collect()
    }

    /// Reads `field[1]` .. `field[rows]` at `row` as a vector.
    pub fn get_vector(&self, field: &str, rows: usize, row: usize) -> Vec<f64> {
        (1..=rows)
            .map(|i| self.get_column(&format!("{}[{}]", field, i)).get_float(row))
            .collect()
    }

    fn to_json(&self) -> Value {
        let mut columns = Map::new();
        for (name, column) in self.column_names.iter().zip(&self.columns) {
            let values: Vec<Value> = (0..self.row_count)
                .map(|row| cell_to_json(column, row))
                .collect();
            columns.insert(name.clone(), Value::Array(values));
        }
        json!({
            "name": self.name,
            "rowCount": self.row_count,
            "columns": columns,
        })
    }
}

fn cell_to_json(column: &BinaryColumn, row: usize) -> Value {
    if !column.is_present(row) {
        return Value::Null;
    }
    match column.data() {
        TypedArray::Strings(_) => column.get_string(row).map_or(Value::Null, Value::String),
        TypedArray::Float32(_) | TypedArray::Float64(_) => json!(column.get_float(row)),
        _ => json!(column.get_integer(row)),
    }
}

#[derive(Debug, Clone)]
pub struct DataBlock {
    header: String,
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl DataBlock {
    pub fn new(header: String, categories: Vec<Category>) -> Self {
        let index = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Self {
            header,
            categories,
            index,
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks a category up by its full name, e.g. `_atom_site`.
    pub fn get_category(&self, name: &str) -> Option<&Category> {
        self.index.get(name).map(|&i| &self.categories[i])
    }
}

#[derive(Debug, Clone)]
pub struct File {
    data_blocks: Vec<DataBlock>,
}

impl File {
    pub fn new(data_blocks: Vec<DataBlock>) -> Self {
        Self { data_blocks }
    }

    pub fn data_blocks(&self) -> &[DataBlock] {
        &self.data_blocks
    }

    /// A JSON dump of every block, category and decoded value. Rows that
    /// are not present become `null`.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.data_blocks
                .iter()
                .map(|block| {
                    json!({
                        "id": block.header,
                        "categories": block.categories.iter().map(Category::to_json).collect::<Vec<_>>(),
                    })
                })
                .collect(),
        )
    }
}
