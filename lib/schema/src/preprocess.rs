//! Defaulting and casting
//!
//! Turns raw records into prepared rows: one [`Cell`] per schema field, in
//! schema order. Missing values are made explicit here, before any
//! type-specific handling:
//!
//! - numeric/integer fields are cast to `f64`, missing becomes the
//!   configured marker (`-1.0` by default)
//! - discrete/logical fields become a [`Category`], missing becomes
//!   [`Category::Default`]
//! - untyped fields pass through untouched

use crate::config::EncodingConfig;
use crate::schema::{DataType, FieldDescription, Schema};
use ordered_float::OrderedFloat;
use paramvec_core::{Error, Record, Result, Value};
use serde::Serialize;
use std::fmt;

/// A categorical value with a total order
///
/// Ordered by variant first (`Default < Bool < Number < Text`), then by
/// value. This order fixes the one-hot label assignment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Category {
    /// Not supplied
    Default,
    Bool(bool),
    Number(OrderedFloat<f64>),
    Text(String),
}

impl Category {
    pub fn text(s: impl Into<String>) -> Self {
        Category::Text(s.into())
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Category::Default)
    }

    /// Back to the raw representation; the default maps to `Missing`
    pub fn to_value(&self) -> Value {
        match self {
            Category::Default => Value::Missing,
            Category::Bool(b) => Value::Bool(*b),
            Category::Number(n) => Value::Number(n.into_inner()),
            Category::Text(s) => Value::Text(s.clone()),
        }
    }
}

impl From<&Value> for Category {
    fn from(value: &Value) -> Self {
        match value {
            Value::Missing => Category::Default,
            Value::Bool(b) => Category::Bool(*b),
            Value::Number(n) => Category::Number(OrderedFloat(*n)),
            Value::Text(s) => Category::Text(s.clone()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Default => write!(f, "<default>"),
            Category::Bool(b) => write!(f, "{}", b),
            Category::Number(n) => write!(f, "{}", n),
            Category::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// One preprocessed field value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Category(Category),
    Passthrough(Value),
}

/// A record after defaulting and casting, aligned with schema order
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRecord {
    cells: Vec<Cell>,
}

impl PreparedRecord {
    /// Cell at a schema position
    pub fn cell(&self, position: usize) -> &Cell {
        &self.cells[position]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Preprocess one record against the schema
pub fn preprocess_record(
    schema: &Schema,
    config: &EncodingConfig,
    record: &Record,
) -> Result<PreparedRecord> {
    schema.validate_record(record)?;

    let cells = schema
        .fields()
        .iter()
        .map(|field| prepare_cell(field, record.get(&field.name), config))
        .collect::<Result<Vec<_>>>()?;

    Ok(PreparedRecord { cells })
}

/// Preprocess a batch; the first failing record aborts
pub fn preprocess_batch<'a, I>(
    schema: &Schema,
    config: &EncodingConfig,
    records: I,
) -> Result<Vec<PreparedRecord>>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .map(|record| preprocess_record(schema, config, record))
        .collect()
}

fn prepare_cell(field: &FieldDescription, value: &Value, config: &EncodingConfig) -> Result<Cell> {
    match field.data_type {
        DataType::Numeric | DataType::Integer => {
            let value = fill_missing(field, value, config);
            cast_number(&field.name, value, config.missing_number).map(Cell::Number)
        }
        DataType::Discrete | DataType::Logical => {
            let value = fill_missing(field, value, config);
            Ok(Cell::Category(Category::from(value)))
        }
        DataType::Untyped => Ok(Cell::Passthrough(value.clone())),
    }
}

/// Declared default for a missing value, when enabled and usable
fn fill_missing<'a>(
    field: &'a FieldDescription,
    value: &'a Value,
    config: &EncodingConfig,
) -> &'a Value {
    if !value.is_missing() || !config.use_declared_defaults {
        return value;
    }
    let declared = &field.default_value;
    // A numeric field whose declared default is not a number keeps the marker
    if field.data_type.is_numeric() && declared.as_number().is_none() {
        return value;
    }
    declared
}

fn cast_number(field: &str, value: &Value, missing: f64) -> Result<f64> {
    if value.is_missing() {
        return Ok(missing);
    }
    value.as_number().ok_or_else(|| Error::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}
