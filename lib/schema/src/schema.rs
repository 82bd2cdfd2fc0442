//! Field schema definitions
//!
//! Normalizes the field description list into an ordered lookup.
//! The description order is the one field order used everywhere
//! downstream: group sizes, vector assembly and reconstruction.

use ahash::AHashMap;
use paramvec_core::{Error, Record, Result, Value};
use serde::{Deserialize, Serialize};

/// Declared type of a field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    /// Real-valued field - standardized
    Numeric,
    /// Integer-valued field - standardized, rounded on decode
    Integer,
    /// Categorical field - one-hot encoded
    Discrete,
    /// Boolean field - three-way encoded (false / unknown / true)
    Logical,
    /// Any other declared type - passed through, never encoded
    Untyped,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Numeric => "numeric",
            DataType::Integer => "integer",
            DataType::Discrete => "discrete",
            DataType::Logical => "logical",
            DataType::Untyped => "untyped",
        }
    }

    /// Numeric and integer fields are cast to floating point
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Numeric | DataType::Integer)
    }
}

impl From<&str> for DataType {
    fn from(s: &str) -> Self {
        match s {
            "numeric" => DataType::Numeric,
            "integer" => DataType::Integer,
            "discrete" => DataType::Discrete,
            "logical" => DataType::Logical,
            _ => DataType::Untyped,
        }
    }
}

impl From<String> for DataType {
    fn from(s: String) -> Self {
        DataType::from(s.as_str())
    }
}

impl From<DataType> for String {
    fn from(t: DataType) -> Self {
        t.as_str().to_string()
    }
}

/// One entry of the field description list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDescription {
    pub name: String,

    pub data_type: DataType,

    /// Declared default, used only when declared defaults are enabled
    #[serde(default, skip_serializing_if = "Value::is_missing")]
    pub default_value: Value,
}

impl FieldDescription {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            default_value: Value::Missing,
        }
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Numeric)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Integer)
    }

    pub fn discrete(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Discrete)
    }

    pub fn logical(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Logical)
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Untyped)
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = value.into();
        self
    }
}

/// Ordered field schema
///
/// Built once from the description list; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldDescription>", into = "Vec<FieldDescription>")]
pub struct Schema {
    fields: Vec<FieldDescription>,
    index: AHashMap<String, usize>,
}

impl Schema {
    /// Build the schema, rejecting duplicate field names
    pub fn from_descriptions(descriptions: &[FieldDescription]) -> Result<Self> {
        let mut index = AHashMap::with_capacity(descriptions.len());
        for (position, field) in descriptions.iter().enumerate() {
            if index.insert(field.name.clone(), position).is_some() {
                return Err(Error::DuplicateField(field.name.clone()));
            }
        }

        Ok(Self {
            fields: descriptions.to_vec(),
            index,
        })
    }

    /// Fields in schema order
    pub fn fields(&self) -> &[FieldDescription] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDescription> {
        self.position(name).map(|i| &self.fields[i])
    }

    /// Position of a field in schema order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn data_type(&self, name: &str) -> Result<DataType> {
        self.get_field(name)
            .map(|f| f.data_type)
            .ok_or_else(|| Error::SchemaMismatch(name.to_string()))
    }

    /// Every field of the record must be declared
    pub fn validate_record(&self, record: &Record) -> Result<()> {
        match record.field_names().find(|name| !self.index.contains_key(*name)) {
            Some(name) => Err(Error::SchemaMismatch(name.to_string())),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Vec<FieldDescription>> for Schema {
    type Error = Error;

    fn try_from(descriptions: Vec<FieldDescription>) -> Result<Self> {
        Schema::from_descriptions(&descriptions)
    }
}

impl From<Schema> for Vec<FieldDescription> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}
