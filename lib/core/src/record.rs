use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

static MISSING: Value = Value::Missing;

/// A flat hyperparameter record: field name -> raw value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Value of a field; absent fields read as [`Value::Missing`]
    pub fn get(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&MISSING)
    }

    /// Whether the field key is present at all (even if its value is null)
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Records grouped by an outer key such as a task id
///
/// Groups are visited in key order, so flattening is deterministic and
/// lines up with any other per-group data keyed the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordBatch {
    groups: BTreeMap<String, Vec<Record>>,
}

impl RecordBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-group batch
    pub fn from_records(group: impl Into<String>, records: Vec<Record>) -> Self {
        let mut batch = Self::new();
        batch.insert(group, records);
        batch
    }

    pub fn insert(&mut self, group: impl Into<String>, records: Vec<Record>) {
        self.groups.insert(group.into(), records);
    }

    pub fn group(&self, key: &str) -> Option<&[Record]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// All records, flattened in group order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.groups.values().flatten()
    }

    /// Total number of records across groups
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
