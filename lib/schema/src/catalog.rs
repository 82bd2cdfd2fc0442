//! Distinct-value catalog
//!
//! Sorted, duplicate-free values per field over the fitting batch.
//! Codecs are fitted on the catalog only, never on the raw batch.

use crate::preprocess::{Category, Cell, PreparedRecord};
use crate::schema::Schema;
use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::BTreeSet;

/// Distinct values of one field, ascending
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Distinct {
    Numbers(Vec<f64>),
    Categories(Vec<Category>),
}

impl Distinct {
    pub fn len(&self) -> usize {
        match self {
            Distinct::Numbers(v) => v.len(),
            Distinct::Categories(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Distinct values for every schema field, in schema order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    entries: Vec<(String, Distinct)>,
    #[serde(skip)]
    index: AHashMap<String, usize>,
}

impl Catalog {
    /// Collect distinct values column-wise over prepared rows
    pub fn from_rows(schema: &Schema, rows: &[PreparedRecord]) -> Self {
        let mut entries = Vec::with_capacity(schema.len());
        let mut index = AHashMap::with_capacity(schema.len());

        for (position, name) in schema.field_names().enumerate() {
            let column = rows.iter().map(|row| row.cell(position));
            index.insert(name.to_string(), entries.len());
            entries.push((name.to_string(), collect_distinct(column)));
        }

        Self { entries, index }
    }

    pub fn get(&self, name: &str) -> Option<&Distinct> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Number of distinct values of a field (0 for unknown fields)
    pub fn cardinality(&self, name: &str) -> usize {
        self.get(name).map_or(0, Distinct::len)
    }

    /// Entries in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Distinct)> {
        self.entries.iter().map(|(name, d)| (name.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn collect_distinct<'a>(column: impl Iterator<Item = &'a Cell>) -> Distinct {
    let mut numbers = BTreeSet::new();
    let mut categories = BTreeSet::new();

    for cell in column {
        match cell {
            Cell::Number(n) => {
                numbers.insert(OrderedFloat(*n));
            }
            Cell::Category(c) => {
                categories.insert(c.clone());
            }
            Cell::Passthrough(v) => {
                categories.insert(Category::from(v));
            }
        }
    }

    // A column is homogeneous: schema position fixes the cell kind
    if categories.is_empty() {
        Distinct::Numbers(numbers.into_iter().map(OrderedFloat::into_inner).collect())
    } else {
        Distinct::Categories(categories.into_iter().collect())
    }
}
