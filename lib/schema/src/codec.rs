//! Per-field codecs
//!
//! Each encoded field gets one fitted codec holding its parameters as
//! plain data:
//!
//! - numeric/integer: standardization `z = (x - mean) / scale`
//! - discrete: one-hot over the catalog categories
//! - logical: three-way `FALSE -> 0`, unknown `-> 0.5`, `TRUE -> 1`
//! - untyped: passthrough, zero width

use crate::catalog::Distinct;
use crate::config::EncodingConfig;
use crate::preprocess::{Category, Cell};
use crate::schema::{DataType, FieldDescription};
use paramvec_core::{Error, Result, Value};
use serde::Serialize;

/// Encoding of a logical value that is neither true nor false
pub const LOGICAL_UNKNOWN: f64 = 0.5;

/// Relative tolerance when matching a decoded number against the marker
const MARKER_TOLERANCE: f64 = 1e-9;

/// Standardization codec for numeric and integer fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericCodec {
    mean: f64,
    scale: f64,
    degenerate: bool,
    integer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_marker: Option<f64>,
}

impl NumericCodec {
    /// Fit mean and population standard deviation on a sample
    ///
    /// A zero-variance (or empty) sample uses a scale of 1, so the codec
    /// only centers values and stays exactly invertible.
    pub fn fit(sample: &[f64]) -> Self {
        if sample.is_empty() {
            return Self {
                mean: 0.0,
                scale: 1.0,
                degenerate: true,
                integer: false,
                missing_marker: None,
            };
        }

        let n = sample.len() as f64;
        let mean = sample.iter().sum::<f64>() / n;
        let variance = sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();
        let degenerate = std <= f64::EPSILON * mean.abs().max(1.0);

        Self {
            mean,
            scale: if degenerate { 1.0 } else { std },
            degenerate,
            integer: false,
            missing_marker: None,
        }
    }

    /// Round decoded values to the nearest integer
    #[must_use]
    pub fn with_rounding(mut self, integer: bool) -> Self {
        self.integer = integer;
        self
    }

    /// Decode values equal to `marker` as missing
    #[must_use]
    pub fn with_missing_marker(mut self, marker: f64) -> Self {
        self.missing_marker = Some(marker);
        self
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// True when the fitting sample had zero variance
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    #[inline]
    pub fn transform(&self, x: f64) -> f64 {
        (x - self.mean) / self.scale
    }

    #[inline]
    pub fn inverse(&self, z: f64) -> f64 {
        let x = z * self.scale + self.mean;
        if self.integer {
            x.round()
        } else {
            x
        }
    }

    /// Inverse transform, mapping the missing marker back to `Missing`
    pub fn decode_value(&self, z: f64) -> Value {
        let x = self.inverse(z);
        match self.missing_marker {
            Some(marker) if self.is_marker(x, marker) => Value::Missing,
            _ => Value::Number(x),
        }
    }

    fn is_marker(&self, x: f64, marker: f64) -> bool {
        if self.integer {
            return x == marker.round();
        }
        let tolerance = MARKER_TOLERANCE * self.scale.max(self.mean.abs()).max(1.0);
        (x - marker).abs() <= tolerance
    }
}

/// One-hot codec for discrete fields
///
/// Labels are positions in the sorted category list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalCodec {
    categories: Vec<Category>,
}

impl CategoricalCodec {
    pub fn fit(mut categories: Vec<Category>) -> Self {
        categories.sort();
        categories.dedup();
        Self { categories }
    }

    pub fn cardinality(&self) -> usize {
        self.categories.len()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn label(&self, category: &Category) -> Option<usize> {
        self.categories.binary_search(category).ok()
    }

    /// Append the one-hot block of `category` to `out`
    pub fn encode_into(&self, field: &str, category: &Category, out: &mut Vec<f64>) -> Result<()> {
        let label = self.label(category).ok_or_else(|| Error::UnseenCategory {
            field: field.to_string(),
            value: category.to_string(),
        })?;
        out.extend((0..self.cardinality()).map(|i| if i == label { 1.0 } else { 0.0 }));
        Ok(())
    }

    /// Category of the single entry equal to 1
    pub fn decode(&self, field: &str, segment: &[f64]) -> Result<Category> {
        let mut hot = segment
            .iter()
            .enumerate()
            .filter(|&(_, &x)| x == 1.0)
            .map(|(i, _)| i);

        match (hot.next(), hot.count()) {
            (Some(label), 0) => Ok(self.categories[label].clone()),
            (first, rest) => Err(Error::MalformedEncoding {
                field: field.to_string(),
                active: usize::from(first.is_some()) + rest,
            }),
        }
    }
}

/// Three-way codec for logical fields
///
/// Accepts the configured text tokens and JSON booleans. A field fitted on
/// booleans only decodes back to booleans.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalCodec {
    true_token: String,
    false_token: String,
    booleans: bool,
}

impl LogicalCodec {
    pub fn new(true_token: impl Into<String>, false_token: impl Into<String>) -> Self {
        Self {
            true_token: true_token.into(),
            false_token: false_token.into(),
            booleans: false,
        }
    }

    /// Decode to booleans when the fitted values hold booleans and no token
    pub fn fit(mut self, categories: &[Category]) -> Self {
        let has_bool = categories.iter().any(|c| matches!(c, Category::Bool(_)));
        let has_token = categories.iter().any(|c| match c {
            Category::Text(s) => *s == self.true_token || *s == self.false_token,
            _ => false,
        });
        self.booleans = has_bool && !has_token;
        self
    }

    pub fn decodes_booleans(&self) -> bool {
        self.booleans
    }

    pub fn encode(&self, category: &Category) -> f64 {
        match category {
            Category::Bool(true) => 1.0,
            Category::Bool(false) => 0.0,
            Category::Text(s) if *s == self.true_token => 1.0,
            Category::Text(s) if *s == self.false_token => 0.0,
            _ => LOGICAL_UNKNOWN,
        }
    }

    /// Exactly 0.5 (or NaN) decodes to `Missing`; there is no tolerance band
    pub fn decode(&self, x: f64) -> Value {
        let truth = if x < LOGICAL_UNKNOWN {
            false
        } else if x > LOGICAL_UNKNOWN {
            true
        } else {
            return Value::Missing;
        };
        match (self.booleans, truth) {
            (true, truth) => Value::Bool(truth),
            (false, true) => Value::Text(self.true_token.clone()),
            (false, false) => Value::Text(self.false_token.clone()),
        }
    }
}

impl Default for LogicalCodec {
    fn default() -> Self {
        let config = EncodingConfig::default();
        Self::new(config.true_token, config.false_token)
    }
}

/// Fitted codec of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldCodec {
    Numeric(NumericCodec),
    Categorical(CategoricalCodec),
    Logical(LogicalCodec),
    Passthrough,
}

impl FieldCodec {
    /// Dispatch on the declared type and fit on the field's distinct values
    pub fn fit(
        field: &FieldDescription,
        distinct: &Distinct,
        config: &EncodingConfig,
    ) -> Result<Self> {
        let codec = match (field.data_type, distinct) {
            (DataType::Numeric | DataType::Integer, Distinct::Numbers(sample)) => {
                FieldCodec::Numeric(
                    NumericCodec::fit(sample)
                        .with_rounding(field.data_type == DataType::Integer)
                        .with_missing_marker(config.missing_number),
                )
            }
            (DataType::Discrete, Distinct::Categories(categories)) => {
                FieldCodec::Categorical(CategoricalCodec::fit(categories.clone()))
            }
            // An empty column carries no category kind
            (DataType::Discrete, Distinct::Numbers(sample)) if sample.is_empty() => {
                FieldCodec::Categorical(CategoricalCodec::fit(Vec::new()))
            }
            (DataType::Logical, distinct) => {
                let codec = LogicalCodec::new(&config.true_token, &config.false_token);
                let categories: &[Category] = match distinct {
                    Distinct::Categories(categories) => categories.as_slice(),
                    Distinct::Numbers(_) => &[],
                };
                FieldCodec::Logical(codec.fit(categories))
            }
            (DataType::Untyped, _) => FieldCodec::Passthrough,
            _ => return Err(Error::SchemaMismatch(field.name.clone())),
        };
        Ok(codec)
    }

    /// Number of vector slots
    pub fn width(&self) -> usize {
        match self {
            FieldCodec::Numeric(_) | FieldCodec::Logical(_) => 1,
            FieldCodec::Categorical(c) => c.cardinality(),
            FieldCodec::Passthrough => 0,
        }
    }

    /// Whether the field occupies any vector slots
    pub fn is_encoded(&self) -> bool {
        self.width() > 0
    }

    /// Append the encoding of `cell` to `out`
    pub fn encode(&self, field: &str, cell: &Cell, out: &mut Vec<f64>) -> Result<()> {
        match (self, cell) {
            (FieldCodec::Numeric(codec), Cell::Number(x)) => out.push(codec.transform(*x)),
            (FieldCodec::Categorical(codec), Cell::Category(category)) => {
                codec.encode_into(field, category, out)?
            }
            (FieldCodec::Logical(codec), Cell::Category(category)) => {
                out.push(codec.encode(category))
            }
            (FieldCodec::Passthrough, _) => {}
            _ => return Err(Error::SchemaMismatch(field.to_string())),
        }
        Ok(())
    }

    /// Decode one segment of exactly [`width`](Self::width) values
    pub fn decode(&self, field: &str, segment: &[f64]) -> Result<Value> {
        if segment.len() != self.width() {
            return Err(Error::InvalidDimension {
                expected: self.width(),
                actual: segment.len(),
            });
        }

        let value = match self {
            FieldCodec::Numeric(codec) => codec.decode_value(segment[0]),
            FieldCodec::Categorical(codec) => codec.decode(field, segment)?.to_value(),
            FieldCodec::Logical(codec) => codec.decode(segment[0]),
            FieldCodec::Passthrough => Value::Missing,
        };
        Ok(value)
    }
}
