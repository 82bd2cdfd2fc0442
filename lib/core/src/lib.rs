//! # paramvec Core
//!
//! Core types shared by the paramvec crates.
//!
//! - [`Value`] - A raw field value (missing, boolean, number or text)
//! - [`Record`] - A flat hyperparameter setting, field name -> value
//! - [`RecordBatch`] - Records grouped by an outer key (e.g. task id)
//! - [`Vector`] - The flat numeric encoding of one record
//! - [`Error`] - The error taxonomy of the encode/decode pipeline
//!
//! ## Example
//!
//! ```rust
//! use paramvec_core::{Record, RecordBatch, Value};
//!
//! let record = Record::new()
//!     .with("num.trees", 500.0)
//!     .with("splitrule", "gini");
//! let batch = RecordBatch::from_records("31", vec![record]);
//!
//! assert_eq!(batch.len(), 1);
//! assert_eq!(batch.records().next().unwrap().get("mtry"), &Value::Missing);
//! ```

pub mod error;
pub mod record;
pub mod value;
pub mod vector;

pub use error::{Error, Result};
pub use record::{Record, RecordBatch};
pub use value::Value;
pub use vector::Vector;
