//! # paramvec Schema
//!
//! Schema-driven encoding of hyperparameter records into fixed-width
//! numeric vectors, and exact reconstruction of the records from them.
//!
//! ## Overview
//!
//! Each field of a record is described by a name and a declared type:
//!
//! - **numeric / integer**: standardized with the mean and standard
//!   deviation of the field's distinct values (integers are rounded back)
//! - **discrete**: one-hot encoded over the sorted distinct values
//! - **logical**: `FALSE -> 0`, not supplied `-> 0.5`, `TRUE -> 1`
//! - anything else: passed through and left out of the vector
//!
//! ## Example
//!
//! ```rust
//! use paramvec_schema::{Converter, FieldDescription};
//! use paramvec_core::{Record, RecordBatch};
//!
//! let descriptions = vec![
//!     FieldDescription::numeric("a"),
//!     FieldDescription::discrete("b"),
//!     FieldDescription::logical("c"),
//! ];
//! let batch = RecordBatch::from_records("task", vec![
//!     Record::new().with("a", 1.0).with("b", "x").with("c", "TRUE"),
//!     Record::new().with("a", 2.0).with("b", "y").with("c", "FALSE"),
//!     Record::new().with("a", 3.0).with("b", "x"),
//! ]);
//!
//! let converter = Converter::new(&batch, &descriptions).unwrap();
//! let record = Record::new().with("a", 2.0).with("b", "y").with("c", "TRUE");
//! let vector = converter.encode_record(&record).unwrap();
//! assert_eq!(vector.as_slice(), &[0.0, 0.0, 1.0, 1.0]);
//! assert_eq!(converter.decode_vector(&vector).unwrap(), record);
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Schema    │────>│ Preprocess  │────>│   Catalog   │
//! │  (fields)   │     │ (defaults)  │     │ (distinct)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                         ┌──────┴──────┐
//!                                         │   Codecs    │
//!                                         │ (per field) │
//!                                         └──────┬──────┘
//!                                  ┌─────────────┴─────────────┐
//!                           ┌──────┴──────┐             ┌──────┴──────┐
//!                           │  Assemble   │             │ Reconstruct │
//!                           │ (record→v)  │             │ (v→record)  │
//!                           └─────────────┘             └─────────────┘
//! ```

pub mod schema;
pub mod config;
pub mod preprocess;
pub mod catalog;
pub mod codec;
pub mod groups;
pub mod converter;

// Re-export main types
pub use schema::{Schema, FieldDescription, DataType};
pub use config::EncodingConfig;
pub use preprocess::{Category, Cell, PreparedRecord, preprocess_record, preprocess_batch};
pub use catalog::{Catalog, Distinct};
pub use codec::{FieldCodec, NumericCodec, CategoricalCodec, LogicalCodec, LOGICAL_UNKNOWN};
pub use groups::{Group, GroupSizes};
pub use converter::Converter;
