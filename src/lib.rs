//! # paramvec
//!
//! Turns schema-described hyperparameter records (numeric, integer,
//! discrete and logical fields, with missing values) into fixed-width
//! numeric vectors for downstream modeling, and back again.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! paramvec encode --params flow_6794_params.json --description flow_6794.json
//! paramvec merge --params flow_6794_params.json --description flow_6794.json \
//!     --scores flow_6794_scores.json --qualities openml_100_qualities.json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use paramvec::prelude::*;
//!
//! let descriptions = vec![
//!     FieldDescription::integer("num.trees"),
//!     FieldDescription::discrete("splitrule"),
//!     FieldDescription::logical("replace"),
//! ];
//! let batch = RecordBatch::from_records("31", vec![
//!     Record::new().with("num.trees", "500").with("splitrule", "gini").with("replace", "TRUE"),
//!     Record::new().with("num.trees", "100").with("splitrule", "extratrees"),
//! ]);
//!
//! let converter = Converter::new(&batch, &descriptions).unwrap();
//! let vectors = converter.get_vectors().unwrap();
//! assert!(vectors.iter().all(|v| v.dim() == converter.vector_dim()));
//!
//! let records: Vec<Record> = converter
//!     .reconstruct(&vectors)
//!     .into_iter()
//!     .collect::<Result<_>>()
//!     .unwrap();
//! assert_eq!(records[1].get("splitrule"), &Value::text("extratrees"));
//! ```
//!
//! ## Crate Structure
//!
//! - [`paramvec-core`](https://docs.rs/paramvec-core) - Values, records, vectors, errors
//! - [`paramvec-schema`](https://docs.rs/paramvec-schema) - Schema, preprocessing, catalog, codecs, converter
//! - [`paramvec-dataset`](https://docs.rs/paramvec-dataset) - JSON loading and training-set merging

// Re-export core types
pub use paramvec_core::{Error, Record, RecordBatch, Result, Value, Vector};

// Re-export the encoding pipeline
pub use paramvec_schema::{
    Catalog, Category, Converter, DataType, Distinct, EncodingConfig, FieldCodec,
    FieldDescription, GroupSizes, Schema,
};

// Re-export the dataset layer
pub use paramvec_dataset::{Merger, TrainingSet};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Converter, DataType, EncodingConfig, Error, FieldDescription, GroupSizes, Merger,
        Record, RecordBatch, Result, Schema, TrainingSet, Value, Vector,
    };
}

/// JSON file loaders
pub mod io {
    pub use paramvec_dataset::loader::{
        load_description, load_qualities, load_records, load_scores, load_vectors, Qualities,
        Scores,
    };
}
