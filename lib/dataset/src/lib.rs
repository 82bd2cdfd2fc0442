//! # paramvec Dataset
//!
//! File loading and training-set assembly around the paramvec converter.
//!
//! - [`loader`] - Reads params, scores, qualities and descriptions from JSON
//! - [`merger`] - Builds `(x, y)` from parameter vectors, task qualities and scores

pub mod loader;
pub mod merger;

pub use loader::{
    load_description, load_qualities, load_records, load_scores, load_vectors, Qualities, Scores,
};
pub use merger::{Merger, TrainingSet};
