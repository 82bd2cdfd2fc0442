//! Encoding configuration
//!
//! Tunable constants of the pipeline. Every field has a default, so a
//! partial JSON document (or none at all) is a valid configuration.

use paramvec_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reserved marker for numeric fields that were not supplied
pub const DEFAULT_MISSING_NUMBER: f64 = -1.0;

/// Token read as `true` by logical fields
pub const DEFAULT_TRUE_TOKEN: &str = "TRUE";

/// Token read as `false` by logical fields
pub const DEFAULT_FALSE_TOKEN: &str = "FALSE";

/// Batches at least this large are encoded in parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EncodingConfig {
    /// Value a missing numeric/integer field is cast to
    pub missing_number: f64,

    pub true_token: String,

    pub false_token: String,

    /// Fill missing values with the field's declared default instead of
    /// the missing marker
    pub use_declared_defaults: bool,

    /// Minimum batch size for record-parallel transform and reconstruct
    pub parallel_threshold: usize,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            missing_number: DEFAULT_MISSING_NUMBER,
            true_token: DEFAULT_TRUE_TOKEN.to_string(),
            false_token: DEFAULT_FALSE_TOKEN.to_string(),
            use_declared_defaults: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EncodingConfig {
    /// Load and validate a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: EncodingConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.missing_number.is_finite() {
            return Err(Error::InvalidConfig(
                "missing_number must be finite".to_string(),
            ));
        }
        if self.true_token.is_empty() || self.false_token.is_empty() {
            return Err(Error::InvalidConfig(
                "logical tokens cannot be empty".to_string(),
            ));
        }
        if self.true_token == self.false_token {
            return Err(Error::InvalidConfig(format!(
                "true and false tokens are both '{}'",
                self.true_token
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(Error::InvalidConfig(
                "parallel_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
