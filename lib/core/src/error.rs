use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Field not found in schema: {0}")]
    SchemaMismatch(String),

    #[error("Field declared more than once: {0}")]
    DuplicateField(String),

    #[error("Unseen category for field '{field}': {value}")]
    UnseenCategory { field: String, value: String },

    #[error("Malformed one-hot encoding for field '{field}': {active} active entries")]
    MalformedEncoding { field: String, active: usize },

    #[error("Invalid number for field '{field}': {value}")]
    InvalidNumber { field: String, value: String },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Cannot fit on an empty record batch")]
    EmptyBatch,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
