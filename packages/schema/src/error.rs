use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Section '{id}' not found (available: {})", .available.join(", "))]
    SectionNotFound { id: String, available: Vec<String> },

    #[error("Schema document has no sections")]
    Empty,
}

pub type SchemaResult<T> = Result<T, SchemaError>;
