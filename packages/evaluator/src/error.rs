use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

/// Failure raised by a component handler.
///
/// Errors never escape the dispatch boundary: the renderer reports them as a
/// diagnostic and the failing node renders nothing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("No data found at '{path}'")]
    MissingData { path: String },

    #[error("Data at '{path}' is not {expected}")]
    InvalidData { path: String, expected: &'static str },

    #[error("Invalid config '{key}': {message}")]
    InvalidConfig { key: String, message: String },

    #[error("Presentation of '{component}' failed: {message}")]
    Presentation { component: String, message: String },
}

impl RenderError {
    pub fn missing(path: impl Into<String>) -> Self {
        RenderError::MissingData { path: path.into() }
    }

    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        RenderError::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Diagnostic code for this error
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::MissingData { .. } => crate::diagnostics::codes::MISSING_DATA,
            RenderError::InvalidData { .. } => crate::diagnostics::codes::INVALID_DATA,
            RenderError::InvalidConfig { .. } => crate::diagnostics::codes::INVALID_CONFIG,
            RenderError::Presentation { .. } => crate::diagnostics::codes::HANDLER_FAILED,
        }
    }
}
