use thiserror::Error;

/// Errors that can occur while resolving template types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// A partial was referenced but its template body was never registered.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

pub type InferenceResult<T> = Result<T, InferenceError>;
