use thiserror::Error;

/// Errors that can occur while rendering a template
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The entry template isn't in the loaded set. Unknown partials inside a
    /// body render as empty instead of failing.
    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
