use stache_evaluator::RenderError;
use stache_inference::InferenceError;
use stache_parser::ParseError;
use thiserror::Error;

/// Anything that can go wrong between the filesystem and finished output
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid template glob: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Unreadable path during template discovery: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Failed parsing template \"{template}\": {source}")]
    Parse {
        template: String,
        source: ParseError,
    },

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type LoaderResult<T> = Result<T, LoaderError>;
