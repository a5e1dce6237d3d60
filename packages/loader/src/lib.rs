//! Template discovery and the two facades built on it: declaration
//! generation ([`Declarer`]) and rendering ([`TemplateRenderer`]).
//!
//! Templates are addressed by their path relative to the template directory
//! with the `.mustache` extension stripped, which is also the name partials
//! use to reference each other.

pub mod error;
pub mod facade;
pub mod loader;

pub use error::{LoaderError, LoaderResult};
pub use facade::{Declarer, TemplateRenderer};
pub use loader::{template_key, LoaderOptions, TemplateLoader, TemplateSources, MUSTACHE_EXTENSION};
