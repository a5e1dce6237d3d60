//! Data-driven rendering of parsed mustache templates.
//!
//! Substitutes `serde_json::Value` data into a token tree: variables resolve
//! dotted paths against a context stack, sections iterate lists and gate on
//! truthiness, and partials transclude other templates from the same set.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use stache_evaluator::{render_template, TemplateSet};
//! use stache_parser::parse;
//!
//! let mut templates = TemplateSet::new();
//! templates.insert("hi".to_string(), parse("Hello, {{name}}!").unwrap());
//!
//! let out = render_template("hi", &json!({ "name": "Ada" }), &templates).unwrap();
//! assert_eq!(out, "Hello, Ada!");
//! ```

pub mod error;
pub mod evaluator;

pub use error::{RenderError, RenderResult};
pub use evaluator::{render, render_template, TemplateSet};
