//! # Stache Inference
//!
//! Static type inference for mustache templates: given template token streams
//! (no runtime data), determine the shape of the input object each template
//! requires and emit TypeScript declarations for the whole family.
//!
//! Two passes, consumed in order:
//!
//! - [`StructureGraph`] merges every template's tokens into one shared,
//!   deduplicated graph of field-access facts. Partials are edges to other
//!   template roots, so a partial referenced by two templates is a single
//!   node visited twice.
//! - [`Resolver`] / [`TypeScriptGenerator`] walk the graph bottom-up, merge
//!   conflicting usage hints per property, and serialize named type
//!   declarations plus a template-name-to-type index.
//!
//! ## Example
//!
//! ```rust
//! use stache_inference::{generate_declarations, StructureGraph};
//! use stache_parser::parse;
//!
//! let mut graph = StructureGraph::new();
//! graph.add_template("card", &parse("{{#user}}{{name}}{{/user}}").unwrap());
//!
//! let declarations = generate_declarations(&graph).unwrap();
//! assert!(declarations.contains("interface Card"));
//! assert!(declarations.contains("user?: MustacheSection<CardUser>"));
//! ```

pub mod codegen;
pub mod error;
pub mod graph;
pub mod resolver;

// Re-export main types for convenience
pub use codegen::typescript::{generate_declarations, TypeScriptGenerator};
pub use error::{InferenceError, InferenceResult};
pub use graph::{NodeId, NodeKind, StructureGraph, StructureNode, SELF_KEY};
pub use resolver::{Candidate, Resolution, Resolver};
