//! Mustache template parsing.
//!
//! Turns template source into a tree of [`Token`]s: raw text, escaped and
//! unescaped variable references, sections (with their nested tokens carried
//! inline), partial references, comments, and delimiter changes. The token
//! tree is the input contract for both declaration inference and rendering.
//!
//! ## Example
//!
//! ```rust
//! use stache_parser::{parse, Token};
//!
//! let tokens = parse("Hello, {{name}}!").unwrap();
//! assert!(matches!(&tokens[1], Token::Variable { path, .. } if path == "name"));
//! ```

pub mod ast;
pub mod error;
pub mod tokenizer;

pub use ast::{Span, Token};
pub use error::{ParseError, ParseResult};
pub use tokenizer::{tokenize, DEFAULT_CLOSE, DEFAULT_OPEN};

/// Parse a template source into its token tree.
pub fn parse(source: &str) -> ParseResult<Vec<Token>> {
    tokenizer::tokenize(source)
}
