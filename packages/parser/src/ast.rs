use serde::{Deserialize, Serialize};

/// Span information for source location tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// One parsed mustache construct.
///
/// Sections carry their nested tokens inline, so a section without a body is
/// unrepresentable and consumers can match exhaustively on the closed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Token {
    /// Raw template text between tags
    Text { value: String, span: Span },

    /// `{{a.b}}` (escaped) or `{{{a.b}}}` / `{{& a.b}}` (unescaped)
    Variable {
        path: String,
        escaped: bool,
        span: Span,
    },

    /// `{{#x}}...{{/x}}` or, inverted, `{{^x}}...{{/x}}`
    Section {
        path: String,
        inverted: bool,
        children: Vec<Token>,
        span: Span,
    },

    /// `{{> name}}`
    Partial { name: String, span: Span },

    /// `{{! ... }}`
    Comment { span: Span },

    /// `{{=<% %>=}}`; switches the active tag delimiters from here on
    Delimiters {
        open: String,
        close: String,
        span: Span,
    },
}

impl Token {
    pub fn span(&self) -> Span {
        match self {
            Token::Text { span, .. }
            | Token::Variable { span, .. }
            | Token::Section { span, .. }
            | Token::Partial { span, .. }
            | Token::Comment { span }
            | Token::Delimiters { span, .. } => *span,
        }
    }
}
