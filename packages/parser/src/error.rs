use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unclosed tag at {pos}")]
    UnclosedTag { pos: usize },

    #[error("Unclosed section '{name}' opened at {pos}")]
    UnclosedSection { name: String, pos: usize },

    #[error("Unexpected section close '{name}' at {pos}")]
    UnexpectedClose { name: String, pos: usize },

    #[error("Empty tag at {pos}")]
    EmptyTag { pos: usize },

    #[error("Invalid delimiter change at {pos}")]
    InvalidDelimiters { pos: usize },
}

impl ParseError {
    pub fn unclosed_tag(pos: usize) -> Self {
        Self::UnclosedTag { pos }
    }

    pub fn unclosed_section(name: impl Into<String>, pos: usize) -> Self {
        Self::UnclosedSection {
            name: name.into(),
            pos,
        }
    }

    pub fn unexpected_close(name: impl Into<String>, pos: usize) -> Self {
        Self::UnexpectedClose {
            name: name.into(),
            pos,
        }
    }

    pub fn empty_tag(pos: usize) -> Self {
        Self::EmptyTag { pos }
    }

    pub fn invalid_delimiters(pos: usize) -> Self {
        Self::InvalidDelimiters { pos }
    }

    /// Byte offset the error points at.
    pub fn pos(&self) -> usize {
        match self {
            Self::UnclosedTag { pos }
            | Self::UnclosedSection { pos, .. }
            | Self::UnexpectedClose { pos, .. }
            | Self::EmptyTag { pos }
            | Self::InvalidDelimiters { pos } => *pos,
        }
    }
}

#[cfg(feature = "pretty-errors")]
pub mod pretty {
    use super::ParseError;
    use ariadne::{Label, Report, ReportKind, Source};

    /// Render a parse error as an annotated source snippet.
    pub fn format_error(err: &ParseError, file_name: &str, source: &str) -> String {
        let pos = err.pos();
        let end = source.len().min(pos + 1).max(pos);

        let mut buf = Vec::new();
        let report = Report::build(ReportKind::Error, file_name, pos)
            .with_message(err.to_string())
            .with_label(Label::new((file_name, pos..end)).with_message("here"))
            .finish();

        match report.write((file_name, Source::from(source)), &mut buf) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => err.to_string(),
        }
    }
}
