use crate::ast::{Span, Token};
use crate::error::{ParseError, ParseResult};

pub const DEFAULT_OPEN: &str = "{{";
pub const DEFAULT_CLOSE: &str = "}}";

/// Tokenize a mustache template into a token tree.
///
/// Section tokens carry their children inline; open/close tags must match by
/// name and nest properly. Tag names are trimmed. Triple-mustache unescaped
/// tags (`{{{x}}}`) follow the `{` sigil rule, so they keep working after a
/// `{{=<% %>=}}` delimiter change as `<%{x}%>`.
pub fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    Tokenizer::new(source).run()
}

/// An open `{{#...}}` / `{{^...}}` waiting for its close tag.
struct OpenSection {
    path: String,
    inverted: bool,
    start: usize,
    children: Vec<Token>,
}

struct Tokenizer<'src> {
    source: &'src str,
    pos: usize,
    open: String,
    close: String,
    stack: Vec<OpenSection>,
    out: Vec<Token>,
}

impl<'src> Tokenizer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            open: DEFAULT_OPEN.to_string(),
            close: DEFAULT_CLOSE.to_string(),
            stack: Vec::new(),
            out: Vec::new(),
        }
    }

    fn run(mut self) -> ParseResult<Vec<Token>> {
        while self.pos < self.source.len() {
            match self.source[self.pos..].find(&self.open) {
                None => {
                    self.push_text(self.pos, self.source.len());
                    self.pos = self.source.len();
                }
                Some(offset) => {
                    let tag_start = self.pos + offset;
                    self.push_text(self.pos, tag_start);
                    self.scan_tag(tag_start)?;
                }
            }
        }

        if let Some(section) = self.stack.last() {
            return Err(ParseError::unclosed_section(&section.path, section.start));
        }

        Ok(self.out)
    }

    /// Tokens inside an open section accumulate on that section's frame.
    fn push(&mut self, token: Token) {
        match self.stack.last_mut() {
            Some(section) => section.children.push(token),
            None => self.out.push(token),
        }
    }

    fn push_text(&mut self, start: usize, end: usize) {
        if start == end {
            return;
        }
        self.push(Token::Text {
            value: self.source[start..end].to_string(),
            span: Span::new(start, end),
        });
    }

    fn scan_tag(&mut self, tag_start: usize) -> ParseResult<()> {
        let after_open = tag_start + self.open.len();
        let rest = &self.source[after_open..];

        let sigil = match rest.chars().next() {
            Some(c @ ('#' | '^' | '/' | '>' | '!' | '&' | '=' | '{')) => Some(c),
            _ => None,
        };
        let body_start = after_open + sigil.map_or(0, char::len_utf8);

        // `{` closes with `}` + close tag; `=` closes with `=` + close tag.
        let closing = match sigil {
            Some('{') => format!("}}{}", self.close),
            Some('=') => format!("={}", self.close),
            _ => self.close.clone(),
        };

        let Some(offset) = self.source[body_start..].find(&closing) else {
            return Err(ParseError::unclosed_tag(tag_start));
        };
        let body_end = body_start + offset;
        let end = body_end + closing.len();

        let body = self.source[body_start..body_end].trim();
        let span = Span::new(tag_start, end);

        match sigil {
            None => {
                self.require_name(body, tag_start)?;
                self.push(Token::Variable {
                    path: body.to_string(),
                    escaped: true,
                    span,
                });
            }
            Some('&') | Some('{') => {
                self.require_name(body, tag_start)?;
                self.push(Token::Variable {
                    path: body.to_string(),
                    escaped: false,
                    span,
                });
            }
            Some('!') => {
                self.push(Token::Comment { span });
            }
            Some('>') => {
                self.require_name(body, tag_start)?;
                self.push(Token::Partial {
                    name: body.to_string(),
                    span,
                });
            }
            Some(c @ ('#' | '^')) => {
                self.require_name(body, tag_start)?;
                self.stack.push(OpenSection {
                    path: body.to_string(),
                    inverted: c == '^',
                    start: tag_start,
                    children: Vec::new(),
                });
            }
            Some('/') => {
                let Some(section) = self.stack.pop() else {
                    return Err(ParseError::unexpected_close(body, tag_start));
                };
                if section.path != body {
                    return Err(ParseError::unexpected_close(body, tag_start));
                }
                self.push(Token::Section {
                    path: section.path,
                    inverted: section.inverted,
                    children: section.children,
                    span: Span::new(section.start, end),
                });
            }
            Some('=') => {
                let mut parts = body.split_whitespace();
                let (Some(open), Some(close), None) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err(ParseError::invalid_delimiters(tag_start));
                };
                if open.contains('=') || close.contains('=') {
                    return Err(ParseError::invalid_delimiters(tag_start));
                }
                self.push(Token::Delimiters {
                    open: open.to_string(),
                    close: close.to_string(),
                    span,
                });
                self.open = open.to_string();
                self.close = close.to_string();
            }
            Some(_) => unreachable!("sigil set is closed"),
        }

        self.pos = end;
        Ok(())
    }

    fn require_name(&self, body: &str, tag_start: usize) -> ParseResult<()> {
        if body.is_empty() {
            return Err(ParseError::empty_tag(tag_start));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(tokens: &[Token], index: usize) -> (&str, bool) {
        match &tokens[index] {
            Token::Variable { path, escaped, .. } => (path.as_str(), *escaped),
            other => panic!("expected variable, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    fn test_plain_text() {
        let tokens = tokenize("just text").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(matches!(&tokens[0], Token::Text { value, .. } if value == "just text"));
    }

    #[test]
    fn test_escaped_variable() {
        let tokens = tokenize("Hello, {{ name }}!").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(variable(&tokens, 1), ("name", true));
    }

    #[test]
    fn test_unescaped_variants() {
        let tokens = tokenize("{{{ html }}}{{& raw }}").unwrap();
        assert_eq!(variable(&tokens, 0), ("html", false));
        assert_eq!(variable(&tokens, 1), ("raw", false));
    }

    #[test]
    fn test_dotted_path_and_self_reference() {
        let tokens = tokenize("{{a.b.c}}{{.}}").unwrap();
        assert_eq!(variable(&tokens, 0), ("a.b.c", true));
        assert_eq!(variable(&tokens, 1), (".", true));
    }

    #[test]
    fn test_comment_is_kept_but_empty() {
        let tokens = tokenize("a{{! ignore me }}b").unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[1], Token::Comment { .. }));
    }

    #[test]
    fn test_partial() {
        let tokens = tokenize("{{> _person}}").unwrap();
        assert!(matches!(&tokens[0], Token::Partial { name, .. } if name == "_person"));
    }

    #[test]
    fn test_section_with_children() {
        let tokens = tokenize("{{#users}}{{name}}{{/users}}").unwrap();
        let Token::Section {
            path,
            inverted,
            children,
            ..
        } = &tokens[0]
        else {
            panic!("expected section");
        };
        assert_eq!(path, "users");
        assert!(!inverted);
        assert_eq!(variable(children, 0), ("name", true));
    }

    #[test]
    fn test_inverted_section() {
        let tokens = tokenize("{{^missing}}fallback{{/missing}}").unwrap();
        assert!(matches!(&tokens[0], Token::Section { inverted: true, .. }));
    }

    #[test]
    fn test_nested_sections() {
        let tokens = tokenize("{{#a}}{{#b}}{{x}}{{/b}}{{/a}}").unwrap();
        let Token::Section { children, .. } = &tokens[0] else {
            panic!("expected section");
        };
        let Token::Section { children: inner, .. } = &children[0] else {
            panic!("expected nested section");
        };
        assert_eq!(variable(inner, 0), ("x", true));
    }

    #[test]
    fn test_delimiter_change() {
        let tokens = tokenize("{{=<% %>=}}<% name %> and <%{ html }%>").unwrap();
        assert!(
            matches!(&tokens[0], Token::Delimiters { open, close, .. } if open == "<%" && close == "%>")
        );
        assert_eq!(variable(&tokens, 1), ("name", true));
        assert_eq!(variable(&tokens, 3), ("html", false));
    }

    #[test]
    fn test_spans_cover_tags() {
        let source = "ab{{x}}";
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens[0].span(), Span::new(0, 2));
        assert_eq!(tokens[1].span(), Span::new(2, source.len()));
    }

    #[test]
    fn test_unclosed_tag() {
        assert_eq!(
            tokenize("{{name").unwrap_err(),
            ParseError::unclosed_tag(0)
        );
    }

    #[test]
    fn test_unclosed_section() {
        assert_eq!(
            tokenize("{{#users}}{{name}}").unwrap_err(),
            ParseError::unclosed_section("users", 0)
        );
    }

    #[test]
    fn test_mismatched_close() {
        assert_eq!(
            tokenize("{{#a}}{{/b}}").unwrap_err(),
            ParseError::unexpected_close("b", 6)
        );
    }

    #[test]
    fn test_close_without_open() {
        assert_eq!(
            tokenize("{{/a}}").unwrap_err(),
            ParseError::unexpected_close("a", 0)
        );
    }

    #[test]
    fn test_empty_tag() {
        assert_eq!(tokenize("{{  }}").unwrap_err(), ParseError::empty_tag(0));
    }

    #[test]
    fn test_invalid_delimiters() {
        assert_eq!(
            tokenize("{{=onlyone=}}").unwrap_err(),
            ParseError::invalid_delimiters(0)
        );
    }
}
