use crate::error::{RenderError, RenderResult};
use serde_json::Value;
use stache_parser::Token;
use std::collections::BTreeMap;

/// Parsed templates by name; doubles as the partial set during rendering.
pub type TemplateSet = BTreeMap<String, Vec<Token>>;

/// Render the named template against `data`, with every template in the set
/// available as a partial.
pub fn render_template(name: &str, data: &Value, templates: &TemplateSet) -> RenderResult<String> {
    let tokens = templates
        .get(name)
        .ok_or_else(|| RenderError::UnknownTemplate(name.to_string()))?;
    render(tokens, data, templates)
}

/// Render a token tree against `data`.
pub fn render(tokens: &[Token], data: &Value, partials: &TemplateSet) -> RenderResult<String> {
    let mut out = String::new();
    let mut stack = vec![data];
    render_tokens(tokens, &mut stack, partials, &mut out)?;
    Ok(out)
}

fn render_tokens<'data>(
    tokens: &[Token],
    stack: &mut Vec<&'data Value>,
    partials: &TemplateSet,
    out: &mut String,
) -> RenderResult<()> {
    for token in tokens {
        match token {
            Token::Comment { .. } | Token::Delimiters { .. } => {}
            Token::Text { value, .. } => out.push_str(value),
            Token::Variable { path, escaped, .. } => {
                if let Some(value) = lookup(stack, path) {
                    let text = stringify(value);
                    if *escaped {
                        escape_html(&text, out);
                    } else {
                        out.push_str(&text);
                    }
                }
            }
            Token::Section {
                path,
                inverted,
                children,
                ..
            } => {
                render_section(path, *inverted, children, stack, partials, out)?;
            }
            Token::Partial { name, .. } => {
                // Unknown partials render as empty, matching the mustache spec
                if let Some(tokens) = partials.get(name) {
                    render_tokens(tokens, stack, partials, out)?;
                }
            }
        }
    }
    Ok(())
}

fn render_section<'data>(
    path: &str,
    inverted: bool,
    children: &[Token],
    stack: &mut Vec<&'data Value>,
    partials: &TemplateSet,
    out: &mut String,
) -> RenderResult<()> {
    let value = lookup(stack, path);
    let falsy = match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    };

    if inverted {
        if falsy {
            render_tokens(children, stack, partials, out)?;
        }
        return Ok(());
    }

    match value {
        _ if falsy => {}
        Some(Value::Array(items)) => {
            for item in items {
                stack.push(item);
                render_tokens(children, stack, partials, out)?;
                stack.pop();
            }
        }
        // Truthy booleans gate the block without becoming the context
        Some(Value::Bool(true)) => {
            render_tokens(children, stack, partials, out)?;
        }
        Some(value) => {
            stack.push(value);
            render_tokens(children, stack, partials, out)?;
            stack.pop();
        }
        None => {}
    }

    Ok(())
}

/// Resolve a dotted path against the context stack. The innermost frame whose
/// object contains the first segment wins; the rest of the path is resolved
/// within that frame only.
fn lookup<'data>(stack: &[&'data Value], path: &str) -> Option<&'data Value> {
    if path == "." {
        return stack.last().copied();
    }

    let mut segments = path.split('.');
    let first = segments.next()?;

    for frame in stack.iter().rev() {
        let Some(object) = frame.as_object() else {
            continue;
        };
        let Some(mut value) = object.get(first) else {
            continue;
        };
        for segment in segments {
            value = value.as_object()?.get(segment)?;
        }
        return Some(value);
    }

    None
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // Containers have no useful scalar form
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// mustache.js's escape table.
fn escape_html(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            _ => out.push(ch),
        }
    }
}
