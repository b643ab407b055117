//! List row templates
//!
//! Renders the configurable list template (`"{index:<4}[{pdf}] {ID}"` by
//! default) against a record's fields plus the synthetic `index`, `row`, and
//! `id` variables. A placeholder naming nothing known renders as its own
//! name; a malformed template never fails, it degrades to literal text.

use std::fmt::Write;

/// Render `template`, resolving `{name}` placeholders through `lookup`.
///
/// Supported placeholder forms: `{name}`, `{name:<N}` (left pad to `N`),
/// `{name:>N}` (right pad). `{{` and `}}` escape literal braces.
pub fn render(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut body = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    body.push(c);
                }
                if closed {
                    expand(&mut out, &body, &lookup);
                } else {
                    // Unclosed placeholder: emit what we consumed, verbatim.
                    out.push('{');
                    out.push_str(&body);
                }
            }
            c => out.push(c),
        }
    }

    out
}

fn expand(out: &mut String, body: &str, lookup: &impl Fn(&str) -> Option<String>) {
    let (name, spec) = match body.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (body, None),
    };

    // Unknown variables pass through as themselves.
    let value = lookup(name).unwrap_or_else(|| name.to_string());

    match spec.and_then(parse_pad) {
        Some(Pad::Left(width)) => {
            let _ = write!(out, "{value:<width$}");
        }
        Some(Pad::Right(width)) => {
            let _ = write!(out, "{value:>width$}");
        }
        None => out.push_str(&value),
    }
}

enum Pad {
    Left(usize),
    Right(usize),
}

fn parse_pad(spec: &str) -> Option<Pad> {
    let (align, width) = spec.split_at(1);
    let width = width.parse().ok()?;
    match align {
        "<" => Some(Pad::Left(width)),
        ">" => Some(Pad::Right(width)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "ID" => Some("Doe2019Maps".to_string()),
            "index" => Some("7".to_string()),
            "pdf" => Some("pdf".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_plain_substitution() {
        assert_eq!(render("{ID}", lookup), "Doe2019Maps");
        assert_eq!(render("[{pdf}] {ID}", lookup), "[pdf] Doe2019Maps");
    }

    #[test]
    fn test_padding() {
        assert_eq!(render("{index:<4}{ID}", lookup), "7   Doe2019Maps");
        assert_eq!(render("{index:>4}", lookup), "   7");
    }

    #[test]
    fn test_unknown_variable_passes_through() {
        assert_eq!(render("{title}", lookup), "title");
        assert_eq!(render("{title:<8}!", lookup), "title   !");
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(render("{{literal}}", lookup), "{literal}");
    }

    #[test]
    fn test_unclosed_placeholder_is_literal() {
        assert_eq!(render("{ID", lookup), "{ID");
    }
}
