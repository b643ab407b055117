//! Search query mini-language
//!
//! Parses and evaluates the filter expressions accepted by the `search`
//! command:
//!
//! ```text
//! [--pdf] [--tag a,b,c] [field=pattern (& or | field=pattern)...]
//! ```
//!
//! Patterns are regular expressions matched against the named field, and may
//! be quoted (`"..."` or `'...'`) to include spaces. Operators combine the
//! running result strictly left to right; there is no precedence. A clause
//! naming a field the record does not have casts no vote, and a record that
//! never receives a vote is excluded. Clauses, the tag filter, and the
//! `--pdf` filter all AND together at the top level.

use regex::Regex;
use thiserror::Error;

use crate::record::Record;

/// Errors produced while parsing a query string.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A quoted pattern was never closed.
    #[error("no closing quotation mark on pattern")]
    UnterminatedQuote,

    /// A pattern failed to compile as a regular expression.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Boolean connective between two clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    And,
    Or,
}

/// One `field=pattern` predicate.
#[derive(Debug)]
pub struct Clause {
    pub field: String,
    pub pattern: Regex,
}

/// A parsed query: filter clauses with their connectives, an optional tag
/// set, and the attachment flag.
#[derive(Debug, Default)]
pub struct Query {
    clauses: Vec<Clause>,
    ops: Vec<Op>,
    tags: Vec<String>,
    require_pdf: bool,
}

impl Query {
    /// Parse a query string.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] for an unterminated quoted pattern or an
    /// invalid regular expression. The caller's state must be left untouched
    /// on error; parsing has no side effects.
    ///
    /// # Examples
    /// ```
    /// use bibr::query::Query;
    ///
    /// let query = Query::parse("--tag ml author=Doe & year=202").unwrap();
    /// assert!(!query.is_empty());
    ///
    /// assert!(Query::parse("title=\"no closing quote").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let mut text = input.to_string();

        let require_pdf = extract_flag(&mut text, "--pdf");
        let tags = extract_tags(&mut text);

        let mut clauses = Vec::new();
        let mut ops = Vec::new();
        let mut rest = text.trim();

        while !rest.is_empty() {
            let mut pending = Op::And;
            if !clauses.is_empty() {
                match rest.chars().next() {
                    Some('&') => rest = &rest[1..],
                    Some('|') => {
                        pending = Op::Or;
                        rest = &rest[1..];
                    }
                    // Missing connective between clauses reads as AND.
                    _ => {}
                }
                rest = rest.trim_start();
            }

            // Trailing text without '=' is not a clause; ignore it.
            let Some(eq) = rest.find('=') else { break };
            let field = rest[..eq].trim().to_string();
            rest = &rest[eq + 1..];

            let pattern_text = match rest.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &rest[quote.len_utf8()..];
                    let end = body.find(quote).ok_or(QueryError::UnterminatedQuote)?;
                    let text = body[..end].to_string();
                    rest = &body[end + quote.len_utf8()..];
                    text
                }
                _ => {
                    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                    let text = rest[..end].to_string();
                    rest = &rest[end..];
                    text
                }
            };

            let pattern = Regex::new(&pattern_text)?;
            if !clauses.is_empty() {
                ops.push(pending);
            }
            clauses.push(Clause { field, pattern });
            rest = rest.trim_start();
        }

        Ok(Self {
            clauses,
            ops,
            tags,
            require_pdf,
        })
    }

    /// Whether the query selects everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty() && self.tags.is_empty() && !self.require_pdf
    }

    /// Evaluate the query against one record.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        let mut keep = self.clause_vote(record);

        if !self.tags.is_empty() {
            let record_tags = record.tags();
            keep = keep
                && self
                    .tags
                    .iter()
                    .any(|tag| record_tags.iter().any(|t| t == tag));
        }

        if self.require_pdf {
            keep = keep && record.has_attachment();
        }

        keep
    }

    /// Left-to-right clause evaluation. Clauses on missing fields abstain;
    /// a record no clause ever votes on is excluded.
    fn clause_vote(&self, record: &Record) -> bool {
        if self.clauses.is_empty() {
            return true;
        }

        let mut acc: Option<bool> = None;
        for (i, clause) in self.clauses.iter().enumerate() {
            let Some(value) = record.get(&clause.field) else {
                continue;
            };
            let hit = clause.pattern.is_match(value);
            acc = Some(match acc {
                None => hit,
                Some(prev) => match self.ops[i - 1] {
                    Op::And => prev && hit,
                    Op::Or => prev || hit,
                },
            });
        }
        acc.unwrap_or(false)
    }

    /// Compute the subset of record indices selected by this query. An empty
    /// query selects all records in their original order.
    #[must_use]
    pub fn filter(&self, records: &[Record]) -> Vec<usize> {
        if self.is_empty() {
            return (0..records.len()).collect();
        }
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(record))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Remove the first occurrence of a bare flag token, reporting whether it
/// was present.
fn extract_flag(text: &mut String, flag: &str) -> bool {
    match text.find(flag) {
        Some(pos) => {
            text.replace_range(pos..pos + flag.len(), "");
            true
        }
        None => false,
    }
}

/// Remove a `--tag a,b,c` token and return the requested tags.
fn extract_tags(text: &mut String) -> Vec<String> {
    let Some(pos) = text.find("--tag ") else {
        return Vec::new();
    };
    let list_start = pos + "--tag ".len();
    let list_end = text[list_start..]
        .find(' ')
        .map_or(text.len(), |off| list_start + off);

    let tags = text[list_start..list_end]
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();

    text.replace_range(pos..list_end, "");
    tags
}
