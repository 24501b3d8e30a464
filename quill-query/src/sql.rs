//! SQL rendering helpers shared by the dialects.

use regex_lite::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

use crate::error::{QueryError, QueryResult};
use crate::value::Value;

static CLAUSE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(order|group)\s*by\b").expect("static pattern")
});

static LEADING_SELECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*SELECT\s*").expect("static pattern"));

/// How a dialect quotes identifiers in insert and update statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Identifiers are written as given.
    Bare,
    /// `"name"` (PostgreSQL).
    DoubleQuote,
    /// `` `name` `` (MySQL).
    Backtick,
    /// `[name]` (SQL Server).
    Bracket,
}

impl QuoteStyle {
    /// Append a quoted identifier to `buf`.
    pub fn write(&self, buf: &mut String, name: &str) {
        match self {
            Self::Bare => buf.push_str(name),
            Self::DoubleQuote => {
                buf.push('"');
                buf.push_str(&name.replace('"', "\"\""));
                buf.push('"');
            }
            Self::Backtick => {
                buf.push('`');
                buf.push_str(&name.replace('`', "``"));
                buf.push('`');
            }
            Self::Bracket => {
                buf.push('[');
                buf.push_str(&name.replace(']', "]]"));
                buf.push(']');
            }
        }
    }

    /// Quote an identifier into a new string.
    pub fn quote(&self, name: &str) -> String {
        let mut buf = String::with_capacity(name.len() + 2);
        self.write(&mut buf, name);
        buf
    }
}

/// Escape a string as a single-quoted SQL literal.
pub fn quote_string(value: &str) -> String {
    let mut buf = String::with_capacity(value.len() + 2);
    buf.push('\'');
    buf.push_str(&value.replace('\'', "''"));
    buf.push('\'');
    buf
}

/// Append `value` as an SQL literal.
///
/// Strings are single-quoted, numbers and booleans are written bare and null
/// becomes `NULL`. Anything else, including non-finite floats, is rejected.
pub fn write_literal(buf: &mut String, field: &str, value: &Value) -> QueryResult<()> {
    match value {
        Value::Null => buf.push_str("NULL"),
        Value::Bool(b) => {
            let _ = write!(buf, "{}", b);
        }
        Value::Int(i) => {
            let _ = write!(buf, "{}", i);
        }
        Value::Float(f) if f.is_finite() => {
            let _ = write!(buf, "{}", f);
        }
        Value::Float(_) => return Err(QueryError::unquotable_value(field, "non-finite float")),
        Value::String(s) => buf.push_str(&quote_string(s)),
        other => return Err(QueryError::unquotable_value(field, other.kind())),
    }
    Ok(())
}

/// Append `count` comma-separated `?` placeholders.
pub fn write_placeholders(buf: &mut String, count: usize) {
    for i in 0..count {
        if i > 0 {
            buf.push_str(", ");
        }
        buf.push('?');
    }
}

/// Append `items` joined by `sep`.
pub fn write_joined<S: AsRef<str>>(buf: &mut String, items: &[S], sep: &str) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push_str(sep);
        }
        buf.push_str(item.as_ref());
    }
}

/// Check whether a predicate fragment is really an `ORDER BY`/`GROUP BY` clause.
pub fn is_trailing_clause(fragment: &str) -> bool {
    CLAUSE_PREFIX.is_match(fragment)
}

/// The text of a complete query after its leading `SELECT` keyword.
pub fn strip_leading_select(query: &str) -> Option<&str> {
    LEADING_SELECT.find(query).map(|m| &query[m.end()..])
}
