//! Query text normalization for fingerprints and statistics labels.
//!
//! Two flavors are provided:
//!
//! - [`graceful_sql`] folds case and whitespace so textually different but
//!   equivalent queries compare equal. Quoted literals are left untouched.
//! - [`statistics_label`] collapses the parts of a query that vary from call
//!   to call (`IN` lists, offsets) so executions aggregate under one label.
//!
//! ```rust
//! use quill_query::normalize::{graceful_sql, statistics_label};
//!
//! assert_eq!(
//!     graceful_sql("SELECT *   from    members where id=?"),
//!     "select * from members where id = ?"
//! );
//! assert_eq!(
//!     statistics_label("select * from t where id IN (1,2,3)"),
//!     "select * from t where id IN (...)"
//! );
//! ```

use regex_lite::Regex;
use std::sync::LazyLock;

static TRAILING_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\blimit\s+(\d+)(?:\s+offset\s+(\d+))?\s*$").expect("static pattern")
});

static IN_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(in)\s*\([^()]*\)").expect("static pattern"));

static OFFSET_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(limit\s+\d+\s+offset)\s+\d+").expect("static pattern")
});

fn is_operator(c: char) -> bool {
    matches!(c, '=' | '!' | '<' | '>')
}

fn push_separator(out: &mut String) {
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
}

/// Fold a query into its canonical form.
///
/// Text outside single-quoted literals and double-quoted identifiers is
/// lowercased, whitespace runs become
/// a single space, and comparison operators get exactly one space on each
/// side. The result is trimmed.
pub fn graceful_sql(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut pending_space = false;
    let mut quote: Option<char> = None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(open) = quote {
            out.push(c);
            if c == open {
                quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            pending_space = true;
            continue;
        }

        if is_operator(c) {
            push_separator(&mut out);
            out.push(c);
            while let Some(&next) = chars.peek() {
                if !is_operator(next) {
                    break;
                }
                out.push(next);
                chars.next();
            }
            pending_space = true;
            continue;
        }

        if pending_space {
            push_separator(&mut out);
            pending_space = false;
        }

        if c == '\'' || c == '"' {
            quote = Some(c);
            out.push(c);
        } else {
            out.extend(c.to_lowercase());
        }
    }

    out
}

/// A trailing `limit N [offset M]` window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageWindow {
    /// Maximum rows requested.
    pub limit: Option<u64>,
    /// Rows skipped.
    pub offset: Option<u64>,
}

impl PageWindow {
    /// Check whether the window bounds nothing.
    pub fn is_unbounded(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }
}

/// Split a trailing `limit N [offset M]` clause off a query.
///
/// Returns the query without the clause and the parsed window. Text without
/// such a clause comes back unchanged with an unbounded window. Numbers too
/// large for `u64` are treated as absent.
pub fn strip_pagination(sql: &str) -> (&str, PageWindow) {
    match TRAILING_PAGE.captures(sql) {
        Some(caps) => {
            let start = caps.get(0).map_or(sql.len(), |m| m.start());
            let window = PageWindow {
                limit: caps.get(1).and_then(|m| m.as_str().parse().ok()),
                offset: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            };
            (&sql[..start], window)
        }
        None => (sql, PageWindow::default()),
    }
}

/// Normalize a query into the label its statistics are recorded under.
///
/// `IN (...)` lists collapse and offset values are replaced, so that the
/// same query paged or called with a different list shares one entry.
pub fn statistics_label(sql: &str) -> String {
    let collapsed = IN_LIST.replace_all(sql, "${1} (...)");
    OFFSET_VALUE.replace_all(&collapsed, "${1} ...").into_owned()
}
