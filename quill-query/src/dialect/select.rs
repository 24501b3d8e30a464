//! Logical selects and their per-dialect pagination wrappers.

use std::fmt::Write;

use super::Dialect;
use crate::error::{QueryError, QueryResult};
use crate::pagination::Pagination;
use crate::sql::{is_trailing_clause, strip_leading_select, write_joined};

/// Where a select reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectSource {
    /// A table; clauses are assembled around it.
    Table(String),
    /// A complete `SELECT`; only the pagination wrapper is applied.
    Query(String),
}

/// A logical select with an optional limit/offset window.
///
/// ```rust
/// use quill_query::{Dialect, SelectSpec};
///
/// let spec = SelectSpec::table("people")
///     .predicate("name = ?")
///     .order_by(["name"])
///     .limit(10)
///     .offset(10);
///
/// assert_eq!(
///     Dialect::PostgreSql.translate(&spec).unwrap(),
///     "SELECT * FROM people WHERE name = ? ORDER BY name LIMIT 10 OFFSET 10"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectSpec {
    /// Table or raw query.
    pub source: SelectSource,
    /// Projected columns; empty means `*`.
    pub columns: Vec<String>,
    /// Condition fragment, without the `WHERE` keyword.
    pub predicate: Option<String>,
    /// Order-by expressions.
    pub order_by: Vec<String>,
    /// Window to apply.
    pub pagination: Pagination,
}

impl SelectSpec {
    fn with_source(source: SelectSource) -> Self {
        Self {
            source,
            columns: Vec::new(),
            predicate: None,
            order_by: Vec::new(),
            pagination: Pagination::new(),
        }
    }

    /// Select from a table.
    pub fn table(table: impl Into<String>) -> Self {
        Self::with_source(SelectSource::Table(table.into()))
    }

    /// Paginate a complete query.
    pub fn query(sql: impl Into<String>) -> Self {
        Self::with_source(SelectSource::Query(sql.into()))
    }

    /// Set the projected columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the condition fragment.
    pub fn predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    /// Set the order-by expressions.
    pub fn order_by<I, S>(mut self, order_by: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = order_by.into_iter().map(Into::into).collect();
        self
    }

    /// Set the limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.pagination.limit = Some(limit);
        self
    }

    /// Set the offset.
    pub fn offset(mut self, offset: u64) -> Self {
        self.pagination.offset = Some(offset);
        self
    }

    /// Set both bounds from `-1`-sentinel integers.
    pub fn bounds(mut self, limit: i64, offset: i64) -> QueryResult<Self> {
        self.pagination = Pagination::from_bounds(limit, offset)?;
        Ok(self)
    }

    /// The table read from, if this is not a raw query.
    pub fn table_name(&self) -> Option<&str> {
        match &self.source {
            SelectSource::Table(table) => Some(table),
            SelectSource::Query(_) => None,
        }
    }

    fn predicate_fragment(&self) -> Option<&str> {
        self.predicate
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }
}

fn write_projection(buf: &mut String, columns: &[String], alias: Option<&str>) {
    if columns.is_empty() {
        if let Some(alias) = alias {
            buf.push_str(alias);
            buf.push('.');
        }
        buf.push('*');
        return;
    }
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        if let Some(alias) = alias {
            buf.push_str(alias);
            buf.push('.');
        }
        buf.push_str(column);
    }
}

fn write_filter(buf: &mut String, spec: &SelectSpec) {
    if let Some(predicate) = spec.predicate_fragment() {
        if is_trailing_clause(predicate) {
            buf.push(' ');
        } else {
            buf.push_str(" WHERE ");
        }
        buf.push_str(predicate);
    }
}

fn write_order_by(buf: &mut String, spec: &SelectSpec) {
    if !spec.order_by.is_empty() {
        buf.push_str(" ORDER BY ");
        write_joined(buf, &spec.order_by, ", ");
    }
}

/// `<projection> FROM <table>[ alias]` followed by the filter and ordering.
fn write_table_body(buf: &mut String, spec: &SelectSpec, table: &str, alias: Option<&str>) {
    write_projection(buf, &spec.columns, alias);
    buf.push_str(" FROM ");
    buf.push_str(table);
    if let Some(alias) = alias {
        buf.push(' ');
        buf.push_str(alias);
    }
    write_filter(buf, spec);
    write_order_by(buf, spec);
}

/// The unpaginated select.
fn base_select(spec: &SelectSpec) -> String {
    match &spec.source {
        SelectSource::Table(table) => {
            let mut sql = String::with_capacity(64);
            sql.push_str("SELECT ");
            write_table_body(&mut sql, spec, table, None);
            sql
        }
        SelectSource::Query(query) => query.clone(),
    }
}

fn raw_body<'a>(dialect: Dialect, query: &'a str) -> QueryResult<&'a str> {
    strip_leading_select(query).ok_or_else(|| {
        QueryError::unsupported_pagination(dialect.name(), "a raw query must start with SELECT")
            .with_sql(query)
    })
}

/// `LIMIT`/`OFFSET` appended to the base select.
pub(super) fn native(dialect: Dialect, spec: &SelectSpec) -> QueryResult<String> {
    let page = spec.pagination;
    if dialect == Dialect::MySql && page.offset.is_some() && page.limit.is_none() {
        return Err(QueryError::unsupported_pagination(
            dialect.name(),
            "OFFSET requires a LIMIT",
        )
        .with_suggestion("Set a limit, e.g. 18446744073709551615 for all remaining rows"));
    }

    let mut sql = base_select(spec);
    if !page.is_empty() {
        sql.push(' ');
        page.write_sql(&mut sql);
    }
    Ok(sql)
}

/// `TOP` for a bare limit, `ROW_NUMBER() OVER (...)` once an offset is involved.
pub(super) fn windowed(dialect: Dialect, spec: &SelectSpec) -> QueryResult<String> {
    let page = spec.pagination;

    if page.offset.is_some() {
        if spec.order_by.is_empty() {
            return Err(QueryError::missing_order_by(dialect.name()));
        }

        let mut sql = String::with_capacity(128);
        sql.push_str("SELECT ");
        write_projection(&mut sql, &spec.columns, Some("sq"));
        sql.push_str(" FROM (SELECT ROW_NUMBER() OVER (ORDER BY ");
        write_joined(&mut sql, &spec.order_by, ", ");
        sql.push_str(") AS rownumber, ");
        match &spec.source {
            SelectSource::Table(table) => {
                write_projection(&mut sql, &spec.columns, None);
                sql.push_str(" FROM ");
                sql.push_str(table);
                write_filter(&mut sql, spec);
            }
            SelectSource::Query(query) => sql.push_str(raw_body(dialect, query)?),
        }

        sql.push_str(") AS sq WHERE rownumber ");
        match page.last_row() {
            Some(last) => {
                let _ = write!(sql, "BETWEEN {} AND {}", page.first_row(), last);
            }
            None => {
                let _ = write!(sql, ">= {}", page.first_row());
            }
        }
        return Ok(sql);
    }

    if let Some(limit) = page.limit {
        let mut sql = String::with_capacity(64);
        let _ = write!(sql, "SELECT TOP {} ", limit);
        match &spec.source {
            SelectSource::Table(table) => write_table_body(&mut sql, spec, table, None),
            SelectSource::Query(query) => sql.push_str(raw_body(dialect, query)?),
        }
        return Ok(sql);
    }

    Ok(base_select(spec))
}

/// Nested `ROWNUM` subqueries.
pub(super) fn rownum(spec: &SelectSpec) -> QueryResult<String> {
    let page = spec.pagination;
    if page.is_empty() {
        return Ok(base_select(spec));
    }

    let mut sql = String::with_capacity(128);
    if page.offset.is_some() {
        sql.push_str("SELECT * FROM (SELECT t2.*, ROWNUM AS oracle_row_number FROM (");
    } else {
        sql.push_str("SELECT * FROM (SELECT t2.* FROM (");
    }

    match &spec.source {
        SelectSource::Table(table) => {
            sql.push_str("SELECT ");
            write_table_body(&mut sql, spec, table, Some("t"));
        }
        SelectSource::Query(query) => sql.push_str(query),
    }

    sql.push_str(") t2) WHERE ");
    match (page.offset, page.limit) {
        (Some(_), Some(limit)) => {
            let _ = write!(
                sql,
                "oracle_row_number >= {} AND ROWNUM <= {}",
                page.first_row(),
                limit
            );
        }
        (Some(_), None) => {
            let _ = write!(sql, "oracle_row_number >= {}", page.first_row());
        }
        (None, limit) => {
            let _ = write!(sql, "ROWNUM <= {}", limit.unwrap_or(0));
        }
    }
    Ok(sql)
}
