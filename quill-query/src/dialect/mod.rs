//! SQL dialects.
//!
//! A [`Dialect`] renders the same logical select, statement or association
//! query into one database's syntax. Dialects carry no state; every method is
//! a pure function of its arguments, so one value can be shared freely.
//!
//! | Dialect        | Pagination                              | Identifiers |
//! |----------------|-----------------------------------------|-------------|
//! | `Default`      | `LIMIT n OFFSET m`                      | bare        |
//! | `PostgreSql`   | `LIMIT n OFFSET m`                      | `"name"`    |
//! | `MySql`        | `LIMIT n OFFSET m` (offset needs limit) | `` `name` ``|
//! | `SqlServer`    | `TOP n` / `ROW_NUMBER() OVER (...)`     | `[name]`    |
//! | `Oracle`       | nested `ROWNUM` subqueries              | bare        |
//!
//! ```rust
//! use quill_query::Dialect;
//!
//! let dialect: Dialect = "mssql".parse().unwrap();
//! let sql = dialect
//!     .form_select(Some("pages"), &[], None, &["page_id"], 10, 20)
//!     .unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT sq.* FROM (SELECT ROW_NUMBER() OVER (ORDER BY page_id) AS rownumber, * \
//!      FROM pages) AS sq WHERE rownumber BETWEEN 21 AND 30"
//! );
//! ```

mod association;
mod select;
mod statement;

pub use select::{SelectSource, SelectSpec};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::sql::QuoteStyle;

/// A database's SQL flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// ANSI-style `LIMIT`/`OFFSET` (H2, SQLite, ...).
    #[default]
    Default,
    /// PostgreSQL.
    #[serde(rename = "postgres")]
    PostgreSql,
    /// MySQL and MariaDB.
    MySql,
    /// Microsoft SQL Server.
    #[serde(rename = "mssql")]
    SqlServer,
    /// Oracle.
    Oracle,
}

impl Dialect {
    /// Every dialect.
    pub const ALL: [Dialect; 5] = [
        Self::Default,
        Self::PostgreSql,
        Self::MySql,
        Self::SqlServer,
        Self::Oracle,
    ];

    /// Canonical configuration key.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PostgreSql => "postgres",
            Self::MySql => "mysql",
            Self::SqlServer => "mssql",
            Self::Oracle => "oracle",
        }
    }

    /// How identifiers are quoted in inserts and updates.
    pub fn quote_style(&self) -> QuoteStyle {
        match self {
            Self::Default | Self::Oracle => QuoteStyle::Bare,
            Self::PostgreSql => QuoteStyle::DoubleQuote,
            Self::MySql => QuoteStyle::Backtick,
            Self::SqlServer => QuoteStyle::Bracket,
        }
    }

    /// Quote an identifier for this dialect.
    pub fn quote_identifier(&self, name: &str) -> String {
        self.quote_style().quote(name)
    }

    /// Pick the dialect for a connection URL or driver name.
    ///
    /// Accepts `postgres://...`, `jdbc:oracle:thin:@...`, `sqlserver://...`
    /// and similar. The scheme (after an optional `jdbc:` prefix) is looked up
    /// the same way as [`FromStr`].
    pub fn from_url(url: &str) -> QueryResult<Self> {
        let trimmed = url.trim();
        let rest = trimmed
            .strip_prefix("jdbc:")
            .or_else(|| trimmed.strip_prefix("JDBC:"))
            .unwrap_or(trimmed);
        let scheme = rest
            .split([':', '/', '@', ';'])
            .next()
            .unwrap_or_default();
        scheme
            .parse()
            .map_err(|_| QueryError::unknown_dialect(url).with_context("Dialect::from_url"))
    }

    /// Build a select from sentinel-encoded arguments.
    ///
    /// With `table` set, the select is assembled from `columns`, `predicate`
    /// and `order_by`. Without a table, `predicate` must hold a complete query
    /// and only the pagination wrapper is applied. `limit` and `offset` use
    /// `-1` for "unset".
    pub fn form_select(
        &self,
        table: Option<&str>,
        columns: &[&str],
        predicate: Option<&str>,
        order_by: &[&str],
        limit: i64,
        offset: i64,
    ) -> QueryResult<String> {
        let mut spec = match table {
            Some(table) => SelectSpec::table(table),
            None => SelectSpec::query(predicate.unwrap_or_default()),
        };
        if table.is_some() {
            spec.predicate = predicate.map(str::to_string);
        }
        let spec = spec
            .columns(columns.iter().copied())
            .order_by(order_by.iter().copied())
            .bounds(limit, offset)?;
        self.translate(&spec)
    }

    /// Render a logical select.
    pub fn translate(&self, spec: &SelectSpec) -> QueryResult<String> {
        if let SelectSource::Query(query) = &spec.source {
            if query.trim().is_empty() {
                return Err(QueryError::missing_query(self.name()).with_context("translate select"));
            }
        }

        let sql = match self {
            Self::Default | Self::PostgreSql | Self::MySql => select::native(*self, spec),
            Self::SqlServer => select::windowed(*self, spec),
            Self::Oracle => select::rownum(spec),
        }
        .map_err(|e| e.with_context("translate select"))?;

        debug!(dialect = %self, sql = %sql, "formed select");
        Ok(sql)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "ansi" | "h2" | "sqlite" | "sqlite3" => Ok(Self::Default),
            "postgres" | "postgresql" | "pg" => Ok(Self::PostgreSql),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "mssql" | "sqlserver" => Ok(Self::SqlServer),
            "oracle" => Ok(Self::Oracle),
            _ => Err(QueryError::unknown_dialect(s)),
        }
    }
}
