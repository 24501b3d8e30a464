//! Error types for SQL generation, caching and statistics.
//!
//! Every fallible operation in this crate returns a [`QueryResult`]. Errors
//! carry an [`ErrorCode`] for programmatic handling plus suggestions that
//! point at the fix.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: Q{category}{number}
//! - 1xxx: Pagination errors (bad bounds, missing order by)
//! - 2xxx: Statement errors (unquotable values, empty attribute maps)
//! - 3xxx: Statistics queue errors (stopped queue, unknown sort field)
//! - 7xxx: Configuration errors
//! - 9xxx: Internal errors
//!
//! ```rust
//! use quill_query::{QueryError, ErrorCode};
//!
//! let err = QueryError::invalid_pagination("limit", -5);
//! assert_eq!(err.code, ErrorCode::InvalidPagination);
//! assert!(err.to_string().starts_with("[Q1001]"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Pagination errors (1xxx)
    /// Negative limit or offset other than the `-1` sentinel (Q1001).
    InvalidPagination = 1001,
    /// Offset pagination requested without an order-by list (Q1002).
    MissingOrderBy = 1002,
    /// The dialect cannot express the requested window (Q1003).
    UnsupportedPagination = 1003,
    /// A raw select was requested with no query text (Q1004).
    MissingQuery = 1004,

    // Statement errors (2xxx)
    /// A value cannot be rendered as an SQL literal (Q2001).
    UnquotableValue = 2001,
    /// An update was requested with no attributes (Q2002).
    EmptyAttributes = 2002,
    /// The attribute map does not carry the primary key (Q2003).
    MissingPrimaryKey = 2003,
    /// An attribute names a column the table does not declare (Q2004).
    UnknownColumn = 2004,

    // Statistics errors (3xxx)
    /// The statistics queue is not running (Q3001).
    QueueStopped = 3001,
    /// The statistics queue was started twice (Q3002).
    QueueAlreadyRunning = 3002,
    /// Unknown report sort field (Q3003).
    InvalidSortField = 3003,

    // Configuration errors (7xxx)
    /// Invalid configuration value (Q7001).
    InvalidConfiguration = 7001,
    /// Unknown dialect name (Q7002).
    UnknownDialect = 7002,

    // Internal errors (9xxx)
    /// Internal error (Q9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "Q1001").
    pub fn code(&self) -> String {
        format!("Q{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidPagination => "Invalid limit or offset",
            Self::MissingOrderBy => "Order by required for offset pagination",
            Self::UnsupportedPagination => "Pagination not supported by dialect",
            Self::MissingQuery => "Raw query text missing",
            Self::UnquotableValue => "Value cannot be quoted as a literal",
            Self::EmptyAttributes => "No attributes supplied",
            Self::MissingPrimaryKey => "Primary key value missing",
            Self::UnknownColumn => "Unknown column",
            Self::QueueStopped => "Statistics queue is stopped",
            Self::QueueAlreadyRunning => "Statistics queue already running",
            Self::InvalidSortField => "Invalid report sort field",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::UnknownDialect => "Unknown dialect",
            Self::Internal => "Internal error",
        }
    }

    /// Check whether this code signals a caller bug rather than a runtime condition.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPagination
                | Self::MissingOrderBy
                | Self::UnsupportedPagination
                | Self::MissingQuery
                | Self::UnquotableValue
                | Self::EmptyAttributes
                | Self::MissingPrimaryKey
                | Self::UnknownColumn
                | Self::InvalidSortField
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Suggestion for fixing an error.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggestion text.
    pub text: String,
    /// Optional code example.
    pub code: Option<String>,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code: None,
        }
    }

    /// Add a code example.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The table involved.
    pub table: Option<String>,
    /// The column or attribute involved.
    pub field: Option<String>,
    /// The SQL text (if available).
    pub sql: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<Suggestion>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors raised by the dialect, cache and statistics layers.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(Suggestion::new(suggestion));
        self
    }

    /// Add a code suggestion.
    pub fn with_code_suggestion(mut self, text: impl Into<String>, code: impl Into<String>) -> Self {
        self.context
            .suggestions
            .push(Suggestion::new(text).with_code(code));
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the table.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.context.table = Some(table.into());
        self
    }

    /// Set the field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.context.field = Some(field.into());
        self
    }

    /// Set the SQL text.
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.context.sql = Some(sql.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// A limit or offset below the `-1` sentinel.
    pub fn invalid_pagination(bound: &str, value: i64) -> Self {
        Self::new(
            ErrorCode::InvalidPagination,
            format!("Invalid {} {}: use -1 for unbounded or a non-negative value", bound, value),
        )
        .with_field(bound)
        .with_suggestion("Pass -1 (or build an empty Pagination) when no bound is wanted")
    }

    /// Offset pagination on a windowed dialect without order-by columns.
    pub fn missing_order_by(dialect: &str) -> Self {
        Self::new(
            ErrorCode::MissingOrderBy,
            format!("{} offset queries require an order by column", dialect),
        )
        .with_suggestion("Add at least one order-by column to the select")
        .with_code_suggestion(
            "Order by the primary key for a stable window",
            "SelectSpec::table(\"pages\").order_by([\"id\"]).offset(20)",
        )
        .with_help("ROW_NUMBER() OVER (...) needs an ORDER BY to number rows")
    }

    /// The dialect has no syntax for the requested window.
    pub fn unsupported_pagination(dialect: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UnsupportedPagination,
            format!("{} does not support this pagination: {}", dialect, message.into()),
        )
    }

    /// A select with neither a table nor raw query text.
    pub fn missing_query(dialect: &str) -> Self {
        Self::new(
            ErrorCode::MissingQuery,
            format!("{} select has no table and no query text to paginate", dialect),
        )
        .with_suggestion("Pass a table name, or a complete SELECT as the predicate")
    }

    /// An attribute outside the table's declared columns.
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        let table = table.into();
        let column = column.into();
        Self::new(
            ErrorCode::UnknownColumn,
            format!("Table {} has no column '{}'", table, column),
        )
        .with_table(&table)
        .with_field(&column)
        .with_help("Check the column list registered in TableMeta::columns")
    }

    /// A value with no unambiguous literal form.
    pub fn unquotable_value(field: impl Into<String>, kind: &str) -> Self {
        let field = field.into();
        Self::new(
            ErrorCode::UnquotableValue,
            format!("Cannot render {} value of attribute '{}' as an SQL literal", kind, field),
        )
        .with_field(&field)
        .with_suggestion("Use a parametrized statement and bind the value instead")
    }

    /// An update statement with nothing to set.
    pub fn empty_attributes(table: impl Into<String>) -> Self {
        let table = table.into();
        Self::new(
            ErrorCode::EmptyAttributes,
            format!("No attributes set, can't create an update statement for {}", table),
        )
        .with_table(&table)
    }

    /// An update statement without a primary key value.
    pub fn missing_primary_key(table: impl Into<String>, pk: impl Into<String>) -> Self {
        let table = table.into();
        let pk = pk.into();
        Self::new(
            ErrorCode::MissingPrimaryKey,
            format!("Attributes for {} carry no value for primary key '{}'", table, pk),
        )
        .with_table(&table)
        .with_field(&pk)
    }

    /// Enqueue on a queue whose consumer is not running.
    pub fn queue_stopped() -> Self {
        Self::new(ErrorCode::QueueStopped, "Statistics queue is not running")
            .with_suggestion("Call StatisticsQueue::start() before enqueueing events")
    }

    /// Second start on an already running queue.
    pub fn queue_already_running() -> Self {
        Self::new(ErrorCode::QueueAlreadyRunning, "Statistics queue is already running")
    }

    /// A sort key outside `total`, `avg`, `min`, `max`, `count`.
    pub fn invalid_sort_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            ErrorCode::InvalidSortField,
            format!("Unknown sort field '{}', allowed values are: total, avg, min, max, count", field),
        )
        .with_field(&field)
    }

    /// Create a configuration error.
    pub fn invalid_configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(
            ErrorCode::InvalidConfiguration,
            format!("Invalid value for {}: {}", key, message.into()),
        )
        .with_field(&key)
    }

    /// Create an unknown dialect error.
    pub fn unknown_dialect(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(ErrorCode::UnknownDialect, format!("Unknown dialect '{}'", name))
            .with_suggestion("Use one of: default, postgres, mysql, mssql, oracle")
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, format!("Internal error: {}", message.into()))
            .with_help("This is likely a bug in Quill - please report it")
    }

    // ============== Error Checks ==============

    /// Check if this is a pagination error.
    pub fn is_pagination_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::InvalidPagination
                | ErrorCode::MissingOrderBy
                | ErrorCode::UnsupportedPagination
                | ErrorCode::MissingQuery
        )
    }

    /// Check if this error came from the statistics queue.
    pub fn is_queue_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::QueueStopped | ErrorCode::QueueAlreadyRunning
        )
    }

    /// Display the full error with all context and suggestions.
    pub fn display_full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error [{}]: {}\n", self.code.code(), self.message));

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  → While: {}\n", op));
        }
        if let Some(ref table) = self.context.table {
            output.push_str(&format!("  → Table: {}\n", table));
        }
        if let Some(ref field) = self.context.field {
            output.push_str(&format!("  → Field: {}\n", field));
        }
        if let Some(ref sql) = self.context.sql {
            output.push_str(&format!("  → SQL: {}\n", sql));
        }

        if !self.context.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.context.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion.text));
                if let Some(ref code) = suggestion.code {
                    output.push_str(&format!("     ```\n     {}\n     ```\n", code));
                }
            }
        }

        if let Some(ref help) = self.context.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::InvalidPagination.code(), "Q1001");
        assert_eq!(ErrorCode::UnquotableValue.code(), "Q2001");
        assert_eq!(ErrorCode::QueueStopped.code(), "Q3001");
        assert_eq!(ErrorCode::UnknownDialect.code(), "Q7002");
    }

    #[test]
    fn test_missing_order_by() {
        let err = QueryError::missing_order_by("MSSQL");
        assert!(err.is_pagination_error());
        assert!(err.message.contains("MSSQL"));
        assert!(err.context.help.is_some());
    }

    #[test]
    fn test_unquotable_value() {
        let err = QueryError::unquotable_value("tags", "list");
        assert_eq!(err.context.field, Some("tags".to_string()));
        assert!(err.code.is_programmer_error());
    }

    #[test]
    fn test_statement_errors() {
        let err = QueryError::unknown_column("people", "nickname");
        assert_eq!(err.code.code(), "Q2004");
        assert_eq!(err.context.table.as_deref(), Some("people"));
        assert_eq!(err.context.field.as_deref(), Some("nickname"));

        let err = QueryError::missing_query("Oracle");
        assert!(err.is_pagination_error());
        assert!(err.code.is_programmer_error());
    }

    #[test]
    fn test_queue_errors() {
        assert!(QueryError::queue_stopped().is_queue_error());
        assert!(QueryError::queue_already_running().is_queue_error());
        assert!(!QueryError::queue_stopped().code.is_programmer_error());
    }

    #[test]
    fn test_display_full() {
        let err = QueryError::invalid_pagination("offset", -3)
            .with_context("Translating select for pages")
            .with_table("pages");

        let output = err.display_full();
        assert!(output.contains("Q1001"));
        assert!(output.contains("pages"));
        assert!(output.contains("Suggestions"));
    }
}
