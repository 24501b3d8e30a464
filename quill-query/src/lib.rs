//! # quill-query
//!
//! Dialect-aware SQL generation, result caching and query statistics for the
//! Quill data-access layer.
//!
//! This crate provides:
//! - Select translation with per-dialect pagination (`LIMIT/OFFSET`, `TOP`,
//!   `ROW_NUMBER() OVER`, nested `ROWNUM`)
//! - Insert/update/lookup statements from table metadata and ordered attributes
//! - Many-to-many association queries
//! - Normalized query fingerprints and a per-connection result cache
//! - An asynchronous statistics queue with sorted reports
//!
//! ## Pagination
//!
//! ```rust
//! use quill_query::{Dialect, SelectSpec};
//!
//! let spec = SelectSpec::table("people").limit(1).offset(1);
//!
//! assert_eq!(
//!     Dialect::PostgreSql.translate(&spec).unwrap(),
//!     "SELECT * FROM people LIMIT 1 OFFSET 1"
//! );
//! assert_eq!(
//!     Dialect::Oracle.translate(&spec).unwrap(),
//!     "SELECT * FROM (SELECT t2.*, ROWNUM AS oracle_row_number FROM \
//!      (SELECT t.* FROM people t) t2) WHERE oracle_row_number >= 2 AND ROWNUM <= 1"
//! );
//! ```
//!
//! ## Statements
//!
//! ```rust
//! use quill_query::{AttributeMap, Dialect, TableMeta};
//!
//! let people = TableMeta::new("people");
//! let attrs = AttributeMap::new().with("name", "John").with("last_name", "Doe");
//!
//! assert_eq!(
//!     Dialect::Default.insert(&people, &attrs).unwrap(),
//!     "INSERT INTO people (name, last_name) VALUES ('John', 'Doe')"
//! );
//! assert_eq!(
//!     Dialect::Default.select_exists(&people),
//!     "SELECT id FROM people WHERE id = ?"
//! );
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use quill_query::{Dialect, ErrorCode, SelectSpec};
//!
//! let spec = SelectSpec::table("pages").offset(20);
//! let err = Dialect::SqlServer.translate(&spec).unwrap_err();
//! assert_eq!(err.code, ErrorCode::MissingOrderBy);
//! ```

pub mod attributes;
pub mod config;
pub mod dialect;
pub mod error;
pub mod logging;
pub mod meta;
pub mod normalize;
pub mod pagination;
pub mod query_cache;
pub mod sql;
pub mod statistics;
pub mod value;

pub use attributes::AttributeMap;
pub use config::{EnvSource, MapEnvSource, QuillConfig, QuillConfigBuilder, StdEnvSource};
pub use dialect::{Dialect, SelectSource, SelectSpec};
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult, Suggestion};
pub use meta::{ManyToMany, TableMeta};
pub use pagination::Pagination;
pub use query_cache::{BaseFingerprint, CacheMetrics, CacheStats, QueryCache, QueryFingerprint};
pub use statistics::{
    ExecutionEvent, Processed, QueryStats, SortBy, StatisticsQueue, StatisticsSnapshot,
};
pub use value::Value;

// Re-export logging utilities
pub use logging::{
    get_log_format, get_log_level, init as init_logging, init_debug, init_with_level,
    is_debug_enabled,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::attributes::AttributeMap;
    pub use crate::config::QuillConfig;
    pub use crate::dialect::{Dialect, SelectSpec};
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::meta::{ManyToMany, TableMeta};
    pub use crate::pagination::Pagination;
    pub use crate::query_cache::{QueryCache, QueryFingerprint};
    pub use crate::statistics::{SortBy, StatisticsQueue, StatisticsSnapshot};
    pub use crate::value::Value;
}
