//! # Quill
//!
//! The SQL core of a data-access layer: dialect-aware select translation and
//! pagination, statement generation, per-connection result caching and
//! asynchronous query statistics.
//!
//! Quill provides:
//! - One logical select rendered for ANSI, PostgreSQL, MySQL, SQL Server and Oracle
//! - Insert/update statements from ordered, case-insensitive attribute maps
//! - A result cache that serves paginated windows from one unpaginated result
//! - A background statistics queue with sortable reports
//!
//! ## Quick Start
//!
//! ```rust
//! use quill::prelude::*;
//!
//! # fn main() -> QueryResult<()> {
//! let config = QuillConfig::builder().dialect(Dialect::SqlServer).build();
//!
//! let spec = SelectSpec::table("pages").order_by(["page_id"]).limit(10);
//! let sql = config.dialect.translate(&spec)?;
//! assert_eq!(sql, "SELECT TOP 10 * FROM pages ORDER BY page_id");
//!
//! let mut cache = QueryCache::from_config(&config);
//! cache.put_item(&QueryFingerprint::without_params("select * from pages"), vec![1, 2, 3]);
//! let page = QueryFingerprint::without_params("SELECT * FROM pages LIMIT 2 OFFSET 1");
//! assert_eq!(cache.get_item(&page), Some(vec![2, 3]));
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The query engine.
pub mod query {
    pub use quill_query::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use quill_query::prelude::*;
}

// Re-export key types at the crate root
pub use quill_query::{
    Dialect, QueryCache, QueryError, QueryFingerprint, QueryResult, QuillConfig, SelectSpec,
    StatisticsQueue,
};
