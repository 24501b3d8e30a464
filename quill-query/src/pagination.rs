//! Limit/offset windows.
//!
//! Callers hand bounds over as signed integers where `-1` means "unset".
//! [`Pagination::from_bounds`] turns them into a typed window, rejecting any
//! other negative number.
//!
//! ```rust
//! use quill_query::Pagination;
//!
//! let page = Pagination::from_bounds(20, 10).unwrap();
//! assert_eq!(page.limit, Some(20));
//! assert_eq!(page.offset, Some(10));
//! assert_eq!(page.to_sql(), "LIMIT 20 OFFSET 10");
//!
//! let first = Pagination::first(10);
//! assert_eq!(first.to_sql(), "LIMIT 10");
//!
//! assert!(Pagination::from_bounds(-1, -1).unwrap().is_empty());
//! assert!(Pagination::from_bounds(-5, -1).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::error::{QueryError, QueryResult};

/// Sentinel for an unset bound.
pub const UNSET: i64 = -1;

/// A limit/offset window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Number of rows to skip.
    pub offset: Option<u64>,
}

fn bound(name: &str, value: i64) -> QueryResult<Option<u64>> {
    match value {
        UNSET => Ok(None),
        v if v < 0 => Err(QueryError::invalid_pagination(name, v)),
        v => Ok(Some(v as u64)),
    }
}

impl Pagination {
    /// A window with no bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a window from sentinel-encoded bounds.
    pub fn from_bounds(limit: i64, offset: i64) -> QueryResult<Self> {
        Ok(Self {
            limit: bound("limit", limit)?,
            offset: bound("offset", offset)?,
        })
    }

    /// Set the limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the offset.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// The first `n` rows.
    pub fn first(n: u64) -> Self {
        Self::new().limit(n)
    }

    /// A 1-indexed page.
    pub fn page(page: u64, page_size: u64) -> Self {
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        Self::new().offset(offset).limit(page_size)
    }

    /// Check if no bound is set.
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }

    /// First row number of the window, 1-based.
    pub fn first_row(&self) -> u64 {
        self.offset.unwrap_or(0).saturating_add(1)
    }

    /// Last row number of the window, 1-based, if bounded.
    pub fn last_row(&self) -> Option<u64> {
        self.limit
            .map(|limit| self.offset.unwrap_or(0).saturating_add(limit))
    }

    /// Native `LIMIT`/`OFFSET` clause.
    pub fn to_sql(&self) -> String {
        let mut sql = String::with_capacity(48);
        self.write_sql(&mut sql);
        sql
    }

    /// Write the native clause into a buffer.
    #[inline]
    pub fn write_sql(&self, buffer: &mut String) {
        if let Some(limit) = self.limit {
            let _ = write!(buffer, "LIMIT {}", limit);
        }
        if let Some(offset) = self.offset {
            if self.limit.is_some() {
                buffer.push(' ');
            }
            let _ = write!(buffer, "OFFSET {}", offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_from_bounds_sentinel() {
        let p = Pagination::from_bounds(-1, -1).unwrap();
        assert!(p.is_empty());
        assert_eq!(p.to_sql(), "");
    }

    #[test]
    fn test_from_bounds_zero_is_a_value() {
        let p = Pagination::from_bounds(0, 0).unwrap();
        assert_eq!(p.limit, Some(0));
        assert_eq!(p.offset, Some(0));
    }

    #[test]
    fn test_from_bounds_rejects_negative() {
        let err = Pagination::from_bounds(10, -2).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPagination);
        assert!(Pagination::from_bounds(i64::MIN, -1).is_err());
    }

    #[test]
    fn test_to_sql() {
        assert_eq!(Pagination::first(5).to_sql(), "LIMIT 5");
        assert_eq!(Pagination::new().offset(5).to_sql(), "OFFSET 5");
        assert_eq!(Pagination::page(3, 25).to_sql(), "LIMIT 25 OFFSET 50");
    }

    #[test]
    fn test_row_numbers() {
        let p = Pagination::new().limit(10).offset(20);
        assert_eq!(p.first_row(), 21);
        assert_eq!(p.last_row(), Some(30));
        assert_eq!(Pagination::new().offset(20).last_row(), None);
    }
}
