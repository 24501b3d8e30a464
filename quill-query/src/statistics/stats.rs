//! Running execution-time aggregates.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Running count/total/min/max for one normalized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStats {
    query: String,
    count: u64,
    total: u64,
    min: u64,
    max: u64,
}

impl QueryStats {
    /// Create empty stats for a query label.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            count: 0,
            total: 0,
            min: u64::MAX,
            max: 0,
        }
    }

    /// Add one execution time in milliseconds.
    pub fn add_query_time(&mut self, millis: u64) {
        self.count += 1;
        self.total = self.total.saturating_add(millis);
        self.min = self.min.min(millis);
        self.max = self.max.max(millis);
    }

    /// Query label.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Number of executions.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of execution times.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Fastest execution, or 0 before the first one.
    pub fn min(&self) -> u64 {
        if self.count == 0 { 0 } else { self.min }
    }

    /// Slowest execution.
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Mean execution time, rounded half up.
    pub fn avg(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        let rounded = (u128::from(self.total) + u128::from(self.count / 2)) / u128::from(self.count);
        rounded as u64
    }

    /// Immutable copy for reporting.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            query: self.query.clone(),
            count: self.count,
            total: self.total,
            min: self.min(),
            max: self.max,
            avg: self.avg(),
        }
    }
}

/// A point-in-time copy of [`QueryStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsSnapshot {
    /// Query label.
    pub query: String,
    /// Number of executions.
    pub count: u64,
    /// Sum of execution times (ms).
    pub total: u64,
    /// Fastest execution (ms).
    pub min: u64,
    /// Slowest execution (ms).
    pub max: u64,
    /// Rounded mean execution time (ms).
    pub avg: u64,
}

/// Report sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortBy {
    /// Sum of execution times.
    Total,
    /// Mean execution time.
    Avg,
    /// Fastest execution.
    Min,
    /// Slowest execution.
    Max,
    /// Number of executions.
    Count,
}

impl SortBy {
    /// Every sort key.
    pub const ALL: [SortBy; 5] = [Self::Total, Self::Avg, Self::Min, Self::Max, Self::Count];

    /// Key name as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
            Self::Count => "count",
        }
    }

    /// The field of a snapshot this key sorts on.
    pub fn key(&self, snapshot: &StatisticsSnapshot) -> u64 {
        match self {
            Self::Total => snapshot.total,
            Self::Avg => snapshot.avg,
            Self::Min => snapshot.min,
            Self::Max => snapshot.max,
            Self::Count => snapshot.count,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total" => Ok(Self::Total),
            "avg" => Ok(Self::Avg),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "count" => Ok(Self::Count),
            other => Err(QueryError::invalid_sort_field(other)),
        }
    }
}
