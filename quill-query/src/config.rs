//! Runtime configuration.
//!
//! [`QuillConfig`] selects the dialect and switches the result cache and the
//! statistics queue on or off. It can be built in code or read from the
//! environment:
//!
//! - `QUILL_DIALECT` - dialect key or connection URL (default: `default`)
//! - `QUILL_CACHE` - `true`/`false` (default: `true`)
//! - `QUILL_STATISTICS` - `true`/`false` (default: `false`)
//! - `QUILL_CACHE_LOG` - log cache hits and misses (default: `true`)
//!
//! ```rust
//! use quill_query::config::{MapEnvSource, QuillConfig};
//! use quill_query::Dialect;
//!
//! let env = MapEnvSource::new()
//!     .set("QUILL_DIALECT", "jdbc:oracle:thin:@localhost:1521:xe")
//!     .set("QUILL_STATISTICS", "on");
//! let config = QuillConfig::from_source(&env).unwrap();
//! assert_eq!(config.dialect, Dialect::Oracle);
//! assert!(config.statistics_enabled);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::dialect::Dialect;
use crate::error::{QueryError, QueryResult};

/// Source for environment variables.
pub trait EnvSource: Send + Sync {
    /// Get an environment variable value.
    fn get(&self, name: &str) -> Option<String>;

    /// Check if a variable exists.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Environment source using `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Environment source backed by a HashMap.
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Quill configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuillConfig {
    /// SQL dialect.
    pub dialect: Dialect,
    /// Whether result caches store and serve rows.
    pub cache_enabled: bool,
    /// Whether execution times are collected.
    pub statistics_enabled: bool,
    /// Whether cache hits and misses are logged at debug level.
    pub log_cache_access: bool,
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Default,
            cache_enabled: true,
            statistics_enabled: false,
            log_cache_access: true,
        }
    }
}

fn parse_flag(key: &str, value: &str) -> QueryResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(QueryError::invalid_configuration(
            key,
            format!("expected a boolean, got '{}'", other),
        )),
    }
}

impl QuillConfig {
    /// Start a builder from the defaults.
    pub fn builder() -> QuillConfigBuilder {
        QuillConfigBuilder::default()
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> QueryResult<Self> {
        Self::from_source(&StdEnvSource)
    }

    /// Read configuration from an environment source.
    pub fn from_source<S: EnvSource>(source: &S) -> QueryResult<Self> {
        let mut config = Self::default();

        if let Some(dialect) = source.get("QUILL_DIALECT") {
            config.dialect = if dialect.contains(':') {
                Dialect::from_url(&dialect)?
            } else {
                dialect.parse()?
            };
        }
        if let Some(value) = source.get("QUILL_CACHE") {
            config.cache_enabled = parse_flag("QUILL_CACHE", &value)?;
        }
        if let Some(value) = source.get("QUILL_STATISTICS") {
            config.statistics_enabled = parse_flag("QUILL_STATISTICS", &value)?;
        }
        if let Some(value) = source.get("QUILL_CACHE_LOG") {
            config.log_cache_access = parse_flag("QUILL_CACHE_LOG", &value)?;
        }

        Ok(config)
    }
}

/// Builder for [`QuillConfig`].
#[derive(Debug, Clone, Default)]
pub struct QuillConfigBuilder {
    config: QuillConfig,
}

impl QuillConfigBuilder {
    /// Set the dialect.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    /// Enable or disable result caching.
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache_enabled = enabled;
        self
    }

    /// Enable or disable statistics collection.
    pub fn statistics_enabled(mut self, enabled: bool) -> Self {
        self.config.statistics_enabled = enabled;
        self
    }

    /// Enable or disable cache access logging.
    pub fn log_cache_access(mut self, enabled: bool) -> Self {
        self.config.log_cache_access = enabled;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> QuillConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_defaults() {
        let config = QuillConfig::from_source(&MapEnvSource::new()).unwrap();
        assert_eq!(config, QuillConfig::default());
        assert!(config.cache_enabled);
        assert!(!config.statistics_enabled);
    }

    #[test]
    fn test_from_source() {
        let env = MapEnvSource::new()
            .set("QUILL_DIALECT", "PostgreSQL")
            .set("QUILL_CACHE", "off")
            .set("QUILL_STATISTICS", "1");
        let config = QuillConfig::from_source(&env).unwrap();
        assert_eq!(config.dialect, Dialect::PostgreSql);
        assert!(!config.cache_enabled);
        assert!(config.statistics_enabled);
    }

    #[test]
    fn test_dialect_from_url() {
        let env = MapEnvSource::new().set("QUILL_DIALECT", "sqlserver://db:1433");
        let config = QuillConfig::from_source(&env).unwrap();
        assert_eq!(config.dialect, Dialect::SqlServer);
    }

    #[test]
    fn test_unknown_dialect() {
        let env = MapEnvSource::new().set("QUILL_DIALECT", "db2");
        let err = QuillConfig::from_source(&env).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownDialect);
    }

    #[test]
    fn test_bad_flag() {
        let env = MapEnvSource::new().set("QUILL_CACHE", "maybe");
        let err = QuillConfig::from_source(&env).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
        assert_eq!(err.context.field.as_deref(), Some("QUILL_CACHE"));
    }

    #[test]
    fn test_builder() {
        let config = QuillConfig::builder()
            .dialect(Dialect::MySql)
            .statistics_enabled(true)
            .log_cache_access(false)
            .build();
        assert_eq!(config.dialect, Dialect::MySql);
        assert!(config.statistics_enabled);
        assert!(!config.log_cache_access);
        assert!(config.cache_enabled);
    }
}
