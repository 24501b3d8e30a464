//! Integration tests for configuration loading.

use pretty_assertions::assert_eq;
use quill::query::{Dialect, ErrorCode, MapEnvSource, QuillConfig};

#[test]
fn test_defaults() {
    let config = QuillConfig::from_source(&MapEnvSource::new()).unwrap();
    assert_eq!(config, QuillConfig::default());
    assert_eq!(config.dialect, Dialect::Default);
    assert!(config.cache_enabled);
    assert!(!config.statistics_enabled);
}

#[test]
fn test_dialect_from_key_and_url() {
    let cases = [
        ("postgres", Dialect::PostgreSql),
        ("MSSQL", Dialect::SqlServer),
        ("mariadb", Dialect::MySql),
        ("jdbc:postgresql://localhost/test", Dialect::PostgreSql),
        ("jdbc:sqlserver://localhost:1433;databaseName=test", Dialect::SqlServer),
        ("mysql://root@localhost/test", Dialect::MySql),
        ("jdbc:oracle:thin:@localhost:1521:xe", Dialect::Oracle),
    ];
    for (value, expected) in cases {
        let env = MapEnvSource::new().set("QUILL_DIALECT", value);
        assert_eq!(QuillConfig::from_source(&env).unwrap().dialect, expected, "{}", value);
    }
}

#[test]
fn test_flags() {
    let env = MapEnvSource::new()
        .set("QUILL_CACHE", "off")
        .set("QUILL_STATISTICS", "YES")
        .set("QUILL_CACHE_LOG", "0");
    let config = QuillConfig::from_source(&env).unwrap();
    assert!(!config.cache_enabled);
    assert!(config.statistics_enabled);
    assert!(!config.log_cache_access);
}

#[test]
fn test_invalid_values() {
    let env = MapEnvSource::new().set("QUILL_CACHE", "sometimes");
    let err = QuillConfig::from_source(&env).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidConfiguration);

    let env = MapEnvSource::new().set("QUILL_DIALECT", "db2");
    let err = QuillConfig::from_source(&env).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownDialect);
}

#[test]
fn test_config_serde() {
    let config = QuillConfig::builder().dialect(Dialect::SqlServer).build();
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["dialect"], "mssql");

    let back: QuillConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}
