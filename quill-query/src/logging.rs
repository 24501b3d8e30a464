//! Logging setup for Quill.
//!
//! Structured logging is controlled by environment variables:
//!
//! - `QUILL_DEBUG=true` / `QUILL_DEBUG=1` - Enable debug logging
//! - `QUILL_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `QUILL_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! ```rust,no_run
//! use quill_query::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```
//!
//! Inside the crate the standard tracing macros are used, e.g.
//! `debug!(sql = %sql, "formed select")` or `warn!(query = %q, "event rejected")`.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `QUILL_DEBUG`.
///
/// Returns `true` if `QUILL_DEBUG` is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("QUILL_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `QUILL_LOG_LEVEL`.
///
/// Defaults to "debug" if `QUILL_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("QUILL_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the configured log format from `QUILL_LOG_FORMAT`.
pub fn get_log_format() -> &'static str {
    env::var("QUILL_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the Quill logging system.
///
/// Subsequent calls are no-ops. Nothing is installed unless `QUILL_DEBUG` or
/// `QUILL_LOG_LEVEL` is set and the `tracing-subscriber` feature is enabled.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("QUILL_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!("quill={},quill_query={}", level, level))
                .unwrap_or_else(|_| EnvFilter::new("warn"));

            match get_log_format() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
            }

            tracing::info!(
                level = level,
                format = get_log_format(),
                "Quill logging initialized"
            );
        }
    });
}

/// Initialize logging with a specific level.
///
/// # Safety
///
/// This function modifies environment variables, which is unsafe in
/// multi-threaded programs. Call this early, before spawning threads.
pub fn init_with_level(level: &str) {
    // SAFETY: only called at program startup before threads are spawned.
    unsafe {
        env::set_var("QUILL_LOG_LEVEL", level);
    }
    init();
}

/// Initialize debug logging (sets `QUILL_DEBUG=true` and calls [`init`]).
pub fn init_debug() {
    // SAFETY: only called at program startup before threads are spawned.
    unsafe {
        env::set_var("QUILL_DEBUG", "true");
    }
    init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_disabled_by_default() {
        // SAFETY: Test runs in isolation
        unsafe {
            env::remove_var("QUILL_DEBUG");
        }
        assert!(!is_debug_enabled());
    }

    #[test]
    fn test_log_format_default() {
        // SAFETY: Test runs in isolation
        unsafe {
            env::remove_var("QUILL_LOG_FORMAT");
        }
        assert_eq!(get_log_format(), "json");
    }
}
