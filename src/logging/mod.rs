//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - JSON file logging with rotation
//!
//! HTTP requests are additionally traced by `tower_http::trace::TraceLayer`
//! in the router.
//!
//! # Example
//!
//! ```no_run
//! use medigram::logging::init_logging;
//! use medigram::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a best-effort cleanup step that failed
///
/// These failures are never surfaced to the caller, so the log line is the
/// only trace they leave.
///
/// # Example
///
/// ```no_run
/// use medigram::log_cleanup_failure;
///
/// let error = "blob store unavailable";
/// log_cleanup_failure!("avatar", "65f1a2b3c4d5e6f708192a3b", error);
/// ```
#[macro_export]
macro_rules! log_cleanup_failure {
    ($what:expr, $id:expr, $error:expr) => {
        tracing::warn!(
            target_kind = $what,
            id = %$id,
            error = %$error,
            "Best-effort cleanup failed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use medigram::log_error_with_context;
/// use medigram::domain::MedigramError;
///
/// let error = MedigramError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// log_error_with_context!(&error, "Record creation failed", kind = "Patient");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
    ($error:expr, $context:expr, $($field:tt)+) => {
        tracing::error!(
            error = %$error,
            context = $context,
            $($field)+,
            "Error occurred"
        );
    };
}
