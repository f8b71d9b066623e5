//! Logging and observability
//!
//! This module provides diagnostic logging with:
//! - Console output on stderr
//! - JSON-formatted rolling log files
//! - Configurable log levels (`RUST_LOG` overrides)
//!
//! The per-run log written next to the export files is a product artifact and
//! lives in [`crate::core::export::runlog`]; this module only covers the
//! process-wide `tracing` subscriber.
//!
//! # Example
//!
//! ```no_run
//! use mailshift::logging::init_logging;
//! use mailshift::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(scope = "OU=Staff,DC=example,DC=com", "Scope resolved");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a failed pipeline stage
///
/// # Example
///
/// ```no_run
/// use mailshift::log_stage_failure;
/// use mailshift::domain::{MailshiftError, RunStage};
///
/// let error = MailshiftError::Io("disk full".to_string());
/// log_stage_failure!(RunStage::Writing, &error);
/// ```
#[macro_export]
macro_rules! log_stage_failure {
    ($stage:expr, $error:expr) => {
        tracing::error!(
            stage = %$stage,
            error = %$error,
            "Run stage failed"
        );
    };
}

/// Log the completion of a run
///
/// # Example
///
/// ```no_run
/// use mailshift::log_run_complete;
/// use std::time::Duration;
///
/// log_run_complete!(42, 3, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_run_complete {
    ($accounts:expr, $width:expr, $duration:expr) => {
        tracing::info!(
            accounts = $accounts,
            width = $width,
            duration_ms = $duration.as_millis() as u64,
            "Run completed"
        );
    };
}
