//! Export orchestration and file output
//!
//! This module provides the GET run for Mailshift, including:
//! - Versioned file naming
//! - CSV table and run log writers
//! - The per-run status log
//! - Run coordination and the run summary

pub mod coordinator;
pub mod fileset;
pub mod runlog;
pub mod summary;
pub mod writer;

pub use coordinator::ExportCoordinator;
pub use fileset::{ExportFileSet, FileKind};
pub use runlog::{LogLevel, LogRecord, RunLog};
pub use summary::{ExportError, ExportErrorType, RunState, RunSummary};
pub use writer::{ExportWriter, WrittenFile};
