//! Run summary and reporting
//!
//! This module defines structures for tracking and reporting the outcome of a
//! GET run.

use super::writer::WrittenFile;
use crate::domain::{MailshiftError, RunStage};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Progress of a GET run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    ScopeResolved,
    AccountsQueried,
    Normalized,
    Shaped,
    /// Both tables written
    Written,
    /// Terminated after at least one file was written
    PartiallyWritten,
    /// Terminated before any file was written
    Failed,
    /// Abandoned at scope selection; only the run log is written
    Cancelled,
}

/// Summary of a GET run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,

    /// Distinguished path of the resolved scope
    pub scope: Option<String>,

    /// Accounts returned by the query
    pub accounts: usize,

    /// Address columns in the proxies table
    pub width: usize,

    /// Routing addresses dropped by the legacy marker rule
    pub addresses_excluded: usize,

    /// Files written, in write order
    pub files: Vec<WrittenFile>,

    pub state: RunState,

    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,

    /// Errors encountered during the run
    pub errors: Vec<ExportError>,
}

impl RunSummary {
    /// Create a new summary for `run_id`
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            scope: None,
            accounts: 0,
            width: 0,
            addresses_excluded: 0,
            files: Vec::new(),
            state: RunState::Idle,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Record a terminating failure and move to the matching terminal state
    pub fn fail(&mut self, error: &MailshiftError) {
        self.state = if self.files.is_empty() {
            RunState::Failed
        } else {
            RunState::PartiallyWritten
        };
        self.add_error(ExportError::from_error(error));
    }

    /// Check if the run wrote both tables without errors
    pub fn is_successful(&self) -> bool {
        self.state == RunState::Written && self.errors.is_empty()
    }

    /// Process exit code for this outcome
    ///
    /// 0 success, 1 partial writes, 2 configuration or scope problem,
    /// 3 directory unavailable, 4 query timeout, 5 other failures,
    /// 130 cancelled.
    pub fn exit_code(&self) -> i32 {
        if self.state == RunState::Cancelled {
            return 130;
        }
        if self.state == RunState::PartiallyWritten {
            return 1;
        }

        match self.errors.first().map(|e| e.error_type) {
            None => 0,
            Some(ExportErrorType::Configuration | ExportErrorType::InvalidScope) => 2,
            Some(ExportErrorType::DirectoryUnavailable) => 3,
            Some(ExportErrorType::QueryTimeout) => 4,
            Some(_) => 5,
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            scope = self.scope.as_deref().unwrap_or("-"),
            accounts = self.accounts,
            width = self.width,
            addresses_excluded = self.addresses_excluded,
            files = self.files.len(),
            state = ?self.state,
            duration_secs = self.duration.as_secs(),
            "GET run finished"
        );

        for error in &self.errors {
            tracing::warn!(
                error_type = ?error.error_type,
                stage = error.stage.map_or("run", |s| s.as_str()),
                message = %error.message,
                "Run error"
            );
        }
    }
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Type of run error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportErrorType {
    /// Directory unreachable or missing the query capability
    DirectoryUnavailable,
    /// Account query ran out of time
    QueryTimeout,
    /// Directory rejected the query
    Query,
    /// Export target could not be written
    IoFailure,
    /// Requested scope could not be resolved
    InvalidScope,
    /// Configuration error
    Configuration,
    /// Unknown error
    Unknown,
}

/// Run error with the stage it happened in
#[derive(Debug, Clone, Serialize)]
pub struct ExportError {
    pub error_type: ExportErrorType,
    pub stage: Option<RunStage>,
    pub message: String,
}

impl ExportError {
    /// Classify a pipeline error
    pub fn from_error(error: &MailshiftError) -> Self {
        let error_type = if error.is_directory_unavailable() {
            ExportErrorType::DirectoryUnavailable
        } else if error.is_timeout() {
            ExportErrorType::QueryTimeout
        } else if error.is_io_failure() {
            ExportErrorType::IoFailure
        } else {
            match (error.stage(), error.root()) {
                (Some(RunStage::ScopeResolution), MailshiftError::Validation(_)) => {
                    ExportErrorType::InvalidScope
                }
                (_, MailshiftError::Configuration(_)) => ExportErrorType::Configuration,
                (_, MailshiftError::Directory(_)) => ExportErrorType::Query,
                _ => ExportErrorType::Unknown,
            }
        };

        Self {
            error_type,
            stage: error.stage(),
            message: error.root().to_string(),
        }
    }
}
