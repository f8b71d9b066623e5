//! Per-run status log
//!
//! Each stage appends records as it completes; the text written next to the
//! export files is rendered from them once, when the run ends. Records are
//! also mirrored to `tracing` as they are appended.

use crate::domain::RunStage;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Severity of a run log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        })
    }
}

/// One immutable run log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,

    /// Pipeline stage; `None` for run-level records
    pub stage: Option<RunStage>,

    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.level,
            self.stage.map_or("run", |stage| stage.as_str()),
            self.message
        )
    }
}

/// Append-only record sequence for one run
#[derive(Debug, Clone)]
pub struct RunLog {
    run_id: Uuid,
    records: Vec<LogRecord>,
}

impl RunLog {
    /// Creates an empty log for `run_id`
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            records: Vec::new(),
        }
    }

    /// Appends an informational record
    pub fn info(&mut self, stage: Option<RunStage>, message: impl Into<String>) {
        self.push(stage, LogLevel::Info, message.into());
    }

    /// Appends a warning
    pub fn warn(&mut self, stage: Option<RunStage>, message: impl Into<String>) {
        self.push(stage, LogLevel::Warn, message.into());
    }

    /// Appends an error
    pub fn error(&mut self, stage: Option<RunStage>, message: impl Into<String>) {
        self.push(stage, LogLevel::Error, message.into());
    }

    fn push(&mut self, stage: Option<RunStage>, level: LogLevel, message: String) {
        let stage_name = stage.map_or("run", |s| s.as_str());
        match level {
            LogLevel::Info => {
                tracing::info!(run_id = %self.run_id, stage = stage_name, "{message}")
            }
            LogLevel::Warn => {
                tracing::warn!(run_id = %self.run_id, stage = stage_name, "{message}")
            }
            LogLevel::Error => {
                tracing::error!(run_id = %self.run_id, stage = stage_name, "{message}")
            }
        }

        self.records.push(LogRecord {
            timestamp: Utc::now(),
            stage,
            level,
            message,
        });
    }

    /// Records appended so far
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Renders the log text and consumes the log
    pub fn render(self) -> String {
        let mut text = format!("Run {}\n", self.run_id);
        for record in &self.records {
            text.push_str(&record.to_string());
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_keep_append_order() {
        let mut log = RunLog::new(Uuid::new_v4());
        log.info(None, "GET run started");
        log.warn(Some(RunStage::Normalization), "3 legacy addresses excluded");
        log.error(Some(RunStage::Writing), "disk full");

        let levels: Vec<_> = log.records().iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![LogLevel::Info, LogLevel::Warn, LogLevel::Error]);
        assert_eq!(log.records()[2].stage, Some(RunStage::Writing));
    }

    #[test]
    fn test_render_is_line_oriented() {
        let run_id = Uuid::new_v4();
        let mut log = RunLog::new(run_id);
        log.info(None, "GET run started");
        log.info(Some(RunStage::AccountQuery), "12 accounts returned");

        let text = log.render();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("Run {run_id}"));
        assert!(lines[1].ends_with("[INFO] run: GET run started"));
        assert!(lines[2].ends_with("[INFO] account-query: 12 accounts returned"));
    }

    #[test]
    fn test_record_display_uses_utc_timestamp() {
        let record = LogRecord {
            timestamp: DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            stage: Some(RunStage::Shaping),
            level: LogLevel::Info,
            message: "width 3".to_string(),
        };

        assert_eq!(record.to_string(), "2024-01-01T10:00:00Z [INFO] shaping: width 3");
    }
}
