//! Export coordinator - main orchestrator for the GET run
//!
//! This module drives one run through scope discovery, scope resolution, the
//! account query, normalization, shaping and the file writes. Stages run
//! strictly one after another; the first failure ends the run.

use crate::adapters::directory::DirectoryService;
use crate::config::{MailshiftConfig, OperationMode};
use crate::core::export::fileset::ExportFileSet;
use crate::core::export::runlog::RunLog;
use crate::core::export::summary::{ExportError, RunState, RunSummary};
use crate::core::export::writer::{ExportWriter, WrittenFile};
use crate::core::query::AccountQuery;
use crate::core::scope::{select_scope, ScopeCatalog, ScopeSelector};
use crate::core::transform::{shape, AddressFilter};
use crate::domain::{MailshiftError, Result, RunStage};
use crate::{log_run_complete, log_stage_failure};
use chrono::{Local, NaiveDate, SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Export coordinator
pub struct ExportCoordinator {
    config: MailshiftConfig,
    directory: Arc<dyn DirectoryService>,
    run_date: Option<NaiveDate>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(config: MailshiftConfig, directory: Arc<dyn DirectoryService>) -> Self {
        Self {
            config,
            directory,
            run_date: None,
        }
    }

    /// Fix the date used in file names instead of today's local date
    pub fn with_run_date(mut self, date: NaiveDate) -> Self {
        self.run_date = Some(date);
        self
    }

    /// Execute a GET run
    ///
    /// Never fails: every outcome, including cancellation at scope selection,
    /// is reported through the returned summary. Files already written when a
    /// later stage fails stay in place. The run log is always written last; a
    /// cancelled run writes nothing else.
    pub async fn execute(&self, selector: &mut dyn ScopeSelector) -> RunSummary {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4();
        let mut summary = RunSummary::new(run_id);
        let mut log = RunLog::new(run_id);

        log.info(
            None,
            format!(
                "GET run started, working directory {}",
                self.config.export.working_directory
            ),
        );

        let run_date = self.run_date.unwrap_or_else(|| Local::now().date_naive());
        let files = match self.prepare(run_date) {
            Ok(files) => files,
            Err(e) => {
                log_stage_failure!("setup", &e);
                summary.fail(&e);
                return summary.with_duration(start_time.elapsed());
            }
        };

        if let Err(e) = self.run(&files, selector, &mut log, &mut summary).await {
            let stage = e.stage();
            log_stage_failure!(stage.map_or("run", |s| s.as_str()), &e);
            log.error(stage, e.root().to_string());
            summary.fail(&e);
        }

        log.info(
            None,
            format!(
                "scope={} accounts={} width={} excluded={} state={:?}",
                summary.scope.as_deref().unwrap_or("-"),
                summary.accounts,
                summary.width,
                summary.addresses_excluded,
                summary.state
            ),
        );
        log.info(
            None,
            format!(
                "completed at {}",
                Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
        );

        match ExportWriter::new(&files).write_run_log(&log.render()) {
            Ok(written) => summary.files.push(written),
            Err(e) => {
                let e = e.in_stage(RunStage::Writing);
                log_stage_failure!(RunStage::Writing, &e);
                if summary.state == RunState::Cancelled {
                    summary.add_error(ExportError::from_error(&e));
                } else {
                    summary.fail(&e);
                }
            }
        }

        summary = summary.with_duration(start_time.elapsed());
        if summary.is_successful() {
            log_run_complete!(summary.accounts, summary.width, summary.duration);
        }
        summary.log_summary();
        summary
    }

    fn prepare(&self, run_date: NaiveDate) -> Result<ExportFileSet> {
        if self.config.application.operation_mode == OperationMode::Put {
            return Err(MailshiftError::Configuration(
                "operation mode PUT (re-import) is not implemented".to_string(),
            ));
        }

        ExportFileSet::from_config(&self.config.export, run_date)
    }

    async fn run(
        &self,
        files: &ExportFileSet,
        selector: &mut dyn ScopeSelector,
        log: &mut RunLog,
        summary: &mut RunSummary,
    ) -> Result<()> {
        // Scope discovery and resolution
        let catalog = ScopeCatalog::discover(self.directory.as_ref())
            .await
            .map_err(|e| e.in_stage(RunStage::ScopeDiscovery))?;
        log.info(
            Some(RunStage::ScopeDiscovery),
            format!("{} organizational scopes discovered", catalog.len()),
        );

        let requested = self.config.export.search_scope.as_deref();
        let Some(scope) = select_scope(requested, &catalog, selector)
            .map_err(|e| e.in_stage(RunStage::ScopeResolution))?
        else {
            log.warn(
                Some(RunStage::ScopeResolution),
                "scope selection cancelled",
            );
            summary.state = RunState::Cancelled;
            return Ok(());
        };

        log.info(
            Some(RunStage::ScopeResolution),
            format!("scope resolved to {scope}"),
        );
        summary.scope = Some(scope.distinguished_path().to_string());
        summary.state = RunState::ScopeResolved;

        // Account query
        let query = AccountQuery::new(
            self.directory.clone(),
            self.config.directory.attributes.clone(),
        );
        let records = query.execute(&scope).await?;
        log.info(
            Some(RunStage::AccountQuery),
            format!("{} accounts returned", records.len()),
        );
        summary.accounts = records.len();
        summary.state = RunState::AccountsQueried;

        // Normalization
        let filter = AddressFilter::new(
            self.config.export.legacy_marker.clone(),
            self.config.export.marker_case_sensitive,
        );
        let (sets, excluded) = filter.normalize_all(&records);
        log.info(
            Some(RunStage::Normalization),
            format!(
                "{excluded} routing addresses containing '{}' excluded",
                self.config.export.legacy_marker
            ),
        );
        summary.addresses_excluded = excluded;
        summary.state = RunState::Normalized;

        // Shaping
        let table = shape(&sets);
        log.info(
            Some(RunStage::Shaping),
            format!("address width {}", table.width()),
        );
        summary.width = table.width();
        summary.state = RunState::Shaped;

        // Writing
        let writer = ExportWriter::new(files);
        let attribute_rows: Vec<_> = records.iter().map(|r| r.attribute_row()).collect();

        let written = writer
            .write_attributes(&attribute_rows)
            .map_err(|e| e.in_stage(RunStage::Writing))?;
        record_written(log, summary, written);

        let written = writer
            .write_proxies(&table)
            .map_err(|e| e.in_stage(RunStage::Writing))?;
        record_written(log, summary, written);

        summary.state = RunState::Written;
        Ok(())
    }
}

fn record_written(log: &mut RunLog, summary: &mut RunSummary, written: WrittenFile) {
    log.info(
        Some(RunStage::Writing),
        format!(
            "{} table written to {} ({} rows, sha256 {})",
            written.kind,
            written.path.display(),
            written.rows,
            written.sha256
        ),
    );
    summary.files.push(written);
}
