//! End-to-end GET runs against an in-memory directory

use async_trait::async_trait;
use chrono::NaiveDate;
use mailshift::adapters::directory::DirectoryService;
use mailshift::config::{AttributeMapping, MailshiftConfig, OperationMode};
use mailshift::core::export::{ExportCoordinator, FileKind, RunState, RunSummary};
use mailshift::core::scope::{NonInteractive, ScopeCatalog, ScopeSelector, Selection};
use mailshift::core::verification::verify_file;
use mailshift::domain::{AccountRecord, DirectoryError, DistinguishedPath, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const STAFF: &str = "OU=Staff,DC=example,DC=com";
const EMPTY: &str = "OU=Empty,DC=example,DC=com";

#[derive(Clone, Copy)]
enum Failure {
    None,
    CatalogUnavailable,
    QueryTimeout,
}

struct StaticDirectory {
    units: Vec<String>,
    accounts: HashMap<String, Vec<AccountRecord>>,
    failure: Failure,
    projections: Mutex<Vec<Vec<String>>>,
}

impl StaticDirectory {
    fn new() -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(
            STAFF.to_string(),
            vec![
                AccountRecord::new("jsmith", "j@x.com", "jsmith").with_routing_addresses(vec![
                    "SMTP:j@x.com".to_string(),
                    "X400:c=US;a=;p=Foo;".to_string(),
                    "smtp:alias@x.com".to_string(),
                    "smtp:j.smith@x.com".to_string(),
                ]),
                AccountRecord::new("svc-backup", "", ""),
                AccountRecord::new("doe, jane", "jane@x.com", "jdoe")
                    .with_routing_addresses(vec!["SMTP:jane@x.com".to_string()]),
            ],
        );
        accounts.insert(EMPTY.to_string(), Vec::new());

        Self {
            units: vec![STAFF.to_string(), EMPTY.to_string()],
            accounts,
            failure: Failure::None,
            projections: Mutex::new(Vec::new()),
        }
    }

    fn failing(failure: Failure) -> Self {
        Self {
            failure,
            ..Self::new()
        }
    }
}

#[async_trait]
impl DirectoryService for StaticDirectory {
    async fn list_organizational_units(&self) -> Result<Vec<String>> {
        if let Failure::CatalogUnavailable = self.failure {
            return Err(DirectoryError::Unavailable("connection refused".to_string()).into());
        }
        Ok(self.units.clone())
    }

    async fn search_accounts(
        &self,
        base: &DistinguishedPath,
        projection: &AttributeMapping,
    ) -> Result<Vec<AccountRecord>> {
        self.projections
            .lock()
            .unwrap()
            .push(projection.projection().iter().map(|s| s.to_string()).collect());

        if let Failure::QueryTimeout = self.failure {
            return Err(DirectoryError::Timeout("time limit exceeded".to_string()).into());
        }
        Ok(self.accounts.get(base.as_str()).cloned().unwrap_or_default())
    }
}

struct Scripted(Vec<Selection>);

impl ScopeSelector for Scripted {
    fn select(&mut self, _catalog: &ScopeCatalog, _rejected: Option<&str>) -> Result<Selection> {
        Ok(if self.0.is_empty() {
            Selection::Cancelled
        } else {
            self.0.remove(0)
        })
    }
}

fn config(dir: &Path, scope: Option<&str>) -> MailshiftConfig {
    let mut config = MailshiftConfig::default();
    config.export.working_directory = dir.to_string_lossy().to_string();
    config.export.search_scope = scope.map(str::to_string);
    config
}

async fn run(
    config: MailshiftConfig,
    directory: Arc<StaticDirectory>,
    selector: &mut dyn ScopeSelector,
) -> RunSummary {
    ExportCoordinator::new(config, directory)
        .with_run_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .execute(selector)
        .await
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_run_writes_both_tables_and_log() {
    let dir = TempDir::new().unwrap();
    let directory = Arc::new(StaticDirectory::new());

    let summary = run(
        config(dir.path(), Some("ou=staff,dc=example,dc=com")),
        directory.clone(),
        &mut NonInteractive,
    )
    .await;

    assert_eq!(summary.state, RunState::Written);
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(summary.scope.as_deref(), Some(STAFF));
    assert_eq!(summary.accounts, 3);
    assert_eq!(summary.width, 3);
    assert_eq!(summary.addresses_excluded, 1);

    assert_eq!(
        read(dir.path(), "ExportedAttributes_2024-01-01_1.csv"),
        "accountId,primaryEmail,displayAlias\r\n\
         jsmith,j@x.com,jsmith\r\n\
         svc-backup,,\r\n\
         \"doe, jane\",jane@x.com,jdoe\r\n"
    );
    assert_eq!(
        read(dir.path(), "ExportedProxies_2024-01-01_1.csv"),
        "accountId,address_0,address_1,address_2\r\n\
         jsmith,SMTP:j@x.com,smtp:alias@x.com,smtp:j.smith@x.com\r\n\
         svc-backup,,,\r\n\
         \"doe, jane\",SMTP:jane@x.com,,\r\n"
    );

    let kinds: Vec<_> = summary.files.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![FileKind::Attributes, FileKind::Proxies, FileKind::RunLog]
    );

    let log = read(dir.path(), "ExportLog_2024-01-01_1.txt");
    assert!(log.starts_with(&format!("Run {}", summary.run_id)));
    assert!(log.contains(&format!("scope resolved to {STAFF}")));
    assert!(log.contains("3 accounts returned"));
    assert!(log.contains(&summary.files[0].sha256));
    assert!(log.contains("completed at"));

    for file in &summary.files {
        assert!(verify_file(&file.path, &file.sha256).unwrap());
    }
}

#[tokio::test]
async fn test_query_requests_exactly_four_attributes() {
    let dir = TempDir::new().unwrap();
    let directory = Arc::new(StaticDirectory::new());

    run(config(dir.path(), Some(STAFF)), directory.clone(), &mut NonInteractive).await;

    let projections = directory.projections.lock().unwrap();
    assert_eq!(projections.len(), 1);
    assert_eq!(
        projections[0],
        vec!["sAMAccountName", "mail", "mailNickname", "proxyAddresses"]
    );
}

#[tokio::test]
async fn test_empty_scope_writes_header_only_tables() {
    let dir = TempDir::new().unwrap();

    let summary = run(
        config(dir.path(), Some(EMPTY)),
        Arc::new(StaticDirectory::new()),
        &mut NonInteractive,
    )
    .await;

    assert!(summary.is_successful());
    assert_eq!(summary.accounts, 0);
    assert_eq!(summary.width, 0);
    assert_eq!(
        read(dir.path(), "ExportedAttributes_2024-01-01_1.csv"),
        "accountId,primaryEmail,displayAlias\r\n"
    );
    assert_eq!(
        read(dir.path(), "ExportedProxies_2024-01-01_1.csv"),
        "accountId\r\n"
    );
}

#[tokio::test]
async fn test_existing_files_bump_run_sequence() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ExportedAttributes_2024-01-01_1.csv"), "old").unwrap();

    let summary = run(
        config(dir.path(), Some(EMPTY)),
        Arc::new(StaticDirectory::new()),
        &mut NonInteractive,
    )
    .await;

    assert!(summary.is_successful());
    assert_eq!(
        summary.files[0].path,
        dir.path().join("ExportedAttributes_2024-01-01_2.csv")
    );
    assert_eq!(
        summary.files[1].path,
        dir.path().join("ExportedProxies_2024-01-01_1.csv")
    );
    assert_eq!(read(dir.path(), "ExportedAttributes_2024-01-01_1.csv"), "old");
}

#[tokio::test]
async fn test_interactive_selection_by_token() {
    let dir = TempDir::new().unwrap();
    let mut selector = Scripted(vec![Selection::Candidate("1".to_string())]);

    let summary = run(
        config(dir.path(), Some("OU=Gone,DC=example,DC=com")),
        Arc::new(StaticDirectory::new()),
        &mut selector,
    )
    .await;

    assert!(summary.is_successful());
    assert_eq!(summary.scope.as_deref(), Some(STAFF));
}

#[tokio::test]
async fn test_cancelled_selection_writes_only_run_log() {
    let dir = TempDir::new().unwrap();
    let directory = Arc::new(StaticDirectory::new());
    let mut selector = Scripted(vec![Selection::Cancelled]);

    let summary = run(config(dir.path(), None), directory.clone(), &mut selector).await;

    assert_eq!(summary.state, RunState::Cancelled);
    assert_eq!(summary.exit_code(), 130);
    assert_eq!(file_names(dir.path()), vec!["ExportLog_2024-01-01_1.txt"]);
    assert_eq!(summary.files.len(), 1);
    assert_eq!(summary.files[0].kind, FileKind::RunLog);
    assert!(directory.projections.lock().unwrap().is_empty());

    let log = read(dir.path(), "ExportLog_2024-01-01_1.txt");
    assert!(log.contains("[WARN] scope-resolution: scope selection cancelled"));
    assert!(log.contains("state=Cancelled"));
    assert!(log.contains("completed at"));
}

#[tokio::test]
async fn test_unresolved_scope_without_prompt_is_usage_error() {
    let dir = TempDir::new().unwrap();

    let summary = run(
        config(dir.path(), Some("OU=Gone,DC=example,DC=com")),
        Arc::new(StaticDirectory::new()),
        &mut NonInteractive,
    )
    .await;

    assert_eq!(summary.state, RunState::Failed);
    assert_eq!(summary.exit_code(), 2);
    assert_eq!(file_names(dir.path()), vec!["ExportLog_2024-01-01_1.txt"]);
}

#[tokio::test]
async fn test_directory_unavailable() {
    let dir = TempDir::new().unwrap();

    let summary = run(
        config(dir.path(), Some(STAFF)),
        Arc::new(StaticDirectory::failing(Failure::CatalogUnavailable)),
        &mut NonInteractive,
    )
    .await;

    assert_eq!(summary.state, RunState::Failed);
    assert_eq!(summary.exit_code(), 3);

    let log = read(dir.path(), "ExportLog_2024-01-01_1.txt");
    assert!(log.contains("[ERROR] scope-discovery"));
    assert!(log.contains("connection refused"));
}

#[tokio::test]
async fn test_query_timeout_leaves_no_tables() {
    let dir = TempDir::new().unwrap();

    let summary = run(
        config(dir.path(), Some(STAFF)),
        Arc::new(StaticDirectory::failing(Failure::QueryTimeout)),
        &mut NonInteractive,
    )
    .await;

    assert_eq!(summary.exit_code(), 4);
    assert_eq!(summary.scope.as_deref(), Some(STAFF));
    assert_eq!(file_names(dir.path()), vec!["ExportLog_2024-01-01_1.txt"]);
    assert!(read(dir.path(), "ExportLog_2024-01-01_1.txt").contains("[ERROR] account-query"));
}

#[tokio::test]
async fn test_gap_in_run_sequence_does_not_block_later_runs() {
    let dir = TempDir::new().unwrap();
    // One file counted, so sequence 2 is computed but already taken
    fs::write(dir.path().join("ExportedProxies_2024-01-01_2.csv"), "keep").unwrap();

    for _ in 0..2 {
        let summary = run(
            config(dir.path(), Some(STAFF)),
            Arc::new(StaticDirectory::new()),
            &mut NonInteractive,
        )
        .await;
        assert_eq!(summary.exit_code(), 0);
    }

    assert_eq!(
        file_names(dir.path()),
        vec![
            "ExportLog_2024-01-01_1.txt",
            "ExportLog_2024-01-01_2.txt",
            "ExportedAttributes_2024-01-01_1.csv",
            "ExportedAttributes_2024-01-01_2.csv",
            "ExportedProxies_2024-01-01_2.csv",
            "ExportedProxies_2024-01-01_3.csv",
            "ExportedProxies_2024-01-01_4.csv",
        ]
    );
    assert_eq!(read(dir.path(), "ExportedProxies_2024-01-01_2.csv"), "keep");
    assert!(read(dir.path(), "ExportedProxies_2024-01-01_3.csv").starts_with("accountId,"));
}

#[tokio::test]
async fn test_unwritable_working_directory_is_io_failure() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");

    let summary = run(
        config(&missing, Some(STAFF)),
        Arc::new(StaticDirectory::new()),
        &mut NonInteractive,
    )
    .await;

    assert_eq!(summary.state, RunState::Failed);
    assert_eq!(summary.exit_code(), 5);
    assert!(summary.files.is_empty());
}

#[tokio::test]
async fn test_put_mode_is_rejected() {
    let dir = TempDir::new().unwrap();
    let directory = Arc::new(StaticDirectory::new());
    let mut config = config(dir.path(), Some(STAFF));
    config.application.operation_mode = OperationMode::Put;

    let summary = run(config, directory.clone(), &mut NonInteractive).await;

    assert_eq!(summary.exit_code(), 2);
    assert!(file_names(dir.path()).is_empty());
    assert!(directory.projections.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_case_insensitive_marker() {
    let dir = TempDir::new().unwrap();
    let mut directory = StaticDirectory::new();
    directory.accounts.insert(
        STAFF.to_string(),
        vec![AccountRecord::new("a", "a@x.com", "a").with_routing_addresses(vec![
            "x400:c=US;".to_string(),
            "SMTP:a@x.com".to_string(),
        ])],
    );
    let mut config = config(dir.path(), Some(STAFF));
    config.export.marker_case_sensitive = false;

    let summary = run(config, Arc::new(directory), &mut NonInteractive).await;

    assert_eq!(summary.addresses_excluded, 1);
    assert_eq!(
        read(dir.path(), "ExportedProxies_2024-01-01_1.csv"),
        "accountId,address_0\r\na,SMTP:a@x.com\r\n"
    );
}
