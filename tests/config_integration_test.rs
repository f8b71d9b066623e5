//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use mailshift::config::{load_config, OperationMode};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("MAILSHIFT_APPLICATION_LOG_LEVEL");
    std::env::remove_var("MAILSHIFT_APPLICATION_OPERATION_MODE");
    std::env::remove_var("MAILSHIFT_DIRECTORY_PAGE_SIZE");
    std::env::remove_var("MAILSHIFT_EXPORT_SEARCH_SCOPE");
    std::env::remove_var("MAILSHIFT_EXPORT_MARKER_CASE_SENSITIVE");
    std::env::remove_var("MAILSHIFT_DIRECTORY_TLS_VERIFY");
    std::env::remove_var("TEST_BIND_PASSWORD");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
environment = "production"

[application]
log_level = "debug"
operation_mode = "GET"

[directory]
url = "ldaps://dc01.example.com:636"
bind_dn = "CN=svc,OU=Service Accounts,DC=example,DC=com"
bind_password = "hunter2"
base_dn = "DC=example,DC=com"
account_filter = "(objectClass=user)"
timeout_seconds = 30
page_size = 1000

[directory.attributes]
account_id = "uid"
primary_email = "mail"
display_alias = "cn"
routing_addresses = "proxyAddresses"

[export]
working_directory = "/srv/exports"
search_scope = "OU=Staff,DC=example,DC=com"
attributes_prefix = "Attrs"
proxies_prefix = "Proxies"
log_prefix = "Log"
date_format = "%Y%m%d"
legacy_marker = "X400"
marker_case_sensitive = false

[logging]
local_enabled = false
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.application.operation_mode, OperationMode::Get);
    assert_eq!(config.directory.url, "ldaps://dc01.example.com:636");
    assert_eq!(
        config
            .directory
            .bind_password
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_ref(),
        "hunter2"
    );
    assert_eq!(config.directory.timeout_seconds, 30);
    assert_eq!(config.directory.page_size, 1000);
    assert_eq!(
        config.directory.attributes.projection(),
        ["uid", "mail", "cn", "proxyAddresses"]
    );
    assert_eq!(
        config.export.search_scope.as_deref(),
        Some("OU=Staff,DC=example,DC=com")
    );
    assert_eq!(config.export.attributes_prefix, "Attrs");
    assert_eq!(config.export.date_format, "%Y%m%d");
    assert!(!config.export.marker_case_sensitive);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[directory]
url = "ldap://localhost:389"
base_dn = "DC=example,DC=com"

[export]
working_directory = "./exports"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.application.operation_mode, OperationMode::Get);
    assert!(config.directory.bind_dn.is_none());
    assert_eq!(config.directory.timeout_seconds, 120);
    assert_eq!(config.directory.page_size, 500);
    assert_eq!(
        config.directory.attributes.projection(),
        ["sAMAccountName", "mail", "mailNickname", "proxyAddresses"]
    );
    assert!(config.export.search_scope.is_none());
    assert_eq!(config.export.attributes_prefix, "ExportedAttributes");
    assert_eq!(config.export.proxies_prefix, "ExportedProxies");
    assert_eq!(config.export.log_prefix, "ExportLog");
    assert_eq!(config.export.date_format, "%Y-%m-%d");
    assert_eq!(config.export.legacy_marker, "X400");
    assert!(config.export.marker_case_sensitive);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_BIND_PASSWORD", "secret_pass");

    let temp_file = write_config(
        r#"
[directory]
url = "ldap://localhost:389"
bind_dn = "CN=svc,DC=example,DC=com"
bind_password = "${TEST_BIND_PASSWORD}"
base_dn = "DC=example,DC=com"

[export]
working_directory = "./exports"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(
        config
            .directory
            .bind_password
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_ref(),
        "secret_pass"
    );

    std::env::remove_var("TEST_BIND_PASSWORD");
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("MAILSHIFT_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("MAILSHIFT_DIRECTORY_PAGE_SIZE", "250");
    std::env::set_var("MAILSHIFT_EXPORT_SEARCH_SCOPE", "OU=Sales,DC=example,DC=com");
    std::env::set_var("MAILSHIFT_EXPORT_MARKER_CASE_SENSITIVE", "false");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[directory]
url = "ldap://localhost:389"
base_dn = "DC=example,DC=com"
page_size = 500

[export]
working_directory = "./exports"
search_scope = "OU=Staff,DC=example,DC=com"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.directory.page_size, 250);
    assert_eq!(
        config.export.search_scope.as_deref(),
        Some("OU=Sales,DC=example,DC=com")
    );
    assert!(!config.export.marker_case_sensitive);

    cleanup_env_vars();
}

#[test]
fn test_operation_mode_put_parses() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
operation_mode = "put"

[directory]
url = "ldap://localhost:389"
base_dn = "DC=example,DC=com"

[export]
working_directory = "./exports"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.application.operation_mode, OperationMode::Put);
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        (
            "http url",
            r#"
[directory]
url = "http://localhost"
base_dn = "DC=example,DC=com"

[export]
working_directory = "./exports"
"#,
        ),
        (
            "bind without password",
            r#"
[directory]
url = "ldap://localhost:389"
bind_dn = "CN=svc,DC=example,DC=com"
base_dn = "DC=example,DC=com"

[export]
working_directory = "./exports"
"#,
        ),
        (
            "same table prefixes",
            r#"
[directory]
url = "ldap://localhost:389"
base_dn = "DC=example,DC=com"

[export]
working_directory = "./exports"
attributes_prefix = "Export"
proxies_prefix = "Export"
"#,
        ),
        (
            "date format with underscore",
            r#"
[directory]
url = "ldap://localhost:389"
base_dn = "DC=example,DC=com"

[export]
working_directory = "./exports"
date_format = "%Y_%m_%d"
"#,
        ),
        (
            "scope without attribute",
            r#"
[directory]
url = "ldap://localhost:389"
base_dn = "DC=example,DC=com"

[export]
working_directory = "./exports"
search_scope = "Staff"
"#,
        ),
    ];

    for (name, content) in cases {
        let temp_file = write_config(content);
        assert!(
            load_config(temp_file.path()).is_err(),
            "expected '{name}' to be rejected"
        );
    }
}

#[test]
fn test_missing_env_var_fails() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[directory]
url = "ldap://localhost:389"
bind_dn = "CN=svc,DC=example,DC=com"
bind_password = "${TEST_BIND_PASSWORD}"
base_dn = "DC=example,DC=com"

[export]
working_directory = "./exports"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_BIND_PASSWORD"));
}

#[test]
fn test_invalid_boolean_override_is_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[directory]
url = "ldap://localhost:389"
base_dn = "DC=example,DC=com"

[export]
working_directory = "./exports"
"#,
    );

    for value in ["no", "0", "off"] {
        std::env::set_var("MAILSHIFT_EXPORT_MARKER_CASE_SENSITIVE", value);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            err.to_string().contains("MAILSHIFT_EXPORT_MARKER_CASE_SENSITIVE"),
            "expected '{value}' to be rejected"
        );
    }

    std::env::set_var("MAILSHIFT_EXPORT_MARKER_CASE_SENSITIVE", "False");
    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert!(!config.export.marker_case_sensitive);

    std::env::set_var("MAILSHIFT_DIRECTORY_TLS_VERIFY", "maybe");
    assert!(load_config(temp_file.path()).is_err());

    cleanup_env_vars();
}
