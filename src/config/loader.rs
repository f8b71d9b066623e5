//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{MailshiftConfig, OperationMode};
use crate::config::SecretValue;
use crate::domain::errors::MailshiftError;
use crate::domain::result::Result;
use regex::Regex;
use secrecy::Secret;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into MailshiftConfig
/// 4. Applies environment variable overrides (MAILSHIFT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use mailshift::config::loader::load_config;
///
/// let config = load_config("mailshift.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MailshiftConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MailshiftError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MailshiftError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: MailshiftConfig = toml::from_str(&contents)
        .map_err(|e| MailshiftError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        MailshiftError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched. Every missing variable is reported in
/// a single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MailshiftError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MailshiftError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using MAILSHIFT_* prefix
///
/// Environment variables follow the pattern: MAILSHIFT_<SECTION>_<KEY>
/// For example: MAILSHIFT_DIRECTORY_URL, MAILSHIFT_EXPORT_SEARCH_SCOPE
fn apply_env_overrides(config: &mut MailshiftConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("MAILSHIFT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("MAILSHIFT_APPLICATION_OPERATION_MODE") {
        config.application.operation_mode = match val.to_lowercase().as_str() {
            "get" => OperationMode::Get,
            "put" => OperationMode::Put,
            other => {
                return Err(MailshiftError::Configuration(format!(
                    "Invalid MAILSHIFT_APPLICATION_OPERATION_MODE '{other}'. Must be get or put"
                )))
            }
        };
    }

    // Directory overrides
    if let Ok(val) = std::env::var("MAILSHIFT_DIRECTORY_URL") {
        config.directory.url = val;
    }
    if let Ok(val) = std::env::var("MAILSHIFT_DIRECTORY_BIND_DN") {
        config.directory.bind_dn = Some(val);
    }
    if let Ok(val) = std::env::var("MAILSHIFT_DIRECTORY_BIND_PASSWORD") {
        config.directory.bind_password = Some(Secret::new(SecretValue::from(val)));
    }
    if let Ok(val) = std::env::var("MAILSHIFT_DIRECTORY_BASE_DN") {
        config.directory.base_dn = val;
    }
    if let Ok(val) = std::env::var("MAILSHIFT_DIRECTORY_TIMEOUT_SECONDS") {
        config.directory.timeout_seconds =
            parse_number("MAILSHIFT_DIRECTORY_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("MAILSHIFT_DIRECTORY_PAGE_SIZE") {
        config.directory.page_size = parse_number("MAILSHIFT_DIRECTORY_PAGE_SIZE", &val)?;
    }
    if let Ok(val) = std::env::var("MAILSHIFT_DIRECTORY_STARTTLS") {
        config.directory.starttls = parse_bool("MAILSHIFT_DIRECTORY_STARTTLS", &val)?;
    }
    if let Ok(val) = std::env::var("MAILSHIFT_DIRECTORY_TLS_VERIFY") {
        config.directory.tls_verify = parse_bool("MAILSHIFT_DIRECTORY_TLS_VERIFY", &val)?;
    }

    // Export overrides
    if let Ok(val) = std::env::var("MAILSHIFT_EXPORT_WORKING_DIRECTORY") {
        config.export.working_directory = val;
    }
    if let Ok(val) = std::env::var("MAILSHIFT_EXPORT_SEARCH_SCOPE") {
        config.export.search_scope = Some(val);
    }
    if let Ok(val) = std::env::var("MAILSHIFT_EXPORT_LEGACY_MARKER") {
        config.export.legacy_marker = val;
    }
    if let Ok(val) = std::env::var("MAILSHIFT_EXPORT_MARKER_CASE_SENSITIVE") {
        config.export.marker_case_sensitive =
            parse_bool("MAILSHIFT_EXPORT_MARKER_CASE_SENSITIVE", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("MAILSHIFT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_bool("MAILSHIFT_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("MAILSHIFT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("MAILSHIFT_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

/// Parses a boolean override; only `true` and `false` are accepted, in any case
fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(MailshiftError::Configuration(format!(
            "Invalid {name} '{value}'. Must be true or false"
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        MailshiftError::Configuration(format!("Invalid {name} '{value}'. Must be a number"))
    })
}
