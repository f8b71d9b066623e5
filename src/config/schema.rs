//! Configuration schema types
//!
//! This module defines the configuration structure for Mailshift.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;

/// Direction of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    /// Export routing metadata from the directory
    #[default]
    #[serde(alias = "GET")]
    Get,
    /// Re-import previously exported files (not implemented)
    #[serde(alias = "PUT")]
    Put,
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationMode::Get => f.write_str("GET"),
            OperationMode::Put => f.write_str("PUT"),
        }
    }
}

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Production environment
    Production,
}

/// Main Mailshift configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailshiftConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, production)
    #[serde(default)]
    pub environment: Environment,

    /// Directory service connection
    pub directory: DirectoryConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MailshiftConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.directory.validate(&self.environment)?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Operation mode (get or put)
    #[serde(default)]
    pub operation_mode: OperationMode,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            operation_mode: OperationMode::default(),
        }
    }
}

/// Directory service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Directory URL (ldap:// or ldaps://)
    pub url: String,

    /// Bind DN; anonymous bind when absent
    #[serde(default)]
    pub bind_dn: Option<String>,

    /// Bind password
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub bind_password: Option<SecretString>,

    /// Search base for the scope catalog
    pub base_dn: String,

    /// Filter selecting account objects inside a scope
    #[serde(default = "default_account_filter")]
    pub account_filter: String,

    /// Filter selecting organizational unit objects
    #[serde(default = "default_scope_filter")]
    pub scope_filter: String,

    /// Per-operation timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Page size for the account query
    #[serde(default = "default_page_size")]
    pub page_size: i32,

    /// Upgrade ldap:// connections with StartTLS
    #[serde(default)]
    pub starttls: bool,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: Disabling TLS verification exposes the bind
    /// credentials to man-in-the-middle attacks. Enforced on in production.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Attribute names of the four-attribute projection
    #[serde(default)]
    pub attributes: AttributeMapping,
}

impl DirectoryConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.url.is_empty() {
            return Err("directory.url cannot be empty".to_string());
        }

        let parsed = url::Url::parse(&self.url)
            .map_err(|e| format!("directory.url '{}' is not a valid URL: {e}", self.url))?;
        if parsed.scheme() != "ldap" && parsed.scheme() != "ldaps" {
            return Err("directory.url must start with ldap:// or ldaps://".to_string());
        }

        if self.starttls && parsed.scheme() == "ldaps" {
            return Err("directory.starttls cannot be combined with an ldaps:// url".to_string());
        }

        if self.base_dn.trim().is_empty() {
            return Err("directory.base_dn cannot be empty".to_string());
        }

        if self.bind_dn.is_some()
            && self
                .bind_password
                .as_ref()
                .map(|s| s.expose_secret().is_empty())
                .unwrap_or(true)
        {
            return Err("directory.bind_password cannot be empty when bind_dn is set".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("directory.timeout_seconds must be > 0".to_string());
        }

        if !(1..=5000).contains(&self.page_size) {
            return Err(format!(
                "directory.page_size must be between 1 and 5000, got {}",
                self.page_size
            ));
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                For development/testing environments, set 'environment = \"development\"'."
                    .to_string(),
            );
        }

        self.attributes.validate()?;
        Ok(())
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: "ldap://localhost:389".to_string(),
            bind_dn: None,
            bind_password: None,
            base_dn: "DC=example,DC=com".to_string(),
            account_filter: default_account_filter(),
            scope_filter: default_scope_filter(),
            timeout_seconds: default_timeout_seconds(),
            page_size: default_page_size(),
            starttls: false,
            tls_verify: true,
            attributes: AttributeMapping::default(),
        }
    }
}

/// Directory attribute names requested by the account query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMapping {
    /// Account identifier attribute
    #[serde(default = "default_account_id_attribute")]
    pub account_id: String,

    /// Primary email attribute
    #[serde(default = "default_primary_email_attribute")]
    pub primary_email: String,

    /// Display alias attribute
    #[serde(default = "default_display_alias_attribute")]
    pub display_alias: String,

    /// Multi-valued routing address attribute
    #[serde(default = "default_routing_addresses_attribute")]
    pub routing_addresses: String,
}

impl AttributeMapping {
    /// The projection, in column order
    pub fn projection(&self) -> [&str; 4] {
        [
            self.account_id.as_str(),
            self.primary_email.as_str(),
            self.display_alias.as_str(),
            self.routing_addresses.as_str(),
        ]
    }

    fn validate(&self) -> Result<(), String> {
        let projection = self.projection();
        if projection.iter().any(|name| name.trim().is_empty()) {
            return Err("directory.attributes entries cannot be empty".to_string());
        }

        for (i, name) in projection.iter().enumerate() {
            if projection[i + 1..]
                .iter()
                .any(|other| other.eq_ignore_ascii_case(name))
            {
                return Err(format!(
                    "directory.attributes maps '{name}' more than once"
                ));
            }
        }
        Ok(())
    }
}

impl Default for AttributeMapping {
    fn default() -> Self {
        Self {
            account_id: default_account_id_attribute(),
            primary_email: default_primary_email_attribute(),
            display_alias: default_display_alias_attribute(),
            routing_addresses: default_routing_addresses_attribute(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving export files
    pub working_directory: String,

    /// Distinguished path of the scope to export; prompts when absent
    #[serde(default)]
    pub search_scope: Option<String>,

    /// Filename prefix of the attributes table
    #[serde(default = "default_attributes_prefix")]
    pub attributes_prefix: String,

    /// Filename prefix of the proxies table
    #[serde(default = "default_proxies_prefix")]
    pub proxies_prefix: String,

    /// Filename prefix of the run log
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,

    /// chrono format of the filename date stamp
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Marker identifying legacy routing addresses to drop
    #[serde(default = "default_legacy_marker")]
    pub legacy_marker: String,

    /// Match the legacy marker case-sensitively
    #[serde(default = "default_true")]
    pub marker_case_sensitive: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.working_directory.trim().is_empty() {
            return Err("export.working_directory cannot be empty".to_string());
        }

        let prefixes = [
            ("attributes_prefix", &self.attributes_prefix),
            ("proxies_prefix", &self.proxies_prefix),
            ("log_prefix", &self.log_prefix),
        ];
        for (key, prefix) in prefixes {
            if prefix.is_empty() {
                return Err(format!("export.{key} cannot be empty"));
            }
            if prefix.contains(['/', '\\']) {
                return Err(format!(
                    "export.{key} '{prefix}' must not contain path separators"
                ));
            }
        }

        if self.attributes_prefix == self.proxies_prefix {
            return Err("export.attributes_prefix and export.proxies_prefix must differ".to_string());
        }

        if self.legacy_marker.is_empty() {
            return Err("export.legacy_marker cannot be empty".to_string());
        }

        // An invalid chrono specifier surfaces as a fmt error, not a panic
        let mut stamp = String::new();
        let formatted = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .map(|sample| write!(stamp, "{}", sample.format(&self.date_format)).is_ok())
            .unwrap_or(false);
        if !formatted || stamp.is_empty() || stamp.contains(['/', '\\', '_']) {
            return Err(format!(
                "export.date_format '{}' must produce a non-empty stamp without '/', '\\' or '_'",
                self.date_format
            ));
        }

        if let Some(scope) = &self.search_scope {
            if !scope.contains('=') {
                return Err(format!(
                    "export.search_scope '{scope}' is not a distinguished path"
                ));
            }
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            working_directory: "./exports".to_string(),
            search_scope: None,
            attributes_prefix: default_attributes_prefix(),
            proxies_prefix: default_proxies_prefix(),
            log_prefix: default_log_prefix(),
            date_format: default_date_format(),
            legacy_marker: default_legacy_marker(),
            marker_case_sensitive: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_account_filter() -> String {
    "(&(objectCategory=person)(objectClass=user))".to_string()
}

fn default_scope_filter() -> String {
    "(objectCategory=organizationalUnit)".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_page_size() -> i32 {
    500
}

fn default_account_id_attribute() -> String {
    "sAMAccountName".to_string()
}

fn default_primary_email_attribute() -> String {
    "mail".to_string()
}

fn default_display_alias_attribute() -> String {
    "mailNickname".to_string()
}

fn default_routing_addresses_attribute() -> String {
    "proxyAddresses".to_string()
}

fn default_attributes_prefix() -> String {
    "ExportedAttributes".to_string()
}

fn default_proxies_prefix() -> String {
    "ExportedProxies".to_string()
}

fn default_log_prefix() -> String {
    "ExportLog".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_legacy_marker() -> String {
    "X400".to_string()
}

fn default_local_path() -> String {
    "/var/log/mailshift".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
