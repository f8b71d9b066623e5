//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "mailshift.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your directory settings", self.output);
                println!("  2. Set MAILSHIFT_BIND_PASSWORD in the environment or a .env file");
                println!("  3. Validate configuration: mailshift validate-config");
                println!("  4. List scopes: mailshift scopes");
                println!("  5. Run export: mailshift export --scope <DN>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Sample configuration
    fn sample_config() -> &'static str {
        r#"# Mailshift Configuration File
# Directory mailbox routing export

# development | production (production requires tls_verify)
environment = "development"

[application]
log_level = "info"
# get (export) | put (re-import, not implemented)
operation_mode = "get"

[directory]
url = "ldap://dc01.example.com:389"
bind_dn = "CN=svc-mailshift,OU=Service Accounts,DC=example,DC=com"
bind_password = "${MAILSHIFT_BIND_PASSWORD}"
base_dn = "DC=example,DC=com"
account_filter = "(&(objectCategory=person)(objectClass=user))"
scope_filter = "(objectCategory=organizationalUnit)"
timeout_seconds = 120
page_size = 500
starttls = true
tls_verify = true

[directory.attributes]
account_id = "sAMAccountName"
primary_email = "mail"
display_alias = "mailNickname"
routing_addresses = "proxyAddresses"

[export]
working_directory = "./exports"
# Prompted for when absent or not found
# search_scope = "OU=Staff,DC=example,DC=com"
attributes_prefix = "ExportedAttributes"
proxies_prefix = "ExportedProxies"
log_prefix = "ExportLog"
date_format = "%Y-%m-%d"
legacy_marker = "X400"
marker_case_sensitive = true

[logging]
local_enabled = false
local_path = "/var/log/mailshift"
# daily | hourly | never
local_rotation = "daily"
"#
    }
}
