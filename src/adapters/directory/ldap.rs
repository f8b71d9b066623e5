//! LDAP implementation of the directory service
//!
//! Talks to Active Directory (or any LDAPv3 server) through `ldap3`. Both
//! searches are paged so that directories with more entries than the server's
//! size limit are read completely.

use super::traits::DirectoryService;
use crate::config::{AttributeMapping, DirectoryConfig};
use crate::domain::{AccountRecord, DirectoryError, DistinguishedPath, Result};
use async_trait::async_trait;
use ldap3::adapters::{Adapter, EntriesOnly, PagedResults};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, Scope, SearchEntry};
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::time::Duration;

/// Requests no attributes; only the entry DN comes back
const NO_ATTRIBUTES: &str = "1.1";

// LDAP result codes with a dedicated classification
const RC_TIME_LIMIT_EXCEEDED: u32 = 3;
const RC_INVALID_CREDENTIALS: u32 = 49;
const RC_BUSY: u32 = 51;
const RC_UNAVAILABLE: u32 = 52;
const RC_UNWILLING_TO_PERFORM: u32 = 53;

/// Directory service backed by an LDAP connection
pub struct LdapDirectory {
    ldap: Ldap,
    base_dn: String,
    account_filter: String,
    scope_filter: String,
    page_size: i32,
    timeout: Duration,
}

impl LdapDirectory {
    /// Connects and binds to the directory
    ///
    /// Binds with `bind_dn`/`bind_password` when configured, anonymously
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Unavailable` if the server cannot be reached or
    /// rejects the bind.
    pub async fn connect(config: &DirectoryConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let settings = LdapConnSettings::new()
            .set_conn_timeout(timeout)
            .set_starttls(config.starttls)
            .set_no_tls_verify(!config.tls_verify);

        tracing::debug!(url = %config.url, starttls = config.starttls, "Connecting to directory");

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &config.url)
            .await
            .map_err(|e| DirectoryError::Unavailable(format!("{}: {e}", config.url)))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(error = %e, "Directory connection closed with error");
            }
        });

        if let Some(bind_dn) = &config.bind_dn {
            let password = config
                .bind_password
                .as_ref()
                .map(|p| p.expose_secret().as_ref())
                .unwrap_or_default();

            ldap.with_timeout(timeout)
                .simple_bind(bind_dn, password)
                .await
                .and_then(|res| res.success())
                .map_err(|e| match map_ldap_error(e) {
                    DirectoryError::QueryFailed(msg) => {
                        DirectoryError::Unavailable(format!("bind as {bind_dn} rejected: {msg}"))
                    }
                    other => other,
                })?;

            tracing::info!(bind_dn = %bind_dn, "Bound to directory");
        }

        Ok(Self {
            ldap,
            base_dn: config.base_dn.clone(),
            account_filter: config.account_filter.clone(),
            scope_filter: config.scope_filter.clone(),
            page_size: config.page_size,
            timeout,
        })
    }

    /// Runs a paged subtree search and collects every entry
    async fn paged_search(
        &self,
        base: &str,
        filter: &str,
        attrs: Vec<String>,
    ) -> Result<Vec<SearchEntry>> {
        let mut ldap = self.ldap.clone();
        let adapters: Vec<Box<dyn Adapter<_, _>>> = vec![
            Box::new(EntriesOnly::new()),
            Box::new(PagedResults::new(self.page_size)),
        ];

        let mut search = ldap
            .with_timeout(self.timeout)
            .streaming_search_with(adapters, base, Scope::Subtree, filter, attrs)
            .await
            .map_err(map_ldap_error)?;

        let mut entries = Vec::new();
        while let Some(entry) = search.next().await.map_err(map_ldap_error)? {
            entries.push(SearchEntry::construct(entry));
        }

        search.finish().await.success().map_err(map_ldap_error)?;
        Ok(entries)
    }
}

#[async_trait]
impl DirectoryService for LdapDirectory {
    async fn list_organizational_units(&self) -> Result<Vec<String>> {
        let entries = self
            .paged_search(
                &self.base_dn,
                &self.scope_filter,
                vec![NO_ATTRIBUTES.to_string()],
            )
            .await?;

        Ok(entries.into_iter().map(|entry| entry.dn).collect())
    }

    async fn search_accounts(
        &self,
        base: &DistinguishedPath,
        projection: &AttributeMapping,
    ) -> Result<Vec<AccountRecord>> {
        let attrs = projection
            .projection()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let entries = self
            .paged_search(base.as_str(), &self.account_filter, attrs)
            .await?;

        Ok(entries
            .iter()
            .map(|entry| record_from_attrs(&entry.attrs, projection))
            .collect())
    }

    async fn close(&self) -> Result<()> {
        let mut ldap = self.ldap.clone();
        ldap.unbind().await.map_err(map_ldap_error)?;
        Ok(())
    }
}

/// Maps one entry's attributes onto an account record
///
/// Attribute names are matched case-insensitively. Single-valued attributes
/// take their first value; missing ones become empty strings.
pub fn record_from_attrs(
    attrs: &HashMap<String, Vec<String>>,
    projection: &AttributeMapping,
) -> AccountRecord {
    let first = |name: &str| {
        attribute_values(attrs, name)
            .and_then(|values| values.first().cloned())
            .unwrap_or_default()
    };

    AccountRecord::new(
        first(&projection.account_id),
        first(&projection.primary_email),
        first(&projection.display_alias),
    )
    .with_routing_addresses(
        attribute_values(attrs, &projection.routing_addresses)
            .cloned()
            .unwrap_or_default(),
    )
}

fn attribute_values<'a>(
    attrs: &'a HashMap<String, Vec<String>>,
    name: &str,
) -> Option<&'a Vec<String>> {
    attrs.get(name).or_else(|| {
        attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values)
    })
}

fn map_ldap_error(err: LdapError) -> DirectoryError {
    match err {
        LdapError::Timeout { .. } => DirectoryError::Timeout(err.to_string()),
        LdapError::LdapResult { ref result } => match result.rc {
            RC_TIME_LIMIT_EXCEEDED => DirectoryError::Timeout(err.to_string()),
            RC_INVALID_CREDENTIALS | RC_BUSY | RC_UNAVAILABLE | RC_UNWILLING_TO_PERFORM => {
                DirectoryError::Unavailable(err.to_string())
            }
            _ => DirectoryError::QueryFailed(err.to_string()),
        },
        other => DirectoryError::Unavailable(other.to_string()),
    }
}
