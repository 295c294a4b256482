//! LDAP directory source implementation.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ldap3::{LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use tracing::{debug, warn};
use uuid::Uuid;

use dirx_export::{FieldValue, Record};

use crate::config::LdapConfig;
use crate::error::{DirectoryError, DirectoryResult};

/// LDAP directory source producing export records.
pub struct LdapSource {
    config: LdapConfig,
}

impl LdapSource {
    /// Create a new source with the given configuration.
    pub fn new(config: LdapConfig) -> DirectoryResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Search the configured subtree and convert every entry to a record.
    pub async fn search(&self) -> DirectoryResult<Vec<Record>> {
        let settings = LdapConnSettings::new()
            .set_conn_timeout(Duration::from_secs(self.config.connect_timeout_secs))
            .set_starttls(self.config.use_starttls);

        debug!(uri = %self.config.uri, "Connecting to LDAP server");

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.config.uri)
            .await
            .map_err(|e| {
                DirectoryError::connection_failed_with_source(
                    format!("failed to connect to LDAP server at {}", self.config.uri),
                    e,
                )
            })?;

        // Drive the connection until the search completes.
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        debug!(bind_dn = %self.config.bind_dn, "Performing LDAP bind");

        ldap.simple_bind(
            &self.config.bind_dn,
            self.config.bind_password.as_deref().unwrap_or(""),
        )
        .await
        .map_err(|e| DirectoryError::connection_failed_with_source("LDAP bind failed", e))?
        .success()
        .map_err(|_| DirectoryError::AuthenticationFailed)?;

        let attributes = if self.config.attributes.is_empty() {
            vec!["*".to_string()]
        } else {
            self.config.attributes.clone()
        };

        debug!(
            base_dn = %self.config.base_dn,
            filter = %self.config.filter,
            "Searching directory"
        );

        let (entries, _result) = ldap
            .search(
                &self.config.base_dn,
                Scope::Subtree,
                &self.config.filter,
                attributes,
            )
            .await
            .map_err(|e| DirectoryError::search_failed_with_source("LDAP search failed", e))?
            .success()
            .map_err(|e| DirectoryError::search_failed_with_source("LDAP search failed", e))?;

        let records: Vec<Record> = entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(|entry| self.entry_to_record(entry))
            .collect();

        let _ = ldap.unbind().await;

        debug!(records = records.len(), "Directory search finished");

        Ok(records)
    }

    /// Convert a search entry into a record.
    ///
    /// Fields are inserted in configured attribute-list order, with any
    /// remaining attributes following in name order, so repeated exports of
    /// the same data are byte-identical.
    fn entry_to_record(&self, entry: SearchEntry) -> Record {
        let mut record = Record::new().with("dn", entry.dn.clone());

        let mut names: Vec<String> = Vec::new();
        for name in &self.config.attributes {
            if name != "*" && !names.contains(name) {
                names.push(name.clone());
            }
        }
        let mut remaining: Vec<String> = entry
            .attrs
            .keys()
            .chain(entry.bin_attrs.keys())
            .filter(|&name| !names.contains(name) && name != "dn")
            .cloned()
            .collect();
        remaining.sort();
        remaining.dedup();
        names.extend(remaining);

        for name in names {
            if let Some(values) = entry.attrs.get(&name) {
                record.set(name.clone(), text_value(values));
            } else if let Some(values) = entry.bin_attrs.get(&name) {
                record.set(name.clone(), self.binary_value(&name, values));
            }
        }

        record
    }

    /// Render binary attribute values as text.
    fn binary_value(&self, name: &str, values: &[Vec<u8>]) -> FieldValue {
        let rendered: Vec<FieldValue> = values
            .iter()
            .map(|bytes| FieldValue::String(self.render_binary(name, bytes)))
            .collect();

        match rendered.len() {
            1 => rendered.into_iter().next().unwrap_or(FieldValue::Null),
            _ => FieldValue::Array(rendered),
        }
    }

    fn render_binary(&self, name: &str, bytes: &[u8]) -> String {
        let is_listed = |list: &[String]| list.iter().any(|a| a.eq_ignore_ascii_case(name));

        if is_listed(&self.config.uuid_attributes) {
            // Active Directory GUIDs use mixed little-endian byte order.
            if let Ok(raw) = <[u8; 16]>::try_from(bytes) {
                return Uuid::from_bytes_le(raw).to_string();
            }
        }

        BASE64.encode(bytes)
    }
}

/// Convert a text attribute's values into a field value.
fn text_value(values: &[String]) -> FieldValue {
    match values.len() {
        0 => FieldValue::Null,
        1 => FieldValue::String(values[0].clone()),
        _ => FieldValue::Array(
            values
                .iter()
                .map(|v| FieldValue::String(v.clone()))
                .collect(),
        ),
    }
}
