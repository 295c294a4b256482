//! LDAP source configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};

/// Configuration for an LDAP directory source.
#[derive(Clone, Serialize, Deserialize)]
pub struct LdapConfig {
    /// Server URI (`ldap://` or `ldaps://`).
    pub uri: String,

    /// Bind DN for authentication (e.g. "cn=admin,dc=example,dc=com").
    pub bind_dn: String,

    /// Bind password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_password: Option<String>,

    /// Base DN for the search (e.g. "ou=people,dc=example,dc=com").
    pub base_dn: String,

    /// LDAP search filter.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Attributes to request; empty requests every attribute.
    #[serde(default)]
    pub attributes: Vec<String>,

    /// Binary attributes rendered as canonical UUID text.
    #[serde(default)]
    pub uuid_attributes: Vec<String>,

    /// Binary attributes rendered as base64 text.
    #[serde(default)]
    pub base64_attributes: Vec<String>,

    /// Use STARTTLS upgrade on plain LDAP connections.
    #[serde(default)]
    pub use_starttls: bool,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_filter() -> String {
    "(objectClass=*)".to_string()
}

fn default_connect_timeout() -> u64 {
    30
}

impl LdapConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> DirectoryResult<()> {
        let parsed = url::Url::parse(&self.uri).map_err(|e| DirectoryError::InvalidConfiguration {
            message: format!("invalid LDAP URI '{}': {e}", self.uri),
        })?;

        match parsed.scheme() {
            "ldap" | "ldaps" => {}
            scheme => {
                return Err(DirectoryError::InvalidConfiguration {
                    message: format!("unsupported LDAP URI scheme: {scheme}"),
                });
            }
        }

        if self.base_dn.is_empty() {
            return Err(DirectoryError::InvalidConfiguration {
                message: "base DN must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl std::fmt::Debug for LdapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapConfig")
            .field("uri", &self.uri)
            .field("bind_dn", &self.bind_dn)
            .field("bind_password", &self.bind_password.as_ref().map(|_| "[REDACTED]"))
            .field("base_dn", &self.base_dn)
            .field("filter", &self.filter)
            .field("attributes", &self.attributes)
            .field("uuid_attributes", &self.uuid_attributes)
            .field("base64_attributes", &self.base64_attributes)
            .field("use_starttls", &self.use_starttls)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}
