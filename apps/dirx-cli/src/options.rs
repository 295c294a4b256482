//! Shared option groups and argument validators.

use clap::Args;
use serde_json::{Map, Value};

use dirx_connector_ldap::LdapConfig;
use dirx_push::PushOptions;

/// LDAP server and search options.
#[derive(Args, Debug, Clone)]
pub struct LdapArgs {
    /// LDAP server URI (ldap:// or ldaps://)
    #[arg(long, value_parser = parse_ldap_uri, env = "DIRX_LDAP_URL")]
    pub url: String,

    /// Bind DN used for authentication
    #[arg(long, env = "DIRX_LDAP_BIND_DN")]
    pub bind_dn: String,

    /// Bind password
    #[arg(long, env = "DIRX_LDAP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Search base DN
    #[arg(long, env = "DIRX_LDAP_BASE_DN")]
    pub base_dn: String,

    /// LDAP search filter
    #[arg(long, default_value = "(objectClass=*)")]
    pub filter: String,

    /// Attributes to export; `*` selects every observed attribute
    #[arg(long, value_delimiter = ',', default_value = "*")]
    pub attributes: Vec<String>,

    /// Binary attributes rendered as UUID text
    #[arg(long, value_delimiter = ',')]
    pub uuid_attributes: Vec<String>,

    /// Binary attributes rendered as base64 text
    #[arg(long, value_delimiter = ',')]
    pub base64_attributes: Vec<String>,

    /// Use STARTTLS on plain LDAP connections
    #[arg(long)]
    pub starttls: bool,

    /// Connection timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub connect_timeout_secs: u64,
}

impl LdapArgs {
    /// Build the directory source configuration.
    pub fn to_config(&self) -> LdapConfig {
        LdapConfig {
            uri: self.url.clone(),
            bind_dn: self.bind_dn.clone(),
            bind_password: self.password.clone(),
            base_dn: self.base_dn.clone(),
            filter: self.filter.clone(),
            attributes: self.attributes.clone(),
            uuid_attributes: self.uuid_attributes.clone(),
            base64_attributes: self.base64_attributes.clone(),
            use_starttls: self.starttls,
            connect_timeout_secs: self.connect_timeout_secs,
        }
    }
}

/// Import API options.
#[derive(Args, Debug, Clone)]
pub struct PushArgs {
    /// Import API base URI (http:// or https://)
    #[arg(long, value_parser = parse_http_uri, env = "DIRX_SITE_URI")]
    pub site_uri: String,

    /// Import API account email
    #[arg(long, env = "DIRX_SITE_EMAIL")]
    pub site_email: String,

    /// Import API account password
    #[arg(long, env = "DIRX_SITE_PASSWORD", hide_env_values = true)]
    pub site_password: String,

    /// Server-side resource the import job targets
    #[arg(long)]
    pub resource: String,

    /// Column names announced to the import job
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Attribute update mode for the import job
    #[arg(long, default_value = "merge")]
    pub attributes_update_mode: String,

    /// Unmatched-record handling for the import job
    #[arg(long, default_value = "none")]
    pub remove_unmatched_mode: String,

    /// JSON object of field overrides applied before upload
    #[arg(long = "override", value_parser = parse_json_object)]
    pub override_map: Option<Map<String, Value>>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl PushArgs {
    /// Build the push options, gating overrides on `attributes`.
    pub fn to_options(&self, attributes: Vec<String>) -> PushOptions {
        PushOptions {
            email: self.site_email.clone(),
            password: self.site_password.clone(),
            resource: self.resource.clone(),
            columns: self.columns.clone(),
            attributes_update_mode: self.attributes_update_mode.clone(),
            remove_unmatched_mode: self.remove_unmatched_mode.clone(),
            override_map: self.override_map.clone(),
            attributes,
        }
    }
}

/// Validate an http/https URI argument.
fn parse_http_uri(value: &str) -> Result<String, String> {
    parse_uri(value, &["http", "https"])
}

/// Validate an ldap/ldaps URI argument.
fn parse_ldap_uri(value: &str) -> Result<String, String> {
    parse_uri(value, &["ldap", "ldaps"])
}

fn parse_uri(value: &str, schemes: &[&str]) -> Result<String, String> {
    let parsed = url::Url::parse(value).map_err(|e| format!("invalid URI: {e}"))?;
    if !schemes.contains(&parsed.scheme()) {
        return Err(format!(
            "URI scheme must be one of: {}",
            schemes.join(", ")
        ));
    }
    Ok(value.to_string())
}

/// Parse a JSON object argument.
fn parse_json_object(value: &str) -> Result<Map<String, Value>, String> {
    let parsed: Value =
        serde_json::from_str(value).map_err(|e| format!("invalid JSON: {e}"))?;
    match parsed {
        Value::Object(map) => Ok(map),
        _ => Err("expected a JSON object".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_uris_are_accepted() {
        assert!(parse_http_uri("https://acme.example.com").is_ok());
        assert!(parse_http_uri("http://localhost:8080").is_ok());
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        assert!(parse_http_uri("ldap://dc.acme.com").is_err());
        assert!(parse_http_uri("not a uri").is_err());
    }

    #[test]
    fn ldap_uris_are_accepted() {
        assert!(parse_ldap_uri("ldap://dc.acme.com").is_ok());
        assert!(parse_ldap_uri("ldaps://dc.acme.com:636").is_ok());
        assert!(parse_ldap_uri("https://dc.acme.com").is_err());
    }

    #[test]
    fn override_option_must_be_a_json_object() {
        let map = parse_json_object(r#"{"c": 3, "d": "asd"}"#).unwrap();
        assert_eq!(map.len(), 2);

        assert!(parse_json_object("[1, 2]").is_err());
        assert!(parse_json_object("not json").is_err());
    }
}
