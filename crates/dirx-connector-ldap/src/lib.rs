//! LDAP directory source.
//!
//! Queries an LDAP server and converts search entries into the sparse
//! [`dirx_export::Record`] model consumed by the export pipeline.

pub mod config;
pub mod connector;
pub mod error;

pub use config::LdapConfig;
pub use connector::LdapSource;
pub use error::{DirectoryError, DirectoryResult};
