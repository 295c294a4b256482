//! Export directory records and push them in one run.

use std::time::Duration;

use clap::Args;
use tracing::debug;

use dirx_connector_ldap::LdapSource;
use dirx_export::encode;
use dirx_push::PushClient;

use crate::error::CliResult;
use crate::options::{LdapArgs, PushArgs};

/// Export records from an LDAP server and push them to the import API.
#[derive(Args, Debug)]
pub struct PushLdapArgs {
    #[command(flatten)]
    pub ldap: LdapArgs,

    #[command(flatten)]
    pub push: PushArgs,
}

/// Execute the push-ldap command.
pub async fn execute(args: PushLdapArgs) -> CliResult<()> {
    debug!("Executing push-ldap command");

    let source = LdapSource::new(args.ldap.to_config())?;
    let records = source.search().await?;

    let data = encode(&records, &args.ldap.attributes)?;

    let client = PushClient::new(
        &args.push.site_uri,
        Duration::from_secs(args.push.timeout_secs),
    )?;
    client
        .push(&data, &args.push.to_options(args.ldap.attributes.clone()))
        .await?;

    Ok(())
}
