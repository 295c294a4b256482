//! Push a local CSV file to the import API.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tracing::debug;

use dirx_push::PushClient;

use crate::error::{CliError, CliResult};
use crate::options::PushArgs;

/// Push a local CSV file to the import API.
#[derive(Args, Debug)]
pub struct PushCsvArgs {
    #[command(flatten)]
    pub push: PushArgs,

    /// Path to the CSV file to push
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Attributes the override map is allowed to touch
    #[arg(long, value_delimiter = ',')]
    pub attributes: Vec<String>,
}

/// Execute the push-csv command.
pub async fn execute(args: PushCsvArgs) -> CliResult<()> {
    debug!("Executing push-csv command");

    let data = std::fs::read_to_string(&args.file)
        .map_err(|e| CliError::Io(format!("Failed to read {}: {}", args.file.display(), e)))?;

    let client = PushClient::new(
        &args.push.site_uri,
        Duration::from_secs(args.push.timeout_secs),
    )?;
    client
        .push(&data, &args.push.to_options(args.attributes))
        .await?;

    Ok(())
}
