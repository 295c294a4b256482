//! Export directory records to a local CSV or JSON file.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use tracing::debug;

use dirx_connector_ldap::LdapSource;
use dirx_export::encode;

use crate::error::CliResult;
use crate::options::LdapArgs;
use crate::output;

/// Output data format.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Export directory records to a local file.
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub ldap: LdapArgs,

    /// Output data format
    #[arg(long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Write data to <FILE>
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: PathBuf,
}

/// Execute the export command.
pub async fn execute(args: ExportArgs) -> CliResult<()> {
    let source = LdapSource::new(args.ldap.to_config())?;
    let records = source.search().await?;

    let content = match args.format {
        ExportFormat::Csv => encode(&records, &args.ldap.attributes)?,
        ExportFormat::Json => {
            debug!("Converting data to JSON");
            serde_json::to_string(&records)?
        }
    };

    output::write_file(&args.output, &content)?;
    println!(
        "Exported {} records to {}",
        records.len(),
        args.output.display()
    );

    Ok(())
}
