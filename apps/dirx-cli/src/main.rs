//! dirx - Export directory records and push them to an import service.
//!
//! This CLI enables operators to:
//! - Export records from an LDAP server to a local CSV or JSON file
//! - Push a local CSV file to the remote import API
//! - Export and push in one run

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod logging;
mod options;
mod output;

use error::CliResult;

/// dirx - directory export and push
#[derive(Parser)]
#[command(name = "dirx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export data from an LDAP server to a local CSV or JSON file
    Export(commands::export::ExportArgs),

    /// Push a local CSV file to the import API
    PushCsv(commands::push_csv::PushCsvArgs),

    /// Export data from an LDAP server and push it to the import API
    PushLdap(commands::push_ldap::PushLdapArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Export(args) => commands::export::execute(args).await,
        Commands::PushCsv(args) => commands::push_csv::execute(args).await,
        Commands::PushLdap(args) => commands::push_ldap::execute(args).await,
    }
}
