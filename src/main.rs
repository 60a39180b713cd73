mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod report;
mod services;
mod store;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::export::{self as export_cmd, ExportArgs};
use crate::cmd::ticket::{
    self as ticket_cmd, AddArgs, DeleteArgs, DeleteOutcome, ListArgs, UpdateArgs,
};
use crate::config::{AppConfig, LogoSource};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::infra::asset::{BundledLogo, FileAsset, HttpAsset};
use crate::infra::clock::SystemClock;
use crate::infra::file_storage::FileBlobStorage;
use crate::services::AssetSource;

#[derive(Parser)]
#[command(
    name = "turnolink",
    author,
    version,
    about = "Support-ticket tracker with shift handoff reports"
)]
struct Cli {
    /// Diagnostic log format (filter with RUST_LOG).
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new ticket.
    Add(AddArgs),
    /// List tickets grouped by priority, newest first.
    List(ListArgs),
    /// Change fields of an existing ticket.
    Update(UpdateArgs),
    /// Delete a ticket.
    Delete(DeleteArgs),
    /// Export every ticket into a self-contained HTML handoff report.
    Export(ExportArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command)?,
        Commands::Add(args) => {
            let ticket = ticket_cmd::run_add(&build_context()?, args)?;
            println!("Ticket {} created for {}.", ticket.id, ticket.cliente);
        }
        Commands::List(args) => ticket_cmd::run_list(&build_context()?, args)?,
        Commands::Update(args) => {
            let id = args.id.clone();
            if ticket_cmd::run_update(&build_context()?, args)? {
                println!("Ticket {id} updated.");
            } else {
                println!("No ticket with id {id}; nothing changed.");
            }
        }
        Commands::Delete(args) => {
            let id = args.id.clone();
            match ticket_cmd::run_delete(&build_context()?, args)? {
                DeleteOutcome::Deleted => println!("Ticket {id} deleted."),
                DeleteOutcome::NotFound => println!("No ticket with id {id}; nothing deleted."),
                DeleteOutcome::Cancelled => println!("Delete cancelled."),
            }
        }
        Commands::Export(args) => {
            let path = export_cmd::run(&build_context()?, args).await?;
            println!("Report saved: {}", path.display());
        }
    }

    Ok(())
}

fn build_context() -> AppResult<AppContext> {
    let cwd = std::env::current_dir()?;
    let config = AppConfig::load(&cwd)?;

    let logo: Arc<dyn AssetSource> = match &config.logo {
        LogoSource::Bundled => Arc::new(BundledLogo),
        LogoSource::File(path) => Arc::new(FileAsset::new(path.clone())),
        LogoSource::Url(url) => Arc::new(HttpAsset::new(url.clone())),
    };
    let storage = Arc::new(FileBlobStorage::new(config.storage_dir.clone()));
    tracing::debug!(storage = %storage.root().display(), logo = ?config.logo, "context ready");

    Ok(AppContext::new(config, storage, logo, Arc::new(SystemClock)))
}

fn init_tracing(log_format: LogFormat) -> AppResult<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber.try_init(),
        LogFormat::Json => subscriber.json().try_init(),
    }
    .map_err(|err| AppError::Configuration(format!("failed to init tracing: {err}")))
}
