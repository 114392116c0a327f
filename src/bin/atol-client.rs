use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use atol_client::config::proc_loader::file_to_config;
use atol_client::document::input::DocumentInput;
use atol_client::observability::metrics::metrics_text;
use atol_client::utils::logging::{self, LogLevel};
use atol_client::{AtolClient, Operation};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "atol-client.yaml")]
    config: PathBuf,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// print prometheus metrics to stderr before exiting
    #[arg(long)]
    dump_metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a valid token for the configured login
    Token {
        /// drop the cached token first
        #[arg(long)]
        refresh: bool,
    },
    /// Register a document described in a YAML or JSON file
    Send {
        #[arg(short, long)]
        operation: Operation,
        #[arg(short, long)]
        document: PathBuf,
    },
    /// Fetch the processing report of a submitted document
    Report { uuid: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Load YAML config, start logging
    // -------------------------------

    let service_config = file_to_config(&args.config).await?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Create client
    // -------------------------------

    let client = AtolClient::with_defaults(
        service_config.client.clone(),
        service_config.settings.http.timeout_ms,
    )?;
    info!("client ready for group '{}'", client.config().group_code);

    // -------------------------------
    // 3. Run command
    // -------------------------------

    match args.command {
        Command::Token { refresh } => {
            if refresh {
                client.invalidate_token().await;
            }
            println!("{}", client.token().await?);
        }
        Command::Send { operation, document } => {
            let input = read_document(&document).await?;
            let document = input
                .into_document(operation, Local::now().naive_local())
                .context("invalid document")?;
            let uuid = client.send(document.as_ref()).await?;
            println!("{}", uuid);
        }
        Command::Report { uuid } => {
            let report = client.report(&uuid).await?;
            println!("{:#?}", report);
        }
    }

    if args.dump_metrics {
        eprintln!("{}", metrics_text().await);
    }
    Ok(())
}

async fn read_document(path: &Path) -> Result<DocumentInput> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read document {}", path.display()))?;
    // YAML is a superset of JSON
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse document {}", path.display()))
}
