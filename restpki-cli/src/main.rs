//! restpki: command-line driver for REST PKI signature workflows
//!
//! Replays the REST PKI sample pages from a terminal:
//! - PAdES, CAdES and XML signatures (Web PKI or client-side)
//! - Opening and validating signed files
//! - Certificate authentication
//! - Visual positioning presets

mod commands;
mod config;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use restpki_client::RestPkiClient;
use tracing::{debug, info};

use commands::Commands;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "restpki")]
#[command(about = "Command-line driver for REST PKI signature workflows")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "restpki.toml")]
    config: String,

    /// REST PKI endpoint (overrides config file)
    #[arg(long, env = "RESTPKI_ENDPOINT")]
    endpoint: Option<String>,

    /// API access token (overrides config file)
    #[arg(long, env = "RESTPKI_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Directory for signed files (overrides config file)
    #[arg(short, long, env = "RESTPKI_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("restpki=info".parse()?)
                .add_directive("restpki_client=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    debug!("Config file: {}", cli.config);

    let mut config = CliConfig::load(&cli.config)?;
    config.apply_overrides(cli.endpoint, cli.access_token, cli.data_dir);
    info!(endpoint = %config.restpki.endpoint_url, "Using REST PKI");

    let client = RestPkiClient::new(config.restpki.clone())
        .context("invalid REST PKI configuration")?;

    let output = commands::execute(&client, &config, cli.command).await?;
    println!("{}", output);
    Ok(())
}
