//! sbsh - an interactive shell for the Stonebranch Universal Controller API.
//!
//! Reads commands such as `health`, `agents` or `tasks` from stdin, performs
//! one HTTP GET against the Stonebranch HTTP API per command, and prints the
//! JSON it gets back.

mod client;
mod command;
mod config;
mod render;
mod shell;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{Config, Overrides};
use std::process::Command as ProcessCommand;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sbsh")]
#[command(author, version, about = "An interactive shell for the Stonebranch API")]
#[command(long_about = "An interactive shell for the Stonebranch API.\n\nType 'help' at the prompt for the list of commands, 'quit' to exit.")]
struct Cli {
    /// Override the API base URL (default: http://localhost:3001)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Request timeout in seconds (default: no timeout)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open configuration file in $EDITOR
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Config) => handle_config(),
        None => {
            let overrides = Overrides {
                base_url: cli.base_url,
                timeout_secs: cli.timeout,
            };
            run_shell(overrides).await
        }
    }
}

/// Initialize logging on stderr so it stays out of the shell transcript.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "sbsh=debug,reqwest=warn"
    } else {
        "sbsh=warn,reqwest=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the interactive shell on stdin/stdout.
async fn run_shell(overrides: Overrides) -> Result<()> {
    let config = Config::load()
        .context("Failed to load configuration")?
        .with_overrides(overrides);

    let client = client::ApiClient::new(&config.api)?;
    info!("Using Stonebranch API at {}", client.base_url());

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let output = std::io::stdout();
    shell::Shell::new(client, input, output).run().await
}

/// Handle the config command.
fn handle_config() -> Result<()> {
    let config_path = Config::config_path()?;

    // Create default config if it doesn't exist
    if !config_path.exists() {
        Config::default().save()?;
        println!("Created default config at {}", config_path.display());
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = ProcessCommand::new(&editor)
        .arg(&config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        eprintln!("Editor exited with non-zero status");
    }

    Ok(())
}
