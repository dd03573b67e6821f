//! ChatRelay CLI — the main entry point.
//!
//! Commands:
//! - `run`    — Register every configured model and relay until Ctrl-C
//! - `check`  — Validate the configuration without connecting
//! - `init`   — Write a starter config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "chatrelay",
    about = "ChatRelay — relay IRC channel messages to a local HTTP endpoint",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.chatrelay/config.toml)
    #[arg(short, long, global = true, env = "CHATRELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect every configured model and relay messages
    Run {
        /// Override the host HTTP port postbacks are sent to
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,

        /// Abort startup if any model fails to register
        #[arg(long)]
        strict: bool,
    },

    /// Validate configuration and list models
    Check,

    /// Write a starter configuration file
    Init {
        /// Print the config instead of writing it
        #[arg(long)]
        print: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Run { port, strict } => commands::run::run(config_path, port, strict).await?,
        Commands::Check => commands::check::run(config_path).await?,
        Commands::Init { print, force } => commands::init::run(config_path, print, force).await?,
    }

    Ok(())
}
