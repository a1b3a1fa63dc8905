//! Docreg CLI — configuration bootstrap and offline replay of registry
//! operations.
//!
//! Subcommands: init, replay, hash.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::DocregConfig;

/// Docreg — permissioned student document registry.
#[derive(Parser, Debug)]
#[command(name = "docreg", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "docreg.toml")]
    config: PathBuf,

    /// Override the configured log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Override the configured registry owner.
    #[arg(long, global = true)]
    owner: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Execute a JSON script of registry operations against a fresh registry.
    Replay(commands::replay::ReplayArgs),
    /// Print the BLAKE3 content hash of a file.
    Hash(commands::hash::HashArgs),
}

fn init_tracing(config: &DocregConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json_logs() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `init` replaces the file, so an unreadable one must not block it.
    let mut config = match cli.command {
        Commands::Init(_) => DocregConfig::default(),
        _ => DocregConfig::load(&cli.config)?,
    };
    config.apply_overrides(cli.log_level, cli.owner);
    init_tracing(&config);

    match &cli.command {
        Commands::Init(args) => {
            commands::init::run(args, &cli.config, config.registry.owner.clone())
        }
        Commands::Replay(args) => commands::replay::run(args, &config),
        Commands::Hash(args) => commands::hash::run(args),
    }
}
