//! Jupiter Trading Bot - periodic price polling and swap submission
//!
//! # WARNING
//! - This bot trades with real money. Only use funds you can afford to lose.
//! - A submitted swap that fails on-chain is not distinguished from a
//!   successful one in the bot's bookkeeping.

use anyhow::Result;
use clap::{Parser, Subcommand};
use solana_sdk::signer::Signer;
use tracing::{error, info};

// Use the library crate
use jupiter_trader::cli::commands;
use jupiter_trader::config::Config;
use jupiter_trader::wallet;

/// Jupiter Trading Bot - periodic swap bot with cooldown gating
#[derive(Parser)]
#[command(name = "trader")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the trading loop
    Start {
        /// Run in dry-run mode (no real trades)
        #[arg(long)]
        dry_run: bool,
    },

    /// Show current configuration
    Config,

    /// Check system health (RPC, price API)
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jupiter_trader=info".parse().unwrap()),
        )
        .with_target(true)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Perform startup checks
    if let Err(e) = startup_checks() {
        error!("Startup checks failed: {}", e);
        std::process::exit(1);
    }

    // Execute command
    let result = match cli.command {
        Commands::Start { dry_run } => commands::start(&config, dry_run).await,
        Commands::Config => commands::show_config(&config),
        Commands::Health => commands::health(&config).await,
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Perform startup safety checks
fn startup_checks() -> Result<()> {
    info!("Performing startup checks...");

    // The signing key must decode to exactly 64 bytes before anything runs
    let keypair = wallet::load_keypair()?;
    info!("Signing key OK ({})", keypair.pubkey());

    info!("Startup checks passed");
    Ok(())
}
