//! CLI command implementations

use anyhow::Result;
use solana_sdk::signature::Signer;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::executor::{DryRunExecutor, JupiterSwapExecutor, SwapExecutor};
use crate::jupiter::JupiterClient;
use crate::scheduler::Scheduler;
use crate::wallet;

/// Start the trading loop
pub async fn start(config: &Config, dry_run: bool) -> Result<()> {
    if dry_run {
        warn!("Running in DRY-RUN mode - no real trades will be executed");
    }

    info!("Starting trading bot...");
    info!(
        "Slippage: {}bps, poll interval: {}s",
        config.trading.slippage_bps, config.scheduler.poll_interval_secs
    );

    if config.tokens.is_empty() {
        warn!("No tokens configured - the loop will idle");
    }

    let keypair = Arc::new(wallet::load_keypair()?);
    info!("Loaded wallet: {}", keypair.pubkey());

    let rpc_client = Arc::new(solana_client::rpc_client::RpcClient::new_with_timeout(
        config.rpc.endpoint.clone(),
        std::time::Duration::from_millis(config.rpc.timeout_ms),
    ));

    let executor: Box<dyn SwapExecutor> = if dry_run {
        Box::new(DryRunExecutor::new(config.trading.clone()))
    } else {
        Box::new(JupiterSwapExecutor::new(
            rpc_client,
            keypair,
            JupiterClient::new(&config.jupiter),
            config.trading.clone(),
        ))
    };

    let mut scheduler = Scheduler::new(
        config.clone(),
        JupiterClient::new(&config.jupiter),
        executor,
    );

    scheduler.run().await?;
    Ok(())
}

/// Show the resolved configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.summary());
    Ok(())
}

/// One-shot connectivity check: RPC plus a price fetch
pub async fn health(config: &Config) -> Result<()> {
    info!("Checking RPC at {}...", config.rpc.endpoint);
    let rpc_client = solana_client::rpc_client::RpcClient::new_with_timeout(
        config.rpc.endpoint.clone(),
        std::time::Duration::from_millis(config.rpc.timeout_ms),
    );
    let blockhash = rpc_client.get_latest_blockhash()?;
    info!("RPC OK (blockhash {})", blockhash);

    match config.tokens.first() {
        Some(token) => {
            info!("Fetching price for {}...", token.name);
            let jupiter = JupiterClient::new(&config.jupiter);
            let price = jupiter.fetch_price(&token.mint_address).await?;
            info!("Price OK: {} = {}", token.name, price);
        }
        None => warn!("No tokens configured, skipping price check"),
    }

    info!("Health check passed");
    Ok(())
}
