//! Swap execution against the Jupiter aggregator
//!
//! Execution is the quote -> swap -> sign -> send pipeline. Any failure at
//! any step surfaces as an error to the scheduler, which must then leave
//! the trade ledger untouched for that attempt.

use async_trait::async_trait;
use base64::Engine;
use solana_client::rpc_client::RpcClient;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::VersionedTransaction;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{TokenConfig, TradingConfig};
use crate::error::{Error, Result};
use crate::jupiter::JupiterClient;
use crate::strategy::SwapLeg;

/// Executes one swap leg, reporting the transaction signature on success
#[async_trait]
pub trait SwapExecutor: Send + Sync {
    async fn execute(&self, token: &TokenConfig, leg: SwapLeg) -> Result<String>;
}

/// Input mint, output mint, and raw amount for one swap leg.
///
/// Bearish legs sell the token, so the amount is scaled by the token's
/// decimals; bullish legs spend the quote currency, scaled by its decimals.
pub fn leg_route(token: &TokenConfig, trading: &TradingConfig, leg: SwapLeg) -> (String, String, u64) {
    match leg {
        SwapLeg::Bearish => {
            let amount = token.avg_purchase_amount * 10f64.powi(token.decimals as i32);
            (
                token.mint_address.clone(),
                trading.quote_mint.clone(),
                amount as u64,
            )
        }
        SwapLeg::Bullish => {
            let amount = token.avg_purchase_amount * 10f64.powi(trading.quote_decimals as i32);
            (
                trading.quote_mint.clone(),
                token.mint_address.clone(),
                amount as u64,
            )
        }
    }
}

/// Live executor: quotes through Jupiter, signs locally, sends via RPC
pub struct JupiterSwapExecutor {
    rpc_client: Arc<RpcClient>,
    wallet: Arc<Keypair>,
    jupiter: JupiterClient,
    trading: TradingConfig,
}

impl JupiterSwapExecutor {
    pub fn new(
        rpc_client: Arc<RpcClient>,
        wallet: Arc<Keypair>,
        jupiter: JupiterClient,
        trading: TradingConfig,
    ) -> Self {
        Self {
            rpc_client,
            wallet,
            jupiter,
            trading,
        }
    }
}

#[async_trait]
impl SwapExecutor for JupiterSwapExecutor {
    async fn execute(&self, token: &TokenConfig, leg: SwapLeg) -> Result<String> {
        let (input_mint, output_mint, amount) = leg_route(token, &self.trading, leg);

        debug!(
            "Executing {:?} swap for {}: {} {} -> {}",
            leg, token.name, amount, input_mint, output_mint
        );

        // Step 1: quote. An in-body error short-circuits before the swap call.
        let quote = self
            .jupiter
            .get_quote(&input_mint, &output_mint, amount, self.trading.slippage_bps)
            .await?;

        // Step 2: unsigned transaction from the swap endpoint
        let swap = self
            .jupiter
            .get_swap_transaction(&quote, &self.wallet.pubkey().to_string())
            .await?;

        // Step 3: deserialize, refresh blockhash, sign
        let tx_bytes = base64::engine::general_purpose::STANDARD
            .decode(&swap.swap_transaction)
            .map_err(|e| Error::TransactionBuild(e.to_string()))?;

        let transaction: VersionedTransaction = bincode::deserialize(&tx_bytes)
            .map_err(|e| Error::TransactionBuild(e.to_string()))?;

        let blockhash = self.rpc_client.get_latest_blockhash()?;

        let mut message = transaction.message;
        message.set_recent_blockhash(blockhash);
        let transaction = VersionedTransaction::try_new(message, &[self.wallet.as_ref()])
            .map_err(|e| Error::TransactionBuild(e.to_string()))?;

        // Step 4: send
        let signature = self
            .rpc_client
            .send_and_confirm_transaction(&transaction)
            .map_err(|e| Error::TransactionSend(e.to_string()))?;

        info!(
            "Trade executed for {} ({:?}): {}",
            token.name, leg, signature
        );

        Ok(signature.to_string())
    }
}

/// Dry-run executor: logs the would-be swap and reports success, so the
/// cooldown and cap bookkeeping can be exercised without touching the chain
pub struct DryRunExecutor {
    trading: TradingConfig,
    seq: AtomicU64,
}

impl DryRunExecutor {
    pub fn new(trading: TradingConfig) -> Self {
        Self {
            trading,
            seq: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl SwapExecutor for DryRunExecutor {
    async fn execute(&self, token: &TokenConfig, leg: SwapLeg) -> Result<String> {
        let (input_mint, output_mint, amount) = leg_route(token, &self.trading, leg);
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);

        info!(
            "[dry-run] {:?} swap for {}: {} {} -> {}",
            leg, token.name, amount, input_mint, output_mint
        );

        Ok(format!("dry-run-{}", seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TradeDirection;

    fn sol_token() -> TokenConfig {
        TokenConfig {
            name: "SOL".into(),
            mint_address: "So11111111111111111111111111111111111111112".into(),
            profit_pct: 2.5,
            stop_purchase_above: 200.0,
            avg_purchase_amount: 1.0,
            max_concurrent_trades: 3,
            direction: TradeDirection::Both,
            cooldown_minutes: 15,
            decimals: 9,
        }
    }

    #[test]
    fn test_bearish_leg_sells_token_for_quote() {
        let token = sol_token();
        let trading = TradingConfig::default();

        let (input, output, amount) = leg_route(&token, &trading, SwapLeg::Bearish);
        assert_eq!(input, token.mint_address);
        assert_eq!(output, trading.quote_mint);
        // 1.0 token at 9 decimals
        assert_eq!(amount, 1_000_000_000);
    }

    #[test]
    fn test_bullish_leg_buys_token_with_quote() {
        let token = sol_token();
        let trading = TradingConfig::default();

        let (input, output, amount) = leg_route(&token, &trading, SwapLeg::Bullish);
        assert_eq!(input, trading.quote_mint);
        assert_eq!(output, token.mint_address);
        // 1.0 quote unit at 6 decimals
        assert_eq!(amount, 1_000_000);
    }

    #[test]
    fn test_fractional_purchase_amount_scales() {
        let mut token = sol_token();
        token.avg_purchase_amount = 0.25;
        let trading = TradingConfig::default();

        let (_, _, amount) = leg_route(&token, &trading, SwapLeg::Bearish);
        assert_eq!(amount, 250_000_000);
    }

    #[tokio::test]
    async fn test_dry_run_executor_reports_success() {
        let executor = DryRunExecutor::new(TradingConfig::default());
        let token = sol_token();

        let sig = executor.execute(&token, SwapLeg::Bullish).await.unwrap();
        assert!(sig.starts_with("dry-run-"));
    }
}
