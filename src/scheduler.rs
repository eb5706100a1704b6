//! The polling loop
//!
//! Every tick, each configured token is processed in configuration order:
//! fetch price, evaluate eligibility, and conditionally execute the planned
//! swap legs. A failure while processing one token is logged and never
//! aborts the loop or skips the remaining tokens in that cycle.

use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::{Config, TokenConfig};
use crate::error::Result;
use crate::executor::SwapExecutor;
use crate::jupiter::JupiterClient;
use crate::state::TradeLedger;
use crate::strategy::{planned_legs, should_trade};

pub struct Scheduler {
    config: Config,
    jupiter: JupiterClient,
    executor: Box<dyn SwapExecutor>,
    ledger: TradeLedger,
}

impl Scheduler {
    pub fn new(config: Config, jupiter: JupiterClient, executor: Box<dyn SwapExecutor>) -> Self {
        Self {
            config,
            jupiter,
            executor,
            ledger: TradeLedger::new(),
        }
    }

    /// Run cycles on a fixed interval until process termination
    pub async fn run(&mut self) -> Result<()> {
        let poll_interval = Duration::from_secs(self.config.scheduler.poll_interval_secs);
        let mut interval = tokio::time::interval(poll_interval);

        info!(
            "Monitoring {} tokens every {}s",
            self.config.tokens.len(),
            self.config.scheduler.poll_interval_secs
        );

        loop {
            interval.tick().await;
            self.run_cycle().await;
        }
    }

    /// Process every configured token once, in configuration order
    pub async fn run_cycle(&mut self) {
        for i in 0..self.config.tokens.len() {
            let token = self.config.tokens[i].clone();
            if let Err(e) = self.process_token(&token).await {
                warn!("Error processing {}: {}", token.name, e);
            }
        }
    }

    /// Price fetch -> eligibility -> direction gating -> execution.
    ///
    /// A price-fetch failure skips the token for this cycle rather than
    /// letting a sentinel price pass the ceiling check.
    async fn process_token(&mut self, token: &TokenConfig) -> Result<()> {
        let price = self.jupiter.fetch_price(&token.mint_address).await?;
        let record = self.ledger.get(&token.mint_address);
        let now_ms = chrono::Utc::now().timestamp_millis();

        if !should_trade(token, &record, price, now_ms) {
            debug!(
                "{} not eligible at price {} (count {}, last trade {}ms ago)",
                token.name,
                price,
                record.count,
                now_ms - record.last_trade_ms
            );
            return Ok(());
        }

        info!("{} eligible at price {}", token.name, price);
        execute_legs(token, self.executor.as_ref(), &mut self.ledger).await;

        Ok(())
    }
}

/// Attempt every planned leg for an eligible token.
///
/// Legs are independent: a failed leg is logged and the next one is still
/// attempted. The ledger is updated only after a successful submission.
pub async fn execute_legs(
    token: &TokenConfig,
    executor: &dyn SwapExecutor,
    ledger: &mut TradeLedger,
) {
    for leg in planned_legs(token.direction) {
        match executor.execute(token, *leg).await {
            Ok(signature) => {
                let now_ms = chrono::Utc::now().timestamp_millis();
                ledger.record(&token.mint_address, now_ms);
                info!("{} {:?} swap submitted: {}", token.name, leg, signature);
            }
            Err(e) => {
                error!("{} {:?} swap failed: {}", token.name, leg, e);
            }
        }
    }
}
