//! Configuration loading and validation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub jupiter: JupiterApiConfig,
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Ordered list of tradable instruments, processed in this order each cycle
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: default_rpc_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JupiterApiConfig {
    #[serde(default = "default_price_api_url")]
    pub price_api_url: String,
    #[serde(default = "default_quote_api_url")]
    pub quote_api_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for JupiterApiConfig {
    fn default() -> Self {
        Self {
            price_api_url: default_price_api_url(),
            quote_api_url: default_quote_api_url(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
    /// Reference asset swaps are priced and settled against
    #[serde(default = "default_quote_mint")]
    pub quote_mint: String,
    #[serde(default = "default_quote_decimals")]
    pub quote_decimals: u8,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            slippage_bps: default_slippage_bps(),
            quote_mint: default_quote_mint(),
            quote_decimals: default_quote_decimals(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Which swap directions are attempted for a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Bull,
    Bear,
    Both,
}

/// Static parameters for one tradable token
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Display identifier
    pub name: String,
    /// On-chain mint address, unique across the token set
    pub mint_address: String,
    /// Target profit threshold, reserved for a future take-profit rule
    pub profit_pct: f64,
    /// Price ceiling; purchases are disallowed above this price
    pub stop_purchase_above: f64,
    /// Nominal trade size in the input asset's native unit
    pub avg_purchase_amount: f64,
    /// Upper bound on trades executed for this token since process start
    pub max_concurrent_trades: u32,
    pub direction: TradeDirection,
    /// Minimum elapsed minutes between trades for this token
    pub cooldown_minutes: u64,
    #[serde(default = "default_token_decimals")]
    pub decimals: u8,
}

// Default value functions
fn default_rpc_endpoint() -> String {
    std::env::var("SOLANA_RPC_URL").unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".into())
}

fn default_timeout_ms() -> u64 {
    30000
}

fn default_price_api_url() -> String {
    "https://price.jup.ag/v6".into()
}

fn default_quote_api_url() -> String {
    "https://quote-api.jup.ag/v6".into()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_slippage_bps() -> u16 {
    100
}

fn default_quote_mint() -> String {
    // USDC
    "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".into()
}

fn default_quote_decimals() -> u8 {
    6
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_token_decimals() -> u8 {
    9
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix TRADER_)
            .add_source(
                config::Environment::with_prefix("TRADER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.trading.slippage_bps > 10000 {
            anyhow::bail!("slippage_bps cannot exceed 10000 (100%)");
        }

        if self.trading.quote_mint.is_empty() {
            anyhow::bail!("quote_mint must not be empty");
        }

        if self.scheduler.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be positive");
        }

        // Duplicate mints would silently merge trade state, so reject them here
        let mut seen = HashSet::new();
        for token in &self.tokens {
            if token.mint_address.is_empty() {
                anyhow::bail!("token {} has an empty mint_address", token.name);
            }

            if !seen.insert(token.mint_address.as_str()) {
                anyhow::bail!(
                    "duplicate mint_address in token set: {}",
                    token.mint_address
                );
            }

            if token.avg_purchase_amount <= 0.0 {
                anyhow::bail!(
                    "token {}: avg_purchase_amount must be positive",
                    token.name
                );
            }
        }

        Ok(())
    }

    /// Human-readable configuration summary
    pub fn summary(&self) -> String {
        let mut out = format!(
            r#"Configuration:
  RPC:
    endpoint: {}
    timeout: {}ms
  Jupiter:
    price_api: {}
    quote_api: {}
  Trading:
    slippage: {}bps
    quote_mint: {}
  Scheduler:
    poll_interval: {}s
  Tokens ({}):
"#,
            self.rpc.endpoint,
            self.rpc.timeout_ms,
            self.jupiter.price_api_url,
            self.jupiter.quote_api_url,
            self.trading.slippage_bps,
            self.trading.quote_mint,
            self.scheduler.poll_interval_secs,
            self.tokens.len(),
        );

        for token in &self.tokens {
            out.push_str(&format!(
                "    {} ({}): direction={:?}, ceiling={}, size={}, cap={}, cooldown={}min\n",
                token.name,
                token.mint_address,
                token.direction,
                token.stop_purchase_above,
                token.avg_purchase_amount,
                token.max_concurrent_trades,
                token.cooldown_minutes,
            ));
        }

        out
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            jupiter: JupiterApiConfig::default(),
            trading: TradingConfig::default(),
            scheduler: SchedulerConfig::default(),
            tokens: vec![],
        }
    }
}
