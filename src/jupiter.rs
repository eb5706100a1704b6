// Jupiter API client: price lookups plus the two-step quote/swap protocol
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::JupiterApiConfig;
use crate::error::{Error, Result};

/// Price API response: one entry per requested mint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceResponse {
    pub data: HashMap<String, PriceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEntry {
    pub id: String,
    pub price: f64,
}

/// Quote API response, passed back verbatim to the swap endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    #[serde(rename = "inputMint")]
    pub input_mint: String,
    #[serde(rename = "inAmount")]
    pub in_amount: String,
    #[serde(rename = "outputMint")]
    pub output_mint: String,
    #[serde(rename = "outAmount")]
    pub out_amount: String,
    #[serde(rename = "otherAmountThreshold")]
    pub other_amount_threshold: String,
    #[serde(rename = "swapMode")]
    pub swap_mode: String,
    #[serde(rename = "slippageBps")]
    pub slippage_bps: u16,
    #[serde(rename = "platformFee")]
    pub platform_fee: Option<PlatformFee>,
    #[serde(rename = "priceImpactPct")]
    pub price_impact_pct: String,
    #[serde(rename = "routePlan")]
    pub route_plan: Vec<RoutePlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformFee {
    pub amount: String,
    #[serde(rename = "feeBps")]
    pub fee_bps: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlan {
    #[serde(rename = "swapInfo")]
    pub swap_info: SwapInfo,
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapInfo {
    #[serde(rename = "ammKey")]
    pub amm_key: String,
    pub label: Option<String>,
    #[serde(rename = "inputMint")]
    pub input_mint: String,
    #[serde(rename = "outputMint")]
    pub output_mint: String,
    #[serde(rename = "inAmount")]
    pub in_amount: String,
    #[serde(rename = "outAmount")]
    pub out_amount: String,
    #[serde(rename = "feeAmount")]
    pub fee_amount: String,
    #[serde(rename = "feeMint")]
    pub fee_mint: String,
}

/// Swap API response carrying the unsigned transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapResponse {
    #[serde(rename = "swapTransaction")]
    pub swap_transaction: String,
    #[serde(rename = "lastValidBlockHeight")]
    pub last_valid_block_height: u64,
}

/// Interpret a quote response body, short-circuiting on an in-body error.
///
/// The quote endpoint can report a routing failure inside an otherwise
/// well-formed body; such a quote must never reach the swap endpoint.
pub fn quote_from_value(value: serde_json::Value) -> Result<QuoteResponse> {
    if let Some(err) = value.get("error") {
        let msg = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
        return Err(Error::QuoteRejected(msg));
    }

    Ok(serde_json::from_value(value)?)
}

pub struct JupiterClient {
    client: reqwest::Client,
    price_api_url: String,
    quote_api_url: String,
}

impl JupiterClient {
    pub fn new(config: &JupiterApiConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
                .build()
                .unwrap_or_default(),
            price_api_url: config.price_api_url.clone(),
            quote_api_url: config.quote_api_url.clone(),
        }
    }

    /// Fetch the current price for a mint.
    ///
    /// A failed fetch is an explicit error; callers skip the token for the
    /// cycle rather than falling through on a sentinel price.
    pub async fn fetch_price(&self, mint: &str) -> Result<f64> {
        let url = format!("{}/price?ids={}", self.price_api_url, mint);
        debug!("Fetching price: {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::PriceFetch {
                mint: mint.to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(Error::PriceFetch {
                mint: mint.to_string(),
                reason: format!("HTTP {}", resp.status()),
            });
        }

        let body: PriceResponse = resp.json().await.map_err(|e| Error::PriceFetch {
            mint: mint.to_string(),
            reason: e.to_string(),
        })?;

        body.data
            .get(mint)
            .map(|entry| entry.price)
            .ok_or_else(|| Error::PriceMissing(mint.to_string()))
    }

    /// Fetch a swap quote for the given route and amount
    pub async fn get_quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        slippage_bps: u16,
    ) -> Result<QuoteResponse> {
        let url = format!(
            "{}/quote?inputMint={}&outputMint={}&amount={}&slippageBps={}",
            self.quote_api_url, input_mint, output_mint, amount, slippage_bps
        );
        debug!("Fetching quote: {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::QuoteRejected(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::QuoteRejected(format!("HTTP {}: {}", status, text)));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::QuoteRejected(e.to_string()))?;

        let quote = quote_from_value(body)?;

        info!(
            "Quote: {} {} -> {} {} (impact: {}%)",
            quote.in_amount,
            &input_mint[..8.min(input_mint.len())],
            quote.out_amount,
            &output_mint[..8.min(output_mint.len())],
            quote.price_impact_pct
        );

        Ok(quote)
    }

    /// Request the unsigned swap transaction for a quote
    pub async fn get_swap_transaction(
        &self,
        quote: &QuoteResponse,
        user_public_key: &str,
    ) -> Result<SwapResponse> {
        let url = format!("{}/swap", self.quote_api_url);

        let payload = serde_json::json!({
            "quoteResponse": quote,
            "userPublicKey": user_public_key,
            "wrapAndUnwrapSol": true,
        });

        debug!("Requesting swap transaction");

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::SwapApi(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::SwapApi(format!("HTTP {}: {}", status, text)));
        }

        resp.json()
            .await
            .map_err(|e| Error::SwapApi(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

    fn sample_quote_json() -> serde_json::Value {
        serde_json::json!({
            "inputMint": SOL_MINT,
            "inAmount": "1000000000",
            "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "outAmount": "150000000",
            "otherAmountThreshold": "148500000",
            "swapMode": "ExactIn",
            "slippageBps": 100,
            "platformFee": null,
            "priceImpactPct": "0.01",
            "routePlan": [{
                "swapInfo": {
                    "ammKey": "AmmKey1111111111111111111111111111111111111",
                    "label": "Orca",
                    "inputMint": SOL_MINT,
                    "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                    "inAmount": "1000000000",
                    "outAmount": "150000000",
                    "feeAmount": "300000",
                    "feeMint": SOL_MINT
                },
                "percent": 100
            }]
        })
    }

    #[test]
    fn test_parse_price_response() {
        let json = format!(
            r#"{{"data":{{"{mint}":{{"id":"{mint}","price":152.34}}}},"timeTaken":0.002}}"#,
            mint = SOL_MINT
        );
        let parsed: PriceResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.data[SOL_MINT].price, 152.34);
    }

    #[test]
    fn test_quote_from_value_parses_valid_quote() {
        let quote = quote_from_value(sample_quote_json()).unwrap();
        assert_eq!(quote.input_mint, SOL_MINT);
        assert_eq!(quote.out_amount, "150000000");
        assert_eq!(quote.slippage_bps, 100);
        assert_eq!(quote.route_plan.len(), 1);
    }

    #[test]
    fn test_quote_error_field_short_circuits() {
        let body = serde_json::json!({
            "error": "Could not find any route"
        });
        match quote_from_value(body) {
            Err(Error::QuoteRejected(msg)) => assert_eq!(msg, "Could not find any route"),
            other => panic!("expected QuoteRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_quote_survives_serialize_round_trip() {
        // The swap payload embeds the quote verbatim, so field names must
        // round-trip in the API's camelCase form
        let quote = quote_from_value(sample_quote_json()).unwrap();
        let value = serde_json::to_value(&quote).unwrap();
        assert_eq!(value["inputMint"], SOL_MINT);
        assert_eq!(value["routePlan"][0]["swapInfo"]["label"], "Orca");
    }
}
