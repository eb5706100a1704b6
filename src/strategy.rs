//! Trade eligibility and direction gating
//!
//! The predicate is pure: it reads a token's static parameters, its trade
//! state, and a freshly fetched price, and decides whether a new trade may
//! be attempted right now. All state mutation happens in the scheduler
//! after a successful swap.

use crate::config::{TokenConfig, TradeDirection};
use crate::state::TradeRecord;

/// One half of a round trip through the quote currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapLeg {
    /// Sell the token into the quote currency
    Bearish,
    /// Buy the token with the quote currency
    Bullish,
}

/// Decide whether a new trade of either direction may be attempted.
///
/// True iff the cooldown gap has strictly elapsed, the price is at or
/// below the purchase ceiling, and the recorded trade count is under the
/// token's cap. Safe to call with the default record (never traded).
pub fn should_trade(
    token: &TokenConfig,
    record: &TradeRecord,
    current_price: f64,
    now_ms: i64,
) -> bool {
    let cooldown_ms = (token.cooldown_minutes * 60 * 1000) as i64;

    now_ms - record.last_trade_ms > cooldown_ms
        && current_price <= token.stop_purchase_above
        && record.count < token.max_concurrent_trades
}

/// Swap legs to attempt for an eligible token, in attempt order.
///
/// Evaluated once per token per cycle; eligibility is not re-checked
/// between the two legs, so a `both` token can execute two swaps in the
/// same cycle.
pub fn planned_legs(direction: TradeDirection) -> &'static [SwapLeg] {
    match direction {
        TradeDirection::Bear => &[SwapLeg::Bearish],
        TradeDirection::Bull => &[SwapLeg::Bullish],
        TradeDirection::Both => &[SwapLeg::Bearish, SwapLeg::Bullish],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: i64 = 1_700_000_000_000;

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
    fn test_never_traded_token_is_eligible() {
        let token = sol_token();
        let record = TradeRecord::default();

        assert!(should_trade(&token, &record, 150.0, NOW_MS));
    }

    #[test]
    fn test_never_traded_ignores_cooldown() {
        let mut token = sol_token();
        token.cooldown_minutes = 10_000;
        let record = TradeRecord::default();

        // last_trade_ms = 0, so any realistic clock clears the cooldown gap
        assert!(should_trade(&token, &record, 150.0, NOW_MS));
    }

    #[test]
    fn test_cooldown_blocks_immediately_after_trade() {
        let token = sol_token();
        let record = TradeRecord {
            last_trade_ms: NOW_MS,
            count: 1,
        };

        assert!(!should_trade(&token, &record, 150.0, NOW_MS));
    }

    #[test]
    fn test_cooldown_boundary_is_strict() {
        let token = sol_token();
        let cooldown_ms = 15 * 60 * 1000;
        let record = TradeRecord {
            last_trade_ms: NOW_MS,
            count: 1,
        };

        // Exactly-equal-to-cooldown does not yet qualify
        assert!(!should_trade(&token, &record, 150.0, NOW_MS + cooldown_ms));
        assert!(should_trade(&token, &record, 150.0, NOW_MS + cooldown_ms + 1));
    }

    #[test]
    fn test_count_at_cap_blocks_regardless_of_price_and_cooldown() {
        let token = sol_token();
        let record = TradeRecord {
            last_trade_ms: 0,
            count: 3,
        };

        assert!(!should_trade(&token, &record, 1.0, NOW_MS));
    }

    #[test]
    fn test_price_ceiling_is_inclusive() {
        let token = sol_token();
        let record = TradeRecord::default();

        assert!(should_trade(&token, &record, 200.0, NOW_MS));
        assert!(!should_trade(&token, &record, 200.01, NOW_MS));
    }

    #[test]
    fn test_fresh_token_scenario() {
        // cooldown 15min, ceiling 200.0, cap 3, no prior state, price 150.0
        let token = sol_token();
        let record = TradeRecord::default();

        assert!(should_trade(&token, &record, 150.0, NOW_MS));
    }

    #[test]
    fn test_reevaluation_after_recorded_swap_is_blocked() {
        let token = sol_token();
        let record = TradeRecord {
            last_trade_ms: NOW_MS,
            count: 1,
        };

        // Price and count conditions still hold; cooldown has not elapsed
        assert!(!should_trade(&token, &record, 150.0, NOW_MS + 1));
    }

    #[test]
    fn test_zero_cap_blocks_all_trades() {
        let mut token = sol_token();
        token.max_concurrent_trades = 0;
        let record = TradeRecord::default();

        assert!(!should_trade(&token, &record, 150.0, NOW_MS));
    }

    #[test]
    fn test_planned_legs_per_direction() {
        assert_eq!(planned_legs(TradeDirection::Bear), &[SwapLeg::Bearish]);
        assert_eq!(planned_legs(TradeDirection::Bull), &[SwapLeg::Bullish]);
        assert_eq!(
            planned_legs(TradeDirection::Both),
            &[SwapLeg::Bearish, SwapLeg::Bullish]
        );
    }
}
