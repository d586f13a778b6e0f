//! Wheel phase classification.
//!
//! A read classifier, not a stored-transition state machine: phase is
//! recomputed fresh from the current holdings shape on every pass, so there is
//! no illegal-transition error path — any shape maps to exactly one phase.

use crate::types::{TickerPhase, WheelPhase};

/// Classify one ticker's wheel phase from its current holdings shape.
///
/// Decision table, first match wins:
/// 1. A manual override always wins, returned verbatim.
/// 2. Flat (no shares, no short legs) — ready to sell a cash-secured put.
/// 3. Short puts, no shares — still collecting premium, waiting on assignment.
/// 4. Shares without short calls — ready to sell a covered call.
/// 5. Shares with short calls — covered, waiting on the call to resolve.
/// 6. Anything else — between cycles.
#[must_use]
pub fn classify_phase(
    ticker: &str,
    has_shares: bool,
    has_short_puts: bool,
    has_short_calls: bool,
    override_phase: Option<WheelPhase>,
) -> TickerPhase {
    if let Some(phase) = override_phase {
        return TickerPhase {
            ticker: ticker.to_string(),
            phase,
            is_manual_override: true,
        };
    }

    let phase = match (has_shares, has_short_puts, has_short_calls) {
        (false, false, false) => WheelPhase::SellCashSecuredPut,
        (false, true, _) => WheelPhase::SellCashSecuredPut,
        (true, _, false) => WheelPhase::SellCoveredCall,
        (true, _, true) => WheelPhase::CallExpiresWorthless,
        (false, false, true) => WheelPhase::Repeat,
    };

    TickerPhase {
        ticker: ticker.to_string(),
        phase,
        is_manual_override: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_of(has_shares: bool, has_short_puts: bool, has_short_calls: bool) -> WheelPhase {
        classify_phase("F", has_shares, has_short_puts, has_short_calls, None).phase
    }

    #[test]
    fn flat_ticker_sells_cash_secured_put() {
        assert_eq!(phase_of(false, false, false), WheelPhase::SellCashSecuredPut);
    }

    #[test]
    fn short_puts_without_shares_still_accumulating_premium() {
        assert_eq!(phase_of(false, true, false), WheelPhase::SellCashSecuredPut);
        assert_eq!(phase_of(false, true, true), WheelPhase::SellCashSecuredPut);
    }

    #[test]
    fn shares_without_calls_sells_covered_call() {
        assert_eq!(phase_of(true, false, false), WheelPhase::SellCoveredCall);
        assert_eq!(phase_of(true, true, false), WheelPhase::SellCoveredCall);
    }

    #[test]
    fn shares_with_calls_awaits_expiry() {
        assert_eq!(phase_of(true, false, true), WheelPhase::CallExpiresWorthless);
        assert_eq!(phase_of(true, true, true), WheelPhase::CallExpiresWorthless);
    }

    #[test]
    fn naked_calls_without_shares_falls_through_to_repeat() {
        assert_eq!(phase_of(false, false, true), WheelPhase::Repeat);
    }

    #[test]
    fn manual_override_wins_over_any_shape() {
        let pinned = classify_phase("F", true, true, true, Some(WheelPhase::BuyAtStrike));
        assert_eq!(pinned.phase, WheelPhase::BuyAtStrike);
        assert!(pinned.is_manual_override);

        let computed = classify_phase("F", true, true, true, None);
        assert!(!computed.is_manual_override);
    }
}
