//! Profit target rule — surfaces short positions near max profit.

use rust_decimal::Decimal;

use wheel_ledger_projection::OptionPosition;

use crate::rule::{position_label, AlertRule, RuleContext};
use crate::types::{alert_id, Alert, AlertCategory, AlertPriority};

/// Percent of max profit captured by a short position at the current mark.
/// A zero or negative entry clamps to zero rather than dividing by it.
pub(crate) fn profit_capture_pct(entry: Decimal, mark: Decimal) -> Decimal {
    if entry <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (entry - mark).max(Decimal::ZERO) / entry * Decimal::from(100)
}

/// Mechanical profit-taking ladder for short premium.
///
/// Emits at most one alert per position: the highest threshold met wins,
/// never one alert per tier.
pub struct ProfitTarget;

impl AlertRule for ProfitTarget {
    fn id(&self) -> &'static str {
        "profit_target"
    }

    fn check(&self, position: &OptionPosition, ctx: &RuleContext<'_>) -> Option<Alert> {
        if !position.is_short() {
            return None;
        }
        let mark = ctx.mark_for(&position.id)?;
        let captured = profit_capture_pct(position.weighted_entry_price, mark);
        let config = ctx.config;

        let (priority, title, action) = if captured >= config.profit_urgent_pct {
            (
                AlertPriority::Urgent,
                "Close for max profit",
                "Buy to close now",
            )
        } else if captured >= config.profit_info_pct {
            (
                AlertPriority::Info,
                "Profit target reached",
                "Consider buying to close",
            )
        } else if captured >= config.profit_opportunity_pct {
            (
                AlertPriority::Opportunity,
                "Halfway to max profit",
                "Watch for an exit",
            )
        } else {
            return None;
        };

        Some(Alert {
            id: alert_id(self.id(), &position.id),
            ticker: position.ticker.clone(),
            category: AlertCategory::ProfitTarget,
            priority,
            title: title.to_string(),
            message: format!(
                "{} has captured {}% of max profit",
                position_label(position),
                captured.round_dp(0)
            ),
            actions: vec![action.to_string()],
            dismissible: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn capture_pct_basic() {
        assert_eq!(profit_capture_pct(dec!(2.00), dec!(0.50)), dec!(75));
        assert_eq!(profit_capture_pct(dec!(2.00), dec!(2.00)), dec!(0));
    }

    #[test]
    fn capture_pct_clamps_losing_positions_to_zero() {
        // Mark above entry means the short is under water, not negative profit.
        assert_eq!(profit_capture_pct(dec!(2.00), dec!(3.00)), dec!(0));
    }

    #[test]
    fn capture_pct_clamps_zero_entry() {
        assert_eq!(profit_capture_pct(dec!(0), dec!(1.00)), dec!(0));
    }
}
