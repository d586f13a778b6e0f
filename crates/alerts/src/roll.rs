//! Roll opportunity rule — when a roll beats an outright close.

use wheel_ledger_projection::OptionPosition;

use crate::profit::profit_capture_pct;
use crate::rule::{position_label, AlertRule, RuleContext};
use crate::types::{alert_id, Alert, AlertCategory, AlertPriority};

/// A short position inside the roll window with most of its premium already
/// captured is better rolled than closed: same buying power, fresh premium.
pub struct RollOpportunity;

impl AlertRule for RollOpportunity {
    fn id(&self) -> &'static str {
        "roll"
    }

    fn check(&self, position: &OptionPosition, ctx: &RuleContext<'_>) -> Option<Alert> {
        if !position.is_short() {
            return None;
        }
        let config = ctx.config;
        let dte = position.days_to_expiration;
        if dte < config.roll_min_dte || dte > config.roll_max_dte {
            return None;
        }
        let mark = ctx.mark_for(&position.id)?;
        let captured = profit_capture_pct(position.weighted_entry_price, mark);
        if captured < config.roll_capture_pct {
            return None;
        }

        Some(Alert {
            id: alert_id(self.id(), &position.id),
            ticker: position.ticker.clone(),
            category: AlertCategory::Roll,
            priority: AlertPriority::Info,
            title: "Roll candidate".to_string(),
            message: format!(
                "{} has {} day(s) left with {}% captured; roll out for fresh premium",
                position_label(position),
                dte,
                captured.round_dp(0)
            ),
            actions: vec!["Roll to next cycle".to_string()],
            dismissible: true,
        })
    }
}
