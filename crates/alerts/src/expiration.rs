//! Expiration warning rule — DTE ladder.

use wheel_ledger_projection::OptionPosition;

use crate::rule::{position_label, AlertRule, RuleContext};
use crate::types::{alert_id, Alert, AlertCategory, AlertPriority};

/// Flags positions approaching expiration. Inside one day the alert is urgent
/// and cannot be dismissed; an expired-but-still-open position lands there too.
pub struct ExpirationWarning;

impl AlertRule for ExpirationWarning {
    fn id(&self) -> &'static str {
        "expiration"
    }

    fn check(&self, position: &OptionPosition, ctx: &RuleContext<'_>) -> Option<Alert> {
        let dte = position.days_to_expiration;
        let config = ctx.config;

        let (priority, title, dismissible) = if dte <= config.expiration_urgent_dte {
            (AlertPriority::Urgent, "Expires imminently", false)
        } else if dte <= config.expiration_warning_dte {
            (AlertPriority::Warning, "Expires this week", true)
        } else if dte <= config.expiration_info_dte {
            (AlertPriority::Info, "Expiration approaching", true)
        } else {
            return None;
        };

        Some(Alert {
            id: alert_id(self.id(), &position.id),
            ticker: position.ticker.clone(),
            category: AlertCategory::Expiration,
            priority,
            title: title.to_string(),
            message: format!("{} expires in {} day(s)", position_label(position), dte),
            actions: vec![
                "Buy to close".to_string(),
                "Roll to a later expiration".to_string(),
            ],
            dismissible,
        })
    }
}
