//! Earnings proximity rule.

use wheel_ledger_projection::OptionPosition;

use crate::rule::{position_label, AlertRule, RuleContext};
use crate::types::{alert_id, Alert, AlertCategory, AlertPriority};

/// Flags positions on tickers with an earnings report inside the planning
/// horizon. No known date, a past date, or anything beyond the horizon
/// produces nothing.
pub struct EarningsProximity;

impl AlertRule for EarningsProximity {
    fn id(&self) -> &'static str {
        "earnings"
    }

    fn check(&self, position: &OptionPosition, ctx: &RuleContext<'_>) -> Option<Alert> {
        let date = *ctx.earnings.get(&position.ticker)?;
        let days = (date - ctx.as_of).num_days();
        if days < 0 {
            return None;
        }
        let config = ctx.config;

        let (priority, title, dismissible) = if days <= config.earnings_urgent_days {
            (AlertPriority::Urgent, "Earnings imminent", false)
        } else if days <= config.earnings_warning_days {
            (AlertPriority::Warning, "Earnings this week", true)
        } else if days <= config.earnings_info_days {
            (AlertPriority::Info, "Earnings approaching", true)
        } else if days <= config.earnings_opportunity_days {
            (AlertPriority::Opportunity, "Earnings on the horizon", true)
        } else {
            return None;
        };

        Some(Alert {
            id: alert_id(self.id(), &position.id),
            ticker: position.ticker.clone(),
            category: AlertCategory::Earnings,
            priority,
            title: title.to_string(),
            message: format!(
                "{} reports earnings in {} day(s) ({}); {} is exposed",
                position.ticker,
                days,
                date,
                position_label(position)
            ),
            actions: vec![
                "Close before the report".to_string(),
                "Size for the move".to_string(),
            ],
            dismissible,
        })
    }
}
