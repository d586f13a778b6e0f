//! Coverage rules — uncovered short calls and idle covered-call capacity.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use wheel_ledger_projection::OptionPosition;

use crate::rule::{position_label, AlertRule, RuleContext};
use crate::types::{alert_id, Alert, AlertCategory, AlertConfig, AlertPriority};

/// Short calls not backed by enough shares carry unlimited upside risk.
/// Position-level: each naked call is reported with its uncovered share count.
///
/// Coverage is judged per position against the ticker's total share count, so
/// two short-call keys on one ticker can each count the same shares as cover;
/// [`covered_call_opportunities`] is the only aggregate view of commitment.
pub struct UncoveredCalls;

impl AlertRule for UncoveredCalls {
    fn id(&self) -> &'static str {
        "uncovered_calls"
    }

    fn check(&self, position: &OptionPosition, ctx: &RuleContext<'_>) -> Option<Alert> {
        if !position.is_short_call() {
            return None;
        }
        let needed =
            Decimal::from(position.net_contracts * ctx.config.shares_per_contract);
        let owned = ctx.owned_shares_for(&position.ticker);
        let uncovered = needed - owned;
        if uncovered <= Decimal::ZERO {
            return None;
        }

        Some(Alert {
            id: alert_id(self.id(), &position.id),
            ticker: position.ticker.clone(),
            category: AlertCategory::Coverage,
            priority: AlertPriority::Warning,
            title: "Uncovered short calls".to_string(),
            message: format!(
                "{} needs {} share(s) of cover; only {} owned ({} short)",
                position_label(position),
                needed,
                owned,
                uncovered
            ),
            actions: vec![
                "Buy shares to cover".to_string(),
                "Buy to close the calls".to_string(),
            ],
            dismissible: true,
        })
    }
}

/// Ticker-level scan: shares not already committed to short calls are idle
/// premium capacity. One alert per ticker with at least one contract's worth.
pub fn covered_call_opportunities(
    positions: &[OptionPosition],
    owned_shares: &BTreeMap<String, Decimal>,
    config: &AlertConfig,
) -> Vec<Alert> {
    let mut covered: BTreeMap<&str, i64> = BTreeMap::new();
    for position in positions.iter().filter(|p| p.is_short_call()) {
        *covered.entry(position.ticker.as_str()).or_default() +=
            position.net_contracts * config.shares_per_contract;
    }

    let per_contract = Decimal::from(config.shares_per_contract);
    let mut alerts = Vec::new();
    for (ticker, owned) in owned_shares {
        let committed = Decimal::from(covered.get(ticker.as_str()).copied().unwrap_or(0));
        let idle = *owned - committed;
        if idle < per_contract {
            continue;
        }
        let sellable = (idle / per_contract).floor().to_i64().unwrap_or(0);
        alerts.push(Alert {
            id: alert_id("covered_call_opportunity", ticker),
            ticker: ticker.clone(),
            category: AlertCategory::Coverage,
            priority: AlertPriority::Opportunity,
            title: "Covered-call capacity".to_string(),
            message: format!(
                "{idle} uncovered share(s) of {ticker}; could sell {sellable} covered call(s)"
            ),
            actions: vec![format!("Sell {sellable} covered call(s)")],
            dismissible: true,
        });
    }
    alerts
}
