//! Alert engine — runs the ordered rule set over one projection pass.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use wheel_ledger_projection::{OptionPosition, ShareLot};

use crate::coverage::{covered_call_opportunities, UncoveredCalls};
use crate::earnings::EarningsProximity;
use crate::expiration::ExpirationWarning;
use crate::profit::ProfitTarget;
use crate::roll::RollOpportunity;
use crate::rule::{AlertRule, RuleContext};
use crate::types::{Alert, AlertInputs};

/// The position-level rule set, in evaluation order.
fn position_rules() -> Vec<Box<dyn AlertRule>> {
    vec![
        Box::new(ProfitTarget),
        Box::new(ExpirationWarning),
        Box::new(EarningsProximity),
        Box::new(RollOpportunity),
        Box::new(UncoveredCalls),
    ]
}

/// Run every rule against every position, plus the ticker-level coverage scan.
///
/// Tolerates empty positions, lots, marks, and earnings — the result is just
/// an empty list. Output is sorted for presentation: urgent first, then by
/// ticker, then by rule id, so re-renders are stable.
#[must_use]
pub fn generate_alerts(
    positions: &[OptionPosition],
    share_lots: &[ShareLot],
    inputs: &AlertInputs<'_>,
) -> Vec<Alert> {
    let owned_shares: BTreeMap<String, Decimal> = share_lots
        .iter()
        .map(|lot| (lot.ticker.clone(), lot.net_shares))
        .collect();

    let ctx = RuleContext {
        as_of: inputs.as_of,
        marks: inputs.marks,
        earnings: inputs.earnings,
        owned_shares: &owned_shares,
        config: inputs.config,
    };

    let rules = position_rules();
    let mut alerts = Vec::new();
    for position in positions {
        for rule in &rules {
            if let Some(alert) = rule.check(position, &ctx) {
                alerts.push(alert);
            }
        }
    }
    alerts.extend(covered_call_opportunities(
        positions,
        &owned_shares,
        inputs.config,
    ));

    alerts.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.ticker.cmp(&b.ticker))
            .then_with(|| a.id.cmp(&b.id))
    });

    debug!(count = alerts.len(), "Generated alerts");
    alerts
}
