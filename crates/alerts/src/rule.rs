//! The rule seam — one trait, one shared read-only context.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use wheel_ledger_projection::OptionPosition;

use crate::types::{Alert, AlertConfig};

/// Everything a rule may read while checking one position. Built once per
/// pass by the engine; rules never mutate it.
#[derive(Debug)]
pub struct RuleContext<'a> {
    pub as_of: NaiveDate,
    pub marks: &'a HashMap<String, Decimal>,
    pub earnings: &'a HashMap<String, NaiveDate>,
    /// Net shares owned per ticker, from the share-lot projection.
    pub owned_shares: &'a BTreeMap<String, Decimal>,
    pub config: &'a AlertConfig,
}

impl RuleContext<'_> {
    pub fn mark_for(&self, position_id: &str) -> Option<Decimal> {
        self.marks.get(position_id).copied()
    }

    pub fn owned_shares_for(&self, ticker: &str) -> Decimal {
        self.owned_shares
            .get(ticker)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// One position-level alert rule.
///
/// Rules are independent by contract: a rule reads only the position and the
/// context, so adding or removing one never changes another's output.
pub trait AlertRule {
    /// Stable identifier, used in alert ids and presentation ordering.
    fn id(&self) -> &'static str;
    fn check(&self, position: &OptionPosition, ctx: &RuleContext<'_>) -> Option<Alert>;
}

/// Short human label for a position, used in alert messages.
pub(crate) fn position_label(position: &OptionPosition) -> String {
    format!(
        "{} ${} {} exp {}",
        position.ticker, position.strike, position.option_type, position.expiration
    )
}
