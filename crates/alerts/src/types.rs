//! Alert types and rule thresholds.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Presentation priority. Declaration order is the sort order: urgent buckets
/// render first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Urgent,
    Warning,
    Info,
    Opportunity,
}

/// Which rule family produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    ProfitTarget,
    Expiration,
    Earnings,
    Roll,
    Coverage,
}

/// A single actionable alert. Regenerated on every pass; `id` is derived from
/// the (rule, source) pair so re-renders stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub ticker: String,
    pub category: AlertCategory,
    pub priority: AlertPriority,
    pub title: String,
    pub message: String,
    pub actions: Vec<String>,
    pub dismissible: bool,
}

/// Deterministic alert id from the rule and its source position/ticker.
pub(crate) fn alert_id(rule: &str, source: &str) -> String {
    format!("{rule}:{source}")
}

/// Rule thresholds. Defaults match the strategy's published ladder; hosts can
/// load overrides through their own config layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Profit capture (% of max) that warrants closing now.
    pub profit_urgent_pct: Decimal,
    /// Profit capture worth surfacing as reached.
    pub profit_info_pct: Decimal,
    /// Profit capture worth watching.
    pub profit_opportunity_pct: Decimal,
    /// DTE at or below which expiration is urgent.
    pub expiration_urgent_dte: i64,
    /// DTE at or below which expiration is a warning.
    pub expiration_warning_dte: i64,
    /// DTE at or below which expiration is informational.
    pub expiration_info_dte: i64,
    /// Days to earnings at or below which the alert is urgent.
    pub earnings_urgent_days: i64,
    pub earnings_warning_days: i64,
    pub earnings_info_days: i64,
    /// Planning horizon; beyond this, earnings are not surfaced at all.
    pub earnings_opportunity_days: i64,
    /// Inclusive DTE window in which a roll beats a close.
    pub roll_min_dte: i64,
    pub roll_max_dte: i64,
    /// Profit capture required before suggesting a roll.
    pub roll_capture_pct: Decimal,
    /// Shares per contract for the coverage rules.
    pub shares_per_contract: i64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            profit_urgent_pct: Decimal::from(90),
            profit_info_pct: Decimal::from(75),
            profit_opportunity_pct: Decimal::from(50),
            expiration_urgent_dte: 1,
            expiration_warning_dte: 3,
            expiration_info_dte: 7,
            earnings_urgent_days: 1,
            earnings_warning_days: 3,
            earnings_info_days: 7,
            earnings_opportunity_days: 14,
            roll_min_dte: 3,
            roll_max_dte: 7,
            roll_capture_pct: Decimal::from(70),
            shares_per_contract: 100,
        }
    }
}

/// Read-only market context supplied by the host for one alert pass.
#[derive(Debug, Clone)]
pub struct AlertInputs<'a> {
    pub as_of: NaiveDate,
    /// Current mark price per position id, from the quote collaborator.
    pub marks: &'a HashMap<String, Decimal>,
    /// Next earnings date per ticker, when known.
    pub earnings: &'a HashMap<String, NaiveDate>,
    pub config: &'a AlertConfig,
}
