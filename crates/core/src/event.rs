//! Canonical journal event.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shares controlled by one standard equity option contract.
pub const SHARES_PER_CONTRACT: i64 = 100;

/// What a journal entry records.
///
/// `RollPut`/`RollCall` only appear in legacy trade-shaped sources; they open a
/// new short leg at the rolled strike. Unknown kind strings are dropped at
/// normalization so future kinds never break replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SellPut,
    SellCall,
    RollPut,
    RollCall,
    BuyClose,
    PutAssigned,
    CallAssigned,
    Dividend,
    Fee,
    Expiration,
}

impl EventKind {
    /// Parse a raw kind string, accepting the legacy aliases seen in
    /// trade-shaped sources (`assignment_shares`, `share_sale`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "sell_put" => Some(Self::SellPut),
            "sell_call" => Some(Self::SellCall),
            "roll_put" => Some(Self::RollPut),
            "roll_call" => Some(Self::RollCall),
            "buy_close" => Some(Self::BuyClose),
            "put_assigned" | "assignment_shares" => Some(Self::PutAssigned),
            "call_assigned" | "share_sale" => Some(Self::CallAssigned),
            "dividend" => Some(Self::Dividend),
            "fee" => Some(Self::Fee),
            "expiration" => Some(Self::Expiration),
            _ => None,
        }
    }

    /// Kinds that touch an option leg.
    pub fn is_option(self) -> bool {
        self.opens_option() || self.closes_option()
    }

    /// Kinds that open (sell to open) a short option leg.
    pub fn opens_option(self) -> bool {
        matches!(
            self,
            Self::SellPut | Self::SellCall | Self::RollPut | Self::RollCall
        )
    }

    /// Kinds that close an option leg.
    pub fn closes_option(self) -> bool {
        matches!(self, Self::BuyClose | Self::Expiration)
    }

    /// Kinds that acquire or dispose of shares.
    pub fn is_share(self) -> bool {
        matches!(self, Self::PutAssigned | Self::CallAssigned)
    }
}

/// Put or call leg of an option event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionLeg {
    Put,
    Call,
}

impl std::fmt::Display for OptionLeg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Put => write!(f, "put"),
            Self::Call => write!(f, "call"),
        }
    }
}

/// A normalized journal event.
///
/// The journal is append-only: edits and deletes arrive as new events or
/// soft-delete markers, never physical mutation. Soft-deleted events stay in
/// the log and every projection must skip them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub ticker: String,
    pub kind: EventKind,
    pub contracts: Option<i64>,
    pub strike: Option<Decimal>,
    pub expiration: Option<NaiveDate>,
    /// Premium quoted per share, the usual options convention. When absent the
    /// projector derives it from the aggregate `amount`.
    pub premium_per_contract: Option<Decimal>,
    pub price_per_share: Option<Decimal>,
    /// Signed cash impact of the event in dollars.
    pub amount: Decimal,
    pub fees: Option<Decimal>,
    pub meta: Option<Value>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub edit_reason: Option<String>,
    pub original_event_id: Option<i64>,
}

impl Event {
    /// Soft-deleted events stay in the log but are invisible to projections.
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Explicit put/call tag from `meta.leg`, when the source supplied one.
    pub fn meta_leg(&self) -> Option<OptionLeg> {
        match self.meta.as_ref()?.get("leg")?.as_str()? {
            "put" => Some(OptionLeg::Put),
            "call" => Some(OptionLeg::Call),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bare_event(meta: Option<Value>) -> Event {
        Event {
            id: 1,
            timestamp: Utc::now(),
            ticker: "F".to_string(),
            kind: EventKind::SellPut,
            contracts: Some(1),
            strike: None,
            expiration: None,
            premium_per_contract: None,
            price_per_share: None,
            amount: Decimal::ZERO,
            fees: None,
            meta,
            deleted_at: None,
            edit_reason: None,
            original_event_id: None,
        }
    }

    #[test]
    fn parses_canonical_and_legacy_kinds() {
        assert_eq!(EventKind::parse("sell_put"), Some(EventKind::SellPut));
        assert_eq!(
            EventKind::parse("assignment_shares"),
            Some(EventKind::PutAssigned)
        );
        assert_eq!(EventKind::parse("share_sale"), Some(EventKind::CallAssigned));
        assert_eq!(EventKind::parse("stock_split"), None);
    }

    #[test]
    fn meta_leg_reads_explicit_tag() {
        let event = bare_event(Some(json!({ "leg": "call" })));
        assert_eq!(event.meta_leg(), Some(OptionLeg::Call));
    }

    #[test]
    fn meta_leg_ignores_unrecognized_values() {
        let event = bare_event(Some(json!({ "leg": "straddle" })));
        assert_eq!(event.meta_leg(), None);
        assert_eq!(bare_event(None).meta_leg(), None);
    }
}
