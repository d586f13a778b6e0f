//! Derived entities produced by the projectors.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use wheel_ledger_core::OptionLeg;

/// Side of an option position. The wheel only ever sells to open, but the tag
/// keeps long legs from imported history representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSide {
    Short,
    Long,
}

/// An open option position, recomputed from the journal on every projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionPosition {
    /// Deterministic key id: `ticker|strike|expiration|type`.
    pub id: String,
    pub ticker: String,
    pub strike: Decimal,
    pub expiration: NaiveDate,
    pub option_type: OptionLeg,
    pub side: PositionSide,
    /// Signed sum of opened minus closed contracts for this key. Always
    /// strictly positive in projector output; closed keys are dropped.
    pub net_contracts: i64,
    /// Weighted-average entry premium per share. Only opening trades move it.
    pub weighted_entry_price: Decimal,
    pub days_to_expiration: i64,
    pub opened: DateTime<Utc>,
}

impl OptionPosition {
    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short
    }

    pub fn is_short_call(&self) -> bool {
        self.is_short() && self.option_type == OptionLeg::Call
    }

    pub fn is_short_put(&self) -> bool {
        self.is_short() && self.option_type == OptionLeg::Put
    }
}

/// Aggregate share holding for one ticker. Shares are fungible, so there is a
/// single lot per ticker with a blended cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareLot {
    pub ticker: String,
    pub net_shares: Decimal,
    /// Blended per-share cost. Acquisitions move it; sales never do.
    pub weighted_cost_per_share: Decimal,
    pub opened: DateTime<Utc>,
}

/// Named stage of the wheel for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelPhase {
    SellCashSecuredPut,
    PutExpiresWorthless,
    BuyAtStrike,
    SellCoveredCall,
    CallExpiresWorthless,
    CallExercisedSellShares,
    Repeat,
}

/// A ticker's current phase, either computed from holdings or pinned manually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerPhase {
    pub ticker: String,
    pub phase: WheelPhase,
    pub is_manual_override: bool,
}
