//! Position projection — folds option events into the open-position set.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use wheel_ledger_core::{Event, EventKind, OptionLeg, SHARES_PER_CONTRACT};

use crate::types::{OptionPosition, PositionSide};

/// One netting key. Options are fungible only within the exact contract, so
/// the key carries all four coordinates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PositionKey {
    ticker: String,
    expiration: NaiveDate,
    strike: Decimal,
    leg: OptionLeg,
}

impl PositionKey {
    fn id(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.ticker, self.strike, self.expiration, self.leg
        )
    }
}

#[derive(Debug)]
struct Net {
    contracts: i64,
    entry_price: Decimal,
    opened: DateTime<Utc>,
}

/// Fold live option events into open positions.
///
/// Events replay in chronological order, ties broken by id so replay is
/// deterministic. Opening kinds add contracts and blend the entry premium;
/// closing kinds subtract and leave the premium untouched. Only keys with a
/// strictly positive net survive; output is sorted by key.
#[must_use]
pub fn project_positions(events: &[Event], as_of: NaiveDate) -> Vec<OptionPosition> {
    let mut ordered: Vec<&Event> = events
        .iter()
        .filter(|e| e.is_live() && e.kind.is_option())
        .collect();
    ordered.sort_by_key(|e| (e.timestamp, e.id));

    let mut book: BTreeMap<PositionKey, Net> = BTreeMap::new();
    for event in ordered {
        // The normalizer guarantees these for option kinds; hand-built events
        // without them simply don't net.
        let (Some(strike), Some(expiration)) = (event.strike, event.expiration) else {
            continue;
        };
        let key = PositionKey {
            ticker: event.ticker.clone(),
            expiration,
            strike,
            leg: infer_leg(event),
        };
        let net = book.entry(key).or_insert_with(|| Net {
            contracts: 0,
            entry_price: Decimal::ZERO,
            opened: event.timestamp,
        });

        if event.kind.opens_option() {
            let Some(qty) = event.contracts.filter(|c| *c > 0) else {
                continue;
            };
            // Blend over the currently-open quantity. A flat or over-closed
            // key restarts the average at the trade price.
            let base = Decimal::from(net.contracts.max(0));
            let added = Decimal::from(qty);
            net.entry_price =
                (net.entry_price * base + entry_price_per_share(event, qty) * added) / (base + added);
            if net.contracts <= 0 {
                net.opened = event.timestamp;
            }
            net.contracts += qty;
        } else {
            // A buy-to-close subtracts its count; an expiration without one
            // flattens whatever remains on the key.
            let qty = event.contracts.unwrap_or_else(|| net.contracts.max(0));
            net.contracts -= qty;
        }
    }

    let positions: Vec<OptionPosition> = book
        .into_iter()
        .filter(|(_, net)| net.contracts > 0)
        .map(|(key, net)| OptionPosition {
            id: key.id(),
            days_to_expiration: (key.expiration - as_of).num_days(),
            ticker: key.ticker,
            strike: key.strike,
            expiration: key.expiration,
            option_type: key.leg,
            side: PositionSide::Short,
            net_contracts: net.contracts,
            weighted_entry_price: net.entry_price,
            opened: net.opened,
        })
        .collect();

    debug!(count = positions.len(), "Projected open option positions");
    positions
}

/// Put/call resolution: explicit `meta.leg` first, then the kind name, then
/// put. Upstream event sources disagree on where they record the leg, so this
/// exact fallback chain matters.
fn infer_leg(event: &Event) -> OptionLeg {
    if let Some(leg) = event.meta_leg() {
        return leg;
    }
    match event.kind {
        EventKind::SellCall | EventKind::RollCall => OptionLeg::Call,
        EventKind::SellPut | EventKind::RollPut => OptionLeg::Put,
        // Closing kinds carry no leg in their name; documented default.
        _ => OptionLeg::Put,
    }
}

/// Per-share entry premium. Some sources record an aggregate dollar amount
/// instead of a per-contract quote; derive per-share from it.
fn entry_price_per_share(event: &Event, contracts: i64) -> Decimal {
    if let Some(premium) = event.premium_per_contract {
        return premium;
    }
    if contracts <= 0 {
        return Decimal::ZERO;
    }
    event.amount.abs() / Decimal::from(contracts) / Decimal::from(SHARES_PER_CONTRACT)
}
