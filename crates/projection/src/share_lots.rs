//! Share lot projection — folds assignments into per-ticker holdings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use wheel_ledger_core::{Event, EventKind, SHARES_PER_CONTRACT};

use crate::types::ShareLot;

#[derive(Debug)]
struct Lot {
    net_shares: Decimal,
    cost_per_share: Decimal,
    opened: DateTime<Utc>,
}

/// Fold live share events into per-ticker lots.
///
/// Shares are fungible, so the key is ticker alone. Put assignments acquire
/// `contracts * 100` shares and blend the cost; call assignments dispose of
/// shares at a fixed cost, clamped at zero. Lots that reach zero are dropped.
#[must_use]
pub fn project_share_lots(events: &[Event]) -> Vec<ShareLot> {
    let mut ordered: Vec<&Event> = events
        .iter()
        .filter(|e| e.is_live() && e.kind.is_share())
        .collect();
    ordered.sort_by_key(|e| (e.timestamp, e.id));

    let mut lots: BTreeMap<String, Lot> = BTreeMap::new();
    for event in ordered {
        let Some(contracts) = event.contracts.filter(|c| *c > 0) else {
            continue;
        };
        let shares = Decimal::from(contracts * SHARES_PER_CONTRACT);
        let lot = lots.entry(event.ticker.clone()).or_insert_with(|| Lot {
            net_shares: Decimal::ZERO,
            cost_per_share: Decimal::ZERO,
            opened: event.timestamp,
        });

        match event.kind {
            EventKind::PutAssigned => {
                // Assigned at the strike unless the source recorded an
                // explicit fill price.
                let price = event
                    .price_per_share
                    .or(event.strike)
                    .unwrap_or(Decimal::ZERO);
                if lot.net_shares <= Decimal::ZERO {
                    lot.opened = event.timestamp;
                }
                let base = lot.net_shares.max(Decimal::ZERO);
                lot.cost_per_share =
                    (lot.cost_per_share * base + price * shares) / (base + shares);
                lot.net_shares = base + shares;
            }
            EventKind::CallAssigned => {
                // Average cost never moves on the way out; only a buy moves it.
                lot.net_shares = (lot.net_shares - shares).max(Decimal::ZERO);
            }
            _ => {}
        }
    }

    let lots: Vec<ShareLot> = lots
        .into_iter()
        .filter(|(_, lot)| lot.net_shares > Decimal::ZERO)
        .map(|(ticker, lot)| ShareLot {
            ticker,
            net_shares: lot.net_shares,
            weighted_cost_per_share: lot.cost_per_share,
            opened: lot.opened,
        })
        .collect();

    debug!(count = lots.len(), "Projected share lots");
    lots
}
