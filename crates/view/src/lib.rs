//! Derived-view composition — one pass from journal events to render state.
//!
//! The host (UI layer) calls [`derive_view`] whenever something changed: the
//! journal grew, a mark price moved, or a phase override was set. Nothing is
//! cached between passes; the view is a pure function of its inputs. The
//! "recompute on change" policy lives entirely on the caller side, hooked
//! through [`ViewSubscription`] rather than any global event bus.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use wheel_ledger_alerts::{generate_alerts, Alert, AlertInputs};
use wheel_ledger_core::{normalize, Event, RawEvent, SymbolLookup};
use wheel_ledger_projection::{
    classify_phase, project_positions, project_share_lots, OptionPosition, ShareLot, TickerPhase,
    WheelPhase,
};

/// Everything the UI renders, recomputed in full on every pass.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedView {
    pub positions: Vec<OptionPosition>,
    pub share_lots: Vec<ShareLot>,
    pub phases: BTreeMap<String, TickerPhase>,
    pub alerts: Vec<Alert>,
}

/// Fold canonical events into the full derived view.
///
/// `overrides` pins a ticker's phase manually; overridden tickers get a phase
/// entry even with no current holdings.
#[must_use]
pub fn derive_view(
    events: &[Event],
    overrides: &BTreeMap<String, WheelPhase>,
    inputs: &AlertInputs<'_>,
) -> DerivedView {
    let positions = project_positions(events, inputs.as_of);
    let share_lots = project_share_lots(events);
    let phases = classify_all(&positions, &share_lots, overrides);
    let alerts = generate_alerts(&positions, &share_lots, inputs);

    debug!(
        positions = positions.len(),
        share_lots = share_lots.len(),
        phases = phases.len(),
        alerts = alerts.len(),
        "Derived view"
    );

    DerivedView {
        positions,
        share_lots,
        phases,
        alerts,
    }
}

/// Convenience entry for hosts holding raw journal/trade rows: normalize
/// first, then derive.
#[must_use]
pub fn derive_view_from_raw(
    raw: &[RawEvent],
    symbols: &impl SymbolLookup,
    overrides: &BTreeMap<String, WheelPhase>,
    inputs: &AlertInputs<'_>,
) -> DerivedView {
    let events = normalize(raw, symbols);
    derive_view(&events, overrides, inputs)
}

/// Classify every ticker seen in positions, lots, or the override map.
fn classify_all(
    positions: &[OptionPosition],
    share_lots: &[ShareLot],
    overrides: &BTreeMap<String, WheelPhase>,
) -> BTreeMap<String, TickerPhase> {
    let mut tickers: BTreeSet<&str> = BTreeSet::new();
    tickers.extend(positions.iter().map(|p| p.ticker.as_str()));
    tickers.extend(share_lots.iter().map(|l| l.ticker.as_str()));
    tickers.extend(overrides.keys().map(String::as_str));

    tickers
        .into_iter()
        .map(|ticker| {
            let has_shares = share_lots.iter().any(|l| l.ticker == ticker);
            let has_short_puts = positions
                .iter()
                .any(|p| p.ticker == ticker && p.is_short_put());
            let has_short_calls = positions
                .iter()
                .any(|p| p.ticker == ticker && p.is_short_call());
            let phase = classify_phase(
                ticker,
                has_shares,
                has_short_puts,
                has_short_calls,
                overrides.get(ticker).copied(),
            );
            (ticker.to_string(), phase)
        })
        .collect()
}

/// Explicit change-notification seam.
///
/// The core never decides when to recompute. A host registers listeners here
/// and fires [`ViewSubscription::notify`] from its own persistence/quote
/// callbacks; each listener then calls [`derive_view`] with fresh inputs.
#[derive(Default)]
pub struct ViewSubscription {
    listeners: Vec<Box<dyn Fn() + Send + Sync>>,
}

impl ViewSubscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl Fn() + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn notify(&self) {
        for listener in &self.listeners {
            listener();
        }
    }
}
