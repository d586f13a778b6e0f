//! Event normalization — two raw record shapes into one canonical [`Event`].
//!
//! The journal has seen two storage shapes over its life: flat journal rows
//! that carry their own ticker, and older trade rows that reference a symbol
//! table by id. Both funnel through [`normalize`]; the rest of the workspace
//! never sees a raw record.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::event::{Event, EventKind};

/// Resolves the symbol table referenced by trade-shaped rows.
///
/// The journal collaborator typically backs this with a DB table; tests use a
/// plain `HashMap`.
pub trait SymbolLookup {
    fn ticker_for(&self, symbol_id: i64) -> Option<String>;
}

impl SymbolLookup for HashMap<i64, String> {
    fn ticker_for(&self, symbol_id: i64) -> Option<String> {
        self.get(&symbol_id).cloned()
    }
}

/// Why a raw record was dropped during normalization.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("unknown event kind `{0}`")]
    UnknownKind(String),
    #[error("symbol id {0} not in symbol table")]
    UnknownSymbol(i64),
    #[error("{kind:?} event missing required field `{field}`")]
    MissingField { kind: EventKind, field: &'static str },
    #[error("{kind:?} event has non-positive contracts")]
    NonPositiveContracts { kind: EventKind },
}

/// Raw `meta` as stored: a JSON string or an already-parsed object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMeta {
    Text(String),
    Object(Value),
}

/// Flat journal row — the canonical storage shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJournalRow {
    pub id: i64,
    #[serde(rename = "timestampISO")]
    pub timestamp: DateTime<Utc>,
    pub ticker: String,
    pub kind: String,
    #[serde(default)]
    pub contracts: Option<i64>,
    #[serde(default)]
    pub strike: Option<Decimal>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub premium_per_contract: Option<Decimal>,
    #[serde(default)]
    pub price_per_share: Option<Decimal>,
    pub amount: Decimal,
    #[serde(default)]
    pub fees: Option<Decimal>,
    #[serde(default)]
    pub meta: Option<RawMeta>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edit_reason: Option<String>,
    #[serde(default)]
    pub original_event_id: Option<i64>,
}

/// Legacy trade row referencing the symbol table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTradeRow {
    pub id: i64,
    pub executed_at: DateTime<Utc>,
    pub symbol_id: i64,
    pub kind: String,
    #[serde(default)]
    pub contracts: Option<i64>,
    #[serde(default)]
    pub strike: Option<Decimal>,
    #[serde(default)]
    pub expiration: Option<NaiveDate>,
    /// Premium per share, when the source recorded one.
    #[serde(default)]
    pub premium: Option<Decimal>,
    pub amount: Decimal,
    #[serde(default)]
    pub fees: Option<Decimal>,
    #[serde(default)]
    pub meta: Option<RawMeta>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// One of the two raw record shapes. Untagged: journal rows carry `ticker`,
/// trade rows carry `symbol_id`, so the shapes never collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEvent {
    Journal(RawJournalRow),
    Trade(RawTradeRow),
}

impl RawEvent {
    pub fn id(&self) -> i64 {
        match self {
            Self::Journal(row) => row.id,
            Self::Trade(row) => row.id,
        }
    }
}

/// Map a batch of raw records into canonical events.
///
/// Pure: inputs are never mutated and output order follows input order.
/// Malformed records are dropped with a `warn!` diagnostic, never an error.
/// Each distinct `symbol_id` is resolved at most once per batch.
pub fn normalize(raw: &[RawEvent], symbols: &impl SymbolLookup) -> Vec<Event> {
    let mut resolved: HashMap<i64, Option<String>> = HashMap::new();
    let mut events = Vec::with_capacity(raw.len());

    for record in raw {
        match canonicalize(record, symbols, &mut resolved) {
            Ok(event) => events.push(event),
            Err(reason) => warn!(id = record.id(), %reason, "Dropped journal record"),
        }
    }

    debug!(input = raw.len(), output = events.len(), "Normalized journal batch");
    events
}

fn canonicalize(
    record: &RawEvent,
    symbols: &impl SymbolLookup,
    resolved: &mut HashMap<i64, Option<String>>,
) -> Result<Event, SkipReason> {
    let event = match record {
        RawEvent::Journal(row) => {
            let kind =
                EventKind::parse(&row.kind).ok_or_else(|| SkipReason::UnknownKind(row.kind.clone()))?;
            Event {
                id: row.id,
                timestamp: row.timestamp,
                ticker: row.ticker.clone(),
                kind,
                contracts: row.contracts,
                strike: row.strike,
                expiration: row.expiration_date,
                premium_per_contract: row.premium_per_contract,
                price_per_share: row.price_per_share,
                amount: row.amount,
                fees: row.fees,
                meta: parse_meta(row.meta.as_ref()),
                deleted_at: row.deleted_at,
                edit_reason: row.edit_reason.clone(),
                original_event_id: row.original_event_id,
            }
        }
        RawEvent::Trade(row) => {
            let kind =
                EventKind::parse(&row.kind).ok_or_else(|| SkipReason::UnknownKind(row.kind.clone()))?;
            let ticker = resolved
                .entry(row.symbol_id)
                .or_insert_with(|| symbols.ticker_for(row.symbol_id))
                .clone()
                .ok_or(SkipReason::UnknownSymbol(row.symbol_id))?;
            Event {
                id: row.id,
                timestamp: row.executed_at,
                ticker,
                kind,
                contracts: row.contracts,
                strike: row.strike,
                expiration: row.expiration,
                premium_per_contract: row.premium,
                price_per_share: None,
                amount: row.amount,
                fees: row.fees,
                meta: parse_meta(row.meta.as_ref()),
                deleted_at: row.deleted_at,
                edit_reason: None,
                original_event_id: None,
            }
        }
    };

    validate(&event)?;
    Ok(event)
}

/// Per-kind required-field checks. An event that fails here would poison a
/// projection key, so it is dropped rather than guessed at.
fn validate(event: &Event) -> Result<(), SkipReason> {
    let kind = event.kind;

    if kind.is_option() {
        if event.strike.is_none() {
            return Err(SkipReason::MissingField {
                kind,
                field: "strike",
            });
        }
        if event.expiration.is_none() {
            return Err(SkipReason::MissingField {
                kind,
                field: "expirationDate",
            });
        }
        // An expiration may omit contracts; it flattens whatever remains.
        if kind != EventKind::Expiration {
            require_contracts(event)?;
        }
    }

    if kind.is_share() {
        require_contracts(event)?;
    }

    Ok(())
}

fn require_contracts(event: &Event) -> Result<(), SkipReason> {
    match event.contracts {
        Some(c) if c > 0 => Ok(()),
        Some(_) => Err(SkipReason::NonPositiveContracts { kind: event.kind }),
        None => Err(SkipReason::MissingField {
            kind: event.kind,
            field: "contracts",
        }),
    }
}

/// `meta` tolerance: absent stays absent, objects pass through, strings are
/// parsed as JSON and fall back to `None` on failure.
fn parse_meta(raw: Option<&RawMeta>) -> Option<Value> {
    match raw? {
        RawMeta::Object(value) => Some(value.clone()),
        RawMeta::Text(text) => match serde_json::from_str(text) {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(%error, "Unparsable meta string, treating as empty");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn journal_row(id: i64, kind: &str) -> RawJournalRow {
        RawJournalRow {
            id,
            timestamp: Utc::now(),
            ticker: "F".to_string(),
            kind: kind.to_string(),
            contracts: Some(2),
            strike: Some(dec!(12)),
            expiration_date: NaiveDate::from_ymd_opt(2026, 9, 18),
            premium_per_contract: Some(dec!(0.45)),
            price_per_share: None,
            amount: dec!(90),
            fees: Some(dec!(1.30)),
            meta: None,
            deleted_at: None,
            edit_reason: None,
            original_event_id: None,
        }
    }

    fn trade_row(id: i64, symbol_id: i64, kind: &str) -> RawTradeRow {
        RawTradeRow {
            id,
            executed_at: Utc::now(),
            symbol_id,
            kind: kind.to_string(),
            contracts: Some(1),
            strike: Some(dec!(150)),
            expiration: NaiveDate::from_ymd_opt(2026, 10, 16),
            premium: Some(dec!(2.10)),
            amount: dec!(210),
            fees: None,
            meta: None,
            deleted_at: None,
        }
    }

    fn symbols() -> HashMap<i64, String> {
        HashMap::from([(7, "AAPL".to_string())])
    }

    #[test]
    fn maps_both_shapes_to_canonical_events() {
        let raw = vec![
            RawEvent::Journal(journal_row(1, "sell_put")),
            RawEvent::Trade(trade_row(2, 7, "sell_call")),
        ];
        let events = normalize(&raw, &symbols());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].ticker, "F");
        assert_eq!(events[0].kind, EventKind::SellPut);
        assert_eq!(events[1].ticker, "AAPL");
        assert_eq!(events[1].kind, EventKind::SellCall);
    }

    #[test]
    fn skips_unknown_kind_without_aborting_batch() {
        let raw = vec![
            RawEvent::Journal(journal_row(1, "sell_put")),
            RawEvent::Journal(journal_row(2, "stock_split")),
            RawEvent::Journal(journal_row(3, "sell_call")),
        ];
        let events = normalize(&raw, &symbols());
        assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn skips_trade_row_with_unresolved_symbol() {
        let raw = vec![RawEvent::Trade(trade_row(1, 99, "sell_put"))];
        assert!(normalize(&raw, &symbols()).is_empty());
    }

    struct CountingLookup {
        inner: HashMap<i64, String>,
        calls: RefCell<usize>,
    }

    impl SymbolLookup for CountingLookup {
        fn ticker_for(&self, symbol_id: i64) -> Option<String> {
            *self.calls.borrow_mut() += 1;
            self.inner.ticker_for(symbol_id)
        }
    }

    #[test]
    fn resolves_each_distinct_symbol_id_once_per_batch() {
        let lookup = CountingLookup {
            inner: symbols(),
            calls: RefCell::new(0),
        };
        let raw = vec![
            RawEvent::Trade(trade_row(1, 7, "sell_call")),
            RawEvent::Trade(trade_row(2, 7, "sell_put")),
            RawEvent::Trade(trade_row(3, 7, "buy_close")),
            RawEvent::Trade(trade_row(4, 99, "sell_put")),
            RawEvent::Trade(trade_row(5, 99, "sell_put")),
        ];
        let events = normalize(&raw, &lookup);
        assert_eq!(events.len(), 3);
        // One lookup per distinct id; the failed id 99 is memoized too.
        assert_eq!(*lookup.calls.borrow(), 2);
    }

    #[test]
    fn skips_option_event_missing_strike_or_expiration() {
        let mut no_strike = journal_row(1, "sell_put");
        no_strike.strike = None;
        let mut no_expiry = journal_row(2, "buy_close");
        no_expiry.expiration_date = None;
        let raw = vec![
            RawEvent::Journal(no_strike),
            RawEvent::Journal(no_expiry),
            RawEvent::Journal(journal_row(3, "sell_put")),
        ];
        let events = normalize(&raw, &symbols());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, 3);
    }

    #[test]
    fn skips_assignment_without_positive_contracts() {
        let mut zero = journal_row(1, "put_assigned");
        zero.contracts = Some(0);
        let mut missing = journal_row(2, "call_assigned");
        missing.contracts = None;
        let raw = vec![RawEvent::Journal(zero), RawEvent::Journal(missing)];
        assert!(normalize(&raw, &symbols()).is_empty());
    }

    #[test]
    fn expiration_may_omit_contracts() {
        let mut row = journal_row(1, "expiration");
        row.contracts = None;
        let events = normalize(&[RawEvent::Journal(row)], &symbols());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Expiration);
    }

    #[test]
    fn meta_string_is_parsed_and_garbage_falls_back_to_none() {
        let mut as_string = journal_row(1, "sell_put");
        as_string.meta = Some(RawMeta::Text(r#"{"leg":"call"}"#.to_string()));
        let mut as_object = journal_row(2, "sell_put");
        as_object.meta = Some(RawMeta::Object(json!({ "leg": "put" })));
        let mut garbage = journal_row(3, "sell_put");
        garbage.meta = Some(RawMeta::Text("{not json".to_string()));

        let raw = vec![
            RawEvent::Journal(as_string),
            RawEvent::Journal(as_object),
            RawEvent::Journal(garbage),
        ];
        let events = normalize(&raw, &symbols());
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].meta, Some(json!({ "leg": "call" })));
        assert_eq!(events[1].meta, Some(json!({ "leg": "put" })));
        assert_eq!(events[2].meta, None);
    }

    #[test]
    fn soft_deleted_rows_pass_through_flagged() {
        let mut row = journal_row(1, "sell_put");
        row.deleted_at = Some(Utc::now());
        let events = normalize(&[RawEvent::Journal(row)], &symbols());
        assert_eq!(events.len(), 1);
        assert!(!events[0].is_live());
    }

    #[test]
    fn raw_union_deserializes_both_shapes() {
        let journal: RawEvent = serde_json::from_value(json!({
            "id": 11,
            "timestampISO": "2026-08-01T14:30:00Z",
            "ticker": "F",
            "kind": "sell_put",
            "contracts": 1,
            "strike": "12",
            "expirationDate": "2026-09-18",
            "amount": "45"
        }))
        .unwrap();
        assert!(matches!(journal, RawEvent::Journal(_)));

        let trade: RawEvent = serde_json::from_value(json!({
            "id": 12,
            "executed_at": "2026-08-01T14:30:00Z",
            "symbol_id": 7,
            "kind": "sell_call",
            "contracts": 1,
            "strike": "150",
            "expiration": "2026-10-16",
            "amount": "210"
        }))
        .unwrap();
        assert!(matches!(trade, RawEvent::Trade(_)));
    }
}
