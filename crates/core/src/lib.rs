//! Canonical event model and normalization for the wheel journal.
//!
//! The journal collaborator owns storage; this crate owns the shape of what a
//! projection sees. Two historically-seen raw record shapes (flat journal rows
//! and trade rows referencing a symbol table) funnel through
//! [`normalize::normalize`] into one canonical [`Event`], so the projectors
//! depend on exactly one type.
//!
//! Everything here is a pure mapping — no I/O, no mutation of inputs. A
//! malformed record degrades output (one entry is missing, with a diagnostic),
//! never aborts the batch.

pub mod event;
pub mod normalize;

pub use event::{Event, EventKind, OptionLeg, SHARES_PER_CONTRACT};
pub use normalize::{
    normalize, RawEvent, RawJournalRow, RawMeta, RawTradeRow, SkipReason, SymbolLookup,
};
