//! Projection engine — pure folds from the journal event log to derived state.
//!
//! Nothing here is persisted or cached: positions, share lots, and phases are
//! recomputed from the full event slice on every invocation. The projectors
//! share no mutable state and may run concurrently over the same slice.

pub mod phase;
pub mod positions;
pub mod share_lots;
pub mod types;

pub use phase::classify_phase;
pub use positions::project_positions;
pub use share_lots::project_share_lots;
pub use types::{OptionPosition, PositionSide, ShareLot, TickerPhase, WheelPhase};
