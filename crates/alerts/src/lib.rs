//! Rule-based alerting over projected wheel state.
//!
//! An ordered set of independent rules scans each open position (and each
//! ticker's share/coverage shape) for time-sensitive or profit-sensitive
//! conditions. Rules never read each other's output — adding or removing one
//! cannot change another's result — and alerts are regenerated on every pass,
//! never persisted.

pub mod coverage;
pub mod earnings;
pub mod engine;
pub mod expiration;
pub mod profit;
pub mod roll;
pub mod rule;
pub mod types;

pub use engine::generate_alerts;
pub use rule::{AlertRule, RuleContext};
pub use types::{Alert, AlertCategory, AlertConfig, AlertInputs, AlertPriority};
