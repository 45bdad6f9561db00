//! Pure engines over domain values: availability gaps and settlement
//! status. No IO; trivially safe to call concurrently.

pub mod availability;
pub mod settlement;

pub use availability::{available_segments, bookable_segments};
pub use settlement::{to_audit_instant, SettlementEngine, StatusDecision};
