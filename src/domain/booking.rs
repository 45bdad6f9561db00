//! Booking-side value types: reservations, rental windows, settlement
//! statuses, audit entries.

use super::{CalendarDate, DateRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque reservation identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(pub String);

impl BookingId {
    /// Create a BookingId from a string.
    pub fn new(id: String) -> Self {
        BookingId(id)
    }

    /// Get the id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A date range occupied by an active reservation. Immutable once created;
/// the engine only ever consumes currently-active ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedRange {
    pub reservation_id: BookingId,
    pub range: DateRange,
}

impl BookedRange {
    pub fn new(reservation_id: BookingId, range: DateRange) -> Self {
        BookedRange {
            reservation_id,
            range,
        }
    }
}

/// The property's total advertise-able period, supplied by the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalWindow {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

impl RentalWindow {
    pub fn new(start: CalendarDate, end: CalendarDate) -> Self {
        RentalWindow { start, end }
    }
}

/// Lifecycle stage of a booking relative to server time.
///
/// Linear machine with no cycles: pending before the check-in instant,
/// confirmed between check-in and check-out, paid once the payable-after
/// instant has passed. Paid is terminal; cancellation is an external
/// concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Pending,
    Confirmed,
    Paid,
}

impl std::fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettlementStatus::Pending => write!(f, "pending"),
            SettlementStatus::Confirmed => write!(f, "confirmed"),
            SettlementStatus::Paid => write!(f, "paid"),
        }
    }
}

impl std::str::FromStr for SettlementStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SettlementStatus::Pending),
            "confirmed" => Ok(SettlementStatus::Confirmed),
            "paid" => Ok(SettlementStatus::Paid),
            other => Err(format!("unknown settlement status: {}", other)),
        }
    }
}

/// Immutable record of one settlement-status determination that a financial
/// decision depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,
    pub booking_id: BookingId,
    pub status: SettlementStatus,
    pub server_time_iso: String,
    pub server_time_ms: i64,
    pub check_in_iso: String,
    pub check_out_iso: String,
    pub payable_after_iso: String,
    pub recorded_at_ms: i64,
}
