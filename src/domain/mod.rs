//! Domain value types for the rental availability and settlement core.
//!
//! This module provides:
//! - Timezone-safe calendar primitives: CalendarDate, TimeOfDay
//! - Half-open DateRange intervals and interval subtraction
//! - Booking-side types: BookedRange, RentalWindow, SettlementStatus,
//!   AuditEntry

pub mod booking;
pub mod calendar;
pub mod interval;

pub use booking::{AuditEntry, BookedRange, BookingId, RentalWindow, SettlementStatus};
pub use calendar::{to_calendar_date, CalendarDate, DateError, TimeOfDay};
pub use interval::{subtract_intervals, DateRange};
