pub mod api;
pub mod audit;
pub mod clock;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;

pub use audit::{AuditError, AuditStore, MemoryAuditStore};
pub use clock::{ClockError, ClockSource, HttpClockSource, MockClockSource, ServerClock};
pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    to_calendar_date, AuditEntry, BookedRange, BookingId, CalendarDate, DateError, DateRange,
    RentalWindow, SettlementStatus, TimeOfDay,
};
pub use engine::{available_segments, bookable_segments, SettlementEngine, StatusDecision};
pub use error::AppError;
