//! Settlement status engine: classify a booking's lifecycle stage against
//! server-anchored time.
//!
//! Every caller must supply `now` from the server clock; this engine never
//! consults the device clock. A missing or stale server time aborts the
//! settlement decision upstream.

use crate::domain::{CalendarDate, DateError, SettlementStatus, TimeOfDay};
use chrono::{DateTime, Duration, FixedOffset, SecondsFormat, TimeZone, Utc};

/// Canonical serialization of an instant for audit and comparison:
/// UTC-normalized RFC 3339 with millisecond precision.
pub fn to_audit_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A status determination together with the anchor instants it was
/// derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDecision {
    pub status: SettlementStatus,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub payable_after: DateTime<Utc>,
}

/// Settlement engine configured with the platform reference timezone,
/// default check-in/out times, and payout delay.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    reference: FixedOffset,
    default_check_in: TimeOfDay,
    default_check_out: TimeOfDay,
    payout_delay: Duration,
}

impl SettlementEngine {
    pub fn new(
        reference: FixedOffset,
        default_check_in: TimeOfDay,
        default_check_out: TimeOfDay,
        payout_delay: Duration,
    ) -> Self {
        SettlementEngine {
            reference,
            default_check_in,
            default_check_out,
            payout_delay,
        }
    }

    /// Combine a calendar date and a reference-timezone time of day into a
    /// concrete UTC instant. Fixed-offset conversion is never ambiguous.
    pub fn moment(&self, date: CalendarDate, time: TimeOfDay) -> DateTime<Utc> {
        let local = date.as_naive().and_time(time.as_naive());
        let utc_naive = local - Duration::seconds(i64::from(self.reference.local_minus_utc()));
        Utc.from_utc_datetime(&utc_naive)
    }

    /// Check-in instant; defaults to the configured check-in time (14:00).
    pub fn check_in_moment(&self, date: CalendarDate, time: Option<TimeOfDay>) -> DateTime<Utc> {
        self.moment(date, time.unwrap_or(self.default_check_in))
    }

    /// Check-out instant; defaults to the configured check-out time (12:00).
    pub fn check_out_moment(&self, date: CalendarDate, time: Option<TimeOfDay>) -> DateTime<Utc> {
        self.moment(date, time.unwrap_or(self.default_check_out))
    }

    /// Instant after which the booking becomes payable: check-out plus the
    /// payout delay (zero delay means paid begins exactly at checkout).
    pub fn payable_after_moment(
        &self,
        check_out_date: CalendarDate,
        check_out_time: Option<TimeOfDay>,
    ) -> DateTime<Utc> {
        self.check_out_moment(check_out_date, check_out_time) + self.payout_delay
    }

    /// Apply the linear status machine to precomputed anchor instants.
    ///
    /// Between check-out and payable-after the booking stays confirmed, so
    /// the output only ever moves forward as `now` advances.
    pub fn classify(
        &self,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        payable_after: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> SettlementStatus {
        if now < check_in {
            SettlementStatus::Pending
        } else if now < check_out {
            SettlementStatus::Confirmed
        } else if now >= payable_after {
            SettlementStatus::Paid
        } else {
            SettlementStatus::Confirmed
        }
    }

    /// Strictly-validated status determination for financial paths: any
    /// malformed date or time is a typed error.
    pub fn decide_strict(
        &self,
        check_in_date: &str,
        check_out_date: &str,
        check_in_time: Option<&str>,
        check_out_time: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<StatusDecision, DateError> {
        let in_date = CalendarDate::parse(check_in_date)?;
        let out_date = CalendarDate::parse(check_out_date)?;
        let in_time = check_in_time.map(TimeOfDay::parse).transpose()?;
        let out_time = check_out_time.map(TimeOfDay::parse).transpose()?;

        let check_in = self.check_in_moment(in_date, in_time);
        let check_out = self.check_out_moment(out_date, out_time);
        let payable_after = self.payable_after_moment(out_date, out_time);

        Ok(StatusDecision {
            status: self.classify(check_in, check_out, payable_after, now),
            check_in,
            check_out,
            payable_after,
        })
    }

    /// Fail-soft status determination: `None` (not yet determinable) when
    /// either date is missing or any input is malformed.
    pub fn decide(
        &self,
        check_in_date: Option<&str>,
        check_out_date: Option<&str>,
        check_in_time: Option<&str>,
        check_out_time: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<StatusDecision> {
        let (in_date, out_date) = match (check_in_date, check_out_date) {
            (Some(i), Some(o)) => (i, o),
            _ => return None,
        };
        self.decide_strict(in_date, out_date, check_in_time, check_out_time, now)
            .ok()
    }
}
