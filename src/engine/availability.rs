//! Availability engine: which parts of a rental window a new booking can
//! occupy, today onward.

use crate::domain::{subtract_intervals, BookedRange, CalendarDate, DateRange, RentalWindow};

/// Compute the free segments of `window` not covered by `booked`, starting
/// no earlier than `today`.
///
/// The effective start is clamped to `max(window.start, today)`; a listing
/// cannot be booked retroactively. A structurally invalid window degrades
/// to no availability rather than an error, so a booking UI shows "no
/// availability" instead of crashing.
///
/// Returned segments are pairwise disjoint, ordered by start ascending,
/// wholly contained in the window, and disjoint from every booked range.
pub fn available_segments(
    window: &RentalWindow,
    booked: &[BookedRange],
    today: CalendarDate,
) -> Vec<DateRange> {
    let effective_start = window.start.max(today);
    if effective_start >= window.end {
        return Vec::new();
    }

    let occupied: Vec<DateRange> = booked.iter().map(|b| b.range).collect();
    subtract_intervals(DateRange::new(effective_start, window.end), &occupied)
        .into_iter()
        .filter(DateRange::is_non_empty)
        .collect()
}

/// As [`available_segments`], then drop segments shorter than
/// `minimum_stay_days` whole days.
pub fn bookable_segments(
    window: &RentalWindow,
    booked: &[BookedRange],
    today: CalendarDate,
    minimum_stay_days: i64,
) -> Vec<DateRange> {
    available_segments(window, booked, today)
        .into_iter()
        .filter(|s| s.length_days() >= minimum_stay_days)
        .collect()
}
