//! Half-open date intervals and interval subtraction.

use super::CalendarDate;
use serde::{Deserialize, Serialize};

/// A half-open date interval `[start, end)`: `start` inclusive, `end`
/// exclusive, so a checkout day is free for a new check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

impl DateRange {
    /// Create a range. Degenerate ranges (`start >= end`) are representable
    /// but contain no days.
    pub fn new(start: CalendarDate, end: CalendarDate) -> Self {
        DateRange { start, end }
    }

    /// True when the range contains at least one day.
    pub fn is_non_empty(&self) -> bool {
        self.start < self.end
    }

    /// Length in whole days; zero for degenerate ranges.
    pub fn length_days(&self) -> i64 {
        self.start.days_until(self.end).max(0)
    }
}

/// Compute `window` minus the union of `occupied`.
///
/// Sorts occupied ranges by start and sweeps a cursor from `window.start`,
/// emitting each free gap before an occupied range and the trailing gap
/// after the last one. The cursor only ever advances, so overlapping or
/// out-of-order occupied input cannot corrupt the result. Occupied ranges
/// entirely outside the window are ignored; touching ranges produce no
/// zero-length gap.
pub fn subtract_intervals(window: DateRange, occupied: &[DateRange]) -> Vec<DateRange> {
    if !window.is_non_empty() {
        return Vec::new();
    }

    let mut occupied: Vec<DateRange> = occupied.to_vec();
    occupied.sort_by_key(|r| r.start);

    let mut segments = Vec::new();
    let mut cursor = window.start;

    for range in occupied {
        if range.end <= cursor || range.start >= window.end {
            continue;
        }
        if range.start > cursor {
            segments.push(DateRange::new(cursor, range.start));
        }
        cursor = cursor.max(range.end);
        if cursor >= window.end {
            return segments;
        }
    }

    if cursor < window.end {
        segments.push(DateRange::new(cursor, window.end));
    }
    segments
}
