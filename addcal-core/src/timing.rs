//! All-day detection and calendar boundary resolution.

use chrono::{DateTime, Days, Timelike, Utc};

use crate::event::{EventTime, ResolvedEventTiming};

/// Resolve the calendar boundaries of an event.
///
/// An event is all-day when the explicit flag is set, when start equals end,
/// or when both start and end sit exactly on midnight UTC. All-day events
/// render as dates and their end is moved to the following day, since
/// calendar end dates are exclusive.
///
/// Returns `None` only when the end date has no successor (the last
/// representable day).
pub fn resolve_timing(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    all_day_flag: Option<bool>,
) -> Option<ResolvedEventTiming> {
    let is_all_day = all_day_flag == Some(true)
        || start == end
        || (is_midnight(&start) && is_midnight(&end));

    if !is_all_day {
        return Some(ResolvedEventTiming {
            is_all_day,
            start: EventTime::DateTimeUtc(start),
            end: EventTime::DateTimeUtc(end),
        });
    }

    let end_date = end.date_naive().checked_add_days(Days::new(1))?;

    Some(ResolvedEventTiming {
        is_all_day,
        start: EventTime::Date(start.date_naive()),
        end: EventTime::Date(end_date),
    })
}

/// Sub-second parts are ignored.
fn is_midnight(instant: &DateTime<Utc>) -> bool {
    instant.num_seconds_from_midnight() == 0
}
