//! ICS file generation.

use std::borrow::Cow;
use std::fmt;

use icalendar::{Property, ValueType};
use rand::RngCore;
use rand::rngs::ThreadRng;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::constants::{
    DATETIME_FORMAT, DEFAULT_PRODID, DEFAULT_UID_PREFIX, ICS_METHOD, ICS_VERSION,
};
use crate::event::{CalendarEvent, EventSource, EventTime};
use crate::summary::{sanitize_filename, summarize, summary_source};
use crate::timing::resolve_timing;

/// Settings that shape the generated calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsOptions {
    pub uid_prefix: String,
    pub prodid: String,
    /// Truncate the description (before the URL is appended) to this many characters
    pub summary_max_length: Option<usize>,
}

impl Default for IcsOptions {
    fn default() -> Self {
        IcsOptions {
            uid_prefix: DEFAULT_UID_PREFIX.to_string(),
            prodid: DEFAULT_PRODID.to_string(),
            summary_max_length: None,
        }
    }
}

/// Builds single-event iCalendar documents.
///
/// The clock (for DTSTAMP) and the random source (for the UID nonce) are
/// injected; tests pass a `FixedClock` and a `StepRng` to get stable output.
pub struct IcsBuilder<C = SystemClock, R = ThreadRng> {
    options: IcsOptions,
    clock: C,
    rng: R,
}

impl IcsBuilder {
    pub fn new(options: IcsOptions) -> Self {
        IcsBuilder::with_sources(options, SystemClock, rand::thread_rng())
    }
}

impl<C: Clock, R: RngCore> IcsBuilder<C, R> {
    pub fn with_sources(options: IcsOptions, clock: C, rng: R) -> Self {
        IcsBuilder {
            options,
            clock,
            rng,
        }
    }

    pub fn options(&self) -> &IcsOptions {
        &self.options
    }

    /// Generate the calendar file for an event.
    ///
    /// Returns `None` when the event has no start or end date; there is
    /// nothing to put on a calendar then.
    pub fn build_event(&mut self, source: &EventSource) -> Option<CalendarEvent> {
        let (Some(start), Some(end)) = (source.start, source.end) else {
            debug!(id = %source.id, "event has no date range, skipping ics export");
            return None;
        };

        let Some(timing) = resolve_timing(start, end, source.all_day) else {
            warn!(id = %source.id, %end, "event end date out of range");
            return None;
        };

        let id = strip_controls(&source.id);
        let url = strip_controls(&source.canonical_url);

        let summary = summarize(
            summary_source(source.body_summary.as_deref(), source.body_html.as_deref()),
            self.options.summary_max_length,
        );
        let description = format!("{summary} {url}");

        // Not stable across calls: repeated exports of one event get new UIDs.
        let uid = format!(
            "{}{}{}{}",
            self.options.uid_prefix,
            id,
            timing.start.to_ics_value(),
            self.rng.next_u32()
        );

        let calendar = [
            Property::new("VERSION", ICS_VERSION),
            Property::new("PRODID", &self.options.prodid),
            Property::new("METHOD", ICS_METHOD),
        ];

        let mut url_property = Property::new("URL", &*url);
        url_property.append_parameter(ValueType::Uri);

        let event = [
            Property::new("UID", uid),
            Property::new("DTSTAMP", self.clock.now().format(DATETIME_FORMAT).to_string()),
            Property::new("CREATED", source.created.format(DATETIME_FORMAT).to_string()),
            Property::new("DESCRIPTION", newlines_to_lf(&description)),
            datetime_property("DTSTART", &timing.start),
            datetime_property("DTEND", &timing.end),
            Property::new("LAST-MODIFIED", source.changed.format(DATETIME_FORMAT).to_string()),
            Property::new(
                "LOCATION",
                newlines_to_lf(source.location.as_deref().unwrap_or_default()),
            ),
            Property::new("SUMMARY", newlines_to_lf(&source.title)),
            url_property,
        ];

        let content = match render_calendar(calendar, event) {
            Ok(content) => content,
            Err(e) => {
                warn!(id = %source.id, error = %e, "failed to render ics");
                return None;
            }
        };
        let filename = format!("{}.ics", sanitize_filename(&source.title));

        debug!(id = %source.id, all_day = timing.is_all_day, %filename, "generated ics");

        Some(CalendarEvent::new(content, filename))
    }
}

fn datetime_property(name: &str, time: &EventTime) -> Property {
    let mut prop = Property::new(name, time.to_ics_value());
    if let EventTime::Date(_) = time {
        prop.append_parameter(ValueType::Date);
    }
    prop
}

/// Lay out the calendar and its single event in order. Properties are
/// escaped and folded by `icalendar`; the document has no trailing CRLF.
fn render_calendar<const N: usize, const M: usize>(
    calendar: [Property; N],
    event: [Property; M],
) -> Result<String, fmt::Error> {
    let mut out = String::from("BEGIN:VCALENDAR\r\n");
    for property in calendar {
        let line: String = property.try_into()?;
        out.push_str(&line);
    }

    out.push_str("BEGIN:VEVENT\r\n");
    for property in event {
        let line: String = property.try_into()?;
        out.push_str(&line);
    }
    out.push_str("END:VEVENT\r\nEND:VCALENDAR");

    Ok(out)
}

/// Identifiers and URLs never carry control characters; a line break in
/// one would start a new content line.
fn strip_controls(value: &str) -> Cow<'_, str> {
    if value.chars().any(char::is_control) {
        Cow::Owned(value.chars().filter(|c| !c.is_control()).collect())
    } else {
        Cow::Borrowed(value)
    }
}

/// TEXT escaping covers `\n` only; a bare CR would otherwise reach the output.
fn newlines_to_lf(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n")
}
