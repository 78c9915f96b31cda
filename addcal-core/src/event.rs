//! Event types shared by the ICS builder and the content boundary.
//!
//! `EventSource` is what the host hands us for a single event node. The
//! builder turns it into a `CalendarEvent`, holding the
//! rendered text plus a suggested filename.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DATE_FORMAT, DATETIME_FORMAT, ICS_MIME_TYPE};

/// Descriptive fields of an event, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSource {
    /// Stable identifier, used for UID generation
    pub id: String,
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Explicit all-day checkbox, when the content type has one
    pub all_day: Option<bool>,
    pub location: Option<String>,
    /// Long-form body markup
    pub body_html: Option<String>,
    /// Editor-written summary of the body
    pub body_summary: Option<String>,
    /// Absolute URL of the event page
    pub canonical_url: String,
    pub created: DateTime<Utc>,
    pub changed: DateTime<Utc>,
}

/// A calendar boundary value: either a whole day or a UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    Date(NaiveDate),
    DateTimeUtc(DateTime<Utc>),
}

impl EventTime {
    /// Render the value in its iCalendar form (`YYYYMMDD` or `YYYYMMDDTHHMMSSZ`).
    pub fn to_ics_value(&self) -> String {
        match self {
            EventTime::Date(d) => d.format(DATE_FORMAT).to_string(),
            EventTime::DateTimeUtc(dt) => dt.format(DATETIME_FORMAT).to_string(),
        }
    }
}

/// Start/end of an event after all-day detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEventTiming {
    pub is_all_day: bool,
    pub start: EventTime,
    /// Exclusive when all-day
    pub end: EventTime,
}

/// A generated .ics document with its suggested download filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    content: String,
    filename: String,
}

impl CalendarEvent {
    pub(crate) fn new(content: String, filename: String) -> Self {
        CalendarEvent { content, filename }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &'static str {
        ICS_MIME_TYPE
    }

    /// Value for a `Content-Disposition` header offering the file as a download.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    pub fn into_content(self) -> String {
        self.content
    }
}
