/// Prefix for generated event UIDs.
pub const DEFAULT_UID_PREFIX: &str = "calendar-";

/// Product identifier written to every generated calendar.
pub const DEFAULT_PRODID: &str = "-//addcal//NONSGML addcal event export//EN";

pub const ICS_VERSION: &str = "2.0";
pub const ICS_METHOD: &str = "PUBLISH";
pub const ICS_MIME_TYPE: &str = "text/calendar; charset=utf-8";

/// UTC date-time value format (`YYYYMMDDTHHMMSSZ`).
pub const DATETIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";
/// All-day date value format (`YYYYMMDD`).
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Number of related items shown by default.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Content type the related block queries for.
pub const EVENT_CONTENT_TYPE: &str = "event";
