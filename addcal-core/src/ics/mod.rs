//! ICS file generation and parsing.
//!
//! This module renders single-event calendars according to RFC 5545 and
//! reads their properties back.

mod generate;
mod parse;

pub use generate::{IcsBuilder, IcsOptions};
pub use parse::{IcsProperty, parse_properties};
