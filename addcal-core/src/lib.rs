//! Core of addcal: turning CMS content into things other systems consume.
//!
//! - `ics`: single-event iCalendar files for event nodes
//! - `related`: the curated-then-tagged related content block
//! - `display_date`: the computed display date of a node
//! - `widget`: the integer dropdown form widget
//! - `migrate`: process steps for migrating legacy body markup and files
//!
//! Host services (entity queries, term lookups, URL routing, clock, random
//! source) are traits passed in by the caller.

pub mod addcal_config;
pub mod clock;
pub mod constants;
pub mod content;
pub mod display_date;
pub mod error;
pub mod event;
pub mod ics;
pub mod links;
pub mod migrate;
pub mod related;
pub mod render;
pub mod summary;
pub mod timing;
pub mod widget;

pub use error::{AddCalError, AddCalResult};
pub use event::{CalendarEvent, EventSource, EventTime, ResolvedEventTiming};
