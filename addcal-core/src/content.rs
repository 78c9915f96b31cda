//! Content records exported from the site, and the in-memory index over them.
//!
//! A [`SiteExport`] is a JSON document holding nodes and taxonomy terms. It
//! stands in for the framework's entity storage: [`ContentIndex`] answers the
//! entity queries the related block needs and the term lookups the ICS export
//! needs.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::display_date::parse_instant;
use crate::error::{AddCalError, AddCalResult};
use crate::event::EventSource;
use crate::links::UrlResolver;
use crate::related::{ContentQuery, TagQuery};

/// A date range field as stored by the site (UTC strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRangeValue {
    pub value: Option<String>,
    pub end_value: Option<String>,
}

/// A long text field with an optional editor summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextWithSummary {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// A taxonomy term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    pub name: String,
}

/// A content node with the fields the helpers in this crate read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default = "default_published")]
    pub published: bool,
    pub created: DateTime<Utc>,
    pub changed: DateTime<Utc>,

    // Event fields
    #[serde(default)]
    pub event_date: Option<DateRangeValue>,
    #[serde(default)]
    pub all_day: Option<bool>,
    /// Term id of the event location
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub body: Option<TextWithSummary>,

    // Related content
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub related_tag: Option<String>,
    /// Editor-curated related node ids, in display order
    #[serde(default)]
    pub related_events: Vec<String>,

    /// Editor override for the display date
    #[serde(default)]
    pub display_date: Option<String>,
}

fn default_published() -> bool {
    true
}

/// Looks up taxonomy term names.
pub trait TermLookup {
    fn term_name(&self, id: &str) -> Option<String>;
}

impl ContentNode {
    /// Convert the node into the input of the ICS builder.
    ///
    /// Malformed or missing dates become `None` so the builder reports the
    /// event as having no date. A location term that can't be found leaves
    /// the location empty.
    pub fn to_event_source(
        &self,
        terms: &impl TermLookup,
        urls: &impl UrlResolver,
    ) -> EventSource {
        let (start, end) = match &self.event_date {
            Some(range) => (
                self.parse_date_field("value", range.value.as_deref()),
                self.parse_date_field("end_value", range.end_value.as_deref()),
            ),
            None => (None, None),
        };

        let location = self.location.as_deref().and_then(|term_id| {
            let name = terms.term_name(term_id);
            if name.is_none() {
                debug!(node = %self.id, term = term_id, "location term not found");
            }
            name
        });

        let body = self.body.clone().unwrap_or_default();

        EventSource {
            id: self.id.clone(),
            title: self.title.clone(),
            start,
            end,
            all_day: self.all_day,
            location,
            body_html: body.value,
            body_summary: body.summary,
            canonical_url: urls.canonical_url(&self.id),
            created: self.created,
            changed: self.changed,
        }
    }

    fn parse_date_field(&self, field: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
        let raw = raw?;
        let parsed = parse_instant(raw);
        if parsed.is_none() {
            warn!(node = %self.id, field, value = raw, "malformed event date");
        }
        parsed
    }
}

/// The on-disk export format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteExport {
    #[serde(default)]
    pub nodes: Vec<ContentNode>,
    #[serde(default)]
    pub terms: Vec<Term>,
}

/// In-memory content store built from a [`SiteExport`].
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    nodes: Vec<ContentNode>,
    positions: HashMap<String, usize>,
    terms: HashMap<String, String>,
}

impl ContentIndex {
    pub fn new(export: SiteExport) -> Self {
        let positions = export
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();
        let terms = export
            .terms
            .into_iter()
            .map(|term| (term.id, term.name))
            .collect();

        ContentIndex {
            nodes: export.nodes,
            positions,
            terms,
        }
    }

    pub fn from_json(json: &str) -> AddCalResult<Self> {
        let export: SiteExport = serde_json::from_str(json)?;
        Ok(ContentIndex::new(export))
    }

    pub fn load(path: &Path) -> AddCalResult<Self> {
        let json = std::fs::read_to_string(path)?;
        ContentIndex::from_json(&json).map_err(|e| {
            AddCalError::Serialization(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    pub fn get(&self, id: &str) -> Option<&ContentNode> {
        self.positions.get(id).map(|&i| &self.nodes[i])
    }

    pub fn require(&self, id: &str) -> AddCalResult<&ContentNode> {
        self.get(id)
            .ok_or_else(|| AddCalError::NotFound(format!("node '{id}'")))
    }

    pub fn nodes(&self) -> &[ContentNode] {
        &self.nodes
    }
}

impl TermLookup for ContentIndex {
    fn term_name(&self, id: &str) -> Option<String> {
        self.terms.get(id).cloned()
    }
}

impl ContentQuery for ContentIndex {
    fn tagged(&self, query: &TagQuery) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|node| node.published)
            .filter(|node| node.content_type == query.content_type)
            .filter(|node| node.tags.iter().any(|tag| *tag == query.tag))
            .filter(|node| node.id != query.exclude)
            .take(query.limit)
            .map(|node| node.id.clone())
            .collect()
    }

    fn load(&self, ids: &[String]) -> Vec<ContentNode> {
        ids.iter().filter_map(|id| self.get(id)).cloned().collect()
    }
}
