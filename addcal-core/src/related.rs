//! The "related content" block: curated items first, then tag matches.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::constants::{DEFAULT_RELATED_LIMIT, EVENT_CONTENT_TYPE};
use crate::content::ContentNode;
use crate::render::Render;

/// Entity query for nodes sharing a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
    pub tag: String,
    pub content_type: String,
    /// Node to leave out of the results (the one being viewed)
    pub exclude: String,
    pub limit: usize,
}

/// Query and load collaborator for the related block.
///
/// `tagged` must only return published nodes of the requested type that
/// carry the tag, never the excluded id, and at most `limit` of them.
pub trait ContentQuery {
    fn tagged(&self, query: &TagQuery) -> Vec<String>;

    /// Load nodes in the order of `ids`, skipping unknown ones.
    fn load(&self, ids: &[String]) -> Vec<ContentNode>;
}

/// Merge curated and tag-matched ids: curated first, duplicates dropped
/// (first occurrence wins), capped at `limit`.
pub fn select_related<T>(curated: &[T], tagged: &[T], limit: usize) -> Vec<T>
where
    T: Clone + Eq + std::hash::Hash,
{
    let mut seen = HashSet::new();
    curated
        .iter()
        .chain(tagged)
        .filter(|id| seen.insert(*id))
        .take(limit)
        .cloned()
        .collect()
}

/// One entry of the rendered block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedItem {
    pub id: String,
    pub title: String,
}

/// Related content for a node.
pub struct RelatedBlock<'a, Q> {
    query: &'a Q,
    limit: usize,
}

impl<'a, Q: ContentQuery> RelatedBlock<'a, Q> {
    pub fn new(query: &'a Q) -> Self {
        RelatedBlock {
            query,
            limit: DEFAULT_RELATED_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Ids of the nodes related to `node`, in display order.
    pub fn related_ids(&self, node: &ContentNode) -> Vec<String> {
        let tagged = match &node.related_tag {
            Some(tag) => self.query.tagged(&TagQuery {
                tag: tag.clone(),
                content_type: EVENT_CONTENT_TYPE.to_string(),
                exclude: node.id.clone(),
                limit: self.limit,
            }),
            None => Vec::new(),
        };

        let ids = select_related(&node.related_events, &tagged, self.limit);
        debug!(
            node = %node.id,
            curated = node.related_events.len(),
            tagged = tagged.len(),
            selected = ids.len(),
            "selected related content"
        );
        ids
    }
}

impl<'n, Q: ContentQuery> Render<&'n ContentNode> for RelatedBlock<'_, Q> {
    type Output = Vec<RelatedItem>;

    fn render(&self, node: &'n ContentNode) -> Vec<RelatedItem> {
        let ids = self.related_ids(node);
        self.query
            .load(&ids)
            .into_iter()
            .map(|related| RelatedItem {
                id: related.id,
                title: related.title,
            })
            .collect()
    }
}
