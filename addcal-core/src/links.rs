//! Canonical URL resolution for content.

use url::Url;

use crate::error::{AddCalError, AddCalResult};

/// Resolves the canonical absolute URL of a content item.
pub trait UrlResolver {
    fn canonical_url(&self, id: &str) -> String;
}

/// Resolves `node/<id>` against a site base URL.
#[derive(Debug, Clone)]
pub struct BaseUrlResolver {
    base: Url,
}

impl BaseUrlResolver {
    pub fn new(base_url: &str) -> AddCalResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| AddCalError::Config(format!("Invalid base_url '{base_url}': {e}")))?;

        if base.cannot_be_a_base() {
            return Err(AddCalError::Config(format!(
                "base_url '{base_url}' cannot be used as a base"
            )));
        }

        Ok(BaseUrlResolver { base })
    }
}

impl UrlResolver for BaseUrlResolver {
    fn canonical_url(&self, id: &str) -> String {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("node").push(id);
        }
        url.to_string()
    }
}
