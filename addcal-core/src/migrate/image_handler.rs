//! Turning inline `<img>` tags of legacy body markup into media embeds.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::expect_str;
use super::media::MediaLibrary;
use crate::error::AddCalResult;

static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid img regex"));

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z][a-z0-9_:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#)
        .expect("valid attribute regex")
});

/// An `<img>` tag found in body markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// The tag exactly as it appears in the markup
    pub tag: String,
    pub src: String,
    pub alt: String,
    pub title: String,
}

impl InlineImage {
    fn parse(tag: &str) -> Self {
        let mut image = InlineImage {
            tag: tag.to_string(),
            src: String::new(),
            alt: String::new(),
            title: String::new(),
        };

        for caps in ATTRIBUTE_RE.captures_iter(tag) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| html_escape::decode_html_entities(m.as_str()).into_owned())
                .unwrap_or_default();

            match caps[1].to_ascii_lowercase().as_str() {
                "src" => image.src = value,
                "alt" => image.alt = value,
                "title" => image.title = value,
                _ => {}
            }
        }

        image
    }

    /// Inline data URIs of PNGs are left alone.
    fn is_embedded_png(&self) -> bool {
        self.src.to_ascii_lowercase().contains("image/png")
    }
}

/// Find every `<img>` tag in `html`.
pub fn find_images(html: &str) -> Vec<InlineImage> {
    IMG_TAG_RE
        .find_iter(html)
        .map(|m| InlineImage::parse(m.as_str()))
        .collect()
}

/// Editor embed markup referencing a media entity.
pub fn media_embed(uuid: &Uuid) -> String {
    format!(
        "<drupal-entity data-align=\"\" data-embed-button=\"media_browser\" \
         data-entity-embed-display=\"view_mode:media.wysiwyg_original\" \
         data-entity-type=\"media\" data-entity-uuid=\"{uuid}\"></drupal-entity>"
    )
}

/// Rewrites inline images of a body value into media embeds.
pub struct ImageHandler<'a, M> {
    library: &'a mut M,
}

impl<'a, M: MediaLibrary> ImageHandler<'a, M> {
    pub fn new(library: &'a mut M) -> Self {
        ImageHandler { library }
    }

    /// Transform one body value.
    ///
    /// Returns `Ok(None)` for an empty value and `InvalidInputType` when the
    /// value is not a string. Images whose legacy file is missing stay as
    /// they are.
    pub fn transform(&mut self, value: &Value) -> AddCalResult<Option<String>> {
        let body = expect_str(value)?;
        if body.is_empty() {
            return Ok(None);
        }

        let mut rewritten = body.to_string();
        for image in find_images(body) {
            if image.src.is_empty() || image.is_embedded_png() {
                continue;
            }

            let uuid = match self.library.find_by_original_ref(&image.src) {
                Some(uuid) => Some(uuid),
                None => self.library.import_image(&image)?,
            };

            match uuid {
                Some(uuid) => rewritten = rewritten.replace(&image.tag, &media_embed(&uuid)),
                None => debug!(src = %image.src, "leaving inline image in place"),
            }
        }

        Ok(Some(url_decode(&rewritten)))
    }
}

/// Decode `+` and percent escapes the way form-encoded text is decoded.
fn url_decode(text: &str) -> String {
    percent_decode_str(&text.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}
