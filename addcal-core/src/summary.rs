//! Plain-text summaries of body markup, and download filenames.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("valid tag regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Pick the text an event description is built from: the summary when it
/// has content, the full body otherwise.
pub fn summary_source<'a>(summary: Option<&'a str>, body: Option<&'a str>) -> &'a str {
    match summary {
        Some(s) if !s.trim().is_empty() => s,
        _ => body.unwrap_or_default(),
    }
}

/// Strip markup from `html` and normalize it to a single line of text.
///
/// Paragraph ends become spaces so adjacent paragraphs (or table cells)
/// don't run together, non-breaking spaces become plain spaces, whitespace
/// runs collapse to one space and HTML entities are decoded.
pub fn strip_markup(html: &str) -> String {
    let spaced = html.replace("</p>", "</p> ");
    let stripped = TAG_RE.replace_all(&spaced, "");
    let spaced = stripped
        .replace("&nbsp;", " ")
        .replace(['\u{a0}', '\n'], " ");
    let collapsed = WHITESPACE_RE.replace_all(spaced.trim(), " ");

    html_escape::decode_html_entities(&collapsed).into_owned()
}

/// Truncate `text` to at most `max_chars` characters without splitting a word.
///
/// The cut always lands on a space of the original text. When the first
/// word alone is longer than `max_chars` nothing fits and the result is empty.
pub fn truncate_words(text: &str, max_chars: usize) -> &str {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text;
    };

    if text[cut..].starts_with(' ') {
        return text[..cut].trim_end();
    }

    match text[..cut].rfind(' ') {
        Some(space) => text[..space].trim_end(),
        None => "",
    }
}

/// Build the plain-text summary of an event body, optionally truncated.
pub fn summarize(html: &str, max_chars: Option<usize>) -> String {
    let text = strip_markup(html);
    match max_chars {
        Some(max) => truncate_words(&text, max).to_string(),
        None => text,
    }
}

/// Replace every character outside `[A-Za-z0-9-]` with a space.
pub fn sanitize_filename(title: &str) -> Cow<'_, str> {
    if title.chars().all(is_filename_char) {
        return Cow::Borrowed(title);
    }

    Cow::Owned(
        title
            .chars()
            .map(|c| if is_filename_char(c) { c } else { ' ' })
            .collect(),
    )
}

fn is_filename_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_source_prefers_summary() {
        assert_eq!(summary_source(Some("Short"), Some("<p>Long</p>")), "Short");
        assert_eq!(summary_source(Some("  "), Some("<p>Long</p>")), "<p>Long</p>");
        assert_eq!(summary_source(None, Some("<p>Long</p>")), "<p>Long</p>");
        assert_eq!(summary_source(None, None), "");
    }

    #[test]
    fn test_strip_markup_separates_paragraphs() {
        let html = "<p>First paragraph.</p><p>Second&nbsp;one.</p>";
        assert_eq!(strip_markup(html), "First paragraph. Second one.");
    }

    #[test]
    fn test_strip_markup_collapses_whitespace_and_decodes_entities() {
        let html = "<div>\n  Tom &amp; Jerry\u{a0}\u{a0}&quot;live&quot;\t</div>\n<!-- note -->";
        assert_eq!(strip_markup(html), "Tom & Jerry \"live\"");
    }

    #[test]
    fn test_truncate_words_never_splits_a_word() {
        let text = "The quarterly planning meeting for all staff";

        for max in 0..=text.len() + 2 {
            let out = truncate_words(text, max);
            assert!(out.chars().count() <= max, "too long for {max}: {out:?}");
            assert!(text.starts_with(out));

            let rest = &text[out.len()..];
            assert!(
                out.is_empty() || rest.is_empty() || rest.starts_with(' '),
                "cut mid-word at {max}: {out:?}"
            );
        }
    }

    #[test]
    fn test_truncate_words_shorter_than_first_word_is_empty() {
        let text = "The quarterly planning meeting";
        for max in 0..3 {
            assert_eq!(truncate_words(text, max), "");
        }
        assert_eq!(truncate_words(text, 3), "The");
    }

    #[test]
    fn test_truncate_words_at_exact_boundary() {
        assert_eq!(truncate_words("alpha beta gamma", 10), "alpha beta");
        assert_eq!(truncate_words("alpha beta gamma", 12), "alpha beta");
        assert_eq!(truncate_words("alpha beta gamma", 16), "alpha beta gamma");
        assert_eq!(truncate_words("alphabet", 3), "");
    }

    #[test]
    fn test_truncate_words_counts_characters() {
        assert_eq!(truncate_words("café crème brûlée", 10), "café crème");
    }

    #[test]
    fn test_summarize_truncates_after_stripping() {
        let html = "<p><strong>Join us</strong> for the annual picnic in the park.</p>";
        assert_eq!(summarize(html, Some(20)), "Join us for the");
        assert_eq!(
            summarize(html, None),
            "Join us for the annual picnic in the park."
        );
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Board Meeting: Q3/Q4"), "Board Meeting  Q3 Q4");
        assert_eq!(sanitize_filename("fall-fest-2024"), "fall-fest-2024");
        assert_eq!(sanitize_filename("Café"), "Caf ");
    }

    #[test]
    fn test_sanitize_filename_is_idempotent() {
        for title in ["Board Meeting: Q3/Q4", "Tom & Jerry's", "ünïcödé", "", "a-b c"] {
            let once = sanitize_filename(title).into_owned();
            assert_eq!(sanitize_filename(&once), once);
        }
    }
}
