//! Skipping migration rows by the MIME type of the file they reference.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::expect_str;
use crate::error::AddCalResult;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Detect the MIME type of a file, sniffing its first bytes when the file
/// is readable and falling back to the extension otherwise.
pub fn detect_mime_type(path: &Path) -> String {
    sniff(path)
        .or_else(|| by_extension(path))
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}

fn sniff(path: &Path) -> Option<&'static str> {
    let mut head = [0u8; 16];
    let read = File::open(path).and_then(|mut f| f.read(&mut head)).ok()?;
    let head = &head[..read];

    match head {
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'%', b'P', b'D', b'F', ..] => Some("application/pdf"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        [b'P', b'K', 0x03, 0x04, ..] => Some("application/zip"),
        _ => None,
    }
}

fn by_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        _ => return None,
    };
    Some(mime)
}

/// What a matching row value causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipMethod {
    /// Skip the whole row
    #[default]
    Row,
    /// Stop processing this property only
    Process,
}

/// Result of the skip check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipOutcome {
    /// Not skipped; carries the detected MIME type onward
    Keep(String),
    SkipRow(String),
    SkipProcess(String),
}

/// Skip rows whose file has (or, with `not_equals`, lacks) one of the
/// configured MIME types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipByFileType {
    pub values: Vec<String>,
    #[serde(default)]
    pub not_equals: bool,
    #[serde(default)]
    pub method: SkipMethod,
}

impl SkipByFileType {
    pub fn transform(&self, value: &Value) -> AddCalResult<SkipOutcome> {
        let path = expect_str(value)?;
        let mime = detect_mime_type(Path::new(path));

        let listed = self.values.iter().any(|v| v.eq_ignore_ascii_case(&mime));
        if listed == self.not_equals {
            return Ok(SkipOutcome::Keep(mime));
        }

        let message = if self.not_equals {
            format!("{path}: type {mime} is not one of the accepted types")
        } else {
            format!("{path}: type {mime} is excluded")
        };
        debug!(%message, method = ?self.method, "skipping by file type");

        Ok(match self.method {
            SkipMethod::Row => SkipOutcome::SkipRow(message),
            SkipMethod::Process => SkipOutcome::SkipProcess(message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AddCalError;
    use serde_json::json;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> String {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(bytes).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_detect_sniffs_content_over_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "photo.jpg", b"GIF89a\x01\x00\x01\x00");
        assert_eq!(detect_mime_type(Path::new(&path)), "image/gif");
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        assert_eq!(detect_mime_type(Path::new("/missing/scan.PDF")), "application/pdf");
        assert_eq!(
            detect_mime_type(Path::new("/missing/archive.xyz")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_not_equals_keeps_accepted_types() {
        let dir = tempfile::tempdir().unwrap();
        let gif = write_file(dir.path(), "a.gif", b"GIF87a");
        let pdf = write_file(dir.path(), "b.pdf", b"%PDF-1.7");

        let plugin = SkipByFileType {
            values: vec!["image/gif".into(), "image/jpeg".into()],
            not_equals: true,
            method: SkipMethod::Row,
        };

        assert_eq!(
            plugin.transform(&json!(gif)).unwrap(),
            SkipOutcome::Keep("image/gif".into())
        );
        assert!(matches!(
            plugin.transform(&json!(pdf)).unwrap(),
            SkipOutcome::SkipRow(_)
        ));
    }

    #[test]
    fn test_equals_skips_listed_types_per_process() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_file(dir.path(), "c.png", b"\x89PNG\r\n\x1a\n");

        let plugin = SkipByFileType {
            values: vec!["image/png".into()],
            not_equals: false,
            method: SkipMethod::Process,
        };
        assert!(matches!(
            plugin.transform(&json!(png)).unwrap(),
            SkipOutcome::SkipProcess(_)
        ));
    }

    #[test]
    fn test_non_string_value_is_rejected() {
        let plugin = SkipByFileType {
            values: vec![],
            not_equals: false,
            method: SkipMethod::Row,
        };
        let err = plugin.transform(&json!(42)).unwrap_err();
        assert!(matches!(err, AddCalError::InvalidInputType(_)));
    }

    #[test]
    fn test_method_deserializes_lowercase() {
        let plugin: SkipByFileType =
            serde_json::from_value(json!({ "values": ["image/gif"], "method": "process" }))
                .unwrap();
        assert_eq!(plugin.method, SkipMethod::Process);
        assert!(!plugin.not_equals);
    }
}
