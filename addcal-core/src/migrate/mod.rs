//! Process steps used while migrating legacy content.
//!
//! Each step receives a raw row value (`serde_json::Value`) and either
//! transforms it or reports that it has the wrong shape.

mod file_type;
mod image_handler;
mod media;

pub use file_type::{SkipByFileType, SkipMethod, SkipOutcome, detect_mime_type};
pub use image_handler::{ImageHandler, InlineImage, media_embed};
pub use media::{FileMediaLibrary, MediaEntity, MediaLibrary};

use serde_json::Value;

use crate::error::{AddCalError, AddCalResult};

/// Borrow the value as a string, or fail with `InvalidInputType`.
pub(crate) fn expect_str(value: &Value) -> AddCalResult<&str> {
    value
        .as_str()
        .ok_or_else(|| AddCalError::InvalidInputType(format!("{value} is not a string")))
}
