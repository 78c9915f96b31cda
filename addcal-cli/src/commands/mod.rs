pub mod config;
pub mod display_date;
pub mod dropdown;
pub mod file_type;
pub mod ics;
pub mod migrate;
pub mod related;

use std::path::Path;

use addcal_core::content::ContentIndex;
use anyhow::{Context, Result};

/// Load a site export, with the path in the error message.
fn load_site(path: &Path) -> Result<ContentIndex> {
    ContentIndex::load(path).with_context(|| format!("Failed to load site export {}", path.display()))
}
