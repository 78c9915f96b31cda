use std::path::{Path, PathBuf};

use addcal_core::addcal_config::AddCalConfig;
use addcal_core::migrate::{FileMediaLibrary, ImageHandler};
use anyhow::{Context, Result};
use serde_json::Value;

pub fn run(config: &AddCalConfig, file: &Path, manifest: Option<PathBuf>) -> Result<()> {
    let body = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let media = &config.media;
    let mut library =
        FileMediaLibrary::new(media.source_path(), media.dest_path(), media.owner_id);

    let manifest = manifest.or_else(|| media.manifest_path());
    if let Some(path) = &manifest {
        library.load_manifest(path)?;
    }

    let rewritten = ImageHandler::new(&mut library).transform(&Value::String(body))?;

    if let Some(path) = &manifest {
        library
            .save_manifest(path)
            .with_context(|| format!("Failed to save media manifest {}", path.display()))?;
    }

    if let Some(rewritten) = rewritten {
        println!("{rewritten}");
    }

    Ok(())
}
