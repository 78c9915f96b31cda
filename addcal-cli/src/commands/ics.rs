use std::path::Path;

use addcal_core::addcal_config::AddCalConfig;
use addcal_core::ics::IcsBuilder;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::load_site;

pub fn run(
    config: &AddCalConfig,
    site: &Path,
    node_id: &str,
    out_dir: &Path,
    stdout: bool,
    max_length: Option<usize>,
) -> Result<()> {
    let index = load_site(site)?;
    let node = index.require(node_id)?;
    let urls = config.url_resolver()?;

    let source = node.to_event_source(&index, &urls);

    let mut options = config.ics_options();
    if max_length.is_some() {
        options.summary_max_length = max_length;
    }

    let Some(event) = IcsBuilder::new(options).build_event(&source) else {
        anyhow::bail!(
            "'{}' (node {}) has no event date, so it cannot be exported",
            node.title,
            node.id
        );
    };

    if stdout {
        print!("{}", event.content());
        return Ok(());
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let path = out_dir.join(event.filename());
    std::fs::write(&path, event.content())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} {}", "Wrote".green(), path.display());
    println!("  {}", event.mime_type().dimmed());

    Ok(())
}
