use std::path::Path;

use addcal_core::addcal_config::AddCalConfig;
use addcal_core::related::RelatedBlock;
use addcal_core::render::Render;
use anyhow::Result;
use owo_colors::OwoColorize;

use super::load_site;

pub fn run(config: &AddCalConfig, site: &Path, node_id: &str, limit: Option<usize>) -> Result<()> {
    let index = load_site(site)?;
    let node = index.require(node_id)?;

    let block = RelatedBlock::new(&index).with_limit(limit.unwrap_or(config.related_limit));
    let items = block.render(node);

    if items.is_empty() {
        println!("{}", "No related content".dimmed());
        return Ok(());
    }

    println!("{}", format!("Related to {}", node.title).bold());
    for item in &items {
        println!("  {} {}", format!("[{}]", item.id).dimmed(), item.title);
    }

    Ok(())
}
