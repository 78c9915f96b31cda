use std::path::Path;

use addcal_core::addcal_config::AddCalConfig;
use addcal_core::display_date::display_date_for;
use anyhow::Result;
use owo_colors::OwoColorize;

use super::load_site;

pub fn run(config: &AddCalConfig, site: &Path, node_id: &str) -> Result<()> {
    let index = load_site(site)?;
    let node = index.require(node_id)?;
    let tz = config.tz()?;

    let date = display_date_for(node).with_timezone(&tz);
    let origin = if node.display_date.is_some() {
        "display date"
    } else {
        "last modified"
    };

    println!(
        "{} {}",
        date.format("%Y-%m-%d %H:%M %Z"),
        format!("({origin})").dimmed()
    );

    Ok(())
}
