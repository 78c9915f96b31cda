use addcal_core::addcal_config::AddCalConfig;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run(config: &AddCalConfig) -> Result<()> {
    let config_path = AddCalConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:        {}", config_path.display());
    println!("  Media source:  {}", config.media.source_path().display());
    println!("  Media dest:    {}", config.media.dest_path().display());
    if let Some(manifest) = config.media.manifest_path() {
        println!("  Manifest:      {}", manifest.display());
    }

    println!();
    println!("{}", "Settings".bold());
    print!("{}", config.to_toml()?);

    Ok(())
}
