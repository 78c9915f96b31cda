use addcal_core::render::Render;
use addcal_core::widget::{IntegerDropdown, IntegerFieldSettings};
use anyhow::Result;

pub fn run(
    min: i64,
    max: i64,
    prefix: Option<String>,
    suffix: Option<String>,
    value: Option<i64>,
) -> Result<()> {
    let dropdown = IntegerDropdown::new(IntegerFieldSettings {
        min,
        max,
        prefix,
        suffix,
    })?;

    let element = dropdown.render(value);
    println!("{}", serde_json::to_string_pretty(&element)?);

    Ok(())
}
