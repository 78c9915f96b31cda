use addcal_core::migrate::{SkipByFileType, SkipMethod, SkipOutcome};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::Value;

pub fn run(path: &str, values: Vec<String>, not_equals: bool, method: SkipMethod) -> Result<()> {
    let plugin = SkipByFileType {
        values,
        not_equals,
        method,
    };

    match plugin.transform(&Value::String(path.to_string()))? {
        SkipOutcome::Keep(mime) => println!("{} {}", "keep".green(), mime),
        SkipOutcome::SkipRow(reason) => println!("{} {}", "skip row".yellow(), reason),
        SkipOutcome::SkipProcess(reason) => println!("{} {}", "skip process".yellow(), reason),
    }

    Ok(())
}
