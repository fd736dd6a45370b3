//! Config command implementation - print or write aligntree.toml

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;

pub fn execute(config: &Config, example: bool, output: Option<PathBuf>) -> Result<()> {
    if let Some(path) = output {
        Config::default().save_to_file(&path)?;
        log::info!("Default configuration written to: {}", path.display());
        return Ok(());
    }

    if example {
        print!("{}", Config::example_toml()?);
    } else {
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}
