use std::{fs, path::Path};

use anyhow::{Context, Result};
use squad_tactics_core::WorldConfig;

/// Loads the skirmish configuration, falling back to the demo battlefield.
pub(crate) fn load(path: Option<&Path>) -> Result<WorldConfig> {
    let Some(path) = path else {
        return Ok(WorldConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse(text: &str) -> Result<WorldConfig> {
    let config: WorldConfig = toml::from_str(text).context("malformed TOML")?;
    config.validate()?;
    Ok(config)
}
