//! Board configuration loading.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use quakesafe_core::GridConfig;

/// Resolves the board configuration from an optional TOML file and a size override.
pub(crate) fn load(path: Option<&Path>, size: Option<u32>) -> Result<GridConfig> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => GridConfig::default(),
    };

    if let Some(size) = size {
        config.size = size;
    }

    config
        .validate()
        .context("board configuration is invalid")?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<GridConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read board configuration at {}", path.display()))?;
    parse(&contents)
        .with_context(|| format!("failed to parse board configuration at {}", path.display()))
}

fn parse(contents: &str) -> Result<GridConfig> {
    toml::from_str(contents).context("board configuration is not valid toml")
}
