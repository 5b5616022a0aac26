use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::cli::OutputFormat;

/// Defaults for the CLI, optionally loaded from a TOML file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub category: String,
    pub key: String,
    pub format: OutputFormat,
    pub allow_missing: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            category: "Root".into(),
            key: "root".into(),
            format: OutputFormat::Text,
            allow_missing: false,
        }
    }
}

impl CliConfig {
    /// Load from `path`, or fall back to the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
