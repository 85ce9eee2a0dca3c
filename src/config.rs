// ABOUTME: Tool configuration loaded from an optional TOML file
// ABOUTME: CLI flags override file values; everything has a default

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::remote::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub chunk_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            chunk_size: 1000,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
