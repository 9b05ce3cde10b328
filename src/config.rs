use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// On-disk configuration (JSON), pointing the process at one remote store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub token: String,

    /// Restrict the mount to the subtree reachable from this record.
    #[serde(default)]
    pub root_id: Option<String>,

    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: Config = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config {}", path.display()))?;
        if cfg.base_url.is_empty() {
            return Err(anyhow!("config {}: base_url is empty", path.display()));
        }
        Ok(cfg)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS))
    }
}

#[cfg(test)]
#[path = "tests/config/config_tests.rs"]
mod tests;
