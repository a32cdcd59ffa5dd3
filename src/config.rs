// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::pagination::DEFAULT_PAGE_SIZE;

pub const ENV_CONFIG_PATH: &str = "NEWSSTAND_CONFIG_PATH";
pub const ENV_BASE_URL: &str = "NEWSSTAND_BASE_URL";

/// Session settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    /// Root of the published archive export.
    pub base_url: String,
    pub page_size: usize,
    pub search_debounce_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: 200,
            request_timeout_secs: 25,
        }
    }
}

impl BrowseConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn normalize(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = 1;
        }
        self.base_url = self.base_url.trim().to_string();
        self
    }
}

/// Load settings from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<BrowseConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
}

/// Load settings using env var + fallbacks:
/// 1) $NEWSSTAND_CONFIG_PATH
/// 2) config/newsstand.toml
/// 3) config/newsstand.json
/// 4) built-in defaults
///
/// $NEWSSTAND_BASE_URL, when set, overrides `base_url` from any source.
pub fn load_default() -> Result<BrowseConfig> {
    let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("NEWSSTAND_CONFIG_PATH points to non-existent path"));
        }
        load_from(&pb)?
    } else {
        let toml_p = PathBuf::from("config/newsstand.toml");
        let json_p = PathBuf::from("config/newsstand.json");
        if toml_p.exists() {
            load_from(&toml_p)?
        } else if json_p.exists() {
            load_from(&json_p)?
        } else {
            BrowseConfig::default()
        }
    };
    if let Ok(url) = std::env::var(ENV_BASE_URL) {
        if !url.trim().is_empty() {
            cfg.base_url = url.trim().to_string();
        }
    }
    Ok(cfg.normalize())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<BrowseConfig> {
    // Try TOML first unless the content plainly looks like JSON.
    let try_toml = hint_ext == "toml" || !s.trim_start().starts_with('{');
    if try_toml {
        if let Ok(v) = toml::from_str::<BrowseConfig>(s) {
            return Ok(v.normalize());
        }
    }
    if let Ok(v) = serde_json::from_str::<BrowseConfig>(s) {
        return Ok(v.normalize());
    }
    if !try_toml {
        if let Ok(v) = toml::from_str::<BrowseConfig>(s) {
            return Ok(v.normalize());
        }
    }
    Err(anyhow!("unsupported config format"))
}
