//! Site configuration loaded from `~/.config/dramaid/config.toml`.
//!
//! Every field has a default matching the live site, so the file is optional.
//!
//! ```toml
//! main_url = "https://dramaid.nl"
//! special_signature = "motonews"
//! timeout_secs = 20
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Site endpoints, host rewrite rules and transport timeouts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL of the catalog site; relative links are completed against it.
    pub main_url: String,
    /// Provider display name attached to every resolved link.
    pub name: String,
    /// Legacy embed host that is rewritten before classification.
    pub legacy_host: String,
    /// Replacement for [`SiteConfig::legacy_host`].
    pub current_host: String,
    /// Host substring that routes a candidate to the built-in Drive path.
    pub special_signature: String,
    /// Referer presented to the player for Drive links.
    pub drive_referer: String,
    /// Source label for Drive links.
    pub drive_provider: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            main_url: "https://dramaid.nl".to_string(),
            name: "DramaId".to_string(),
            legacy_host: "https://ndrama.xyz".to_string(),
            current_host: "https://www.fembed.com".to_string(),
            special_signature: "motonews".to_string(),
            drive_referer: "https://motonews.club/".to_string(),
            drive_provider: "Drive".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl SiteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Referer hint handed to external extractors (`{main_url}/`).
    pub fn referer_hint(&self) -> String {
        format!("{}/", self.main_url.trim_end_matches('/'))
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid site config")
    }

    /// Load from an explicit path. Missing files yield the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    /// Load from `~/.config/dramaid/config.toml`.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir().join("config.toml"))
    }
}

/// Return the `dramaid` configuration directory.
pub(crate) fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dramaid")
}
