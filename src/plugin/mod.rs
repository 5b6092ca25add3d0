//! External extractors for embed hosts other than Drive.
//!
//! Plugins are external binaries that receive a player URL and return the
//! playable links behind it.
//! Protocol: binary receives JSON on stdin, returns JSON on stdout.
//!
//! # Configuration
//!
//! Plugins are defined in `~/.config/dramaid/plugins.toml`:
//!
//! ```toml
//! [[plugins]]
//! name = "fembed"
//! binary = "/usr/local/bin/dramaid-fembed"
//! patterns = ["fembed\\.com/v/.*"]
//! ```
//!
//! # Protocol
//!
//! Input (JSON on stdin):
//! ```json
//! {"url": "https://www.fembed.com/v/abc", "referer": "https://dramaid.nl/"}
//! ```
//!
//! Output (JSON on stdout):
//! ```json
//! {"links": [{"url": "https://…/720.mp4", "quality": "720p"}],
//!  "subtitles": [{"label": "English", "url": "https://…/en.vtt"}]}
//! ```

pub mod config;
pub mod runner;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::links::ResolvedMedia;

pub use config::{load_plugins, PluginConfig};
pub use runner::PluginRunner;

/// Resolves player URLs for one family of embed hosts.
#[async_trait]
pub trait ExternalExtractor: Send + Sync {
    /// Extractor name used in logs and as the link source label.
    fn name(&self) -> &str;

    /// Check if this extractor handles the given URL.
    fn matches(&self, url: &str) -> bool;

    /// Resolve `url`, presenting `referer` where the host requires one.
    async fn extract(&self, url: &str, referer: &str) -> Result<ResolvedMedia>;
}

/// Routes external candidates to extractors.
///
/// Extractors are checked in registration order. First match wins.
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn ExternalExtractor>>,
}

impl ExtractorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from plugin configurations, each run bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if any plugin has an invalid URL pattern.
    pub fn from_plugins(configs: Vec<PluginConfig>, timeout: Duration) -> Result<Self> {
        let mut registry = Self::new();
        for config in configs {
            registry.register(Box::new(PluginRunner::new(config, timeout)?));
        }
        Ok(registry)
    }

    pub fn register(&mut self, extractor: Box<dyn ExternalExtractor>) {
        tracing::debug!("Registered extractor: {}", extractor.name());
        self.extractors.push(extractor);
    }

    /// The first extractor matching `url`.
    pub fn find(&self, url: &str) -> Option<&dyn ExternalExtractor> {
        self.extractors
            .iter()
            .find(|extractor| extractor.matches(url))
            .map(|extractor| &**extractor)
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::links::{Quality, ResolvedLink};

    /// Extractor returning one fixed link for URLs containing `host`.
    pub(crate) struct FixedExtractor {
        pub(crate) host: &'static str,
        pub(crate) fail: bool,
    }

    #[async_trait]
    impl ExternalExtractor for FixedExtractor {
        fn name(&self) -> &str {
            self.host
        }

        fn matches(&self, url: &str) -> bool {
            url.contains(self.host)
        }

        async fn extract(&self, url: &str, referer: &str) -> Result<ResolvedMedia> {
            if self.fail {
                anyhow::bail!("host {} is down", self.host);
            }
            Ok(ResolvedMedia {
                links: vec![ResolvedLink {
                    name: self.host.to_string(),
                    source: self.host.to_string(),
                    url: format!("{url}/video.mp4"),
                    referer: referer.to_string(),
                    quality: Quality::P480,
                    is_m3u8: false,
                }],
                subtitles: Vec::new(),
            })
        }
    }

    #[test]
    fn first_matching_extractor_wins() {
        let mut registry = ExtractorRegistry::new();
        registry.register(Box::new(FixedExtractor { host: "fembed", fail: false }));
        registry.register(Box::new(FixedExtractor { host: "fembed.com", fail: true }));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find("https://www.fembed.com/v/1").unwrap().name(), "fembed");
        assert!(registry.find("https://unknown.test/").is_none());
    }

    #[test]
    fn invalid_plugin_pattern_is_rejected() {
        let config = PluginConfig {
            name: "broken".to_string(),
            binary: "/nonexistent".into(),
            patterns: vec!["[unclosed".to_string()],
        };
        assert!(ExtractorRegistry::from_plugins(vec![config], Duration::from_secs(1)).is_err());
    }
}
