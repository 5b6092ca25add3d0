//! Plugin runner that implements [`ExternalExtractor`] for external binaries.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use super::config::PluginConfig;
use super::ExternalExtractor;
use crate::links::{Quality, ResolvedLink, ResolvedMedia, ResolvedSubtitle};

/// JSON sent to the plugin on stdin.
#[derive(Serialize)]
struct PluginInput<'a> {
    url: &'a str,
    referer: &'a str,
}

/// JSON expected from the plugin on stdout.
#[derive(Deserialize)]
struct PluginOutput {
    #[serde(default)]
    links: Vec<PluginLink>,
    #[serde(default)]
    subtitles: Vec<PluginSubtitle>,
}

#[derive(Deserialize)]
struct PluginLink {
    url: String,
    name: Option<String>,
    quality: Option<String>,
    #[serde(default)]
    is_m3u8: bool,
    referer: Option<String>,
}

#[derive(Deserialize)]
struct PluginSubtitle {
    label: String,
    url: String,
}

impl PluginOutput {
    fn into_media(self, plugin_name: &str, referer: &str) -> ResolvedMedia {
        ResolvedMedia {
            links: self
                .links
                .into_iter()
                .map(|link| ResolvedLink {
                    name: link.name.unwrap_or_else(|| plugin_name.to_string()),
                    source: plugin_name.to_string(),
                    is_m3u8: link.is_m3u8 || link.url.contains(".m3u8"),
                    url: link.url,
                    referer: link.referer.unwrap_or_else(|| referer.to_string()),
                    quality: link
                        .quality
                        .as_deref()
                        .map_or(Quality::Unknown, Quality::from_name),
                })
                .collect(),
            subtitles: self
                .subtitles
                .into_iter()
                .map(|s| ResolvedSubtitle {
                    label: s.label,
                    url: s.url,
                })
                .collect(),
        }
    }
}

/// Runs an external plugin binary as an [`ExternalExtractor`].
///
/// The plugin receives `{"url": "...", "referer": "..."}` on stdin and must
/// return `{"links": [...], "subtitles": [...]}` on stdout.
/// A plugin still running after `timeout` is killed and the call fails.
pub struct PluginRunner {
    config: PluginConfig,
    patterns: Vec<Regex>,
    timeout: Duration,
}

impl PluginRunner {
    /// Create a runner from a plugin configuration.
    ///
    /// Compiles all URL patterns as regexes. `timeout` bounds each run.
    ///
    /// # Errors
    ///
    /// Returns an error if any URL pattern is not a valid regex.
    pub fn new(config: PluginConfig, timeout: Duration) -> Result<Self> {
        let patterns = config
            .patterns
            .iter()
            .map(|p| {
                Regex::new(p)
                    .with_context(|| format!("invalid pattern '{p}' in plugin '{}'", config.name))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            patterns,
            timeout,
        })
    }
}

#[async_trait]
impl ExternalExtractor for PluginRunner {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn matches(&self, url: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(url))
    }

    async fn extract(&self, url: &str, referer: &str) -> Result<ResolvedMedia> {
        let binary = &self.config.binary;
        let plugin_name = &self.config.name;

        if !binary.exists() {
            bail!(
                "plugin '{plugin_name}' binary not found at {}",
                binary.display()
            );
        }

        let input = serde_json::to_string(&PluginInput { url, referer })?;

        // Dropping the child on timeout kills the plugin process.
        let mut child = Command::new(binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn plugin '{plugin_name}'"))?;

        let run = async move {
            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(input.as_bytes())
                    .await
                    .with_context(|| format!("failed to write to plugin '{plugin_name}' stdin"))?;
            }
            child
                .wait_with_output()
                .await
                .with_context(|| format!("plugin '{plugin_name}' failed"))
        };

        let result = timeout(self.timeout, run).await.map_err(|_| {
            anyhow!(
                "plugin '{plugin_name}' timed out after {}s",
                self.timeout.as_secs_f32()
            )
        })??;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            bail!(
                "plugin '{plugin_name}' exited with {}: {}",
                result.status,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8(result.stdout)
            .with_context(|| format!("plugin '{plugin_name}' output is not valid UTF-8"))?;

        let output = serde_json::from_str::<PluginOutput>(&stdout).with_context(|| {
            format!(
                "plugin '{plugin_name}' returned invalid JSON: {}",
                stdout.chars().take(200).collect::<String>()
            )
        })?;

        Ok(output.into_media(plugin_name, referer))
    }
}
