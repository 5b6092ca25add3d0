//! Plugin configuration loaded from `~/.config/dramaid/plugins.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::config_dir;

/// Configuration for a single extractor plugin.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    /// Human-readable plugin name.
    pub name: String,
    /// Path to the plugin binary.
    pub binary: PathBuf,
    /// Player URL regex patterns this plugin handles.
    pub patterns: Vec<String>,
}

/// Top-level plugins configuration file.
#[derive(Debug, Clone, Deserialize, Default)]
struct PluginsFile {
    #[serde(default)]
    plugins: Vec<PluginConfig>,
}

/// Load plugin configurations from `~/.config/dramaid/plugins.toml`.
///
/// Returns an empty vec if the file doesn't exist (plugins are optional).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_plugins() -> Result<Vec<PluginConfig>> {
    load_plugins_from(&config_dir().join("plugins.toml"))
}

/// Load plugin configurations from an explicit path.
pub fn load_plugins_from(path: &Path) -> Result<Vec<PluginConfig>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let file: PluginsFile =
        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))?;

    Ok(file.plugins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let file: PluginsFile = toml::from_str("").unwrap();
        assert!(file.plugins.is_empty());
    }

    #[test]
    fn parse_extractor_plugins() {
        let toml_str = r#"
[[plugins]]
name = "fembed"
binary = "/usr/local/bin/dramaid-fembed"
patterns = ["fembed\\.com/v/.*"]

[[plugins]]
name = "streamtape"
binary = "/usr/bin/st"
patterns = ["streamtape\\.com/e/.*", "strtape\\.cloud/.*"]
"#;
        let file: PluginsFile = toml::from_str(toml_str).unwrap();
        assert_eq!(file.plugins.len(), 2);
        assert_eq!(file.plugins[0].name, "fembed");
        assert_eq!(
            file.plugins[0].binary,
            PathBuf::from("/usr/local/bin/dramaid-fembed")
        );
        assert_eq!(file.plugins[1].patterns.len(), 2);
    }

    #[test]
    fn missing_file_means_no_plugins() {
        let plugins = load_plugins_from(Path::new("/nonexistent/plugins.toml")).unwrap();
        assert!(plugins.is_empty());
    }

    #[test]
    fn plugin_without_patterns_is_rejected() {
        let toml_str = r#"
[[plugins]]
name = "incomplete"
binary = "/usr/bin/x"
"#;
        assert!(toml::from_str::<PluginsFile>(toml_str).is_err());
    }
}
