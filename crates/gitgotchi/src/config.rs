//! Configuration file support for gitgotchi.
//!
//! Settings come from the global `~/.config/gitgotchi/config.toml`, overlaid
//! by `gitgotchi.toml` in the repository root, overlaid by CLI flags.

use anyhow::{Context, Result};
use gitgotchi_logging::LogFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The project config file name
pub const CONFIG_FILE_NAME: &str = "gitgotchi.toml";
pub const GLOBAL_CONFIG_DIR: &str = "gitgotchi";
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

const DEFAULT_LOG_LEVEL: &str = "warn";

/// One configuration file, global or per-project
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// tracing filter, e.g. "info" or "gitgotchi_core=debug"
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub hook: HookConfig,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Show the counters under the pet in `status`
    pub show_stats: Option<bool>,
    /// Force colors on or off
    pub color: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct HookConfig {
    /// Print nothing after commits
    pub quiet: Option<bool>,
}

impl ConfigFile {
    /// Load a config file.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }

    pub fn load_project(repo_root: &Path) -> Result<Option<Self>> {
        Self::load_from(&repo_root.join(CONFIG_FILE_NAME))
    }

    pub fn load_global() -> Result<Option<Self>> {
        match global_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }
}

pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE))
}

/// Effective settings after layering
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_level: String,
    pub log_format: LogFormat,
    pub show_stats: bool,
    pub color: Option<bool>,
    pub hook_quiet: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Pretty,
            show_stats: true,
            color: None,
            hook_quiet: false,
        }
    }
}

impl Settings {
    /// Layer config files in order; later files win.
    pub fn from_layers(layers: &[Option<ConfigFile>]) -> Self {
        let mut settings = Settings::default();
        for layer in layers.iter().flatten() {
            if let Some(ref level) = layer.log_level {
                settings.log_level = level.clone();
            }
            if let Some(format) = layer.log_format {
                settings.log_format = format;
            }
            if let Some(show) = layer.display.show_stats {
                settings.show_stats = show;
            }
            if let Some(color) = layer.display.color {
                settings.color = Some(color);
            }
            if let Some(quiet) = layer.hook.quiet {
                settings.hook_quiet = quiet;
            }
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(s: &str) -> ConfigFile {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigFile::load_project(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_project_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "log_level = \"debug\"\n\n[hook]\nquiet = true\n",
        )
        .unwrap();

        let config = ConfigFile::load_project(dir.path()).unwrap().unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.hook.quiet, Some(true));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "hunger_hours = 12\n").unwrap();
        assert!(ConfigFile::load_project(dir.path()).is_err());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_layers(&[None, None]);
        assert_eq!(settings, Settings::default());
        assert!(settings.show_stats);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_project_overrides_global() {
        let global = parse(
            "log_level = \"info\"\nlog_format = \"json\"\n[display]\nshow_stats = false\n",
        );
        let project = parse("log_level = \"debug\"\n[display]\ncolor = false\n");

        let settings = Settings::from_layers(&[Some(global), Some(project)]);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.log_format, LogFormat::Json);
        assert!(!settings.show_stats);
        assert_eq!(settings.color, Some(false));
        assert!(!settings.hook_quiet);
    }
}
