use crate::cleaner::CleanMethod;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub clean: CleanSettings,

    #[serde(default)]
    pub throttle: Throttle,

    #[serde(default)]
    pub analyze: AnalyzeSettings,

    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

/// Minimum file ages (in days) used by the preset targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_temp_age")]
    pub temp_min_age_days: u32,

    #[serde(default = "default_log_age")]
    pub log_min_age_days: u32,

    #[serde(default = "default_recycle_bin_age")]
    pub recycle_bin_min_age_days: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanSettings {
    #[serde(default)]
    pub method: CleanMethod,
}

/// Pauses between units of background work, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Throttle {
    #[serde(default = "default_target_pause")]
    pub target_pause_ms: u64,

    #[serde(default = "default_task_pause")]
    pub task_pause_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeSettings {
    /// Depth limit for `analyze` when none is given on the command line
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// A user-defined scan target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub min_age_days: Option<u32>,
    #[serde(default)]
    pub min_size: Option<String>,
    #[serde(default)]
    pub max_size: Option<String>,
    #[serde(default = "default_true")]
    pub recursive: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_min_age_days: default_temp_age(),
            log_min_age_days: default_log_age(),
            recycle_bin_min_age_days: default_recycle_bin_age(),
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self {
            target_pause_ms: default_target_pause(),
            task_pause_ms: default_task_pause(),
        }
    }
}

fn default_temp_age() -> u32 { 1 }
fn default_log_age() -> u32 { 7 }
fn default_recycle_bin_age() -> u32 { 7 }
fn default_target_pause() -> u64 { 100 }
fn default_task_pause() -> u64 { 10 }
fn default_patterns() -> Vec<String> { vec!["*".to_string()] }
fn default_true() -> bool { true }

impl Config {
    /// Get the config file path, e.g. ~/.config/tidyup/config.toml on Linux
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "tidyup")
            .context("Could not determine the user config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load config from the default location or return defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                log::warn!("{:#}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Load config from `path`. A missing file gives defaults silently, an
    /// unreadable or malformed one gives defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{:#}; using default settings", e);
                Self::default()
            }
        }
    }

    fn try_load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml = self.to_toml()?;
        fs::write(path, toml).context("Failed to write config file")?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Apply CLI option overrides
    pub fn apply_cli_overrides(&mut self, method: Option<CleanMethod>, depth: Option<usize>) {
        if let Some(method) = method {
            self.clean.method = method;
        }
        if let Some(depth) = depth {
            self.analyze.max_depth = Some(depth);
        }
    }
}
