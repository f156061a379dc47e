//! Configuration file support for pinplan.
//!
//! pinplan supports two configuration file locations:
//! - Global: `~/.pinplan/config.toml` - User-wide defaults
//! - Project: `.pinplan/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::platform::HostToken;

/// pinplan configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolution settings
    pub resolve: ResolveConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// `[resolve]` settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolveConfig {
    /// Host tokens to resolve when none is given on the command line
    pub systems: Vec<HostToken>,

    /// Override for `lock.allow-git-fetch` in Pinplan.toml
    pub allow_git_fetch: Option<bool>,
}

/// `[output]` settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    pub pretty: Option<bool>,
}

impl Config {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load config from a file, returning default if not found or on error.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if !other.resolve.systems.is_empty() {
            self.resolve.systems = other.resolve.systems;
        }
        if other.resolve.allow_git_fetch.is_some() {
            self.resolve.allow_git_fetch = other.resolve.allow_git_fetch;
        }
        if other.output.pretty.is_some() {
            self.output.pretty = other.output.pretty;
        }
    }

    /// Whether JSON output should be pretty-printed (default true).
    pub fn pretty(&self) -> bool {
        self.output.pretty.unwrap_or(true)
    }
}

/// Load configuration with proper precedence.
///
/// Precedence (highest to lowest):
/// 1. Project config (.pinplan/config.toml)
/// 2. Global config (~/.pinplan/config.toml)
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }
    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.pinplan).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".pinplan"))
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|d| d.join("config.toml"))
}

/// Get the project config file path.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".pinplan").join("config.toml")
}
