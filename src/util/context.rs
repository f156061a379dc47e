//! Global context for pinplan operations.
//!
//! Provides centralized access to the working directory, output settings
//! and configuration paths.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::project::{find_project_file, ProjectError};
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext for the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            verbose: false,
            color: true,
        }
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Find Pinplan.toml starting from cwd and searching upward.
    pub fn find_project_file(&self) -> Result<PathBuf, ProjectError> {
        find_project_file(&self.cwd)
    }

    /// Load configuration for the project rooted at `project_root`.
    pub fn config(&self, project_root: &Path) -> Config {
        let global = global_config_path();
        load_config(global.as_deref(), &project_config_path(project_root))
    }
}
