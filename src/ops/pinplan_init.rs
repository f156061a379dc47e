//! Implementation of `pinplan init`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::manifest::Manifest;
use crate::core::project::{generate_project_file, PROJECT_FILE_NAME};

/// Options for initializing a project declaration.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Fallback name when the directory has no package manifest
    pub name: String,

    /// Primary executable (defaults to the package name)
    pub main_program: Option<String>,
}

/// Write a starter Pinplan.toml into `path`.
///
/// When a `Cargo.toml` with a package name sits next to it, that name is
/// the default main program. Returns the path of the written file.
pub fn init_project(path: &Path, opts: &InitOptions) -> Result<PathBuf> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }

    let project_file = path.join(PROJECT_FILE_NAME);
    if project_file.exists() {
        bail!("`{}` already exists in `{}`", PROJECT_FILE_NAME, path.display());
    }

    let main_program = match &opts.main_program {
        Some(program) => program.clone(),
        None => detect_package_name(path).unwrap_or_else(|| opts.name.clone()),
    };

    fs::write(&project_file, generate_project_file(&main_program))
        .with_context(|| format!("failed to write {}", PROJECT_FILE_NAME))?;

    tracing::debug!("wrote {}", project_file.display());
    Ok(project_file)
}

fn detect_package_name(dir: &Path) -> Option<String> {
    let manifest_path = dir.join("Cargo.toml");
    if !manifest_path.exists() {
        return None;
    }
    match Manifest::load(&manifest_path) {
        Ok(manifest) => Some(manifest.name),
        Err(e) => {
            tracing::warn!("ignoring {}: {}", manifest_path.display(), e);
            None
        }
    }
}
