//! Pinplan.toml project declaration.
//!
//! The declaration is the single platform-agnostic input a resolution pass
//! starts from. It names the package metadata file and lock file, the
//! toolchain provider, and the native input tables.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::toolchain::ProviderDecl;
use crate::core::inputs::{FeatureTables, InputName, InputTables};

/// Canonical project declaration file name.
pub const PROJECT_FILE_NAME: &str = "Pinplan.toml";

/// Errors raised while loading the project declaration.
#[derive(Debug, Error, Diagnostic)]
pub enum ProjectError {
    #[error("could not find `Pinplan.toml` in {} or any parent directory", dir.display())]
    #[diagnostic(
        code(pinplan::project::not_found),
        help("Run `pinplan init` to create a new project declaration")
    )]
    NotFound { dir: PathBuf },

    #[error("failed to read {}", path.display())]
    #[diagnostic(code(pinplan::project::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    #[diagnostic(code(pinplan::project::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("`{name}` is declared both as a native tool and as a library in {table}")]
    #[diagnostic(
        code(pinplan::project::input_category_conflict),
        help("Build-time tools must not be part of the link set; keep `{name}` in one category")
    )]
    InputCategoryConflict { name: InputName, table: String },

    #[error("feature `{feature}` is enabled but has no [features.{feature}] table")]
    #[diagnostic(code(pinplan::project::unknown_feature))]
    UnknownFeature { feature: String },
}

/// The parsed Pinplan.toml.
#[derive(Debug, Clone)]
pub struct Project {
    /// Package section
    pub package: PackageDecl,

    /// Lock file section
    pub lock: LockDecl,

    /// Toolchain provider section
    pub toolchain: ProviderDecl,

    /// Native inputs
    pub inputs: InputTables,

    /// Optional per-feature inputs
    pub features: FeatureTables,

    /// Development shell extras
    pub dev: DevDecl,

    /// The directory containing this declaration
    pub project_dir: PathBuf,
}

/// `[package]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PackageDecl {
    /// Path to the package metadata file
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Source root handed to the build engine
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Name of the primary executable (defaults to the package name)
    #[serde(default)]
    pub main_program: Option<String>,

    /// Feature tables to enable
    #[serde(default)]
    pub features: BTreeSet<String>,
}

impl Default for PackageDecl {
    fn default() -> Self {
        PackageDecl {
            manifest: default_manifest(),
            source_root: default_source_root(),
            main_program: None,
            features: BTreeSet::new(),
        }
    }
}

/// `[lock]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LockDecl {
    /// Path to the lock file
    #[serde(default = "default_lock_path")]
    pub path: PathBuf,

    /// Whether git-addressed lock entries may be fetched
    #[serde(default)]
    pub allow_git_fetch: bool,
}

impl Default for LockDecl {
    fn default() -> Self {
        LockDecl {
            path: default_lock_path(),
            allow_git_fetch: false,
        }
    }
}

/// `[dev]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DevDecl {
    /// Auxiliary developer tools added to the shell
    pub tools: BTreeSet<String>,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("Cargo.toml")
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_lock_path() -> PathBuf {
    PathBuf::from("Cargo.lock")
}

/// Raw declaration as deserialized from TOML.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProject {
    #[serde(default)]
    package: PackageDecl,

    #[serde(default)]
    lock: LockDecl,

    #[serde(default)]
    toolchain: ProviderDecl,

    #[serde(default)]
    inputs: InputTables,

    #[serde(default)]
    features: FeatureTables,

    #[serde(default)]
    dev: DevDecl,
}

impl Project {
    /// Load a project declaration from a file path.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProjectError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path)
    }

    /// Parse declaration content.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ProjectError> {
        let raw: RawProject = toml::from_str(content).map_err(|source| ProjectError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let project_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let project = Project {
            package: raw.package,
            lock: raw.lock,
            toolchain: raw.toolchain,
            inputs: raw.inputs,
            features: raw.features,
            dev: raw.dev,
            project_dir,
        };
        project.validate()?;

        Ok(project)
    }

    fn validate(&self) -> Result<(), ProjectError> {
        if let Some(name) = self.inputs.category_conflicts().into_iter().next() {
            return Err(ProjectError::InputCategoryConflict {
                name,
                table: "[inputs]".to_string(),
            });
        }

        for (feature, tables) in &self.features {
            if let Some(name) = tables.category_conflicts().into_iter().next() {
                return Err(ProjectError::InputCategoryConflict {
                    name,
                    table: format!("[features.{}]", feature),
                });
            }
            // A feature tool must not become a library through the base tables either
            let feature_only = InputTables {
                native: tables.native.clone(),
                libs: self.inputs.libs.clone(),
            };
            let lib_only = InputTables {
                native: self.inputs.native.clone(),
                libs: tables.libs.clone(),
            };
            if let Some(name) = feature_only
                .category_conflicts()
                .into_iter()
                .chain(lib_only.category_conflicts())
                .next()
            {
                return Err(ProjectError::InputCategoryConflict {
                    name,
                    table: format!("[features.{}] and [inputs]", feature),
                });
            }
        }

        // Any two features may be enabled together
        let features: Vec<(&String, &InputTables)> = self.features.iter().collect();
        for (i, (a_name, a)) in features.iter().enumerate() {
            for (b_name, b) in &features[i + 1..] {
                let crossed = [
                    InputTables {
                        native: a.native.clone(),
                        libs: b.libs.clone(),
                    },
                    InputTables {
                        native: b.native.clone(),
                        libs: a.libs.clone(),
                    },
                ];
                if let Some(name) = crossed
                    .iter()
                    .flat_map(InputTables::category_conflicts)
                    .next()
                {
                    return Err(ProjectError::InputCategoryConflict {
                        name,
                        table: format!("[features.{}] and [features.{}]", a_name, b_name),
                    });
                }
            }
        }

        self.check_features(self.package.features.iter().map(String::as_str))
    }

    /// Check that every feature in `enabled` has a table.
    pub fn check_features<'a>(
        &self,
        enabled: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ProjectError> {
        for feature in enabled {
            if !self.features.contains_key(feature) {
                return Err(ProjectError::UnknownFeature {
                    feature: feature.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Absolute-or-relative path of the package metadata file.
    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join(&self.package.manifest)
    }

    /// Path of the lock file.
    pub fn lock_path(&self) -> PathBuf {
        self.project_dir.join(&self.lock.path)
    }

    /// Source root handed to the build engine.
    pub fn source_root(&self) -> PathBuf {
        self.project_dir.join(&self.package.source_root)
    }
}

/// Find `Pinplan.toml` in `dir` or any of its parents.
pub fn find_project_file(dir: &Path) -> Result<PathBuf, ProjectError> {
    let mut current = dir.to_path_buf();
    loop {
        let candidate = current.join(PROJECT_FILE_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(ProjectError::NotFound {
                dir: dir.to_path_buf(),
            });
        }
    }
}

/// Generate a starter Pinplan.toml.
pub fn generate_project_file(main_program: &str) -> String {
    format!(
        r#"[package]
manifest = "Cargo.toml"
source-root = "."
main-program = "{main_program}"

[lock]
path = "Cargo.lock"
allow-git-fetch = true

[toolchain]
provider = "rust-overlay"
version = "latest"

[inputs.native]
base = ["pkg-config"]

[inputs.libs]
base = ["openssl"]
linux = []
macos = []
"#
    )
}
