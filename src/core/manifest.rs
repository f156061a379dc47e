//! Package identity loading.
//!
//! The package metadata file belongs to the application's source tree (a
//! `Cargo.toml` in practice). pinplan reads exactly two fields from its
//! `[package]` section and nothing else.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading package identity.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("package manifest not found: {}", path.display())]
    #[diagnostic(
        code(pinplan::manifest::not_found),
        help("Check `package.manifest` in Pinplan.toml")
    )]
    NotFound { path: PathBuf },

    #[error("failed to read package manifest: {}", path.display())]
    #[diagnostic(code(pinplan::manifest::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse package manifest: {}", path.display())]
    #[diagnostic(code(pinplan::manifest::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("package manifest {} has no [package] section", path.display())]
    #[diagnostic(code(pinplan::manifest::missing_section))]
    MissingSection { path: PathBuf },

    #[error("package manifest {} is missing `package.{field}`", path.display())]
    #[diagnostic(
        code(pinplan::manifest::missing_field),
        help("Both `name` and `version` must be set to non-empty values in the [package] section")
    )]
    MissingField { path: PathBuf, field: &'static str },

    #[error("`package.{field}` in {} must be a string", path.display())]
    #[diagnostic(
        code(pinplan::manifest::invalid_field),
        help("Inherited values (e.g. `version.workspace = true`) are not supported; write the value out")
    )]
    InvalidField { path: PathBuf, field: &'static str },
}

impl ManifestError {
    /// The metadata file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            ManifestError::NotFound { path }
            | ManifestError::Read { path, .. }
            | ManifestError::Parse { path, .. }
            | ManifestError::MissingSection { path }
            | ManifestError::MissingField { path, .. }
            | ManifestError::InvalidField { path, .. } => path,
        }
    }
}

/// Package identity: the name and version of the produced artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package name
    pub name: String,

    /// Package version, as written
    pub version: String,
}

impl Manifest {
    /// Create a manifest from its parts.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Manifest {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Load package identity from a metadata file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ManifestError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::parse(&content, path)
    }

    /// Parse package identity from metadata content.
    ///
    /// `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let doc: toml::Table = toml::from_str(content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let package = doc
            .get("package")
            .and_then(toml::Value::as_table)
            .ok_or_else(|| ManifestError::MissingSection {
                path: path.to_path_buf(),
            })?;

        let name = string_field(package, "name", path)?;
        let version = string_field(package, "version", path)?;

        tracing::debug!("loaded package identity {} {}", name, version);

        Ok(Manifest { name, version })
    }

    /// Parse the version as semver.
    pub fn semver(&self) -> Result<Version, semver::Error> {
        self.version.parse()
    }
}

fn string_field(
    package: &toml::Table,
    field: &'static str,
    path: &Path,
) -> Result<String, ManifestError> {
    // An empty value counts as missing
    match package.get(field) {
        None => Err(ManifestError::MissingField {
            path: path.to_path_buf(),
            field,
        }),
        Some(toml::Value::String(s)) if s.trim().is_empty() => {
            Err(ManifestError::MissingField {
                path: path.to_path_buf(),
                field,
            })
        }
        Some(toml::Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ManifestError::InvalidField {
            path: path.to_path_buf(),
            field,
        }),
    }
}
