//! Lock file decoding.
//!
//! pinplan consumes Cargo-style lock files: an optional top-level
//! `version` and a list of `[[package]]` tables. Legacy files also carry
//! the root package in a `[root]` table.

use std::path::Path;

use serde::Deserialize;

use crate::resolver::errors::LockIntegrityError;

/// Highest lock file format version understood.
pub const MAX_LOCK_VERSION: u32 = 4;

/// Lock file representation for deserialization.
#[derive(Debug, Deserialize)]
pub struct Lockfile {
    /// Lock file format version (absent in legacy formats)
    #[serde(default)]
    pub version: Option<u32>,

    /// Root package of legacy lock files; folded into `packages` on parse
    #[serde(default)]
    pub root: Option<LockedPackage>,

    /// Locked packages
    #[serde(rename = "package", default)]
    pub packages: Vec<LockedPackage>,
}

/// A locked package entry, as written.
#[derive(Debug, Clone, Deserialize)]
pub struct LockedPackage {
    /// Package name
    pub name: String,

    /// Exact version
    pub version: String,

    /// Source string (absent for members of the local source tree)
    #[serde(default)]
    pub source: Option<String>,

    /// Optional checksum
    #[serde(default)]
    pub checksum: Option<String>,

    /// Dependencies (`name`, `name version` or `name version (source)`)
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A dependency reference inside a locked package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef<'a> {
    pub name: &'a str,
    pub version: Option<&'a str>,
    pub source: Option<&'a str>,
}

impl<'a> DependencyRef<'a> {
    /// Parse `name`, `name version` or `name version (source)`.
    pub fn parse(s: &'a str) -> Option<Self> {
        let s = s.trim();
        let (head, source) = match s.split_once(" (") {
            Some((head, rest)) => (head, Some(rest.strip_suffix(')')?)),
            None => (s, None),
        };

        let mut parts = head.split_whitespace();
        let name = parts.next()?;
        let version = parts.next();
        if parts.next().is_some() {
            return None;
        }

        Some(DependencyRef {
            name,
            version,
            source,
        })
    }
}

impl Lockfile {
    /// Load a lock file from a path.
    ///
    /// The file is read in one call; no handle outlives this function.
    pub fn load(path: &Path) -> Result<(Self, String), LockIntegrityError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LockIntegrityError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LockIntegrityError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let lockfile = Self::parse(&content, path)?;
        Ok((lockfile, content))
    }

    /// Parse lock file content.
    pub fn parse(content: &str, path: &Path) -> Result<Self, LockIntegrityError> {
        let mut lockfile: Lockfile =
            toml::from_str(content).map_err(|source| LockIntegrityError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if !lockfile.is_compatible() {
            return Err(LockIntegrityError::UnsupportedVersion {
                version: lockfile.version.unwrap_or_default(),
            });
        }

        if let Some(root) = lockfile.root.take() {
            lockfile.packages.insert(0, root);
        }

        Ok(lockfile)
    }

    /// Check if the lock file format is understood.
    pub fn is_compatible(&self) -> bool {
        match self.version {
            None => true,
            Some(v) => (1..=MAX_LOCK_VERSION).contains(&v),
        }
    }

    /// Effective format version (legacy files carry none).
    pub fn format_version(&self) -> u32 {
        self.version.unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lockfile() {
        let content = r#"
# This file is automatically @generated by Cargo.
version = 3

[[package]]
name = "app"
version = "0.1.0"
dependencies = [
 "anyhow",
]

[[package]]
name = "anyhow"
version = "1.0.86"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "b3d1d046238990b9cf5bcde22a3fb3584ee5cf65fb2765f454ed428c7a0063da"
"#;
        let lockfile = Lockfile::parse(content, Path::new("Cargo.lock")).unwrap();
        assert_eq!(lockfile.format_version(), 3);
        assert_eq!(lockfile.packages.len(), 2);
        assert_eq!(lockfile.packages[0].dependencies, vec!["anyhow"]);
        assert!(lockfile.packages[0].source.is_none());
        assert!(lockfile.packages[1].checksum.is_some());
    }

    #[test]
    fn test_legacy_lockfile_without_version() {
        let content = r#"
[[package]]
name = "app"
version = "0.1.0"

[metadata]
"checksum foo 1.0.0 (registry+https://github.com/rust-lang/crates.io-index)" = "abc"
"#;
        let lockfile = Lockfile::parse(content, Path::new("Cargo.lock")).unwrap();
        assert_eq!(lockfile.format_version(), 1);
    }

    #[test]
    fn test_legacy_root_table_becomes_a_package() {
        let content = r#"
[root]
name = "app"
version = "0.1.0"
dependencies = [
 "anyhow 1.0.86 (registry+https://github.com/rust-lang/crates.io-index)",
]

[[package]]
name = "anyhow"
version = "1.0.86"
source = "registry+https://github.com/rust-lang/crates.io-index"
"#;
        let lockfile = Lockfile::parse(content, Path::new("Cargo.lock")).unwrap();
        assert_eq!(lockfile.format_version(), 1);
        assert!(lockfile.root.is_none());

        let names: Vec<&str> = lockfile.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["app", "anyhow"]);
        assert_eq!(lockfile.packages[0].dependencies.len(), 1);
    }

    #[test]
    fn test_unsupported_version() {
        let err = Lockfile::parse("version = 9\n", Path::new("Cargo.lock")).unwrap_err();
        assert!(matches!(
            err,
            LockIntegrityError::UnsupportedVersion { version: 9 }
        ));
    }

    #[test]
    fn test_structurally_invalid() {
        let err = Lockfile::parse("[[package]]\nname = 3\n", Path::new("Cargo.lock")).unwrap_err();
        assert!(matches!(err, LockIntegrityError::Parse { .. }));
    }

    #[test]
    fn test_dependency_ref_forms() {
        assert_eq!(
            DependencyRef::parse("anyhow"),
            Some(DependencyRef {
                name: "anyhow",
                version: None,
                source: None
            })
        );
        assert_eq!(
            DependencyRef::parse("syn 2.0.66"),
            Some(DependencyRef {
                name: "syn",
                version: Some("2.0.66"),
                source: None
            })
        );
        assert_eq!(
            DependencyRef::parse(
                "syn 1.0.109 (registry+https://github.com/rust-lang/crates.io-index)"
            ),
            Some(DependencyRef {
                name: "syn",
                version: Some("1.0.109"),
                source: Some("registry+https://github.com/rust-lang/crates.io-index")
            })
        );
        assert_eq!(DependencyRef::parse("a b c"), None);
        assert_eq!(DependencyRef::parse(""), None);
    }
}
