//! Test fixtures for common test scenarios.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::project::PROJECT_FILE_NAME;

/// Git commit used by fixture lock files.
pub const FIXTURE_COMMIT: &str = "8d5ae1f4a94c24a5eb8e6d5f0b3fa6e0b0fbd8a2";

/// Fixture for a complete project tree.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Directory name under the base path.
    pub name: String,
    /// Pinplan.toml content.
    pub declaration: String,
    /// Cargo.toml content.
    pub manifest: String,
    /// Cargo.lock content (not written when `None`).
    pub lock: Option<String>,
    /// Extra files (path relative to project root -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl ProjectFixture {
    /// Create a fixture with an empty declaration and a bare package.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        ProjectFixture {
            manifest: manifests::package(&name, "0.1.0"),
            lock: Some(locks::single(&name, "0.1.0")),
            declaration: String::new(),
            files: BTreeMap::new(),
            name,
        }
    }

    /// A media player-like application: platform-specific audio libraries,
    /// a git-pinned dependency and one optional feature.
    pub fn player(name: impl Into<String>) -> Self {
        let name = name.into();
        ProjectFixture {
            declaration: declarations::player(&format!("{}_cli", name)),
            manifest: manifests::package(&name, "1.2.3"),
            lock: Some(locks::with_git(&name, "1.2.3")),
            files: BTreeMap::new(),
            name,
        }
    }

    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = declaration.into();
        self
    }

    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = manifest.into();
        self
    }

    pub fn with_lock(mut self, lock: impl Into<String>) -> Self {
        self.lock = Some(lock.into());
        self
    }

    pub fn without_lock(mut self) -> Self {
        self.lock = None;
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Write the fixture and return the project directory.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<PathBuf> {
        let project_path = base_path.join(&self.name);
        std::fs::create_dir_all(&project_path)?;

        std::fs::write(project_path.join(PROJECT_FILE_NAME), &self.declaration)?;
        std::fs::write(project_path.join("Cargo.toml"), &self.manifest)?;
        if let Some(lock) = &self.lock {
            std::fs::write(project_path.join("Cargo.lock"), lock)?;
        }

        for (rel_path, content) in &self.files {
            let full_path = project_path.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        Ok(project_path)
    }

    /// Path of the declaration inside a written fixture.
    pub fn declaration_path(&self, base_path: &Path) -> PathBuf {
        base_path.join(&self.name).join(PROJECT_FILE_NAME)
    }
}

/// Package metadata templates.
pub mod manifests {
    pub fn package(name: &str, version: &str) -> String {
        format!(
            r#"[package]
name = "{name}"
version = "{version}"
edition = "2021"

[dependencies]
"#
        )
    }

    pub fn without_version(name: &str) -> String {
        format!(
            r#"[package]
name = "{name}"
edition = "2021"
"#
        )
    }
}

/// Pinplan.toml templates.
pub mod declarations {
    pub fn player(main_program: &str) -> String {
        format!(
            r#"[package]
main-program = "{main_program}"

[lock]
allow-git-fetch = true

[toolchain]
provider = "rust-overlay"
version = "2024-06-01"

[inputs.native]
base = ["pkg-config"]

[inputs.libs]
base = ["openssl", "dbus"]
linux = ["alsa-lib"]
macos = ["AudioUnit", "CoreAudio"]

[features.pulseaudio.libs]
linux = ["libpulseaudio"]

[dev]
tools = ["cargo-watch"]
"#
        )
    }
}

/// Lock file templates.
pub mod locks {
    use super::FIXTURE_COMMIT;

    pub fn single(name: &str, version: &str) -> String {
        format!(
            r#"version = 3

[[package]]
name = "{name}"
version = "{version}"
"#
        )
    }

    /// Format 1 lock: no `version`, root package in `[root]`.
    pub fn legacy(name: &str, version: &str) -> String {
        format!(
            r#"[root]
name = "{name}"
version = "{version}"
dependencies = [
 "anyhow 1.0.86 (registry+https://github.com/rust-lang/crates.io-index)",
]

[[package]]
name = "anyhow"
version = "1.0.86"
source = "registry+https://github.com/rust-lang/crates.io-index"
"#
        )
    }

    pub fn with_git(name: &str, version: &str) -> String {
        format!(
            r#"version = 3

[[package]]
name = "{name}"
version = "{version}"
dependencies = [
 "anyhow",
 "librespot",
]

[[package]]
name = "anyhow"
version = "1.0.86"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "b3d1d046238990b9cf5bcde22a3fb3584ee5cf65fb2765f454ed428c7a0063da"

[[package]]
name = "librespot"
version = "0.4.2"
source = "git+https://github.com/librespot-org/librespot?branch=dev#{FIXTURE_COMMIT}"
"#
        )
    }
}
