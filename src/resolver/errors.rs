//! Lock integrity errors.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// The lock file is missing or cannot be consumed verbatim.
#[derive(Debug, Error, Diagnostic)]
pub enum LockIntegrityError {
    #[error("lock file not found: {}", path.display())]
    #[diagnostic(
        code(pinplan::lock::not_found),
        help("Generate the lock file with the package's own tooling (e.g. `cargo generate-lockfile`)")
    )]
    NotFound { path: PathBuf },

    #[error("failed to read lock file: {}", path.display())]
    #[diagnostic(code(pinplan::lock::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lock file: {}", path.display())]
    #[diagnostic(code(pinplan::lock::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("lock file format version {version} is not supported")]
    #[diagnostic(
        code(pinplan::lock::unsupported_version),
        help("Supported lock file versions are 1 through 4")
    )]
    UnsupportedVersion { version: u32 },

    #[error("locked package `{name}` has invalid version `{version}`")]
    #[diagnostic(code(pinplan::lock::invalid_version))]
    InvalidVersion {
        name: String,
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("locked package `{name}` has an invalid source: {reason}")]
    #[diagnostic(code(pinplan::lock::invalid_source))]
    InvalidSource { name: String, reason: String },

    #[error("`{name} {version}` is locked more than once from the same source")]
    #[diagnostic(code(pinplan::lock::duplicate_entry))]
    DuplicateEntry { name: String, version: String },

    #[error("`{package}` depends on `{dependency}`, which is not in the lock file")]
    #[diagnostic(
        code(pinplan::lock::dangling_dependency),
        help("The lock file is out of sync with its manifest; regenerate it")
    )]
    DanglingDependency { package: String, dependency: String },

    #[error("`{package}` depends on `{dependency}`, which matches several locked packages")]
    #[diagnostic(code(pinplan::lock::ambiguous_dependency))]
    AmbiguousDependency { package: String, dependency: String },
}
