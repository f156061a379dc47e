//! Core data structures for pinplan.
//!
//! This module contains the foundational types used throughout pinplan:
//! - Host tokens and platform classification
//! - Package identity
//! - Native input tables and their composition
//! - The Pinplan.toml project declaration

pub mod inputs;
pub mod manifest;
pub mod platform;
pub mod project;

pub use inputs::{compose, FeatureTables, InputName, InputSet, InputTables, PlatformTable};
pub use manifest::{Manifest, ManifestError};
pub use platform::{HostToken, PlatformFact, System};
pub use project::{find_project_file, Project, ProjectError, PROJECT_FILE_NAME};
