//! pinplan - reproducible build and dev-shell descriptors from one declaration
//!
//! This crate turns a platform-agnostic project declaration, a package
//! manifest and a pre-solved lock file into a build descriptor and a
//! development environment for a given host.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test fixtures for pinplan unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildDescriptor, DevEnvironmentDescriptor, ToolchainPinner, ToolchainSpec};
pub use core::{HostToken, Manifest, PlatformFact, Project};
pub use ops::{resolve, resolve_systems, Resolution, ResolveError};
pub use resolver::LockGraph;
pub use util::context::GlobalContext;
