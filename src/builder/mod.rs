//! Descriptor construction.
//!
//! Turns resolved facts (identity, platform, inputs, toolchain, lock graph)
//! into the build descriptor and the development environment.

pub mod devenv;
pub mod plan;
pub mod toolchain;

pub use devenv::{compose_dev_environment, DevEnvironmentDescriptor};
pub use plan::{emit_build_descriptor, BuildDescriptor, BuildInputs};
pub use toolchain::{
    Channel, Component, DevToolchains, Profile, ProviderDecl, ToolchainPinner,
    ToolchainResolutionError, ToolchainSpec,
};
