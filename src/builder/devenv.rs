//! Development shell composition.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::builder::plan::BuildDescriptor;
use crate::builder::toolchain::{DevToolchains, ToolchainSpec};
use crate::core::inputs::InputSet;
use crate::core::platform::System;

/// The interactive development environment for one system.
#[derive(Debug, Clone, Serialize)]
pub struct DevEnvironmentDescriptor {
    /// Host token and its classification
    pub system: System,

    /// The build descriptor's native inputs (same instance)
    pub inputs: Arc<InputSet>,

    /// Stable and nightly development toolchains
    pub toolchains: DevToolchains,

    /// Auxiliary developer tools
    pub tools: BTreeSet<String>,
}

impl DevEnvironmentDescriptor {
    /// Whether this environment holds the very input set `build` holds.
    pub fn shares_inputs_with(&self, build: &BuildDescriptor) -> bool {
        Arc::ptr_eq(&self.inputs, &build.inputs)
    }

    /// Both toolchains, stable first.
    pub fn toolchain_specs(&self) -> [&ToolchainSpec; 2] {
        [&self.toolchains.stable, &self.toolchains.nightly]
    }

    /// Every package the shell puts on its path: toolchain component
    /// packages, native inputs and tools.
    pub fn packages(&self) -> BTreeSet<String> {
        let mut packages: BTreeSet<String> = self
            .toolchain_specs()
            .iter()
            .flat_map(|spec| spec.component_packages())
            .map(str::to_string)
            .collect();
        packages.extend(self.inputs.native.iter().map(|n| n.to_string()));
        packages.extend(self.inputs.libs.iter().map(|n| n.to_string()));
        packages.extend(self.tools.iter().cloned());
        packages
    }
}

/// Derive the development environment from a build descriptor.
///
/// The input set is taken from `build` by reference count, never
/// recomposed, so the shell and the build cannot disagree on inputs.
pub fn compose_dev_environment(
    build: &BuildDescriptor,
    toolchains: DevToolchains,
    tools: BTreeSet<String>,
) -> DevEnvironmentDescriptor {
    tracing::debug!(
        "composing dev environment for {} with {} extra tools",
        build.system,
        tools.len()
    );

    DevEnvironmentDescriptor {
        system: build.system.clone(),
        inputs: Arc::clone(&build.inputs),
        toolchains,
        tools,
    }
}
