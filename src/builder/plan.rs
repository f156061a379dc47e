//! Build descriptor emission.
//!
//! A [`BuildDescriptor`] is everything the external build engine needs to
//! produce one artifact on one system. Every platform decision has already
//! been made by the time it is emitted; the engine never classifies the
//! host or consults the declaration again.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::builder::toolchain::ToolchainSpec;
use crate::core::inputs::{InputName, InputSet};
use crate::core::manifest::Manifest;
use crate::core::platform::System;
use crate::resolver::LockGraph;
use crate::util::hash::Fingerprint;

/// Everything a build descriptor is assembled from.
#[derive(Debug, Clone)]
pub struct BuildInputs {
    pub identity: Manifest,
    pub system: System,
    pub inputs: Arc<InputSet>,
    pub toolchain: ToolchainSpec,
    pub lock: Arc<LockGraph>,
    pub source_root: PathBuf,
    pub main_program: String,
    pub features: BTreeSet<String>,
}

/// Platform-resolved build instructions for one artifact.
#[derive(Debug, Clone, Serialize)]
pub struct BuildDescriptor {
    /// Package name and version
    pub identity: Manifest,

    /// Host token and its classification
    pub system: System,

    /// Native inputs, shared with the development environment
    pub inputs: Arc<InputSet>,

    /// Production toolchain
    pub toolchain: ToolchainSpec,

    /// Pinned dependency graph
    pub lock: Arc<LockGraph>,

    /// Source tree handed to the build engine
    pub source_root: PathBuf,

    /// Primary executable
    pub main_program: String,

    /// Enabled feature tables
    pub features: BTreeSet<String>,

    /// Stable fingerprint of all of the above
    pub fingerprint: String,
}

impl BuildDescriptor {
    /// Fingerprint over identity, system, inputs, toolchain, lock content,
    /// source root, main program and features.
    fn compute_fingerprint(inputs: &BuildInputs) -> String {
        let source_root = inputs.source_root.to_string_lossy();

        let mut fp = Fingerprint::new();
        fp.update_str(&inputs.identity.name)
            .update_str(&inputs.identity.version)
            .update_str(inputs.system.token.as_str())
            .update_str(inputs.system.platform.as_str())
            .update_list(inputs.inputs.native.iter().map(InputName::as_str))
            .update_list(inputs.inputs.libs.iter().map(InputName::as_str))
            .update_str(&inputs.toolchain.fingerprint())
            .update_str(&inputs.lock.digest)
            .update_bool(inputs.lock.allow_source_fetch)
            .update_str(&source_root)
            .update_str(&inputs.main_program)
            .update_list(inputs.features.iter().map(String::as_str));
        fp.finish()
    }

    /// Whether `name` is linked into the artifact.
    pub fn links(&self, name: &str) -> bool {
        self.inputs.libs.contains(&InputName::new(name))
    }

    /// Short fingerprint for display.
    pub fn short_fingerprint(&self) -> &str {
        crate::util::hash::short(&self.fingerprint)
    }
}

/// Assemble a build descriptor.
///
/// Pure composition: no I/O, no platform inspection.
pub fn emit_build_descriptor(inputs: BuildInputs) -> BuildDescriptor {
    let fingerprint = BuildDescriptor::compute_fingerprint(&inputs);

    tracing::debug!(
        "emitted build descriptor for {} {} on {} ({} native, {} libs)",
        inputs.identity.name,
        inputs.identity.version,
        inputs.system,
        inputs.inputs.native.len(),
        inputs.inputs.libs.len()
    );

    BuildDescriptor {
        identity: inputs.identity,
        system: inputs.system,
        inputs: inputs.inputs,
        toolchain: inputs.toolchain,
        lock: inputs.lock,
        source_root: inputs.source_root,
        main_program: inputs.main_program,
        features: inputs.features,
        fingerprint,
    }
}
