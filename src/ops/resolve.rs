//! Resolution passes.
//!
//! A pass turns the platform-agnostic project declaration plus one host
//! token into a build descriptor and a development environment. Everything
//! that can fail (declaration checks, package identity, toolchain pinning,
//! lock loading) happens before any descriptor is built, so a pass yields
//! both descriptors or none.

use std::path::Path;
use std::sync::Arc;

use miette::Diagnostic as MietteDiagnostic;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::builder::devenv::{compose_dev_environment, DevEnvironmentDescriptor};
use crate::builder::plan::{emit_build_descriptor, BuildDescriptor, BuildInputs};
use crate::builder::toolchain::{
    DevToolchains, ToolchainPinner, ToolchainResolutionError, ToolchainSpec,
};
use crate::core::inputs::compose;
use crate::core::manifest::{Manifest, ManifestError};
use crate::core::platform::{HostToken, System};
use crate::core::project::{Project, ProjectError};
use crate::ops::lockfile::load_lock_graph;
use crate::resolver::{LockGraph, LockIntegrityError};
use crate::util::diagnostic::Diagnostic;

/// A fatal error that aborts a resolution pass.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Toolchain(#[from] ToolchainResolutionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lock(#[from] LockIntegrityError),
}

impl ResolveError {
    /// File the error is about, when there is one.
    pub fn location(&self) -> Option<&Path> {
        match self {
            ResolveError::Project(ProjectError::Read { path, .. })
            | ResolveError::Project(ProjectError::Parse { path, .. }) => Some(path.as_path()),
            ResolveError::Project(_) => None,
            ResolveError::Manifest(e) => Some(e.path()),
            ResolveError::Toolchain(_) => None,
            ResolveError::Lock(LockIntegrityError::NotFound { path })
            | ResolveError::Lock(LockIntegrityError::Read { path, .. })
            | ResolveError::Lock(LockIntegrityError::Parse { path, .. }) => Some(path.as_path()),
            ResolveError::Lock(_) => None,
        }
    }

    /// Build a user-facing diagnostic: the message, each underlying cause
    /// as context, and the help text as a suggestion.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());

        if let Some(path) = self.location() {
            diag = diag.with_location(path);
        }

        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            diag = diag.with_context(err.to_string());
            cause = err.source();
        }

        if let Some(help) = MietteDiagnostic::help(self) {
            diag = diag.with_suggestion(help.to_string());
        }
        if let Some(code) = MietteDiagnostic::code(self) {
            diag = diag.with_context(format!("error code: {}", code));
        }

        diag
    }
}

/// The output of one pass.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub build: BuildDescriptor,
    pub dev: DevEnvironmentDescriptor,
}

/// Everything a pass needs that does not depend on the host token.
///
/// Loaded once and shared read-only across parallel passes.
#[derive(Debug)]
struct PassContext<'p> {
    project: &'p Project,
    identity: Manifest,
    production: ToolchainSpec,
    development: DevToolchains,
    lock: Arc<LockGraph>,
}

impl<'p> PassContext<'p> {
    fn load(project: &'p Project) -> Result<Self, ResolveError> {
        project.check_features(project.package.features.iter().map(String::as_str))?;

        let identity = Manifest::load(&project.manifest_path())?;

        let pinner = ToolchainPinner::new(project.toolchain.clone());
        let production = pinner.production()?;
        let development = pinner.development()?;

        let lock = load_lock_graph(&project.lock_path(), project.lock.allow_git_fetch)?;

        Ok(PassContext {
            project,
            identity,
            production,
            development,
            lock: Arc::new(lock),
        })
    }

    /// Run the token-dependent part of a pass. Cannot fail.
    fn resolve(&self, token: HostToken) -> Resolution {
        let system = System::resolve(token);
        tracing::debug!("resolving {} for {}", self.identity.name, system);

        let inputs = compose(
            system.platform,
            &self.project.inputs,
            &self.project.features,
            self.project.package.features.iter().map(String::as_str),
        );

        let main_program = self
            .project
            .package
            .main_program
            .clone()
            .unwrap_or_else(|| self.identity.name.clone());

        let build = emit_build_descriptor(BuildInputs {
            identity: self.identity.clone(),
            system,
            inputs: Arc::new(inputs),
            toolchain: self.production.clone(),
            lock: Arc::clone(&self.lock),
            source_root: self.project.source_root(),
            main_program,
            features: self.project.package.features.clone(),
        });

        let dev = compose_dev_environment(
            &build,
            self.development.clone(),
            self.project.dev.tools.clone(),
        );

        Resolution { build, dev }
    }
}

/// Resolve `project` for one host token.
pub fn resolve(project: &Project, token: HostToken) -> Result<Resolution, ResolveError> {
    let ctx = PassContext::load(project)?;
    Ok(ctx.resolve(token))
}

/// Resolve `project` for several host tokens in parallel.
///
/// Results are in the order of `tokens`. The package identity and lock
/// graph are loaded once; a failure there aborts every pass.
pub fn resolve_systems(
    project: &Project,
    tokens: &[HostToken],
) -> Result<Vec<Resolution>, ResolveError> {
    let ctx = PassContext::load(project)?;
    tracing::info!(
        "resolving {} {} for {} system(s)",
        ctx.identity.name,
        ctx.identity.version,
        tokens.len()
    );

    Ok(tokens
        .par_iter()
        .map(|token| ctx.resolve(token.clone()))
        .collect())
}
