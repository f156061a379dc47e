//! Command implementations

pub mod build;
pub mod completions;
pub mod develop;
pub mod init;
pub mod lock;
pub mod platform;
pub mod toolchain;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::ProjectArgs;
use pinplan::core::{HostToken, Project};
use pinplan::util::{Config, GlobalContext};
use pinplan::ResolveError;

/// A loaded project with config and command-line overrides applied.
pub struct Session {
    pub project: Project,
    pub config: Config,
}

impl Session {
    /// Find and load Pinplan.toml, then layer config and flags over it.
    pub fn load(ctx: &GlobalContext, args: &ProjectArgs, features: &[String]) -> Result<Self> {
        let path = match &args.project {
            Some(path) => path.clone(),
            None => ctx.find_project_file().map_err(ResolveError::from)?,
        };
        let mut project = Project::load(&path).map_err(ResolveError::from)?;
        let config = ctx.config(&project.project_dir);

        if let Some(allow) = config.resolve.allow_git_fetch {
            project.lock.allow_git_fetch = allow;
        }
        if let Some(allow) = args.git_fetch_override() {
            project.lock.allow_git_fetch = allow;
        }
        project.package.features.extend(features.iter().cloned());

        tracing::debug!("using project declaration {}", path.display());
        Ok(Session { project, config })
    }

    /// Host tokens to resolve: flags, then config, then this host.
    pub fn host_tokens(&self, flags: &[String]) -> Vec<HostToken> {
        if !flags.is_empty() {
            return flags.iter().map(|s| HostToken::new(s.as_str())).collect();
        }
        if !self.config.resolve.systems.is_empty() {
            return self.config.resolve.systems.clone();
        }
        vec![HostToken::host()]
    }
}

/// Write `value` as JSON to `output`, or to stdout.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to serialize descriptor")?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json))
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("       Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
