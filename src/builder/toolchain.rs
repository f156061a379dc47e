//! Pinned toolchain selection.
//!
//! A toolchain is never looked up on the host. It is derived from the
//! provider declared in Pinplan.toml (name + version), so the same
//! declaration always yields the same [`ToolchainSpec`] regardless of what
//! happens to be installed.

use std::collections::BTreeSet;
use std::fmt;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::hash::Fingerprint;

/// Release channel of a toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Stable,
    Nightly,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Stable => "stable",
            Channel::Nightly => "nightly",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installation profile of a toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Compiler and build tool only
    Minimal,
    /// The provider's complete default set
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Minimal => "minimal",
            Profile::Full => "full",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional toolchain component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Component {
    /// Linter
    Lint,
    /// Linter with nightly-only lints
    LintExtended,
    /// Formatter
    Format,
    /// Language server / source indexer
    SourceIndex,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Lint => "lint",
            Component::LintExtended => "lint-extended",
            Component::Format => "format",
            Component::SourceIndex => "source-index",
        }
    }

    /// Name of the provider package that supplies this component.
    pub fn package_name(&self) -> &'static str {
        match self {
            Component::Lint | Component::LintExtended => "clippy",
            Component::Format => "rustfmt",
            Component::SourceIndex => "rust-analyzer",
        }
    }

    /// Whether `channel` can supply this component.
    fn available_on(&self, channel: Channel) -> bool {
        match self {
            Component::LintExtended => channel == Channel::Nightly,
            Component::Lint | Component::Format | Component::SourceIndex => true,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toolchain provider declared in the `[toolchain]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProviderDecl {
    /// Provider name
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Pinned provider version
    #[serde(default = "default_provider_version")]
    pub version: String,

    /// Channels the provider supplies
    #[serde(default = "all_channels")]
    pub channels: BTreeSet<Channel>,

    /// Profiles the provider supplies
    #[serde(default = "all_profiles")]
    pub profiles: BTreeSet<Profile>,

    /// Profile used for the development toolchains
    #[serde(default = "default_dev_profile")]
    pub dev_profile: Profile,
}

impl Default for ProviderDecl {
    fn default() -> Self {
        ProviderDecl {
            provider: default_provider(),
            version: default_provider_version(),
            channels: all_channels(),
            profiles: all_profiles(),
            dev_profile: default_dev_profile(),
        }
    }
}

fn default_provider() -> String {
    "rust-overlay".to_string()
}

fn default_provider_version() -> String {
    "latest".to_string()
}

fn all_channels() -> BTreeSet<Channel> {
    [Channel::Stable, Channel::Nightly].into_iter().collect()
}

fn all_profiles() -> BTreeSet<Profile> {
    [Profile::Minimal, Profile::Full].into_iter().collect()
}

fn default_dev_profile() -> Profile {
    Profile::Minimal
}

/// Identity of the provider a spec was pinned from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId {
    pub name: String,
    pub version: String,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A fully pinned toolchain selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolchainSpec {
    pub provider: ProviderId,
    pub channel: Channel,
    pub profile: Profile,
    pub components: BTreeSet<Component>,
}

impl ToolchainSpec {
    /// Stable fingerprint over every field of the pinned toolchain.
    pub fn fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.provider.name)
            .update_str(&self.provider.version)
            .update_str(self.channel.as_str())
            .update_str(self.profile.as_str())
            .update_strs(self.components.iter().map(Component::as_str));
        fp.finish()
    }

    /// Provider package names this spec installs beyond the compiler.
    pub fn component_packages(&self) -> BTreeSet<&'static str> {
        self.components.iter().map(Component::package_name).collect()
    }
}

impl fmt::Display for ToolchainSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.provider, self.channel, self.profile)?;
        if !self.components.is_empty() {
            let names: Vec<&str> = self.components.iter().map(Component::as_str).collect();
            write!(f, " + {}", names.join(", "))?;
        }
        Ok(())
    }
}

/// The development toolchain pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevToolchains {
    pub stable: ToolchainSpec,
    pub nightly: ToolchainSpec,
}

/// Errors raised when the declared provider cannot supply a toolchain.
#[derive(Debug, Error, Diagnostic)]
pub enum ToolchainResolutionError {
    #[error("toolchain provider declaration is incomplete: {reason}")]
    #[diagnostic(
        code(pinplan::toolchain::invalid_provider),
        help("Set both `provider` and `version` in the [toolchain] section")
    )]
    InvalidProvider { reason: String },

    #[error("provider `{provider}` does not supply the {channel} channel")]
    #[diagnostic(
        code(pinplan::toolchain::channel_unavailable),
        help("Add \"{channel}\" to `toolchain.channels` or pick a provider that ships it")
    )]
    ChannelUnavailable { provider: String, channel: Channel },

    #[error("provider `{provider}` does not supply the {profile} profile")]
    #[diagnostic(code(pinplan::toolchain::profile_unavailable))]
    ProfileUnavailable { provider: String, profile: Profile },

    #[error("component `{component}` is not available on the {channel} channel")]
    #[diagnostic(code(pinplan::toolchain::component_unavailable))]
    ComponentUnavailable {
        component: Component,
        channel: Channel,
    },
}

/// Derives toolchain specs from a declared provider.
#[derive(Debug, Clone)]
pub struct ToolchainPinner {
    decl: ProviderDecl,
}

impl ToolchainPinner {
    /// Create a pinner for a declared provider.
    pub fn new(decl: ProviderDecl) -> Self {
        ToolchainPinner { decl }
    }

    /// The toolchain used for production builds: stable, minimal, nothing
    /// extra.
    pub fn production(&self) -> Result<ToolchainSpec, ToolchainResolutionError> {
        self.pin(Channel::Stable, Profile::Minimal, &[])
    }

    /// The toolchains used in the development shell.
    pub fn development(&self) -> Result<DevToolchains, ToolchainResolutionError> {
        let profile = self.decl.dev_profile;
        let stable = self.pin(
            Channel::Stable,
            profile,
            &[Component::Lint, Component::SourceIndex],
        )?;
        let nightly = self.pin(
            Channel::Nightly,
            profile,
            &[
                Component::LintExtended,
                Component::Format,
                Component::SourceIndex,
            ],
        )?;
        Ok(DevToolchains { stable, nightly })
    }

    /// Pin one channel/profile/components combination.
    pub fn pin(
        &self,
        channel: Channel,
        profile: Profile,
        components: &[Component],
    ) -> Result<ToolchainSpec, ToolchainResolutionError> {
        let provider = self.provider_id()?;

        if !self.decl.channels.contains(&channel) {
            return Err(ToolchainResolutionError::ChannelUnavailable {
                provider: provider.to_string(),
                channel,
            });
        }
        if !self.decl.profiles.contains(&profile) {
            return Err(ToolchainResolutionError::ProfileUnavailable {
                provider: provider.to_string(),
                profile,
            });
        }
        if let Some(component) = components.iter().find(|c| !c.available_on(channel)) {
            return Err(ToolchainResolutionError::ComponentUnavailable {
                component: *component,
                channel,
            });
        }

        let spec = ToolchainSpec {
            provider,
            channel,
            profile,
            components: components.iter().copied().collect(),
        };
        tracing::debug!("pinned toolchain {}", spec);
        Ok(spec)
    }

    fn provider_id(&self) -> Result<ProviderId, ToolchainResolutionError> {
        let name = self.decl.provider.trim();
        let version = self.decl.version.trim();
        if name.is_empty() {
            return Err(ToolchainResolutionError::InvalidProvider {
                reason: "`provider` is empty".to_string(),
            });
        }
        if version.is_empty() {
            return Err(ToolchainResolutionError::InvalidProvider {
                reason: "`version` is empty".to_string(),
            });
        }
        Ok(ProviderId {
            name: name.to_string(),
            version: version.to_string(),
        })
    }
}
