//! Host platform classification.
//!
//! Every platform-conditional decision in pinplan goes through
//! [`PlatformFact`]. The host is described by an opaque [`HostToken`]
//! supplied by the caller; nothing below the CLI entry point inspects the
//! running machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque description of the evaluating host (e.g. `x86_64-linux`,
/// `aarch64-darwin`, `x86_64-unknown-linux-gnu`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostToken(String);

impl HostToken {
    /// Create a token from any string. Never fails.
    pub fn new(token: impl Into<String>) -> Self {
        HostToken(token.into())
    }

    /// Derive a token for the machine this binary was compiled for.
    ///
    /// Only the CLI entry point calls this; the library takes tokens as
    /// explicit arguments.
    pub fn host() -> Self {
        let os = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };
        HostToken(format!("{}-{}", std::env::consts::ARCH, os))
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the token into its `-` separated segments.
    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('-').map(str::trim).filter(|s| !s.is_empty())
    }
}

impl fmt::Display for HostToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HostToken {
    fn from(s: &str) -> Self {
        HostToken::new(s)
    }
}

/// Operating system family of the evaluating host.
///
/// Adding a variant here forces every `match` on it to be revisited, which
/// is the point: the composer and anything else that branches on platform
/// must be exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFact {
    Linux,
    Macos,
    Other,
}

impl PlatformFact {
    /// Classify a host token. Total: unrecognized tokens map to `Other`.
    pub fn classify(token: &HostToken) -> PlatformFact {
        let mut fact = PlatformFact::Other;
        for segment in token.segments() {
            match segment.to_ascii_lowercase().as_str() {
                "linux" => return PlatformFact::Linux,
                "darwin" | "macos" | "macosx" => fact = PlatformFact::Macos,
                _ => {}
            }
        }
        fact
    }

    /// Whether this fact names a platform with declared extension tables.
    pub fn is_classified(&self) -> bool {
        !matches!(self, PlatformFact::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformFact::Linux => "linux",
            PlatformFact::Macos => "macos",
            PlatformFact::Other => "other",
        }
    }
}

impl fmt::Display for PlatformFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A host token together with its classification.
///
/// Computed once per resolution pass and carried by the emitted descriptors
/// so consumers never have to classify again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    pub token: HostToken,
    pub platform: PlatformFact,
}

impl System {
    /// Classify `token` and pair it with the result.
    pub fn resolve(token: HostToken) -> Self {
        let platform = PlatformFact::classify(&token);
        if !platform.is_classified() {
            tracing::warn!(
                "host `{}` is not a known platform; only base inputs will be used",
                token
            );
        }
        System { token, platform }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.token, self.platform)
    }
}
