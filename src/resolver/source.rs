//! Resolved sources recorded in a lock file - WHERE a locked package comes from.
//!
//! Source strings use the `kind+url[?query][#precise]` form:
//! - `registry+https://github.com/rust-lang/crates.io-index`
//! - `sparse+https://index.crates.io/`
//! - `git+https://github.com/owner/repo?branch=main#<commit>`
//! - `path+file:///work/vendored` (or no source at all for workspace members)

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Git reference the lock entry was resolved from.
///
/// Informational only: the commit is what gets built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitReference {
    /// Default branch (usually main/master)
    DefaultBranch,
    /// Specific branch
    Branch(String),
    /// Specific tag
    Tag(String),
    /// Specific revision
    Rev(String),
}

impl fmt::Display for GitReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitReference::DefaultBranch => write!(f, "default branch"),
            GitReference::Branch(b) => write!(f, "branch={}", b),
            GitReference::Tag(t) => write!(f, "tag={}", t),
            GitReference::Rev(r) => write!(f, "rev={}", r),
        }
    }
}

/// The exact source of a locked package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LockedSource {
    /// Part of the local source tree (no source recorded)
    Local,
    /// Local path outside the source tree
    Path { url: Url },
    /// Package registry
    Registry { url: Url },
    /// Git repository pinned to a commit
    Git {
        url: Url,
        reference: GitReference,
        commit: String,
    },
}

impl LockedSource {
    /// Parse a lock file source string.
    ///
    /// Returns a human-readable reason on failure; the caller attaches the
    /// package it belongs to.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (kind, rest) = s
            .split_once('+')
            .ok_or_else(|| "missing kind prefix".to_string())?;

        let (url_str, precise) = match rest.rsplit_once('#') {
            Some((u, p)) => (u, Some(p)),
            None => (rest, None),
        };

        let mut url = Url::parse(url_str).map_err(|e| format!("invalid URL `{}`: {}", url_str, e))?;

        match kind {
            "registry" | "sparse" => Ok(LockedSource::Registry { url }),
            "path" => Ok(LockedSource::Path { url }),
            "git" => {
                let reference = match url.query() {
                    Some(query) => parse_git_reference(query),
                    None => GitReference::DefaultBranch,
                };
                url.set_query(None);

                let commit = precise
                    .filter(|c| is_commit_hash(c))
                    .ok_or_else(|| "git source is not pinned to a commit".to_string())?
                    .to_string();

                Ok(LockedSource::Git {
                    url,
                    reference,
                    commit,
                })
            }
            other => Err(format!("unknown source kind `{}`", other)),
        }
    }

    /// Whether this source is addressed through version control.
    pub fn is_git(&self) -> bool {
        matches!(self, LockedSource::Git { .. })
    }
}

impl fmt::Display for LockedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockedSource::Local => write!(f, "local"),
            LockedSource::Path { url } => write!(f, "path+{}", url),
            LockedSource::Registry { url } => write!(f, "registry+{}", url),
            LockedSource::Git { url, commit, .. } => write!(f, "git+{}#{}", url, commit),
        }
    }
}

fn parse_git_reference(query: &str) -> GitReference {
    for param in query.split('&') {
        if let Some((key, value)) = param.split_once('=') {
            match key {
                "branch" => return GitReference::Branch(value.to_string()),
                "tag" => return GitReference::Tag(value.to_string()),
                "rev" => return GitReference::Rev(value.to_string()),
                _ => {}
            }
        }
    }
    GitReference::DefaultBranch
}

fn is_commit_hash(s: &str) -> bool {
    s.len() >= 7 && s.chars().all(|c| c.is_ascii_hexdigit())
}
