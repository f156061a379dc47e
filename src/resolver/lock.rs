//! The pinned dependency graph.
//!
//! A [`LockGraph`] is built from a lock file exactly as written. Nothing
//! here chooses versions: every dependency reference must point at an entry
//! that is already in the file, or the graph is rejected.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use semver::Version;
use serde::Serialize;
use url::Url;

use crate::resolver::encode::{DependencyRef, LockedPackage, Lockfile};
use crate::resolver::errors::LockIntegrityError;
use crate::resolver::source::LockedSource;
use crate::util::hash::sha256_str;

/// Identity of a locked package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LockId {
    pub name: String,
    pub version: Version,
}

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// One locked package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockEntry {
    #[serde(flatten)]
    pub id: LockId,
    pub source: LockedSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub dependencies: Vec<LockId>,
}

/// A git checkout the build engine may materialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitFetch {
    pub package: LockId,
    pub url: Url,
    pub commit: String,
}

/// A pre-resolved, exact dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockGraph {
    /// Lock file format version
    pub format_version: u32,

    /// SHA256 of the lock file content
    pub digest: String,

    /// Whether git-addressed entries may be fetched while consuming the graph
    pub allow_source_fetch: bool,

    /// Entries sorted by name, version, source
    entries: Vec<LockEntry>,

    /// Dependency edges as indices into `entries`
    #[serde(skip)]
    edges: Vec<Vec<usize>>,
}

impl LockGraph {
    /// Load the lock file at `path` and build the graph.
    pub fn load(path: &Path, allow_source_fetch: bool) -> Result<Self, LockIntegrityError> {
        let (lockfile, content) = Lockfile::load(path)?;
        Self::from_lockfile(&lockfile, &content, allow_source_fetch)
    }

    /// Build a graph from decoded lock file content.
    pub fn from_lockfile(
        lockfile: &Lockfile,
        content: &str,
        allow_source_fetch: bool,
    ) -> Result<Self, LockIntegrityError> {
        let mut decoded: Vec<(LockedPackage, LockId, LockedSource, String)> = lockfile
            .packages
            .iter()
            .map(|pkg| {
                let (id, source) = decode_entry(pkg)?;
                let source_key = pkg.source.clone().unwrap_or_default();
                Ok((pkg.clone(), id, source, source_key))
            })
            .collect::<Result<_, LockIntegrityError>>()?;

        decoded.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.3.cmp(&b.3)));

        // Exact (name, version, source) must be unique
        for pair in decoded.windows(2) {
            if pair[0].1 == pair[1].1 && pair[0].3 == pair[1].3 {
                return Err(LockIntegrityError::DuplicateEntry {
                    name: pair[0].1.name.clone(),
                    version: pair[0].1.version.to_string(),
                });
            }
        }

        let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
        for (index, (_, id, _, _)) in decoded.iter().enumerate() {
            by_name.entry(id.name.as_str()).or_default().push(index);
        }

        let mut edges = Vec::with_capacity(decoded.len());
        for (pkg, id, _, _) in &decoded {
            let mut targets = Vec::with_capacity(pkg.dependencies.len());
            for dep in &pkg.dependencies {
                targets.push(resolve_reference(id, dep, &decoded, &by_name)?);
            }
            edges.push(targets);
        }

        let entries: Vec<LockEntry> = decoded
            .iter()
            .zip(&edges)
            .map(|((pkg, id, source, _), targets)| LockEntry {
                id: id.clone(),
                source: source.clone(),
                checksum: pkg.checksum.clone(),
                dependencies: targets.iter().map(|&t| decoded[t].1.clone()).collect(),
            })
            .collect();

        let graph = LockGraph {
            format_version: lockfile.format_version(),
            digest: sha256_str(content),
            allow_source_fetch,
            entries,
            edges,
        };

        tracing::debug!(
            "loaded lock graph with {} entries ({} from git)",
            graph.len(),
            graph.git_entries().count()
        );
        if !allow_source_fetch {
            for entry in graph.git_entries() {
                tracing::warn!(
                    "`{}` is pinned to git but source fetching is disabled; \
                     the build engine must already have it",
                    entry.id
                );
            }
        }

        Ok(graph)
    }

    /// Number of locked packages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in deterministic order.
    pub fn entries(&self) -> &[LockEntry] {
        &self.entries
    }

    /// Entries locked under `name`.
    pub fn get(&self, name: &str) -> impl Iterator<Item = &LockEntry> + '_ {
        let name = name.to_string();
        self.entries.iter().filter(move |e| e.id.name == name)
    }

    /// Entries whose source is a git repository.
    pub fn git_entries(&self) -> impl Iterator<Item = &LockEntry> {
        self.entries.iter().filter(|e| e.source.is_git())
    }

    /// Git checkouts the build engine may materialize.
    ///
    /// Empty when fetching is disallowed; which versions are selected does
    /// not depend on the flag.
    pub fn fetch_requests(&self) -> Vec<GitFetch> {
        if !self.allow_source_fetch {
            return Vec::new();
        }
        self.git_entries()
            .filter_map(|entry| match &entry.source {
                LockedSource::Git { url, commit, .. } => Some(GitFetch {
                    package: entry.id.clone(),
                    url: url.clone(),
                    commit: commit.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Entries reachable from the packages named `root`, root included.
    pub fn closure(&self, root: &str) -> Vec<&LockEntry> {
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(self.len(), 0);
        let nodes: Vec<NodeIndex> = (0..self.len()).map(|i| graph.add_node(i)).collect();
        for (from, targets) in self.edges.iter().enumerate() {
            for &to in targets {
                graph.add_edge(nodes[from], nodes[to], ());
            }
        }

        let mut seen = vec![false; self.len()];
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.id.name != root {
                continue;
            }
            let mut dfs = Dfs::new(&graph, nodes[index]);
            while let Some(node) = dfs.next(&graph) {
                seen[graph[node]] = true;
            }
        }

        self.entries
            .iter()
            .zip(seen)
            .filter_map(|(entry, reachable)| reachable.then_some(entry))
            .collect()
    }

    /// Count entries per source kind, for summaries.
    pub fn source_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            let kind = match entry.source {
                LockedSource::Local => "local",
                LockedSource::Path { .. } => "path",
                LockedSource::Registry { .. } => "registry",
                LockedSource::Git { .. } => "git",
            };
            *counts.entry(kind).or_insert(0) += 1;
        }
        counts
    }
}

fn decode_entry(pkg: &LockedPackage) -> Result<(LockId, LockedSource), LockIntegrityError> {
    let version: Version =
        pkg.version
            .parse()
            .map_err(|source| LockIntegrityError::InvalidVersion {
                name: pkg.name.clone(),
                version: pkg.version.clone(),
                source,
            })?;

    let source = match &pkg.source {
        None => LockedSource::Local,
        Some(s) => LockedSource::parse(s).map_err(|reason| LockIntegrityError::InvalidSource {
            name: pkg.name.clone(),
            reason,
        })?,
    };

    Ok((
        LockId {
            name: pkg.name.clone(),
            version,
        },
        source,
    ))
}

fn resolve_reference(
    from: &LockId,
    dep: &str,
    decoded: &[(LockedPackage, LockId, LockedSource, String)],
    by_name: &HashMap<&str, Vec<usize>>,
) -> Result<usize, LockIntegrityError> {
    let dangling = || LockIntegrityError::DanglingDependency {
        package: from.to_string(),
        dependency: dep.to_string(),
    };

    let reference = DependencyRef::parse(dep).ok_or_else(dangling)?;
    let candidates = by_name.get(reference.name).ok_or_else(dangling)?;

    let matching: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| {
            let (_, id, _, source_key) = &decoded[i];
            let version_ok = reference
                .version
                .map_or(true, |v| id.version.to_string() == v);
            let source_ok = reference.source.map_or(true, |s| source_key == s);
            version_ok && source_ok
        })
        .collect();

    match matching.as_slice() {
        [] => Err(dangling()),
        [only] => Ok(*only),
        _ => Err(LockIntegrityError::AmbiguousDependency {
            package: from.to_string(),
            dependency: dep.to_string(),
        }),
    }
}
