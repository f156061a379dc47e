//! Lock file loading.

use std::path::Path;

use crate::resolver::{LockGraph, LockIntegrityError};

/// Load the pinned dependency graph at `path`.
///
/// The graph is consumed exactly as written. `allow_source_fetch` only
/// controls whether git-addressed entries are reported as fetchable; it
/// never changes which versions are selected.
pub fn load_lock_graph(
    path: &Path,
    allow_source_fetch: bool,
) -> Result<LockGraph, LockIntegrityError> {
    tracing::debug!("loading lock graph from {}", path.display());
    LockGraph::load(path, allow_source_fetch)
}
