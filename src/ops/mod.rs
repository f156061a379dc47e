//! High-level operations.
//!
//! This module contains the implementation of pinplan commands.

pub mod lockfile;
pub mod pinplan_init;
pub mod resolve;

pub use lockfile::load_lock_graph;
pub use pinplan_init::{init_project, InitOptions};
pub use resolve::{resolve, resolve_systems, Resolution, ResolveError};
