//! Lock graph consumption.
//!
//! pinplan never solves versions. The lock file is decoded, checked for
//! internal consistency and exposed as an immutable graph.

pub mod encode;
pub mod errors;
pub mod lock;
pub mod source;

pub use encode::{Lockfile, LockedPackage, MAX_LOCK_VERSION};
pub use errors::LockIntegrityError;
pub use lock::{GitFetch, LockEntry, LockGraph, LockId};
pub use source::{GitReference, LockedSource};
