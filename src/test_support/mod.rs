//! Test utilities for pinplan unit tests.
//!
//! Fixtures write a complete project tree (declaration, package metadata
//! and lock file) into a temporary directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use pinplan::test_support::ProjectFixture;
//!
//! #[test]
//! fn test_example() {
//!     let tmp = tempfile::TempDir::new().unwrap();
//!     let dir = ProjectFixture::player("app").write_to(tmp.path()).unwrap();
//!     let project = Project::load(&dir.join("Pinplan.toml")).unwrap();
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;
