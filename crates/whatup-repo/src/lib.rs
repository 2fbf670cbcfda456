//! Whatup Repository Sources
//!
//! This crate reads what `helm repo add` and `helm repo update` leave on disk:
//!
//! - **Repository file**: `repositories.yaml`, the configured name/URL pairs
//! - **Index cache**: one `<name>-index.yaml` per repository in the cache directory
//!
//! Indices come back as [`whatup_core::RepositoryIndex`] values in configured
//! repository order. A repository whose cached index is missing or cannot be
//! parsed is left out; only the repository file itself is required.
//!
//! ## Example
//!
//! ```rust,no_run
//! use whatup_repo::{HelmPaths, IndexLoader, RepositoryFile};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let paths = HelmPaths::resolve(None, None)?;
//! let repositories = RepositoryFile::load_from(&paths.repository_config)?;
//! let indices = IndexLoader::new(&paths.repository_cache).load_all(&repositories);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod loader;

pub use config::{HelmPaths, Repository, RepositoryFile};
pub use error::{RepoError, Result};
pub use index::{ChartVersion, IndexFile};
pub use loader::{IndexLoader, IndexOrdering};
