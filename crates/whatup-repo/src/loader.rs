//! Cached index loading
//!
//! `helm repo update` writes each repository's index to
//! `<cache dir>/<name>-index.yaml`. Repositories whose cached index is missing
//! or broken are skipped: the run goes on with the remaining ones.

use std::path::{Path, PathBuf};
use whatup_core::RepositoryIndex;

use crate::config::{Repository, RepositoryFile};
use crate::error::{RepoError, Result};
use crate::index::IndexFile;

/// What to do about entry order when loading an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexOrdering {
    /// Keep the order from the file (Helm writes newest first)
    #[default]
    Trust,

    /// Re-sort every chart's entries newest first by semver
    Resort,
}

/// Loads cached repository indices
#[derive(Debug, Clone)]
pub struct IndexLoader {
    cache_dir: PathBuf,
    ordering: IndexOrdering,
}

impl IndexLoader {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ordering: IndexOrdering::default(),
        }
    }

    pub fn with_ordering(mut self, ordering: IndexOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Cache path of a repository's index
    pub fn index_path(&self, repo: &Repository) -> PathBuf {
        self.cache_dir.join(repo.index_file_name())
    }

    /// Load every configured repository's cached index, in configured order.
    ///
    /// Unreadable indices are logged and left out.
    pub fn load_all(&self, file: &RepositoryFile) -> Vec<RepositoryIndex> {
        file.repositories
            .iter()
            .filter_map(|repo| match self.load_repository(repo) {
                Ok(index) => Some(index),
                Err(e) => {
                    tracing::debug!(repository = %repo.name, "skipping repository: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Load one configured repository's cached index
    pub fn load_repository(&self, repo: &Repository) -> Result<RepositoryIndex> {
        let path = self.index_path(repo);
        let mut index = self.read(&path)?;
        index.name = Some(repo.name.clone());
        index.url = Some(repo.url.clone());
        Ok(self.apply_ordering(index))
    }

    /// Load an index file that does not belong to a configured repository
    pub fn load_file(&self, path: &Path) -> Result<RepositoryIndex> {
        let index = self.read(path)?;
        Ok(self.apply_ordering(index))
    }

    fn read(&self, path: &Path) -> Result<RepositoryIndex> {
        if !path.exists() {
            return Err(RepoError::IndexNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let file = IndexFile::from_yaml(&content).map_err(|e| RepoError::IndexParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut index = file.into_repository_index();
        index.identifier = Some(path.display().to_string());
        Ok(index)
    }

    fn apply_ordering(&self, mut index: RepositoryIndex) -> RepositoryIndex {
        match self.ordering {
            IndexOrdering::Trust => {
                if let Err(e) = index.validate_order() {
                    tracing::debug!("{}", e);
                }
            }
            IndexOrdering::Resort => index.sort_entries(),
        }
        index
    }
}
