//! Repository configuration
//!
//! Reads Helm's `repositories.yaml` and resolves where Helm keeps it and the
//! index cache, honoring the same environment variables Helm does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use whatup_core::RepositoryRef;

use crate::error::{RepoError, Result};

/// Helm repository file (`repositories.yaml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryFile {
    /// API version
    #[serde(default)]
    pub api_version: String,

    /// When the file was last written
    #[serde(default)]
    pub generated: Option<DateTime<Utc>>,

    /// Configured repositories, in configured order
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

impl RepositoryFile {
    /// Load the repository file. A missing or unreadable file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RepoError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|message| RepoError::InvalidConfig {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_yaml(content: &str) -> std::result::Result<Self, String> {
        // An empty file is a valid, empty configuration
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Get a repository by name
    pub fn get(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// List all repository names
    pub fn names(&self) -> Vec<&str> {
        self.repositories.iter().map(|r| r.name.as_str()).collect()
    }

    /// Name/URL pairs in configured order
    pub fn references(&self) -> Vec<RepositoryRef> {
        self.repositories
            .iter()
            .map(|r| RepositoryRef::new(&r.name, &r.url))
            .collect()
    }
}

/// One configured repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,

    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, rename = "caFile", skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<PathBuf>,

    #[serde(default, rename = "certFile", skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<PathBuf>,

    #[serde(default, rename = "keyFile", skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,

    #[serde(default)]
    pub insecure_skip_tls_verify: bool,

    #[serde(default)]
    pub pass_credentials_all: bool,
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// File name of this repository's cached index
    pub fn index_file_name(&self) -> String {
        format!("{}-index.yaml", self.name)
    }
}

/// Locations of Helm's repository file and index cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmPaths {
    pub repository_config: PathBuf,
    pub repository_cache: PathBuf,
}

impl HelmPaths {
    /// Resolve from explicit values, then the environment, then platform defaults
    pub fn resolve(config: Option<PathBuf>, cache: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with(config, cache, |key| std::env::var_os(key).map(PathBuf::from))
    }

    /// Resolve with a custom environment lookup.
    ///
    /// Precedence for the repository file: explicit path, `HELM_REPOSITORY_CONFIG`,
    /// `$HELM_CONFIG_HOME/repositories.yaml`, `<preference dir>/helm/repositories.yaml`.
    /// For the cache: explicit path, `HELM_REPOSITORY_CACHE`,
    /// `$HELM_CACHE_HOME/repository`, `<cache dir>/helm/repository`.
    pub fn resolve_with<F>(config: Option<PathBuf>, cache: Option<PathBuf>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let repository_config = match config.or_else(|| env("HELM_REPOSITORY_CONFIG")) {
            Some(path) => path,
            None => env("HELM_CONFIG_HOME")
                .or_else(|| dirs::preference_dir().map(|d| d.join("helm")))
                .ok_or(RepoError::NoDefaultPath {
                    kind: "config",
                    env: "HELM_REPOSITORY_CONFIG",
                })?
                .join("repositories.yaml"),
        };

        let repository_cache = match cache.or_else(|| env("HELM_REPOSITORY_CACHE")) {
            Some(path) => path,
            None => env("HELM_CACHE_HOME")
                .or_else(|| dirs::cache_dir().map(|d| d.join("helm")))
                .ok_or(RepoError::NoDefaultPath {
                    kind: "cache",
                    env: "HELM_REPOSITORY_CACHE",
                })?
                .join("repository"),
        };

        Ok(Self {
            repository_config,
            repository_cache,
        })
    }
}
