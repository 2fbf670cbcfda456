//! File-based release source
//!
//! Reads a YAML (or JSON) list of installed releases from a local file.
//! Useful for:
//! - Checking a snapshot of a cluster without access to it
//! - Tests and demos without a Kubernetes cluster
//!
//! ```yaml
//! - name: db
//!   namespace: data
//!   chart: postgres
//!   version: "10.1"
//!   annotations:
//!     artifacthub.io/repository: bitnami
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use whatup_core::Release;

use super::ReleaseSource;
use crate::error::{KubeError, Result};

/// One release entry in a releases file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRelease {
    pub name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    pub chart: String,

    pub version: String,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

fn default_namespace() -> String {
    "default".to_string()
}

impl From<FileRelease> for Release {
    fn from(entry: FileRelease) -> Self {
        Release {
            annotations: entry.annotations,
            ..Release::new(entry.name, entry.namespace, entry.chart, entry.version)
        }
    }
}

/// Reads releases from a local file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse releases file content, keeping file order
    pub fn parse(&self, content: &str) -> Result<Vec<Release>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<FileRelease> =
            serde_yaml::from_str(content).map_err(|e| KubeError::InvalidReleasesFile {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        Ok(entries.into_iter().map(Release::from).collect())
    }
}

#[async_trait]
impl ReleaseSource for FileSource {
    async fn list(&self) -> Result<Vec<Release>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        self.parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RELEASES_YAML: &str = r#"
- name: db
  namespace: data
  chart: postgres
  version: "10.1"
- name: cache
  chart: redis
  version: "16.0.0"
  annotations:
    artifacthub.io/repository: bitnami
"#;

    #[tokio::test]
    async fn test_list_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("releases.yaml");
        std::fs::write(&path, RELEASES_YAML).unwrap();

        let releases = FileSource::new(&path).list().await.unwrap();
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0], Release::new("db", "data", "postgres", "10.1"));
        assert_eq!(releases[1].namespace, "default");
        assert_eq!(releases[1].annotation("artifacthub.io/repository"), Some("bitnami"));
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = FileSource::new(dir.path().join("nope.yaml")).list().await;
        assert!(matches!(result, Err(KubeError::Io(_))));
    }

    #[test]
    fn test_parse_json_and_empty() {
        let source = FileSource::new("releases.json");
        let releases = source
            .parse(r#"[{"name":"web","namespace":"web","chart":"nginx","version":"15.0.0"}]"#)
            .unwrap();
        assert_eq!(releases[0].chart.name, "nginx");

        assert!(source.parse("").unwrap().is_empty());
        assert!(matches!(
            source.parse("- name: broken"),
            Err(KubeError::InvalidReleasesFile { .. })
        ));
    }
}
