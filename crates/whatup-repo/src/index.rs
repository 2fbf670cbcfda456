//! Helm repository index format
//!
//! Only the fields whatup needs are modelled; everything else in the file is ignored.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use whatup_core::{ChartEntry, RepositoryIndex};

/// Marker some index generators put in an entry's `apiVersion` to flag a prerelease
const PRERELEASE_API_VERSION: &str = "prerelease";

/// Repository index file (`index.yaml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexFile {
    /// API version
    #[serde(default)]
    pub api_version: String,

    /// When this index was generated
    #[serde(default)]
    pub generated: Option<DateTime<Utc>>,

    /// Chart versions keyed by chart name, in file order
    #[serde(default)]
    pub entries: IndexMap<String, Vec<ChartVersion>>,
}

impl IndexFile {
    /// Parse index from YAML (or JSON) text
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Convert into the engine's view, keeping entry order
    pub fn into_repository_index(self) -> RepositoryIndex {
        let entries = self
            .entries
            .into_iter()
            .map(|(name, versions)| {
                let versions = versions
                    .into_iter()
                    .map(ChartVersion::into_chart_entry)
                    .collect();
                (name, versions)
            })
            .collect();

        RepositoryIndex {
            entries,
            ..Default::default()
        }
    }
}

/// One chart version in an index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartVersion {
    #[serde(default)]
    pub name: String,

    pub version: String,

    /// Chart API version (`v1`, `v2`, or the `prerelease` marker)
    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(default)]
    pub app_version: Option<String>,

    /// URLs to download the chart archive
    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default)]
    pub created: Option<DateTime<Utc>>,

    #[serde(default)]
    pub digest: Option<String>,

    #[serde(default)]
    pub deprecated: bool,

    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

impl ChartVersion {
    /// Whether this version should be hidden unless prereleases are requested.
    ///
    /// Flagged either by the `prerelease` API version marker or by a semver
    /// pre-release component (`1.2.0-rc.1`, also with a leading `v`).
    pub fn is_prerelease(&self) -> bool {
        if self.api_version.as_deref() == Some(PRERELEASE_API_VERSION) {
            return true;
        }
        let raw = self.version.strip_prefix('v').unwrap_or(&self.version);
        Version::parse(raw).is_ok_and(|v| !v.pre.is_empty())
    }

    pub fn into_chart_entry(self) -> ChartEntry {
        ChartEntry {
            prerelease: self.is_prerelease(),
            version: self.version,
            urls: self.urls,
        }
    }
}
