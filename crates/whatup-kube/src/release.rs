//! Helm's stored release record
//!
//! Helm persists every revision of a release as a JSON document (gzipped,
//! then base64 encoded) in a Secret or ConfigMap. Only the fields needed to
//! reconcile a release against repository indices are modelled here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use whatup_core::Release;

/// One stored revision of a Helm release
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelmRelease {
    pub name: String,

    #[serde(default)]
    pub namespace: String,

    /// Revision number, starting at 1
    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub info: ReleaseInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<HelmChart>,
}

/// Deployment information of a revision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    #[serde(default)]
    pub status: ReleaseStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deployed: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Status of a revision, as Helm writes it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseStatus {
    Deployed,
    Uninstalled,
    Superseded,
    Failed,
    Uninstalling,
    PendingInstall,
    PendingUpgrade,
    PendingRollback,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ReleaseStatus {
    /// Whether the release is gone from the cluster (kept only as history)
    pub fn is_uninstalled(&self) -> bool {
        matches!(self, Self::Uninstalled)
    }
}

/// The chart a revision was installed from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelmChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChartMetadata>,
}

/// Chart metadata (`Chart.yaml`) embedded in the release
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl HelmRelease {
    /// Convert into the engine's release view.
    ///
    /// Returns `None` for records without chart metadata.
    pub fn into_release(self) -> Option<Release> {
        let metadata = self.chart?.metadata?;
        let release = Release::new(self.name, self.namespace, metadata.name, metadata.version);
        Some(Release {
            annotations: metadata.annotations,
            ..release
        })
    }
}

/// Keep the highest revision of each release, dropping releases whose latest
/// revision is uninstalled. The result is sorted by namespace, then name.
pub fn latest_revisions(revisions: Vec<HelmRelease>) -> Vec<HelmRelease> {
    let mut latest: HashMap<(String, String), HelmRelease> = HashMap::new();
    for revision in revisions {
        let key = (revision.namespace.clone(), revision.name.clone());
        match latest.get(&key) {
            Some(current) if current.version >= revision.version => {}
            _ => {
                latest.insert(key, revision);
            }
        }
    }

    let mut releases: Vec<_> = latest
        .into_values()
        .filter(|r| !r.info.status.is_uninstalled())
        .collect();
    releases.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));
    releases
}
