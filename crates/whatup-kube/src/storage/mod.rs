//! Release sources
//!
//! whatup reads installed releases from wherever Helm keeps them:
//! - **Secrets** (default): `helm.sh/release.v1` Secrets, like Helm's default driver
//! - **ConfigMap**: ConfigMaps written by `HELM_DRIVER=configmap`
//! - **File**: a local list of releases, for offline runs
//! - **Mock**: in-memory, for tests

mod configmap;
mod file;
mod mock;
mod secrets;

pub use configmap::ConfigMapSource;
pub use file::FileSource;
pub use mock::MockReleaseSource;
pub use secrets::SecretsSource;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::io::{Read, Write};
use std::str::FromStr;
use whatup_core::Release;

use crate::error::{KubeError, Result};
use crate::release::{HelmRelease, latest_revisions};

/// Label selector matching Helm-owned storage objects
pub const HELM_OWNER_SELECTOR: &str = "owner=helm";

/// Key holding the encoded release in a Secret or ConfigMap
pub const RELEASE_KEY: &str = "release";

/// gzip magic bytes Helm checks before decompressing
const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// Source of installed releases
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// List the latest revision of every installed release
    async fn list(&self) -> Result<Vec<Release>>;
}

/// Where Helm stores release records (`HELM_DRIVER`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Driver {
    #[default]
    Secret,
    ConfigMap,
}

impl FromStr for Driver {
    type Err = KubeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "secret" | "secrets" => Ok(Self::Secret),
            "configmap" | "configmaps" => Ok(Self::ConfigMap),
            _ => Err(KubeError::UnsupportedDriver {
                driver: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Secret => write!(f, "secret"),
            Self::ConfigMap => write!(f, "configmap"),
        }
    }
}

/// Decode a stored release (base64, optionally gzipped, JSON)
#[must_use = "decoded release should be used"]
pub fn decode_release(data: &str) -> Result<HelmRelease> {
    let decoded = STANDARD
        .decode(data.trim())
        .map_err(|e| KubeError::Decode(format!("base64 decode error: {}", e)))?;

    let json = if decoded.starts_with(&GZIP_MAGIC) {
        let mut decoder = flate2::read::GzDecoder::new(decoded.as_slice());
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| KubeError::Compression(e.to_string()))?;
        decompressed
    } else {
        decoded
    };

    serde_json::from_slice(&json).map_err(|e| KubeError::Serialization(e.to_string()))
}

/// Encode a release the way Helm stores it (JSON, gzip, base64)
#[must_use = "encoded data should be used for storage"]
pub fn encode_release(release: &HelmRelease) -> Result<String> {
    let json = serde_json::to_vec(release).map_err(|e| KubeError::Serialization(e.to_string()))?;

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::best());
    encoder
        .write_all(&json)
        .map_err(|e| KubeError::Compression(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| KubeError::Compression(e.to_string()))?;

    Ok(STANDARD.encode(compressed))
}

/// A release payload read from a storage object
#[derive(Debug, Clone)]
pub(crate) struct StoredPayload {
    /// Namespace of the Secret or ConfigMap holding the record
    pub namespace: Option<String>,
    pub data: String,
}

/// Decode payloads, keep the latest revision of each release and convert.
///
/// Records that fail to decode are skipped with a warning.
pub(crate) fn collect_releases(payloads: impl IntoIterator<Item = StoredPayload>) -> Vec<Release> {
    let revisions = payloads
        .into_iter()
        .filter_map(|payload| match decode_release(&payload.data) {
            Ok(mut release) => {
                if release.namespace.is_empty() {
                    release.namespace = payload.namespace.unwrap_or_default();
                }
                Some(release)
            }
            Err(e) => {
                tracing::warn!(
                    namespace = payload.namespace.as_deref().unwrap_or(""),
                    "skipping unreadable release record: {}",
                    e
                );
                None
            }
        })
        .collect();

    latest_revisions(revisions)
        .into_iter()
        .filter_map(|stored| {
            let name = stored.name.clone();
            let release = stored.into_release();
            if release.is_none() {
                tracing::debug!(release = %name, "release record has no chart metadata");
            }
            release
        })
        .collect()
}
