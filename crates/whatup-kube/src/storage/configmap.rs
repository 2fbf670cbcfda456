//! Kubernetes ConfigMap release source (`HELM_DRIVER=configmap`)

use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::Client;
use kube::api::{Api, ListParams};
use whatup_core::Release;

use super::{HELM_OWNER_SELECTOR, RELEASE_KEY, ReleaseSource, StoredPayload, collect_releases};
use crate::error::Result;

/// Reads releases from Helm's ConfigMaps across all namespaces
pub struct ConfigMapSource {
    client: Client,
}

impl ConfigMapSource {
    /// Create with an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn payload(config_map: &ConfigMap) -> Option<StoredPayload> {
        let data = config_map.data.as_ref()?.get(RELEASE_KEY)?;
        Some(StoredPayload {
            namespace: config_map.metadata.namespace.clone(),
            data: data.clone(),
        })
    }
}

#[async_trait]
impl ReleaseSource for ConfigMapSource {
    async fn list(&self) -> Result<Vec<Release>> {
        let api: Api<ConfigMap> = Api::all(self.client.clone());
        let params = ListParams::default().labels(HELM_OWNER_SELECTOR);
        let config_maps = api.list(&params).await?;

        tracing::debug!(count = config_maps.items.len(), "listed release configmaps");
        Ok(collect_releases(config_maps.items.iter().filter_map(Self::payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::encode_release;
    use crate::storage::tests::stored;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    #[test]
    fn test_payload_from_config_map() {
        let encoded = encode_release(&stored("ops", "metrics", 2, "prometheus")).unwrap();
        let config_map = ConfigMap {
            metadata: ObjectMeta {
                namespace: Some("ops".to_string()),
                ..Default::default()
            },
            data: Some(BTreeMap::from([(RELEASE_KEY.to_string(), encoded.clone())])),
            ..Default::default()
        };

        let payload = ConfigMapSource::payload(&config_map).unwrap();
        assert_eq!(payload.data, encoded);

        let releases = collect_releases([payload]);
        assert_eq!(releases[0].chart.name, "prometheus");
        assert_eq!(releases[0].namespace, "ops");
    }

    #[test]
    fn test_payload_without_release_data() {
        assert!(ConfigMapSource::payload(&ConfigMap::default()).is_none());
    }
}
