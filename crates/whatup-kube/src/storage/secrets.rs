//! Kubernetes Secrets release source
//!
//! Helm's default storage driver keeps one Secret per revision, named
//! `sh.helm.release.v1.<name>.v<revision>`, of type `helm.sh/release.v1` and
//! labelled `owner=helm`.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::Client;
use kube::api::{Api, ListParams};
use whatup_core::Release;

use super::{HELM_OWNER_SELECTOR, RELEASE_KEY, ReleaseSource, StoredPayload, collect_releases};
use crate::error::Result;

/// Secret type Helm uses for release records
pub const HELM_RELEASE_TYPE: &str = "helm.sh/release.v1";

/// Reads releases from Helm's Secrets across all namespaces
pub struct SecretsSource {
    client: Client,
}

impl SecretsSource {
    /// Create with an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Extract the encoded release from a Secret, if it holds one
    fn payload(secret: &Secret) -> Option<StoredPayload> {
        if secret.type_.as_deref() != Some(HELM_RELEASE_TYPE) {
            return None;
        }

        let data = secret.data.as_ref()?.get(RELEASE_KEY)?;
        match String::from_utf8(data.0.clone()) {
            Ok(encoded) => Some(StoredPayload {
                namespace: secret.metadata.namespace.clone(),
                data: encoded,
            }),
            Err(e) => {
                tracing::warn!(
                    secret = secret.metadata.name.as_deref().unwrap_or(""),
                    "invalid UTF-8 in release secret: {}",
                    e
                );
                None
            }
        }
    }
}

#[async_trait]
impl ReleaseSource for SecretsSource {
    async fn list(&self) -> Result<Vec<Release>> {
        let api: Api<Secret> = Api::all(self.client.clone());
        let params = ListParams::default().labels(HELM_OWNER_SELECTOR);
        let secrets = api.list(&params).await?;

        tracing::debug!(count = secrets.items.len(), "listed release secrets");
        Ok(collect_releases(secrets.items.iter().filter_map(Self::payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::encode_release;
    use crate::storage::tests::stored;
    use k8s_openapi::ByteString;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn secret(type_: &str, data: Option<Vec<u8>>) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some("sh.helm.release.v1.web.v1".to_string()),
                namespace: Some("web".to_string()),
                ..Default::default()
            },
            type_: Some(type_.to_string()),
            data: data.map(|bytes| BTreeMap::from([(RELEASE_KEY.to_string(), ByteString(bytes))])),
            ..Default::default()
        }
    }

    #[test]
    fn test_payload_from_release_secret() {
        let encoded = encode_release(&stored("web", "web", 1, "nginx")).unwrap();
        let release_secret = secret(HELM_RELEASE_TYPE, Some(encoded.clone().into_bytes()));
        let payload = SecretsSource::payload(&release_secret).unwrap();

        assert_eq!(payload.namespace.as_deref(), Some("web"));
        assert_eq!(payload.data, encoded);
    }

    #[test]
    fn test_payload_ignores_other_secrets() {
        assert!(SecretsSource::payload(&secret("Opaque", Some(b"x".to_vec()))).is_none());
        assert!(SecretsSource::payload(&secret(HELM_RELEASE_TYPE, None)).is_none());
        assert!(SecretsSource::payload(&secret(HELM_RELEASE_TYPE, Some(vec![0xff, 0xfe]))).is_none());
    }
}
