//! Kubernetes connection setup
//!
//! Builds a client from the local kubeconfig, with optional transport
//! overrides mirroring Helm's `--tls*` flags.

use kube::Client;
use kube::config::{Config, KubeConfigOptions, Kubeconfig};
use std::path::PathBuf;

use crate::error::Result;
use crate::storage::{ConfigMapSource, Driver, ReleaseSource, SecretsSource};

/// Transport options for reaching the cluster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// Apply the TLS overrides below
    pub tls: bool,

    /// CA bundle used to verify the API server
    pub tls_ca_cert: Option<PathBuf>,

    /// Client certificate
    pub tls_cert: Option<PathBuf>,

    /// Client key
    pub tls_key: Option<PathBuf>,

    /// Server name expected in the API server certificate
    pub tls_hostname: Option<String>,

    /// Verify the API server certificate
    pub tls_verify: bool,

    /// Kubeconfig context to use instead of the current one
    pub kube_context: Option<String>,
}

impl TransportOptions {
    /// Whether the kubeconfig has to be loaded and modified explicitly
    fn needs_custom_config(&self) -> bool {
        self.tls || self.context().is_some()
    }

    /// Requested context, an empty name meaning the current one
    fn context(&self) -> Option<&str> {
        self.kube_context.as_deref().filter(|c| !c.is_empty())
    }

    /// Apply the TLS overrides to every cluster and user of a kubeconfig
    pub fn apply(&self, kubeconfig: &mut Kubeconfig) {
        if !self.tls {
            return;
        }

        for named in &mut kubeconfig.clusters {
            let Some(cluster) = named.cluster.as_mut() else {
                continue;
            };
            cluster.insecure_skip_tls_verify = Some(!self.tls_verify);
            if let Some(ca) = &self.tls_ca_cert {
                cluster.certificate_authority = Some(ca.display().to_string());
                cluster.certificate_authority_data = None;
            }
            if let Some(hostname) = &self.tls_hostname {
                cluster.tls_server_name = Some(hostname.clone());
            }
        }

        for named in &mut kubeconfig.auth_infos {
            let Some(auth) = named.auth_info.as_mut() else {
                continue;
            };
            if let Some(cert) = &self.tls_cert {
                auth.client_certificate = Some(cert.display().to_string());
                auth.client_certificate_data = None;
            }
            if let Some(key) = &self.tls_key {
                auth.client_key = Some(key.display().to_string());
                auth.client_key_data = None;
            }
        }
    }

    /// Connect to the cluster.
    ///
    /// Without overrides this is the standard inference (kubeconfig, then
    /// in-cluster service account).
    pub async fn client(&self) -> Result<Client> {
        if !self.needs_custom_config() {
            return Ok(Client::try_default().await?);
        }

        let mut kubeconfig = Kubeconfig::read()?;
        self.apply(&mut kubeconfig);

        let options = KubeConfigOptions {
            context: self.context().map(str::to_string),
            ..Default::default()
        };
        let config = Config::from_custom_kubeconfig(kubeconfig, &options).await?;
        tracing::debug!(cluster_url = %config.cluster_url, "connecting to cluster");

        Ok(Client::try_from(config)?)
    }
}

/// Connect and build the release source for a storage driver
pub async fn connect(driver: Driver, options: &TransportOptions) -> Result<Box<dyn ReleaseSource>> {
    let client = options.client().await?;
    Ok(match driver {
        Driver::Secret => Box::new(SecretsSource::with_client(client)),
        Driver::ConfigMap => Box::new(ConfigMapSource::with_client(client)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: dev
clusters:
- name: dev
  cluster:
    server: https://127.0.0.1:6443
    certificate-authority-data: Zm9v
- name: prod
  cluster:
    server: https://prod.example.com
contexts:
- name: dev
  context:
    cluster: dev
    user: admin
users:
- name: admin
  user:
    client-certificate-data: YmFy
    client-key-data: YmF6
"#;

    fn tls_options() -> TransportOptions {
        TransportOptions {
            tls: true,
            tls_ca_cert: Some(PathBuf::from("/etc/helm/ca.pem")),
            tls_cert: Some(PathBuf::from("/etc/helm/cert.pem")),
            tls_key: Some(PathBuf::from("/etc/helm/key.pem")),
            tls_hostname: Some("kubernetes.internal".to_string()),
            tls_verify: true,
            kube_context: None,
        }
    }

    #[test]
    fn test_apply_tls_overrides() {
        let mut kubeconfig = Kubeconfig::from_yaml(KUBECONFIG).unwrap();
        tls_options().apply(&mut kubeconfig);

        for named in &kubeconfig.clusters {
            let cluster = named.cluster.as_ref().unwrap();
            assert_eq!(cluster.certificate_authority.as_deref(), Some("/etc/helm/ca.pem"));
            assert!(cluster.certificate_authority_data.is_none());
            assert_eq!(cluster.tls_server_name.as_deref(), Some("kubernetes.internal"));
            assert_eq!(cluster.insecure_skip_tls_verify, Some(false));
        }

        let auth = kubeconfig.auth_infos[0].auth_info.as_ref().unwrap();
        assert_eq!(auth.client_certificate.as_deref(), Some("/etc/helm/cert.pem"));
        assert_eq!(auth.client_key.as_deref(), Some("/etc/helm/key.pem"));
        assert!(auth.client_certificate_data.is_none());
        assert!(auth.client_key_data.is_none());
    }

    #[test]
    fn test_apply_without_verification() {
        let mut kubeconfig = Kubeconfig::from_yaml(KUBECONFIG).unwrap();
        let options = TransportOptions {
            tls: true,
            ..Default::default()
        };
        options.apply(&mut kubeconfig);

        let dev = kubeconfig.clusters[0].cluster.as_ref().unwrap();
        assert_eq!(dev.insecure_skip_tls_verify, Some(true));
        assert_eq!(dev.certificate_authority_data.as_deref(), Some("Zm9v"));
    }

    #[test]
    fn test_apply_is_noop_without_tls() {
        let mut kubeconfig = Kubeconfig::from_yaml(KUBECONFIG).unwrap();
        TransportOptions {
            tls: false,
            ..tls_options()
        }
        .apply(&mut kubeconfig);

        let dev = kubeconfig.clusters[0].cluster.as_ref().unwrap();
        assert_eq!(dev.certificate_authority_data.as_deref(), Some("Zm9v"));
        assert!(dev.certificate_authority.is_none());
        assert!(dev.insecure_skip_tls_verify.is_none());
        assert!(kubeconfig.auth_infos[0].auth_info.as_ref().unwrap().client_key.is_none());
    }

    #[test]
    fn test_needs_custom_config() {
        assert!(!TransportOptions::default().needs_custom_config());
        assert!(tls_options().needs_custom_config());
        assert!(
            TransportOptions {
                kube_context: Some("prod".to_string()),
                ..Default::default()
            }
            .needs_custom_config()
        );
    }

    #[test]
    fn test_empty_context_uses_current() {
        let options = TransportOptions {
            kube_context: Some(String::new()),
            ..Default::default()
        };
        assert!(!options.needs_custom_config());
        assert_eq!(options.context(), None);

        let with_tls = TransportOptions {
            kube_context: Some(String::new()),
            ..tls_options()
        };
        assert!(with_tls.needs_custom_config());
        assert_eq!(with_tls.context(), None);
    }
}
