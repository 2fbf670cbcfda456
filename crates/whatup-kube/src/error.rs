//! Error types for whatup-kube

use std::path::PathBuf;
use thiserror::Error;

/// Result type for whatup-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur while reading installed releases
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// Kubeconfig could not be read or applied
    #[error("kubeconfig error: {0}")]
    Kubeconfig(String),

    /// Unknown `HELM_DRIVER` value
    #[error("unsupported storage driver '{driver}' (expected 'secret' or 'configmap')")]
    UnsupportedDriver { driver: String },

    /// Stored release record could not be decoded
    #[error("release decode error: {0}")]
    Decode(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Compression error
    #[error("compression error: {0}")]
    Compression(String),

    /// Releases file could not be parsed
    #[error("invalid releases file {}: {message}", path.display())]
    InvalidReleasesFile { path: PathBuf, message: String },

    /// Injected failure from the mock source
    #[error("release source unavailable: {0}")]
    Unavailable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<kube::config::KubeconfigError> for KubeError {
    fn from(err: kube::config::KubeconfigError) -> Self {
        KubeError::Kubeconfig(err.to_string())
    }
}
