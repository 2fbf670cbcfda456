//! whatup Kube - reads installed Helm releases
//!
//! This crate provides:
//! - **Release sources**: Helm's Secrets and ConfigMaps storage, a local file, and a mock
//! - **Release codec**: Helm's base64 + gzip + JSON release records
//! - **Connection setup**: kubeconfig loading with Helm-style TLS overrides

pub mod client;
pub mod error;
pub mod release;
pub mod storage;

pub use client::{TransportOptions, connect};
pub use error::{KubeError, Result};
pub use release::{HelmRelease, ReleaseStatus, latest_revisions};
pub use storage::{
    ConfigMapSource, Driver, FileSource, MockReleaseSource, ReleaseSource, SecretsSource,
    decode_release, encode_release,
};
