//! Mock release source for testing
//!
//! Serves releases from memory, useful for unit tests without requiring a
//! Kubernetes cluster.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use whatup_core::Release;

use super::ReleaseSource;
use crate::error::{KubeError, Result};

/// In-memory release source
#[derive(Debug, Clone, Default)]
pub struct MockReleaseSource {
    releases: Vec<Release>,
    failure: Option<String>,
    /// Number of `list` calls, for assertions
    lists: Arc<AtomicUsize>,
}

impl MockReleaseSource {
    /// Create an empty mock source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-populated releases
    pub fn with_releases(releases: Vec<Release>) -> Self {
        Self {
            releases,
            ..Self::default()
        }
    }

    /// A source whose every `list` call fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of `list` calls so far
    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseSource for MockReleaseSource {
    async fn list(&self) -> Result<Vec<Release>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(KubeError::Unavailable(message.clone())),
            None => Ok(self.releases.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_lists_releases() {
        let source = MockReleaseSource::with_releases(vec![Release::new("a", "ns", "chart", "1.0.0")]);
        assert_eq!(source.list().await.unwrap().len(), 1);
        assert_eq!(source.list().await.unwrap().len(), 1);
        assert_eq!(source.list_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let source = MockReleaseSource::failing("connection refused");
        let err = source.list().await.unwrap_err();
        assert_eq!(err.to_string(), "release source unavailable: connection refused");
        assert_eq!(source.list_count(), 1);
        assert!(MockReleaseSource::new().list().await.unwrap().is_empty());
    }
}
