//! Installed release types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One installed deployment of a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Release name (unique within its namespace)
    pub name: String,

    /// Kubernetes namespace
    pub namespace: String,

    /// Chart the release was installed from
    pub chart: ChartRef,

    /// Chart metadata annotations
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// Chart name and installed version of a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRef {
    pub name: String,
    pub version: String,
}

impl Release {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        chart: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            chart: ChartRef {
                name: chart.into(),
                version: version.into(),
            },
            annotations: BTreeMap::new(),
        }
    }

    /// Add an annotation, builder style
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Look up an annotation value
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_builder() {
        let release = Release::new("db", "data", "postgres", "10.1")
            .with_annotation("artifacthub.io/repository", "bitnami");

        assert_eq!(release.chart.name, "postgres");
        assert_eq!(release.chart.version, "10.1");
        assert_eq!(release.annotation("artifacthub.io/repository"), Some("bitnami"));
        assert_eq!(release.annotation("missing"), None);
    }

    #[test]
    fn test_release_deserialize_without_annotations() {
        let yaml = r#"
name: cache
namespace: default
chart:
  name: redis
  version: 6.0.0
"#;
        let release: Release = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(release.name, "cache");
        assert!(release.annotations.is_empty());
    }
}
