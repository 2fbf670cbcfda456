//! Precomputed chart -> repository map

use std::collections::HashMap;

use crate::index::{RepositoryIndex, RepositoryRef};

/// Owning repository for every chart listed in a configured repository's index.
///
/// Built once per run before any release is processed and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartRepoMap {
    owners: HashMap<String, String>,
}

impl ChartRepoMap {
    /// Scan configured repositories in order and record the owner of each chart.
    ///
    /// Only indices whose name matches a configured repository contribute. The
    /// first repository listing a chart owns it, unless a later repository's
    /// name contains the chart name, which then takes over.
    pub fn build(repositories: &[RepositoryRef], indices: &[RepositoryIndex]) -> Self {
        let mut owners: HashMap<String, String> = HashMap::new();

        for repo in repositories {
            let owned = indices
                .iter()
                .filter(|index| index.name.as_deref() == Some(repo.name.as_str()));

            for index in owned {
                for chart in index.chart_names() {
                    let claim = !owners.contains_key(chart) || repo.name.contains(chart);
                    if claim {
                        owners.insert(chart.to_string(), repo.name.clone());
                    }
                }
            }
        }

        Self { owners }
    }

    pub fn get(&self, chart: &str) -> Option<&str> {
        self.owners.get(chart).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ChartEntry;

    fn index(name: &str, charts: &[&str]) -> RepositoryIndex {
        charts.iter().fold(
            RepositoryIndex::for_repository(name, format!("https://{}.example.com", name)),
            |index, chart| index.with_chart(*chart, vec![ChartEntry::stable("1.0.0")]),
        )
    }

    fn repos(names: &[&str]) -> Vec<RepositoryRef> {
        names
            .iter()
            .map(|n| RepositoryRef::new(*n, format!("https://{}.example.com", n)))
            .collect()
    }

    #[test]
    fn test_first_writer_owns_chart() {
        let indices = vec![index("bitnami", &["redis", "nginx"]), index("other", &["redis"])];
        let map = ChartRepoMap::build(&repos(&["bitnami", "other"]), &indices);

        assert_eq!(map.get("redis"), Some("bitnami"));
        assert_eq!(map.get("nginx"), Some("bitnami"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_containing_repository_takes_over() {
        let indices = vec![
            index("bitnami", &["redis"]),
            index("redis-charts", &["redis"]),
            index("zzz", &["redis"]),
        ];
        let map = ChartRepoMap::build(&repos(&["bitnami", "redis-charts", "zzz"]), &indices);

        assert_eq!(map.get("redis"), Some("redis-charts"));
    }

    #[test]
    fn test_last_containing_repository_wins() {
        let indices = vec![index("redis", &["redis"]), index("redis-mirror", &["redis"])];
        let map = ChartRepoMap::build(&repos(&["redis", "redis-mirror"]), &indices);

        assert_eq!(map.get("redis"), Some("redis-mirror"));
    }

    #[test]
    fn test_unconfigured_index_is_ignored() {
        let mut adhoc = index("ignored", &["cilium"]);
        adhoc.name = None;
        let indices = vec![index("bitnami", &["redis"]), adhoc, index("orphan", &["etcd"])];
        let map = ChartRepoMap::build(&repos(&["bitnami"]), &indices);

        assert_eq!(map.get("redis"), Some("bitnami"));
        assert_eq!(map.get("cilium"), None);
        assert_eq!(map.get("etcd"), None);
    }

    #[test]
    fn test_configured_order_drives_ownership() {
        let indices = vec![index("a", &["app"]), index("b", &["app"])];
        let map = ChartRepoMap::build(&repos(&["b", "a"]), &indices);

        assert_eq!(map.get("app"), Some("b"));
    }

    #[test]
    fn test_empty() {
        let map = ChartRepoMap::build(&[], &[index("bitnami", &["redis"])]);
        assert!(map.is_empty());
    }
}
