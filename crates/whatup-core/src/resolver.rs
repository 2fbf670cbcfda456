//! Version resolution
//!
//! Finds the latest acceptable published version of a chart. Indices are
//! searched in configured order and the first one yielding an acceptable
//! entry wins; candidates from different repositories are never compared.

use crate::index::{ChartEntry, RepositoryIndex};
use crate::settings::{Settings, Status};

/// The entry selected as "latest" for a chart and the index it came from
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub index: &'a RepositoryIndex,
    pub entry: &'a ChartEntry,
}

impl<'a> Resolution<'a> {
    pub fn latest_version(&self) -> &'a str {
        &self.entry.version
    }

    /// First URL of the selected entry
    pub fn source_url(&self) -> Option<&'a str> {
        self.entry.source_url()
    }

    /// Classify an installed version against this resolution
    pub fn classify(&self, installed: &str, settings: &Settings) -> Status {
        settings.classify(installed, self.latest_version())
    }
}

/// Resolve the latest acceptable entry for `chart`.
///
/// Entries are taken to be ordered newest first, so the first entry that
/// passes the prerelease filter is the latest. An index listing the chart
/// with only filtered-out entries does not match.
pub fn resolve_latest<'a>(
    chart: &str,
    indices: &'a [RepositoryIndex],
    settings: &Settings,
) -> Option<Resolution<'a>> {
    indices.iter().find_map(|index| {
        let entry = index
            .get(chart)?
            .iter()
            .find(|entry| settings.include_prereleases || !entry.prerelease)?;
        Some(Resolution { index, entry })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::VersionMatch;

    fn stable_only() -> Settings {
        Settings::default()
    }

    fn with_devel() -> Settings {
        Settings::new(true, VersionMatch::Exact)
    }

    #[test]
    fn test_first_entry_is_latest() {
        let indices = vec![
            RepositoryIndex::for_repository("bitnami", "https://charts.bitnami.com/bitnami")
                .with_chart(
                    "postgres",
                    vec![ChartEntry::stable("10.1"), ChartEntry::stable("9.0")],
                ),
        ];

        let resolution = resolve_latest("postgres", &indices, &stable_only()).unwrap();
        assert_eq!(resolution.latest_version(), "10.1");
        assert_eq!(resolution.index.name.as_deref(), Some("bitnami"));
        assert_eq!(resolution.classify("10.1", &stable_only()), Status::Uptodate);
    }

    #[test]
    fn test_prerelease_skipped_by_default() {
        let indices = vec![
            RepositoryIndex::for_repository("hashicorp", "https://helm.releases.hashicorp.com")
                .with_chart(
                    "redis",
                    vec![
                        ChartEntry::prerelease("6.3.0-beta"),
                        ChartEntry::stable("6.2.0"),
                        ChartEntry::prerelease("6.1.0-beta"),
                    ],
                ),
        ];

        let resolution = resolve_latest("redis", &indices, &stable_only()).unwrap();
        assert_eq!(resolution.latest_version(), "6.2.0");
        assert_eq!(resolution.classify("6.0.0", &stable_only()), Status::Outdated);

        let resolution = resolve_latest("redis", &indices, &with_devel()).unwrap();
        assert_eq!(resolution.latest_version(), "6.3.0-beta");
    }

    #[test]
    fn test_all_prerelease_index_does_not_match() {
        let indices = vec![
            RepositoryIndex::for_repository("edge", "https://edge.example.com")
                .with_chart("app", vec![ChartEntry::prerelease("2.0.0-rc.1")]),
            RepositoryIndex::for_repository("stable", "https://stable.example.com")
                .with_chart("app", vec![ChartEntry::stable("1.9.0")]),
        ];

        let resolution = resolve_latest("app", &indices, &stable_only()).unwrap();
        assert_eq!(resolution.index.name.as_deref(), Some("stable"));
        assert_eq!(resolution.latest_version(), "1.9.0");

        let resolution = resolve_latest("app", &indices, &with_devel()).unwrap();
        assert_eq!(resolution.index.name.as_deref(), Some("edge"));
    }

    #[test]
    fn test_configured_order_is_the_tie_break() {
        let indices = vec![
            RepositoryIndex::for_repository("first", "https://first.example.com")
                .with_chart("nginx", vec![ChartEntry::stable("1.0.0")]),
            RepositoryIndex::for_repository("second", "https://second.example.com")
                .with_chart("nginx", vec![ChartEntry::stable("9.9.9")]),
        ];

        let resolution = resolve_latest("nginx", &indices, &stable_only()).unwrap();
        assert_eq!(resolution.index.name.as_deref(), Some("first"));
        assert_eq!(resolution.latest_version(), "1.0.0");
    }

    #[test]
    fn test_empty_entry_list_is_skipped() {
        let indices = vec![
            RepositoryIndex::for_repository("empty", "https://empty.example.com")
                .with_chart("nginx", vec![]),
            RepositoryIndex::for_repository("full", "https://full.example.com")
                .with_chart("nginx", vec![ChartEntry::stable("1.0.0")]),
        ];

        let resolution = resolve_latest("nginx", &indices, &stable_only()).unwrap();
        assert_eq!(resolution.index.name.as_deref(), Some("full"));
    }

    #[test]
    fn test_unknown_chart() {
        let indices = vec![
            RepositoryIndex::for_repository("bitnami", "https://charts.bitnami.com/bitnami")
                .with_chart("redis", vec![ChartEntry::stable("17.0.0")]),
        ];
        assert!(resolve_latest("postgres", &indices, &stable_only()).is_none());
        assert!(resolve_latest("redis", &[], &stable_only()).is_none());
    }

    #[test]
    fn test_source_url_comes_from_selected_entry() {
        let indices = vec![
            RepositoryIndex::for_repository("bitnami", "https://charts.bitnami.com/bitnami")
                .with_chart(
                    "redis",
                    vec![
                        ChartEntry::prerelease("18.0.0-rc.1")
                            .with_url("https://rc.example.com/redis-18.0.0-rc.1.tgz"),
                        ChartEntry::stable("17.0.0")
                            .with_url("https://charts.bitnami.com/bitnami/redis-17.0.0.tgz"),
                    ],
                ),
        ];

        let resolution = resolve_latest("redis", &indices, &stable_only()).unwrap();
        assert_eq!(
            resolution.source_url(),
            Some("https://charts.bitnami.com/bitnami/redis-17.0.0.tgz")
        );
    }
}
