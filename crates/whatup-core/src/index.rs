//! Repository index types as seen by the reconciliation engine
//!
//! A [`RepositoryIndex`] is one repository's published catalog. The entry sequence of
//! every chart is expected newest first; the engine relies on that order and never
//! re-sorts on its own. Loaders that cannot vouch for the order can check it with
//! [`RepositoryIndex::validate_order`] or fix it with [`RepositoryIndex::sort_entries`].

use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{CoreError, Result};

/// A configured repository (name + base URL)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    pub url: String,
}

impl RepositoryRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One published version of a chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartEntry {
    /// Chart version (opaque)
    pub version: String,

    /// Excluded from selection unless prereleases are requested
    #[serde(default)]
    pub prerelease: bool,

    /// Download URLs, used for provenance matching
    #[serde(default)]
    pub urls: Vec<String>,
}

impl ChartEntry {
    /// Stable entry without URLs
    pub fn stable(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            prerelease: false,
            urls: Vec::new(),
        }
    }

    /// Prerelease entry without URLs
    pub fn prerelease(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            prerelease: true,
            urls: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    /// The URL the chart archive is published at
    pub fn source_url(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }
}

/// One repository's catalog of charts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryIndex {
    /// Configured repository name, `None` for an index loaded on its own
    #[serde(default)]
    pub name: Option<String>,

    /// Configured repository base URL
    #[serde(default)]
    pub url: Option<String>,

    /// Where the index was read from (usually a cache file path)
    #[serde(default)]
    pub identifier: Option<String>,

    /// Chart name -> entries, newest first
    #[serde(default)]
    pub entries: IndexMap<String, Vec<ChartEntry>>,
}

impl RepositoryIndex {
    /// Index belonging to a configured repository
    pub fn for_repository(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Append entries for a chart, builder style
    pub fn with_chart(mut self, chart: impl Into<String>, entries: Vec<ChartEntry>) -> Self {
        self.entries.entry(chart.into()).or_default().extend(entries);
        self
    }

    /// All entries of a chart
    pub fn get(&self, chart: &str) -> Option<&[ChartEntry]> {
        self.entries.get(chart).map(Vec::as_slice)
    }

    pub fn contains(&self, chart: &str) -> bool {
        self.entries.contains_key(chart)
    }

    /// Chart names in index order
    pub fn chart_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Human readable label for logs and errors
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.identifier.as_deref())
            .unwrap_or("<unnamed index>")
    }

    /// Check that every chart's entries are newest first.
    ///
    /// Only versions that parse as semver are compared; anything else is
    /// opaque and cannot be ordered.
    pub fn validate_order(&self) -> Result<()> {
        for (chart, entries) in &self.entries {
            let mut previous: Option<(Version, &str)> = None;
            for entry in entries {
                let Ok(current) = Version::parse(&entry.version) else {
                    continue;
                };
                if let Some((prev, prev_raw)) = &previous {
                    if current > *prev {
                        return Err(CoreError::UnorderedEntries {
                            repository: self.label().to_string(),
                            chart: chart.clone(),
                            found: (*prev_raw).to_string(),
                            newer: entry.version.clone(),
                        });
                    }
                }
                previous = Some((current, &entry.version));
            }
        }
        Ok(())
    }

    pub fn is_ordered(&self) -> bool {
        self.validate_order().is_ok()
    }

    /// Re-sort every chart's entries newest first by semver.
    ///
    /// Unparsable versions sink below parsable ones and keep their relative order.
    pub fn sort_entries(&mut self) {
        for entries in self.entries.values_mut() {
            entries.sort_by(|a, b| {
                match (Version::parse(&a.version), Version::parse(&b.version)) {
                    (Ok(va), Ok(vb)) => vb.cmp(&va),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => Ordering::Equal,
                }
            });
        }
    }
}
