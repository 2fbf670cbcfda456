//! Reconciliation of releases against repository indices

use serde::{Deserialize, Serialize};

use crate::attribution::{AttributionContext, Attributor, ChartRepoMap};
use crate::index::{RepositoryIndex, RepositoryRef};
use crate::release::Release;
use crate::resolver::resolve_latest;
use crate::settings::{Settings, Status};

/// Outcome of reconciling one release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub release_name: String,
    pub namespace: String,
    pub chart_name: String,
    pub installed_version: String,
    pub latest_version: String,
    pub repo_name: String,
    pub status: Status,
}

impl ResultRecord {
    pub fn is_outdated(&self) -> bool {
        self.status.is_outdated()
    }
}

/// A release whose chart is not listed in any loaded index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub release: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The source repository could not be determined for '{}'",
            self.release
        )
    }
}

/// Records and warnings of a run, in release order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub records: Vec<ResultRecord>,
    pub warnings: Vec<Warning>,
}

impl Report {
    pub fn has_outdated(&self) -> bool {
        self.records.iter().any(ResultRecord::is_outdated)
    }

    pub fn outdated(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter().filter(|r| r.is_outdated())
    }
}

/// Result of a full run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing is installed, nothing to check
    NoReleases,

    /// No repository index could be loaded
    NoRepositories,

    Completed(Report),
}

/// Reconciles releases against a fixed set of indices.
///
/// The chart -> repository map is built on construction, before any release
/// is looked at, and is never modified afterwards.
pub struct Reconciler<'a> {
    repositories: &'a [RepositoryRef],
    indices: &'a [RepositoryIndex],
    settings: Settings,
    chart_map: ChartRepoMap,
    attributor: Attributor,
}

impl<'a> Reconciler<'a> {
    /// `indices` must be in configured repository order
    pub fn new(
        repositories: &'a [RepositoryRef],
        indices: &'a [RepositoryIndex],
        settings: Settings,
    ) -> Self {
        let chart_map = ChartRepoMap::build(repositories, indices);
        tracing::debug!(
            repositories = repositories.len(),
            indices = indices.len(),
            charts = chart_map.len(),
            "built chart repository map"
        );

        Self {
            repositories,
            indices,
            settings,
            chart_map,
            attributor: Attributor::default(),
        }
    }

    /// Replace the attribution chain
    pub fn with_attributor(mut self, attributor: Attributor) -> Self {
        self.attributor = attributor;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn chart_map(&self) -> &ChartRepoMap {
        &self.chart_map
    }

    /// Run with the empty-input short-circuits applied
    pub fn run(&self, releases: &[Release]) -> Outcome {
        if releases.is_empty() {
            return Outcome::NoReleases;
        }
        if self.indices.is_empty() {
            return Outcome::NoRepositories;
        }
        Outcome::Completed(self.reconcile(releases))
    }

    /// Reconcile every release, preserving release order
    pub fn reconcile(&self, releases: &[Release]) -> Report {
        let mut report = Report::default();

        for release in releases {
            match self.reconcile_one(release) {
                Some(record) => report.records.push(record),
                None => {
                    tracing::debug!(
                        release = %release.name,
                        chart = %release.chart.name,
                        "chart not found in any index"
                    );
                    report.warnings.push(Warning {
                        release: release.name.clone(),
                    });
                }
            }
        }

        report
    }

    fn reconcile_one(&self, release: &Release) -> Option<ResultRecord> {
        let chart = release.chart.name.as_str();
        let resolution = resolve_latest(chart, self.indices, &self.settings)?;

        let ctx = AttributionContext {
            release,
            chart,
            repositories: self.repositories,
            indices: self.indices,
            chart_map: &self.chart_map,
            index: Some(resolution.index),
            source_url: resolution.source_url(),
        };
        let attribution = self.attributor.attribute(&ctx);
        tracing::debug!(
            release = %release.name,
            chart,
            repository = %attribution.repository,
            strategy = attribution.strategy,
            unknown = attribution.is_unknown(),
            "attributed release"
        );

        Some(ResultRecord {
            release_name: release.name.clone(),
            namespace: release.namespace.clone(),
            chart_name: chart.to_string(),
            installed_version: release.chart.version.clone(),
            latest_version: resolution.latest_version().to_string(),
            repo_name: attribution.repository,
            status: resolution.classify(&release.chart.version, &self.settings),
        })
    }
}
