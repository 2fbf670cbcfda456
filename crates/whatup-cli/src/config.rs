//! Run configuration
//!
//! Built once from flags and the environment before any work starts, then
//! only read.

use std::path::PathBuf;
use whatup_core::Settings;
use whatup_kube::{Driver, TransportOptions};
use whatup_repo::{HelmPaths, IndexOrdering};

/// Output format of the results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One paragraph per release
    Plain,

    /// One line per outdated release
    Short,

    /// Records as JSON
    Json,

    /// Records as YAML
    #[value(alias = "yml")]
    Yaml,

    /// Outdated releases as a table
    #[default]
    Table,
}

impl OutputFormat {
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain)
    }
}

/// Where installed releases are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseInput {
    /// Helm's storage in the cluster
    Cluster {
        driver: Driver,
        transport: TransportOptions,
    },

    /// A local releases file
    File(PathBuf),
}

/// Everything a run needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub output: OutputFormat,
    pub settings: Settings,
    pub paths: HelmPaths,
    /// Extra index files, consulted after the configured repositories
    pub index_files: Vec<PathBuf>,
    pub ordering: IndexOrdering,
    pub releases: ReleaseInput,
    pub fail_on_outdated: bool,
    /// Emit terminal styling on stdout
    pub styled: bool,
}
