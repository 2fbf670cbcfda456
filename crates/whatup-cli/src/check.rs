//! The whatup run: load indices, list releases, reconcile, render

use whatup_core::{Outcome, Reconciler, Release, RepositoryIndex, RepositoryRef};
use whatup_kube::{FileSource, ReleaseSource, connect};
use whatup_repo::{IndexLoader, RepositoryFile};

use crate::config::{ReleaseInput, RunConfig};
use crate::display::ReportRenderer;
use crate::error::Result;

/// Repositories and their loaded indices, in configured order
#[derive(Debug, Default)]
pub struct Catalog {
    pub repositories: Vec<RepositoryRef>,
    pub indices: Vec<RepositoryIndex>,
}

/// Load the repository file and every index that can be read.
///
/// A missing or invalid repository file is fatal. Cached indices that cannot
/// be read are skipped; an explicitly requested `--index-file` must load.
pub fn load_catalog(config: &RunConfig) -> Result<Catalog> {
    let file = RepositoryFile::load_from(&config.paths.repository_config)?;
    tracing::debug!(
        path = %config.paths.repository_config.display(),
        repositories = file.repositories.len(),
        "loaded repository file"
    );

    let loader = IndexLoader::new(&config.paths.repository_cache).with_ordering(config.ordering);
    let mut indices = loader.load_all(&file);
    for path in &config.index_files {
        indices.push(loader.load_file(path)?);
    }

    Ok(Catalog {
        repositories: file.references(),
        indices,
    })
}

/// Open the configured release source
pub async fn open_source(input: &ReleaseInput) -> Result<Box<dyn ReleaseSource>> {
    match input {
        ReleaseInput::File(path) => Ok(Box::new(FileSource::new(path))),
        ReleaseInput::Cluster { driver, transport } => {
            tracing::debug!(%driver, "reading releases from cluster");
            Ok(connect(*driver, transport).await?)
        }
    }
}

/// Reconcile releases against the catalog
pub fn reconcile(config: &RunConfig, catalog: &Catalog, releases: &[Release]) -> Outcome {
    Reconciler::new(&catalog.repositories, &catalog.indices, config.settings).run(releases)
}

/// Run a check against an already opened source and render the outcome.
///
/// Returns whether any release is outdated.
pub async fn execute(
    config: &RunConfig,
    source: &dyn ReleaseSource,
    renderer: &mut ReportRenderer,
) -> Result<bool> {
    let releases = source.list().await?;
    tracing::debug!(count = releases.len(), "listed releases");

    let catalog = load_catalog(config)?;
    let outcome = reconcile(config, &catalog, &releases);

    if !renderer.format().is_plain() {
        log_outcome(&outcome);
    }
    renderer.render(&outcome)?;

    Ok(matches!(&outcome, Outcome::Completed(report) if report.has_outdated()))
}

/// Structured formats keep stdout parseable; notices go to the log instead
fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::NoReleases => tracing::info!("no releases found"),
        Outcome::NoRepositories => {
            tracing::warn!("no repositories found, did you run `helm repo update`?")
        }
        Outcome::Completed(report) => {
            for warning in &report.warnings {
                tracing::warn!("{}", warning);
            }
        }
    }
}

/// Full run writing to stdout
pub async fn run(config: &RunConfig) -> Result<bool> {
    let source = open_source(&config.releases).await?;
    let mut renderer = ReportRenderer::new(config.output, config.styled);
    execute(config, source.as_ref(), &mut renderer).await
}
