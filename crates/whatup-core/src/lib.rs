//! Whatup Core - reconciles installed releases against cached repository indices
//!
//! This crate holds all of the decision logic of whatup:
//! - `resolver`: picks the latest published version of a chart and classifies releases
//! - `attribution`: an ordered chain of strategies naming the repository a release came from
//! - `report`: drives both over every release and collects records and warnings
//!
//! Everything here is synchronous and pure. Releases, indices and the configured
//! repositories are fully materialized by the caller before a [`Reconciler`] is built.

pub mod attribution;
pub mod error;
pub mod index;
pub mod release;
pub mod report;
pub mod resolver;
pub mod settings;

pub use attribution::{
    AnnotationStrategy, Attribution, AttributionContext, AttributionStrategy, Attributor,
    ChartMapStrategy, ChartRepoMap, IndexIdentifierStrategy, NameEqualityStrategy,
    PrefixStrategy, UrlProvenanceStrategy, REPOSITORY_ANNOTATION, UNKNOWN_REPOSITORY,
};
pub use error::{CoreError, Result};
pub use index::{ChartEntry, RepositoryIndex, RepositoryRef};
pub use release::{ChartRef, Release};
pub use report::{Outcome, Reconciler, Report, ResultRecord, Warning};
pub use resolver::{Resolution, resolve_latest};
pub use settings::{Settings, Status, VersionMatch};
