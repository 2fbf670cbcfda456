//! Repository attribution
//!
//! Index files rarely say which configured repository a release was installed
//! from, so the owning repository is inferred by an ordered chain of
//! [`AttributionStrategy`] implementations, strongest signal first:
//!
//! 1. [`AnnotationStrategy`] - the chart declares its repository
//! 2. [`ChartMapStrategy`] - the chart is listed in a configured repository's index
//! 3. [`UrlProvenanceStrategy`] - the selected entry's URL lives under a repository URL
//! 4. [`NameEqualityStrategy`] - a repository is named after the chart
//! 5. [`IndexIdentifierStrategy`] - the index was read from `<repo>-index.yaml`
//! 6. [`PrefixStrategy`] - a repository name starts with the chart's name prefix
//!
//! The first strategy producing a non-empty name wins. When none does, the
//! release is attributed to [`UNKNOWN_REPOSITORY`].

mod chart_map;
mod strategies;

pub use chart_map::ChartRepoMap;
pub use strategies::{
    AnnotationStrategy, ChartMapStrategy, IndexIdentifierStrategy, NameEqualityStrategy,
    PrefixStrategy, UrlProvenanceStrategy,
};

use crate::index::{RepositoryIndex, RepositoryRef};
use crate::release::Release;

/// Chart annotation declaring the source repository
pub const REPOSITORY_ANNOTATION: &str = "artifacthub.io/repository";

/// Repository name used when no strategy could attribute a release
pub const UNKNOWN_REPOSITORY: &str = "unknown";

/// Strategy name reported for the fallback
const FALLBACK: &str = "fallback";

/// Everything a strategy may look at for one release
#[derive(Debug, Clone, Copy)]
pub struct AttributionContext<'a> {
    pub release: &'a Release,

    /// Chart name being attributed
    pub chart: &'a str,

    /// Configured repositories, in configured order
    pub repositories: &'a [RepositoryRef],

    /// Every loaded index. None of the built-in strategies read it; custom
    /// strategies may.
    pub indices: &'a [RepositoryIndex],

    /// Chart -> repository map built once for the run
    pub chart_map: &'a ChartRepoMap,

    /// Index the latest version was resolved from
    pub index: Option<&'a RepositoryIndex>,

    /// Source URL of the resolved entry
    pub source_url: Option<&'a str>,
}

/// One attribution heuristic.
///
/// Returns `None` (or an empty name) to pass the decision on to the next strategy.
pub trait AttributionStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn attribute(&self, ctx: &AttributionContext<'_>) -> Option<String>;
}

/// Result of attributing a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub repository: String,

    /// Name of the strategy that decided
    pub strategy: &'static str,
}

impl Attribution {
    /// Whether no strategy decided and the fallback name was used
    pub fn is_unknown(&self) -> bool {
        self.strategy == FALLBACK
    }
}

/// Runs attribution strategies in order
pub struct Attributor {
    strategies: Vec<Box<dyn AttributionStrategy>>,
}

impl Default for Attributor {
    fn default() -> Self {
        Self::new(vec![
            Box::new(AnnotationStrategy::default()),
            Box::new(ChartMapStrategy),
            Box::new(UrlProvenanceStrategy),
            Box::new(NameEqualityStrategy),
            Box::new(IndexIdentifierStrategy::default()),
            Box::new(PrefixStrategy::default()),
        ])
    }
}

impl std::fmt::Debug for Attributor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}

impl Attributor {
    /// Build an attributor with a custom chain
    pub fn new(strategies: Vec<Box<dyn AttributionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Strategy names in evaluation order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Attribute a release; never fails
    pub fn attribute(&self, ctx: &AttributionContext<'_>) -> Attribution {
        self.strategies
            .iter()
            .find_map(|strategy| {
                strategy
                    .attribute(ctx)
                    .filter(|name| !name.is_empty())
                    .map(|repository| Attribution {
                        repository,
                        strategy: strategy.name(),
                    })
            })
            .unwrap_or_else(|| Attribution {
                repository: UNKNOWN_REPOSITORY.to_string(),
                strategy: FALLBACK,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, Option<&'static str>);

    impl AttributionStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn attribute(&self, _ctx: &AttributionContext<'_>) -> Option<String> {
            self.1.map(str::to_string)
        }
    }

    fn with_ctx<R>(release: &Release, f: impl FnOnce(&AttributionContext<'_>) -> R) -> R {
        let chart_map = ChartRepoMap::default();
        let ctx = AttributionContext {
            release,
            chart: &release.chart.name,
            repositories: &[],
            indices: &[],
            chart_map: &chart_map,
            index: None,
            source_url: None,
        };
        f(&ctx)
    }

    #[test]
    fn test_first_match_wins() {
        let attributor = Attributor::new(vec![
            Box::new(Fixed("none", None)),
            Box::new(Fixed("first", Some("alpha"))),
            Box::new(Fixed("second", Some("beta"))),
        ]);
        let release = Release::new("web", "default", "nginx", "1.0.0");

        let attribution = with_ctx(&release, |ctx| attributor.attribute(ctx));
        assert_eq!(attribution.repository, "alpha");
        assert_eq!(attribution.strategy, "first");
        assert!(!attribution.is_unknown());
    }

    #[test]
    fn test_empty_name_passes_through() {
        let attributor = Attributor::new(vec![
            Box::new(Fixed("blank", Some(""))),
            Box::new(Fixed("real", Some("stable"))),
        ]);
        let release = Release::new("web", "default", "nginx", "1.0.0");

        let attribution = with_ctx(&release, |ctx| attributor.attribute(ctx));
        assert_eq!(attribution.repository, "stable");
    }

    #[test]
    fn test_fallback_is_unknown() {
        let release = Release::new("web", "default", "nginx", "1.0.0");
        let attribution = with_ctx(&release, |ctx| Attributor::default().attribute(ctx));
        assert_eq!(attribution.repository, UNKNOWN_REPOSITORY);
        assert!(attribution.is_unknown());
    }

    #[test]
    fn test_default_chain_order() {
        assert_eq!(
            Attributor::default().strategy_names(),
            vec![
                "annotation",
                "chart-map",
                "url-provenance",
                "name-equality",
                "index-identifier",
                "prefix",
            ]
        );
    }
}
