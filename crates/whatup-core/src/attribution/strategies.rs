//! The built-in attribution strategies

use std::path::Path;

use super::{AttributionContext, AttributionStrategy, REPOSITORY_ANNOTATION};

/// Use a repository declared in the chart annotations
#[derive(Debug, Clone)]
pub struct AnnotationStrategy {
    keys: Vec<String>,
}

impl Default for AnnotationStrategy {
    fn default() -> Self {
        Self::new([REPOSITORY_ANNOTATION])
    }
}

impl AnnotationStrategy {
    /// Recognize the given annotation keys, checked in order
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl AttributionStrategy for AnnotationStrategy {
    fn name(&self) -> &'static str {
        "annotation"
    }

    fn attribute(&self, ctx: &AttributionContext<'_>) -> Option<String> {
        self.keys
            .iter()
            .filter_map(|key| ctx.release.annotation(key))
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }
}

/// Look the chart up in the precomputed chart -> repository map
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartMapStrategy;

impl AttributionStrategy for ChartMapStrategy {
    fn name(&self) -> &'static str {
        "chart-map"
    }

    fn attribute(&self, ctx: &AttributionContext<'_>) -> Option<String> {
        ctx.chart_map.get(ctx.chart).map(str::to_string)
    }
}

/// Match the resolved entry's URL against configured repository URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlProvenanceStrategy;

impl AttributionStrategy for UrlProvenanceStrategy {
    fn name(&self) -> &'static str {
        "url-provenance"
    }

    fn attribute(&self, ctx: &AttributionContext<'_>) -> Option<String> {
        let source = ctx.source_url?;
        ctx.repositories
            .iter()
            .find(|repo| !repo.url.is_empty() && source.contains(repo.url.as_str()))
            .map(|repo| repo.name.clone())
    }
}

/// A configured repository named exactly like the chart
#[derive(Debug, Clone, Copy, Default)]
pub struct NameEqualityStrategy;

impl AttributionStrategy for NameEqualityStrategy {
    fn name(&self) -> &'static str {
        "name-equality"
    }

    fn attribute(&self, ctx: &AttributionContext<'_>) -> Option<String> {
        ctx.repositories
            .iter()
            .find(|repo| repo.name == ctx.chart)
            .map(|repo| repo.name.clone())
    }
}

/// Derive the repository from the file name the matched index was read from
#[derive(Debug, Clone)]
pub struct IndexIdentifierStrategy {
    suffix: String,
}

impl Default for IndexIdentifierStrategy {
    fn default() -> Self {
        Self::new("-index.yaml")
    }
}

impl IndexIdentifierStrategy {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl AttributionStrategy for IndexIdentifierStrategy {
    fn name(&self) -> &'static str {
        "index-identifier"
    }

    fn attribute(&self, ctx: &AttributionContext<'_>) -> Option<String> {
        let identifier = ctx.index?.identifier.as_deref()?;
        let file_name = Path::new(identifier).file_name()?.to_str()?;
        file_name
            .strip_suffix(self.suffix.as_str())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}

/// A configured repository whose name starts with the chart's name prefix
/// (`rke2-cilium` -> a repository starting with `rke2`)
#[derive(Debug, Clone, Copy)]
pub struct PrefixStrategy {
    separator: char,
}

impl Default for PrefixStrategy {
    fn default() -> Self {
        Self::new('-')
    }
}

impl PrefixStrategy {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }
}

impl AttributionStrategy for PrefixStrategy {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn attribute(&self, ctx: &AttributionContext<'_>) -> Option<String> {
        let prefix = ctx.chart.split(self.separator).next()?;
        if prefix.is_empty() {
            return None;
        }
        ctx.repositories
            .iter()
            .find(|repo| repo.name.starts_with(prefix))
            .map(|repo| repo.name.clone())
    }
}
