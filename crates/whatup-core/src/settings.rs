//! Immutable engine settings and release status classification

use semver::Version;
use serde::{Deserialize, Serialize};

/// Freshness status of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "UPTODATE")]
    Uptodate,
    #[serde(rename = "OUTDATED")]
    Outdated,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uptodate => "UPTODATE",
            Self::Outdated => "OUTDATED",
        }
    }

    pub fn is_outdated(&self) -> bool {
        matches!(self, Self::Outdated)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an installed version is compared with the latest published one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionMatch {
    /// Byte-for-byte string equality. A locally patched build that is textually
    /// different from the latest version is reported as outdated.
    #[default]
    Exact,

    /// Up to date when the installed version is at least the latest one.
    /// Falls back to `Exact` when either side is not valid semver.
    Semver,
}

/// Settings shared by the resolver and the attributor for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// Consider entries flagged as prerelease
    pub include_prereleases: bool,

    /// Freshness comparison mode
    pub version_match: VersionMatch,
}

impl Settings {
    pub fn new(include_prereleases: bool, version_match: VersionMatch) -> Self {
        Self {
            include_prereleases,
            version_match,
        }
    }

    /// Classify an installed version against the resolved latest version
    pub fn classify(&self, installed: &str, latest: &str) -> Status {
        let current = match self.version_match {
            VersionMatch::Exact => installed == latest,
            VersionMatch::Semver => match (Version::parse(installed), Version::parse(latest)) {
                (Ok(installed), Ok(latest)) => installed >= latest,
                _ => installed == latest,
            },
        };

        if current {
            Status::Uptodate
        } else {
            Status::Outdated
        }
    }
}
