//! Error types for repository operations

use std::path::PathBuf;
use thiserror::Error;

/// Repository operation errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Configuration Errors ============
    #[error("Repository file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid repository file {}: {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Could not determine the {kind} directory; set {env}")]
    NoDefaultPath { kind: &'static str, env: &'static str },

    // ============ Index Errors ============
    #[error("Index not found at {}", path.display())]
    IndexNotFound { path: PathBuf },

    #[error("Index parse error in {}: {message}", path.display())]
    IndexParseError { path: PathBuf, message: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepoError>;
