//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use thiserror::Error;
use whatup_kube::KubeError;
use whatup_repo::RepoError;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Repository file missing, unreadable, or explicitly requested index unusable
    #[error("Repository error: {message}")]
    #[diagnostic(code(whatup::cli::repository))]
    Repository {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Installed releases could not be listed
    #[error("Could not list releases: {message}")]
    #[diagnostic(code(whatup::cli::releases))]
    ReleaseSource {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Results could not be rendered or written
    #[error("Output error: {message}")]
    #[diagnostic(code(whatup::cli::output))]
    Output { message: String },

    /// Invalid flag or environment value
    #[error("{message}")]
    #[diagnostic(code(whatup::cli::usage))]
    Usage { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Repository { .. } => exit_codes::REPOSITORY_ERROR,
            CliError::ReleaseSource { .. } => exit_codes::RELEASE_SOURCE_ERROR,
            CliError::Output { .. } => exit_codes::OUTPUT_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        let help = match &err {
            RepoError::ConfigNotFound { .. } => {
                Some("Add a repository with `helm repo add`, or pass --repository-config".to_string())
            }
            RepoError::NoDefaultPath { env, .. } => Some(format!("Set {} explicitly", env)),
            _ => None,
        };
        CliError::Repository {
            message: err.to_string(),
            help,
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        match err {
            KubeError::UnsupportedDriver { .. } => CliError::usage(err.to_string()),
            KubeError::Kubeconfig(_) => CliError::ReleaseSource {
                message: err.to_string(),
                help: Some("Check KUBECONFIG and --kube-context".to_string()),
            },
            _ => CliError::ReleaseSource {
                message: err.to_string(),
                help: None,
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::output(err.to_string())
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
