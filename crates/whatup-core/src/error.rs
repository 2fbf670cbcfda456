//! Core error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Entries for chart '{chart}' in {repository} are not ordered newest first ({found} listed before {newer})")]
    UnorderedEntries {
        repository: String,
        chart: String,
        found: String,
        newer: String,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
