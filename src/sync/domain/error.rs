//! Error types for sync domain validation.

use thiserror::Error;

/// Errors returned while constructing sync domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncDomainError {
    /// The repository name does not follow `owner/repo` format.
    #[error("invalid repository name '{0}', expected owner/repo")]
    InvalidRepository(String),

    /// The issue number is invalid.
    #[error("invalid issue number {0}, expected a positive integer")]
    InvalidIssueNumber(u64),

    /// The pull request number is invalid.
    #[error("invalid pull request number {0}, expected a positive integer")]
    InvalidPullRequestNumber(u64),

    /// The installation identifier is invalid.
    #[error("invalid installation id {0}, expected a positive integer")]
    InvalidInstallationId(u64),

    /// The external account login is empty after trimming.
    #[error("account login must not be empty")]
    EmptyAccountLogin,
}
