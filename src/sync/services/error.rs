//! Errors surfaced by webhook handlers.
//!
//! Only storage failures are errors. Missing linkage and unhandled actions
//! are reported as [`super::SyncOutcome::Ignored`].

use crate::sync::ports::{InstallationRepositoryError, LinkageRepositoryError};
use crate::task::{
    domain::TaskDomainError,
    ports::{ProjectDirectoryError, TaskRepositoryError},
};
use thiserror::Error;

/// Failure while applying an event to local state.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Task aggregate rejected the change.
    #[error(transparent)]
    Task(#[from] TaskDomainError),
    /// Task store failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
    /// Project directory failed.
    #[error(transparent)]
    ProjectDirectory(#[from] ProjectDirectoryError),
    /// Linkage store failed.
    #[error(transparent)]
    Linkage(#[from] LinkageRepositoryError),
    /// Installation store failed.
    #[error(transparent)]
    Installation(#[from] InstallationRepositoryError),
}

/// Result type for webhook handlers.
pub type SyncResult<T> = Result<T, SyncError>;
