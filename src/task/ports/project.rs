//! Project directory port: lane designation, membership and numbering.
//!
//! Projects themselves are managed elsewhere. Sync services only ask the
//! questions below, which keeps project-domain logic out of the handlers.

use crate::task::domain::{ProjectId, StatusLanes, TaskNumber, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project directory operations.
pub type ProjectDirectoryResult<T> = Result<T, ProjectDirectoryError>;

/// Capability queries against the project collaborator.
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    /// Returns the project's designated open and done lanes.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDirectoryError::UnknownProject`] when the project
    /// does not exist or [`ProjectDirectoryError::LanesNotDesignated`] when
    /// it lacks an open or done lane.
    async fn lanes(&self, project_id: ProjectId) -> ProjectDirectoryResult<StatusLanes>;

    /// Returns whether the user is a member of the project.
    async fn is_member(&self, project_id: ProjectId, user_id: UserId)
    -> ProjectDirectoryResult<bool>;

    /// Allocates the next task number from the project's counter.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDirectoryError::UnknownProject`] when the project
    /// does not exist.
    async fn allocate_task_number(&self, project_id: ProjectId)
    -> ProjectDirectoryResult<TaskNumber>;
}

/// Errors returned by project directory implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectDirectoryError {
    /// The project does not exist.
    #[error("project not found: {0}")]
    UnknownProject(ProjectId),

    /// The project has no designated open or done lane.
    #[error("project {0} has no designated open and done lanes")]
    LanesNotDesignated(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
