//! Error types for task domain validation.

use super::{ProjectId, StatusId, TaskId};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task number is invalid.
    #[error("invalid task number {0}, expected a positive integer")]
    InvalidTaskNumber(u64),

    /// The open and done lanes of a project resolve to the same status.
    #[error("project {project_id} uses status {status_id} as both open and done lane")]
    IndistinctLanes {
        /// Project whose lanes were rejected.
        project_id: ProjectId,
        /// Status configured for both lanes.
        status_id: StatusId,
    },

    /// The task has been soft-deleted and can no longer change.
    #[error("task {0} has been deleted")]
    TaskDeleted(TaskId),
}
