//! Outbound port to the hosting service's issue API.
//!
//! The concrete client, including its retry policy, lives outside this
//! crate. Sync services only push task state and request issue creation.

use crate::sync::domain::{Integration, IssueNumber, PullRequestNumber, RepositoryFullName};
use crate::task::domain::{Task, TaskId, TaskNumber};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for outbound client operations.
pub type ExternalIssueClientResult<T> = Result<T, ExternalIssueClientError>;

/// Open/closed state mirrored onto the external entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalState {
    /// Entity should be open.
    Open,
    /// Entity should be closed.
    Closed,
}

impl ExternalState {
    /// Returns the hosting service's state string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// External entity linked to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalTarget {
    /// Linked issue.
    Issue(IssueNumber),
    /// Attached pull request.
    PullRequest(PullRequestNumber),
}

/// Task state to mirror onto its linked external entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStateUpdate {
    /// Updated task.
    pub task_id: TaskId,
    /// Task number, for logging.
    pub task_number: TaskNumber,
    /// Repository holding the targets.
    pub repository: RepositoryFullName,
    /// Current task name.
    pub title: String,
    /// Desired external state.
    pub state: ExternalState,
    /// Entities to update.
    pub targets: Vec<ExternalTarget>,
}

/// Issue created on the hosting service from a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    /// Assigned issue number.
    pub number: IssueNumber,
    /// Browser URL.
    pub url: Option<String>,
}

/// Outbound hosting-service client.
#[async_trait]
pub trait ExternalIssueClient: Send + Sync {
    /// Pushes a task's current title and open/closed state.
    async fn push_task_state(&self, update: &TaskStateUpdate) -> ExternalIssueClientResult<()>;

    /// Creates an issue in the integration's repository from a task.
    async fn create_issue(
        &self,
        integration: &Integration,
        task: &Task,
    ) -> ExternalIssueClientResult<CreatedIssue>;
}

/// Errors returned by outbound client implementations.
#[derive(Debug, Clone, Error)]
pub enum ExternalIssueClientError {
    /// The hosting service rejected the request.
    #[error("hosting service rejected request: {0}")]
    Rejected(String),

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ExternalIssueClientError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
