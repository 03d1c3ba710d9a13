//! Linkage store port: integrations and task links.

use crate::sync::domain::{
    InstallationId, Integration, IntegrationId, IssueLink, IssueNumber, PullRequestLink,
    PullRequestNumber, RepositoryFullName,
};
use crate::task::{
    domain::{ProjectId, Task, TaskId},
    ports::TaskRepository,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Result type for linkage store operations.
pub type LinkageRepositoryResult<T> = Result<T, LinkageRepositoryError>;

/// Persistent mapping between external entities and internal tasks.
#[async_trait]
pub trait LinkageRepository: Send + Sync {
    /// Stores a new integration.
    ///
    /// # Errors
    ///
    /// Returns [`LinkageRepositoryError::DuplicateRepository`] when the
    /// repository is already integrated.
    async fn store_integration(&self, integration: &Integration) -> LinkageRepositoryResult<()>;

    /// Finds the integration bound to a repository.
    async fn find_integration_by_repository(
        &self,
        repository: &RepositoryFullName,
    ) -> LinkageRepositoryResult<Option<Integration>>;

    /// Lists the integrations of a project.
    async fn find_integrations_by_project(
        &self,
        project_id: ProjectId,
    ) -> LinkageRepositoryResult<Vec<Integration>>;

    /// Deletes an integration together with its links.
    ///
    /// Returns `false` when the integration did not exist.
    async fn delete_integration(&self, id: IntegrationId) -> LinkageRepositoryResult<bool>;

    /// Deletes every integration bound to an installation, with their links.
    ///
    /// Returns the number of integrations removed.
    async fn delete_integrations_for_installation(
        &self,
        installation_id: InstallationId,
    ) -> LinkageRepositoryResult<usize>;

    /// Inserts an issue link unless the `(integration, issue number)` pair
    /// is already linked, as one atomic step.
    ///
    /// Returns `false` when an existing link won.
    ///
    /// # Errors
    ///
    /// Returns [`LinkageRepositoryError::TaskAlreadyLinked`] when the task
    /// already owns another issue link.
    async fn insert_issue_link_if_absent(&self, link: &IssueLink)
    -> LinkageRepositoryResult<bool>;

    /// Stores a task created from an issue together with the issue's link.
    ///
    /// Returns `false` when the issue is already linked, leaving no task
    /// behind. The default writes through `tasks` and removes the task again
    /// when linking does not succeed; stores that own both tables write them
    /// in one transaction instead.
    async fn store_task_with_issue_link(
        &self,
        tasks: &dyn TaskRepository,
        task: &Task,
        link: &IssueLink,
    ) -> LinkageRepositoryResult<bool> {
        tasks
            .store(task)
            .await
            .map_err(LinkageRepositoryError::persistence)?;
        let linked = self.insert_issue_link_if_absent(link).await;
        if !matches!(linked, Ok(true)) {
            if let Err(err) = tasks.delete(task.id()).await {
                warn!(task_id = %task.id(), error = %err, "failed to discard unlinked task");
            }
        }
        linked
    }

    /// Finds the link for an issue.
    async fn find_issue_link(
        &self,
        integration_id: IntegrationId,
        issue_number: IssueNumber,
    ) -> LinkageRepositoryResult<Option<IssueLink>>;

    /// Finds the issue link owning a task.
    async fn find_issue_link_by_task(
        &self,
        task_id: TaskId,
    ) -> LinkageRepositoryResult<Option<IssueLink>>;

    /// Deletes the link for an issue.
    ///
    /// Returns `false` when no link existed.
    async fn delete_issue_link(
        &self,
        integration_id: IntegrationId,
        issue_number: IssueNumber,
    ) -> LinkageRepositoryResult<bool>;

    /// Attaches a pull request link.
    ///
    /// # Errors
    ///
    /// Returns [`LinkageRepositoryError::DuplicatePullRequestLink`] when the
    /// pull request is already attached or
    /// [`LinkageRepositoryError::TaskAlreadyLinked`] when the task already
    /// has a pull request.
    async fn insert_pull_request_link(&self, link: &PullRequestLink)
    -> LinkageRepositoryResult<()>;

    /// Persists merged flag and cached content of a pull request link.
    ///
    /// # Errors
    ///
    /// Returns [`LinkageRepositoryError::PullRequestLinkNotFound`] when the
    /// link does not exist.
    async fn update_pull_request_link(&self, link: &PullRequestLink)
    -> LinkageRepositoryResult<()>;

    /// Finds the link for a pull request.
    async fn find_pull_request_link(
        &self,
        integration_id: IntegrationId,
        pull_request_number: PullRequestNumber,
    ) -> LinkageRepositoryResult<Option<PullRequestLink>>;

    /// Finds the pull request link attached to a task.
    async fn find_pull_request_link_by_task(
        &self,
        task_id: TaskId,
    ) -> LinkageRepositoryResult<Option<PullRequestLink>>;

    /// Deletes the link for a pull request.
    ///
    /// Returns `false` when no link existed.
    async fn delete_pull_request_link(
        &self,
        integration_id: IntegrationId,
        pull_request_number: PullRequestNumber,
    ) -> LinkageRepositoryResult<bool>;
}

/// Errors returned by linkage store implementations.
#[derive(Debug, Clone, Error)]
pub enum LinkageRepositoryError {
    /// The repository already has an integration.
    #[error("repository already integrated: {0}")]
    DuplicateRepository(RepositoryFullName),

    /// The pull request is already attached to a task.
    #[error("pull request #{pull_request_number} already linked in integration {integration_id}")]
    DuplicatePullRequestLink {
        /// Integration scoping the number.
        integration_id: IntegrationId,
        /// Conflicting pull request number.
        pull_request_number: PullRequestNumber,
    },

    /// The task already has a link of the same kind.
    #[error("task already linked: {0}")]
    TaskAlreadyLinked(TaskId),

    /// The pull request link does not exist.
    #[error("pull request #{pull_request_number} not linked in integration {integration_id}")]
    PullRequestLinkNotFound {
        /// Integration scoping the number.
        integration_id: IntegrationId,
        /// Missing pull request number.
        pull_request_number: PullRequestNumber,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LinkageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
