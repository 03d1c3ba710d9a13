//! Port bundle shared by the sync services.

use super::SyncResult;
use crate::sync::{
    domain::{Integration, RepositoryFullName},
    ports::{ExternalIssueClient, InstallationRepository, LinkageRepository},
};
use crate::task::{
    domain::{Task, TaskId},
    ports::{ProjectDirectory, TaskRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::debug;

/// Collaborators every sync service reads from or writes to.
pub struct SyncPorts<C>
where
    C: Clock + Send + Sync,
{
    /// Integration and link store.
    pub linkage: Arc<dyn LinkageRepository>,
    /// Installation store.
    pub installations: Arc<dyn InstallationRepository>,
    /// Task store.
    pub tasks: Arc<dyn TaskRepository>,
    /// Project lanes, membership and numbering.
    pub projects: Arc<dyn ProjectDirectory>,
    /// Outbound hosting-service client.
    pub issue_client: Arc<dyn ExternalIssueClient>,
    /// Time source for record timestamps.
    pub clock: Arc<C>,
}

impl<C> Clone for SyncPorts<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            linkage: Arc::clone(&self.linkage),
            installations: Arc::clone(&self.installations),
            tasks: Arc::clone(&self.tasks),
            projects: Arc::clone(&self.projects),
            issue_client: Arc::clone(&self.issue_client),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> SyncPorts<C>
where
    C: Clock + Send + Sync,
{
    /// Resolves the integration for a repository named in a payload.
    ///
    /// Names that are not `owner/repo` cannot be integrated and resolve to
    /// `None`.
    pub(super) async fn integration_for(&self, full_name: &str) -> SyncResult<Option<Integration>> {
        let Ok(repository) = RepositoryFullName::new(full_name) else {
            debug!(repository = full_name, "ignoring malformed repository name");
            return Ok(None);
        };
        Ok(self
            .linkage
            .find_integration_by_repository(&repository)
            .await?)
    }

    /// Loads a task unless it is missing or soft-deleted.
    pub(super) async fn active_task(&self, task_id: TaskId) -> SyncResult<Option<Task>> {
        let task = self.tasks.find_by_id(task_id).await?;
        Ok(task.filter(|found| !found.is_deleted()))
    }
}
