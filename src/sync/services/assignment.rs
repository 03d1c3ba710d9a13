//! Assignee changes shared by the issue and pull request handlers.

use super::{IgnoreReason, InstallationLifecycleService, SyncOutcome, SyncPorts, SyncResult};
use crate::sync::domain::{Integration, event::AccountPayload};
use crate::task::domain::Task;
use mockable::Clock;
use tracing::{debug, info};

pub(super) struct TaskAssigner<C>
where
    C: Clock + Send + Sync,
{
    ports: SyncPorts<C>,
    installations: InstallationLifecycleService<C>,
}

impl<C> Clone for TaskAssigner<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            ports: self.ports.clone(),
            installations: self.installations.clone(),
        }
    }
}

impl<C> TaskAssigner<C>
where
    C: Clock + Send + Sync,
{
    pub(super) fn new(ports: SyncPorts<C>) -> Self {
        Self {
            installations: InstallationLifecycleService::new(ports.clone()),
            ports,
        }
    }

    /// Assigns the user behind `assignee` when they belong to the
    /// integration's project.
    pub(super) async fn assign(
        &self,
        integration: &Integration,
        mut task: Task,
        assignee: Option<&AccountPayload>,
    ) -> SyncResult<SyncOutcome> {
        let Some(account) = assignee else {
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotApplicable));
        };
        let Some(user_id) = self.installations.resolve_user(&account.login).await? else {
            debug!(login = %account.login, "assignee has no installation");
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotLinked));
        };
        if !self
            .ports
            .projects
            .is_member(integration.project_id(), user_id)
            .await?
        {
            debug!(login = %account.login, "assignee is not a project member");
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotApplicable));
        }

        task.set_assignee(Some(user_id), &*self.ports.clock)?;
        self.ports.tasks.update(&task).await?;
        info!(task_number = %task.number(), assignee = %user_id, "task assigned");
        Ok(SyncOutcome::Applied)
    }

    pub(super) async fn unassign(&self, mut task: Task) -> SyncResult<SyncOutcome> {
        task.set_assignee(None, &*self.ports.clock)?;
        self.ports.tasks.update(&task).await?;
        info!(task_number = %task.number(), "task unassigned");
        Ok(SyncOutcome::Applied)
    }
}
