//! Issue sync handler.
//!
//! Issues own their tasks: `opened` creates the task, edits overwrite it and
//! deletion removes it.

use super::{
    IgnoreReason, SyncOutcome, SyncPorts, SyncResult, assignment::TaskAssigner,
};
use crate::sync::domain::{
    Integration, IssueLink, IssueNumber,
    event::{IssueAction, IssuePayload, IssuesPayload},
};
use crate::task::domain::{Lane, NewTask, Task, UserId};
use mockable::Clock;
use tracing::{debug, info};

/// Applies `issues` events to linked tasks.
pub struct IssueSyncService<C>
where
    C: Clock + Send + Sync,
{
    ports: SyncPorts<C>,
    assigner: TaskAssigner<C>,
    system_user: UserId,
}

impl<C> IssueSyncService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates the handler. Tasks created from issues are assigned to
    /// `system_user`.
    #[must_use]
    pub fn new(ports: SyncPorts<C>, system_user: UserId) -> Self {
        Self {
            assigner: TaskAssigner::new(ports.clone()),
            ports,
            system_user,
        }
    }

    /// Applies one `issues` event.
    ///
    /// # Errors
    ///
    /// Returns [`super::SyncError`] when a store fails. Unlinked
    /// repositories and issues are reported as ignored outcomes.
    pub async fn handle(&self, payload: &IssuesPayload) -> SyncResult<SyncOutcome> {
        let Some(integration) = self
            .ports
            .integration_for(&payload.repository.full_name)
            .await?
        else {
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotLinked));
        };
        let Ok(issue_number) = IssueNumber::new(payload.issue.number) else {
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotApplicable));
        };

        if payload.action == IssueAction::Opened {
            return self.open(&integration, issue_number, &payload.issue).await;
        }

        let Some(link) = self
            .ports
            .linkage
            .find_issue_link(integration.id(), issue_number)
            .await?
        else {
            debug!(repository = %integration.repository(), %issue_number, "issue not linked");
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotLinked));
        };
        if payload.action == IssueAction::Deleted {
            return self.delete(&link).await;
        }
        let Some(task) = self.ports.active_task(link.task_id()).await? else {
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotLinked));
        };

        match &payload.action {
            IssueAction::Edited => self.edit(task, &payload.issue).await,
            IssueAction::Closed => self.move_task(task, Lane::Done).await,
            IssueAction::Reopened => self.move_task(task, Lane::Open).await,
            IssueAction::Assigned => {
                self.assigner
                    .assign(&integration, task, payload.assignee.as_ref())
                    .await
            }
            IssueAction::Unassigned => self.assigner.unassign(task).await,
            IssueAction::Opened | IssueAction::Deleted | IssueAction::Other(_) => {
                Ok(SyncOutcome::Ignored(IgnoreReason::NotApplicable))
            }
        }
    }

    async fn open(
        &self,
        integration: &Integration,
        issue_number: IssueNumber,
        issue: &IssuePayload,
    ) -> SyncResult<SyncOutcome> {
        if self
            .ports
            .linkage
            .find_issue_link(integration.id(), issue_number)
            .await?
            .is_some()
        {
            return Ok(SyncOutcome::Ignored(IgnoreReason::Duplicate));
        }

        let project_id = integration.project_id();
        let lanes = self.ports.projects.lanes(project_id).await?;
        let number = self.ports.projects.allocate_task_number(project_id).await?;
        let clock = &*self.ports.clock;
        let task = Task::new(
            NewTask {
                project_id,
                number,
                name: issue.title.clone(),
                description: issue.body.clone().unwrap_or_default(),
                status_id: lanes.status_for(Lane::Open),
                assignee: Some(self.system_user),
            },
            clock,
        );

        let link = IssueLink::new(
            integration.id(),
            issue_number,
            task.id(),
            issue.html_url.clone(),
            clock,
        );
        let linked = self
            .ports
            .linkage
            .store_task_with_issue_link(self.ports.tasks.as_ref(), &task, &link)
            .await?;
        if !linked {
            // A concurrent delivery linked the issue first.
            return Ok(SyncOutcome::Ignored(IgnoreReason::Duplicate));
        }

        info!(
            repository = %integration.repository(),
            %issue_number,
            task_number = %task.number(),
            "task created from issue"
        );
        Ok(SyncOutcome::Applied)
    }

    async fn edit(&self, mut task: Task, issue: &IssuePayload) -> SyncResult<SyncOutcome> {
        task.rename(
            issue.title.clone(),
            issue.body.clone().unwrap_or_default(),
            &*self.ports.clock,
        )?;
        self.ports.tasks.update(&task).await?;
        info!(task_number = %task.number(), "task updated from issue edit");
        Ok(SyncOutcome::Applied)
    }

    async fn move_task(&self, mut task: Task, lane: Lane) -> SyncResult<SyncOutcome> {
        let lanes = self.ports.projects.lanes(task.project_id()).await?;
        task.move_to_lane(lane, &lanes, &*self.ports.clock)?;
        self.ports.tasks.update(&task).await?;
        info!(task_number = %task.number(), lane = lane.as_str(), "task moved by issue");
        Ok(SyncOutcome::Applied)
    }

    /// Removes the link and its task, soft-deleted or not.
    async fn delete(&self, link: &IssueLink) -> SyncResult<SyncOutcome> {
        self.ports
            .linkage
            .delete_issue_link(link.integration_id(), link.issue_number())
            .await?;
        let removed = self.ports.tasks.delete(link.task_id()).await?;
        info!(
            issue_number = %link.issue_number(),
            task_id = %link.task_id(),
            removed,
            "task deleted with its issue"
        );
        Ok(SyncOutcome::Applied)
    }
}
