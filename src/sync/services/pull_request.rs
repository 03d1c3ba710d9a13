//! Pull request sync handler.
//!
//! Pull requests are attached to tasks that exist on their own. Nothing
//! happens until a link has been made, and edits only refresh the link.

use super::{
    IgnoreReason, SyncOutcome, SyncPorts, SyncResult, assignment::TaskAssigner,
};
use crate::sync::domain::{
    PullRequestContent, PullRequestLink, PullRequestNumber,
    event::{PullRequestAction, PullRequestBodyPayload, PullRequestPayload},
};
use crate::task::domain::{Lane, Task};
use mockable::Clock;
use tracing::{debug, info};

/// Applies `pull_request` events to attached tasks.
pub struct PullRequestSyncService<C>
where
    C: Clock + Send + Sync,
{
    ports: SyncPorts<C>,
    assigner: TaskAssigner<C>,
}

impl<C> PullRequestSyncService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates the handler.
    #[must_use]
    pub fn new(ports: SyncPorts<C>) -> Self {
        Self {
            assigner: TaskAssigner::new(ports.clone()),
            ports,
        }
    }

    /// Applies one `pull_request` event.
    ///
    /// # Errors
    ///
    /// Returns [`super::SyncError`] when a store fails.
    pub async fn handle(&self, payload: &PullRequestPayload) -> SyncResult<SyncOutcome> {
        let Some(integration) = self
            .ports
            .integration_for(&payload.repository.full_name)
            .await?
        else {
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotLinked));
        };
        let Ok(number) = PullRequestNumber::new(payload.pull_request.number) else {
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotApplicable));
        };
        let Some(link) = self
            .ports
            .linkage
            .find_pull_request_link(integration.id(), number)
            .await?
        else {
            debug!(repository = %integration.repository(), pull_request = %number, "pull request not linked");
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotLinked));
        };

        if payload.action == PullRequestAction::Edited {
            return self.refresh(link, &payload.pull_request).await;
        }

        let Some(task) = self.ports.active_task(link.task_id()).await? else {
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotLinked));
        };
        match &payload.action {
            PullRequestAction::Closed | PullRequestAction::Reopened => {
                self.apply_state(link, task, &payload.pull_request).await
            }
            PullRequestAction::Assigned => {
                self.assigner
                    .assign(&integration, task, payload.assignee.as_ref())
                    .await
            }
            PullRequestAction::Unassigned => self.assigner.unassign(task).await,
            PullRequestAction::Edited | PullRequestAction::Other(_) => {
                Ok(SyncOutcome::Ignored(IgnoreReason::NotApplicable))
            }
        }
    }

    async fn apply_state(
        &self,
        mut link: PullRequestLink,
        mut task: Task,
        pull_request: &PullRequestBodyPayload,
    ) -> SyncResult<SyncOutcome> {
        let clock = &*self.ports.clock;
        if pull_request.merged && link.mark_merged(clock) {
            self.ports.linkage.update_pull_request_link(&link).await?;
        }

        let lane = Lane::from_open_flag(pull_request.is_open());
        let lanes = self.ports.projects.lanes(task.project_id()).await?;
        task.move_to_lane(lane, &lanes, clock)?;
        self.ports.tasks.update(&task).await?;
        info!(
            pull_request = %link.pull_request_number(),
            task_number = %task.number(),
            lane = lane.as_str(),
            merged = link.is_merged(),
            "task moved by pull request"
        );
        Ok(SyncOutcome::Applied)
    }

    async fn refresh(
        &self,
        mut link: PullRequestLink,
        pull_request: &PullRequestBodyPayload,
    ) -> SyncResult<SyncOutcome> {
        link.refresh_content(
            PullRequestContent {
                title: pull_request.title.clone(),
                body: pull_request.body.clone(),
            },
            &*self.ports.clock,
        );
        self.ports.linkage.update_pull_request_link(&link).await?;
        info!(pull_request = %link.pull_request_number(), "pull request link refreshed");
        Ok(SyncOutcome::Applied)
    }
}
