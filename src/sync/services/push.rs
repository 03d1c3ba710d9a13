//! Push sync handler: commit-message directives move tasks between lanes.

use super::{IgnoreReason, PendingNotifications, SyncOutcome, SyncPorts, SyncResult};
use crate::sync::{
    domain::{Integration, event::PushPayload, parse_commit_message},
    ports::{ExternalState, ExternalTarget, TaskStateUpdate},
};
use crate::task::domain::{Lane, Task, TaskNumber};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a `push` event.
#[derive(Debug)]
pub struct PushReport {
    /// Overall outcome.
    pub outcome: SyncOutcome,
    /// Task numbers moved, ordered by their last mention.
    pub moved: Vec<TaskNumber>,
    /// Outbound notifications started for the moved tasks.
    pub notifications: PendingNotifications,
}

impl PushReport {
    fn ignored(reason: IgnoreReason) -> Self {
        Self {
            outcome: SyncOutcome::Ignored(reason),
            moved: Vec::new(),
            notifications: PendingNotifications::default(),
        }
    }
}

/// Applies `push` events.
pub struct PushSyncService<C>
where
    C: Clock + Send + Sync,
{
    ports: SyncPorts<C>,
}

impl<C> PushSyncService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates the handler.
    #[must_use]
    pub const fn new(ports: SyncPorts<C>) -> Self {
        Self { ports }
    }

    /// Applies the directives of every pushed commit, oldest first.
    ///
    /// Numbers that match no active task are skipped. When a task is
    /// mentioned more than once, the last directive decides its lane and a
    /// single notification is sent for it. Once lanes are saved, a failure
    /// to look up a task's links only skips that task's notification.
    ///
    /// # Errors
    ///
    /// Returns [`super::SyncError`] when a store fails before any lane is saved
    /// or while saving one.
    pub async fn handle(&self, payload: &PushPayload) -> SyncResult<PushReport> {
        let Some(integration) = self
            .ports
            .integration_for(&payload.repository.full_name)
            .await?
        else {
            return Ok(PushReport::ignored(IgnoreReason::NotLinked));
        };

        let project_id = integration.project_id();
        let mut lanes = None;
        let mut moved: Vec<(Task, Lane)> = Vec::new();
        for commit in &payload.commits {
            let Some(directive) = parse_commit_message(&commit.message) else {
                continue;
            };
            let Some(mut task) = self
                .ports
                .tasks
                .find_active_by_number(project_id, directive.task_number)
                .await?
            else {
                debug!(task_number = %directive.task_number, "commit references unknown task");
                continue;
            };
            let board = match lanes {
                Some(board) => board,
                None => {
                    let board = self.ports.projects.lanes(project_id).await?;
                    lanes = Some(board);
                    board
                }
            };

            let lane = directive.action.target_lane();
            task.move_to_lane(lane, &board, &*self.ports.clock)?;
            self.ports.tasks.update(&task).await?;
            info!(task_number = %task.number(), lane = lane.as_str(), "task moved by commit");

            moved.retain(|(seen, _)| seen.id() != task.id());
            moved.push((task, lane));
        }

        if moved.is_empty() {
            return Ok(PushReport::ignored(IgnoreReason::NotApplicable));
        }

        let mut handles = Vec::new();
        for (task, lane) in &moved {
            let update = match self.state_update(&integration, task, *lane).await {
                Ok(Some(update)) => update,
                Ok(None) => continue,
                Err(err) => {
                    warn!(
                        task_number = %task.number(),
                        error = %err,
                        "failed to build notification"
                    );
                    continue;
                }
            };
            let client = Arc::clone(&self.ports.issue_client);
            handles.push(tokio::spawn(async move {
                if let Err(err) = client.push_task_state(&update).await {
                    warn!(
                        task_number = %update.task_number,
                        repository = %update.repository,
                        error = %err,
                        "failed to notify hosting service"
                    );
                }
            }));
        }

        Ok(PushReport {
            outcome: SyncOutcome::Applied,
            moved: moved.iter().map(|(task, _)| task.number()).collect(),
            notifications: PendingNotifications::new(handles),
        })
    }

    async fn state_update(
        &self,
        integration: &Integration,
        task: &Task,
        lane: Lane,
    ) -> SyncResult<Option<TaskStateUpdate>> {
        let mut targets = Vec::new();
        if let Some(link) = self.ports.linkage.find_issue_link_by_task(task.id()).await? {
            targets.push(ExternalTarget::Issue(link.issue_number()));
        }
        if let Some(link) = self
            .ports
            .linkage
            .find_pull_request_link_by_task(task.id())
            .await?
        {
            targets.push(ExternalTarget::PullRequest(link.pull_request_number()));
        }
        if targets.is_empty() {
            return Ok(None);
        }
        let state = match lane {
            Lane::Open => ExternalState::Open,
            Lane::Done => ExternalState::Closed,
        };
        Ok(Some(TaskStateUpdate {
            task_id: task.id(),
            task_number: task.number(),
            repository: integration.repository().clone(),
            title: task.name().to_owned(),
            state,
            targets,
        }))
    }
}
