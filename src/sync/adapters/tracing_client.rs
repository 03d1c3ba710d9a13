//! Outbound client that only logs what it would send.

use async_trait::async_trait;
use tracing::info;

use crate::sync::{
    domain::Integration,
    ports::{
        CreatedIssue, ExternalIssueClient, ExternalIssueClientError, ExternalIssueClientResult,
        TaskStateUpdate,
    },
};
use crate::task::domain::Task;

/// Log-only outbound client.
///
/// State pushes are logged and acknowledged. Issue creation is refused
/// because no issue number can be produced without the hosting service.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingIssueClient;

impl TracingIssueClient {
    /// Creates the client.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExternalIssueClient for TracingIssueClient {
    async fn push_task_state(&self, update: &TaskStateUpdate) -> ExternalIssueClientResult<()> {
        for target in &update.targets {
            info!(
                repository = %update.repository,
                task_number = %update.task_number,
                state = update.state.as_str(),
                ?target,
                "would push task state"
            );
        }
        Ok(())
    }

    async fn create_issue(
        &self,
        integration: &Integration,
        task: &Task,
    ) -> ExternalIssueClientResult<CreatedIssue> {
        info!(
            repository = %integration.repository(),
            task_number = %task.number(),
            "issue creation requested without a hosting-service client"
        );
        Err(ExternalIssueClientError::Rejected(
            "no hosting-service client configured".to_owned(),
        ))
    }
}
