//! Recording outbound client for tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::sync::{
    domain::{Integration, IssueNumber, RepositoryFullName},
    ports::{
        CreatedIssue, ExternalIssueClient, ExternalIssueClientError, ExternalIssueClientResult,
        TaskStateUpdate,
    },
};
use crate::task::domain::{Task, TaskId};

/// Issue creation captured by [`RecordingIssueClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCreation {
    /// Repository the issue was created in.
    pub repository: RepositoryFullName,
    /// Task the issue was created from.
    pub task_id: TaskId,
    /// Issue title.
    pub title: String,
}

/// Outbound client that records every call and numbers created issues
/// sequentially.
#[derive(Debug, Clone, Default)]
pub struct RecordingIssueClient {
    state: Arc<Mutex<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    pushed: Vec<TaskStateUpdate>,
    created: Vec<RecordedCreation>,
    failing: bool,
    next_issue_number: u64,
}

impl RecordingIssueClient {
    /// Creates a client that accepts every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent calls fail with a rejection.
    pub fn fail_all(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.failing = true;
        }
    }

    /// Returns the state updates pushed so far.
    #[must_use]
    pub fn pushed(&self) -> Vec<TaskStateUpdate> {
        self.state
            .lock()
            .map(|state| state.pushed.clone())
            .unwrap_or_default()
    }

    /// Returns the issue creations requested so far.
    #[must_use]
    pub fn created(&self) -> Vec<RecordedCreation> {
        self.state
            .lock()
            .map(|state| state.created.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> ExternalIssueClientResult<MutexGuard<'_, RecordingState>> {
        self.state.lock().map_err(|err| {
            ExternalIssueClientError::transport(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ExternalIssueClient for RecordingIssueClient {
    async fn push_task_state(&self, update: &TaskStateUpdate) -> ExternalIssueClientResult<()> {
        let mut state = self.lock()?;
        if state.failing {
            return Err(ExternalIssueClientError::Rejected(format!(
                "push for task {} refused",
                update.task_number
            )));
        }
        state.pushed.push(update.clone());
        Ok(())
    }

    async fn create_issue(
        &self,
        integration: &Integration,
        task: &Task,
    ) -> ExternalIssueClientResult<CreatedIssue> {
        let mut state = self.lock()?;
        if state.failing {
            return Err(ExternalIssueClientError::Rejected(format!(
                "issue creation in {} refused",
                integration.repository()
            )));
        }
        state.next_issue_number += 1;
        let number = IssueNumber::new(state.next_issue_number)
            .map_err(|err| ExternalIssueClientError::Rejected(err.to_string()))?;
        state.created.push(RecordedCreation {
            repository: integration.repository().clone(),
            task_id: task.id(),
            title: task.name().to_owned(),
        });
        Ok(CreatedIssue {
            number,
            url: Some(format!(
                "https://github.com/{}/issues/{number}",
                integration.repository()
            )),
        })
    }
}
