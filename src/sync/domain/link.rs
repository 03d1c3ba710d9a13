//! Task links to external issues and pull requests.
//!
//! The two link kinds carry different ownership. An [`IssueLink`] owns its
//! task: issue edits overwrite the task and issue deletion deletes it. A
//! [`PullRequestLink`] is merely attached to a task that exists on its own:
//! pull request edits only refresh the link's cached content and the task
//! is never deleted through it.

use super::{IntegrationId, IssueNumber, PullRequestNumber};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Owning link between a task and an external issue.
///
/// Unique per `(integration, issue number)`; a task has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLink {
    integration_id: IntegrationId,
    issue_number: IssueNumber,
    task_id: TaskId,
    url: Option<String>,
    created_at: DateTime<Utc>,
}

impl IssueLink {
    /// Creates a link for a freshly mirrored or explicitly connected issue.
    #[must_use]
    pub fn new(
        integration_id: IntegrationId,
        issue_number: IssueNumber,
        task_id: TaskId,
        url: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            integration_id,
            issue_number,
            task_id,
            url,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a link from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        integration_id: IntegrationId,
        issue_number: IssueNumber,
        task_id: TaskId,
        url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            integration_id,
            issue_number,
            task_id,
            url,
            created_at,
        }
    }

    /// Returns the integration scoping the issue number.
    #[must_use]
    pub const fn integration_id(&self) -> IntegrationId {
        self.integration_id
    }

    /// Returns the external issue number.
    #[must_use]
    pub const fn issue_number(&self) -> IssueNumber {
        self.issue_number
    }

    /// Returns the owned task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the issue URL, if known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Content of an external pull request cached on its link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestContent {
    /// Pull request title.
    pub title: String,
    /// Pull request body.
    pub body: Option<String>,
}

/// Attached link between an existing task and an external pull request.
///
/// Unique per `(integration, pull request number)`; a task has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestLink {
    integration_id: IntegrationId,
    pull_request_number: PullRequestNumber,
    task_id: TaskId,
    url: Option<String>,
    branch: Option<String>,
    content: PullRequestContent,
    merged: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for attaching or reconstructing a pull request link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLinkData {
    /// Integration scoping the pull request number.
    pub integration_id: IntegrationId,
    /// External pull request number.
    pub pull_request_number: PullRequestNumber,
    /// Attached task.
    pub task_id: TaskId,
    /// Pull request URL.
    pub url: Option<String>,
    /// Head branch name.
    pub branch: Option<String>,
    /// Cached title and body.
    pub content: PullRequestContent,
    /// Whether the pull request has been merged.
    pub merged: bool,
}

impl PullRequestLink {
    /// Attaches a pull request to a task.
    #[must_use]
    pub fn new(data: PullRequestLinkData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self::from_persisted(data, timestamp, timestamp)
    }

    /// Reconstructs a link from persisted storage.
    #[must_use]
    pub fn from_persisted(
        data: PullRequestLinkData,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            integration_id: data.integration_id,
            pull_request_number: data.pull_request_number,
            task_id: data.task_id,
            url: data.url,
            branch: data.branch,
            content: data.content,
            merged: data.merged,
            created_at,
            updated_at,
        }
    }

    /// Returns the integration scoping the pull request number.
    #[must_use]
    pub const fn integration_id(&self) -> IntegrationId {
        self.integration_id
    }

    /// Returns the external pull request number.
    #[must_use]
    pub const fn pull_request_number(&self) -> PullRequestNumber {
        self.pull_request_number
    }

    /// Returns the attached task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the pull request URL, if known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the head branch, if known.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Returns the cached title and body.
    #[must_use]
    pub const fn content(&self) -> &PullRequestContent {
        &self.content
    }

    /// Returns whether the pull request was ever observed merged.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.merged
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records that the pull request was merged. Never cleared.
    ///
    /// Returns `true` when the flag changed.
    pub fn mark_merged(&mut self, clock: &impl Clock) -> bool {
        if self.merged {
            return false;
        }
        self.merged = true;
        self.updated_at = clock.utc();
        true
    }

    /// Replaces the cached title and body.
    pub fn refresh_content(&mut self, content: PullRequestContent, clock: &impl Clock) {
        self.content = content;
        self.updated_at = clock.utc();
    }
}
