//! Inbound webhook payload model.
//!
//! Payloads are parsed in two steps: the body must be a JSON object, then
//! the object is decoded into the typed payload of its declared event type.
//! Event types outside the routing table only need to pass the first step.
//! Actions are decoded leniently so that new upstream actions fall through
//! to an `Other` variant instead of failing the delivery.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Event type header value for repository removal from an installation.
pub const EVENT_INSTALLATION_REPOSITORIES: &str = "installation_repositories";
/// Event type header value for issue activity.
pub const EVENT_ISSUES: &str = "issues";
/// Event type header value for pushed commits.
pub const EVENT_PUSH: &str = "push";
/// Event type header value for installation lifecycle changes.
pub const EVENT_INSTALLATION: &str = "installation";
/// Event type header value for pull request activity.
pub const EVENT_PULL_REQUEST: &str = "pull_request";

/// Error returned when an authenticated body cannot be decoded.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The body is not a JSON object.
    #[error("webhook body is not a JSON object: {0}")]
    NotAnObject(#[source] serde_json::Error),

    /// The object does not match the payload shape of its event type.
    #[error("invalid '{event_type}' payload: {source}")]
    InvalidShape {
        /// Declared event type.
        event_type: String,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

/// A decoded webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// `installation_repositories` event.
    InstallationRepositories(InstallationRepositoriesPayload),
    /// `issues` event.
    Issues(IssuesPayload),
    /// `push` event.
    Push(PushPayload),
    /// `installation` event.
    Installation(InstallationPayload),
    /// `pull_request` event.
    PullRequest(PullRequestPayload),
    /// Any other event type, acknowledged without processing.
    Unknown(String),
}

impl WebhookEvent {
    /// Decodes a body for the given event type.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when the body is not a JSON object or does
    /// not match the payload shape of a routed event type.
    pub fn parse(event_type: &str, body: &[u8]) -> Result<Self, PayloadError> {
        let object: Map<String, Value> =
            serde_json::from_slice(body).map_err(PayloadError::NotAnObject)?;
        let value = Value::Object(object);
        let event = match event_type {
            EVENT_INSTALLATION_REPOSITORIES => {
                Self::InstallationRepositories(decode(event_type, value)?)
            }
            EVENT_ISSUES => Self::Issues(decode(event_type, value)?),
            EVENT_PUSH => Self::Push(decode(event_type, value)?),
            EVENT_INSTALLATION => Self::Installation(decode(event_type, value)?),
            EVENT_PULL_REQUEST => Self::PullRequest(decode(event_type, value)?),
            other => Self::Unknown(other.to_owned()),
        };
        Ok(event)
    }

    /// Returns the event type this delivery was routed as.
    #[must_use]
    pub fn event_type(&self) -> &str {
        match self {
            Self::InstallationRepositories(_) => EVENT_INSTALLATION_REPOSITORIES,
            Self::Issues(_) => EVENT_ISSUES,
            Self::Push(_) => EVENT_PUSH,
            Self::Installation(_) => EVENT_INSTALLATION,
            Self::PullRequest(_) => EVENT_PULL_REQUEST,
            Self::Unknown(event_type) => event_type,
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(event_type: &str, value: Value) -> Result<T, PayloadError> {
    serde_json::from_value(value).map_err(|source| PayloadError::InvalidShape {
        event_type: event_type.to_owned(),
        source,
    })
}

/// Decodes an absent or `null` list as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Repository reference carried by most payloads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryPayload {
    /// `owner/repo` full name.
    pub full_name: String,
}

/// Account reference (assignee, sender).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountPayload {
    /// Account login.
    pub login: String,
}

/// Installation reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallationRefPayload {
    /// External installation identifier.
    pub id: u64,
}

/// Issue body of an `issues` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssuePayload {
    /// Issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Issue body; absent or `null` for empty issues.
    #[serde(default)]
    pub body: Option<String>,
    /// `open` or `closed`.
    #[serde(default)]
    pub state: Option<String>,
    /// Browser URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Actions of an `issues` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum IssueAction {
    /// Issue created.
    Opened,
    /// Title or body changed.
    Edited,
    /// Issue closed.
    Closed,
    /// Issue reopened.
    Reopened,
    /// Issue deleted.
    Deleted,
    /// Assignee added.
    Assigned,
    /// Assignee removed.
    Unassigned,
    /// Any other action.
    Other(String),
}

impl From<String> for IssueAction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "opened" => Self::Opened,
            "edited" => Self::Edited,
            "closed" => Self::Closed,
            "reopened" => Self::Reopened,
            "deleted" => Self::Deleted,
            "assigned" => Self::Assigned,
            "unassigned" => Self::Unassigned,
            _ => Self::Other(value),
        }
    }
}

/// `issues` event payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssuesPayload {
    /// Event action.
    pub action: IssueAction,
    /// Source repository.
    pub repository: RepositoryPayload,
    /// Affected issue.
    pub issue: IssuePayload,
    /// Assignee added or removed by `assigned`/`unassigned`.
    #[serde(default)]
    pub assignee: Option<AccountPayload>,
}

/// Pull request body of a `pull_request` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestBodyPayload {
    /// Pull request number.
    pub number: u64,
    /// Pull request title.
    pub title: String,
    /// Pull request body.
    #[serde(default)]
    pub body: Option<String>,
    /// `open` or `closed`.
    pub state: String,
    /// Whether the pull request has been merged.
    #[serde(default)]
    pub merged: bool,
    /// Browser URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

impl PullRequestBodyPayload {
    /// Returns whether the external state is `open`.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == "open"
    }
}

/// Actions of a `pull_request` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PullRequestAction {
    /// Pull request closed (merged or not).
    Closed,
    /// Pull request reopened.
    Reopened,
    /// Title or body changed.
    Edited,
    /// Assignee added.
    Assigned,
    /// Assignee removed.
    Unassigned,
    /// Any other action.
    Other(String),
}

impl From<String> for PullRequestAction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "closed" => Self::Closed,
            "reopened" => Self::Reopened,
            "edited" => Self::Edited,
            "assigned" => Self::Assigned,
            "unassigned" => Self::Unassigned,
            _ => Self::Other(value),
        }
    }
}

/// `pull_request` event payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestPayload {
    /// Event action.
    pub action: PullRequestAction,
    /// Source repository.
    pub repository: RepositoryPayload,
    /// Affected pull request.
    pub pull_request: PullRequestBodyPayload,
    /// Assignee added or removed by `assigned`/`unassigned`.
    #[serde(default)]
    pub assignee: Option<AccountPayload>,
}

/// One pushed commit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitPayload {
    /// Full commit message.
    pub message: String,
}

/// `push` event payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushPayload {
    /// Target repository.
    pub repository: RepositoryPayload,
    /// Pushed commits, oldest first.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub commits: Vec<CommitPayload>,
}

/// Actions of an `installation` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum InstallationAction {
    /// Access suspended.
    Suspend,
    /// Access restored.
    Unsuspend,
    /// App uninstalled.
    Deleted,
    /// Any other action.
    Other(String),
}

impl From<String> for InstallationAction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "suspend" => Self::Suspend,
            "unsuspend" => Self::Unsuspend,
            "deleted" => Self::Deleted,
            _ => Self::Other(value),
        }
    }
}

/// `installation` event payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallationPayload {
    /// Event action.
    pub action: InstallationAction,
    /// Affected installation.
    pub installation: InstallationRefPayload,
}

/// `installation_repositories` event payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallationRepositoriesPayload {
    /// Event action (`added` or `removed`).
    #[serde(default)]
    pub action: Option<String>,
    /// Affected installation.
    #[serde(default)]
    pub installation: Option<InstallationRefPayload>,
    /// Repositories removed from the installation.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub repositories_removed: Vec<RepositoryPayload>,
}
