//! Shared wiring for in-memory end-to-end tests.

use std::sync::Arc;

use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};
use tracksync::sync::{
    adapters::memory::{
        InMemoryInstallationRepository, InMemoryLinkageRepository, RecordingIssueClient,
    },
    domain::{
        AccountLogin, Installation, InstallationId, Integration, RepositoryFullName, WebhookEvent,
    },
    ports::{InstallationRepository, LinkageRepository},
    services::{Dispatched, LinkService, SyncPorts, WebhookDispatcher},
};
use tracksync::task::{
    adapters::memory::{InMemoryProjectDirectory, InMemoryTaskRepository},
    domain::{Lane, ProjectId, StatusId, StatusLanes, Task, TaskNumber, UserId},
    ports::TaskRepository,
};

/// Repository bound to the seeded project.
pub const REPOSITORY: &str = "tracksync/board";
/// Installation granting access to [`REPOSITORY`].
pub const INSTALLATION: u64 = 1001;
/// Login of the installation owner.
pub const OWNER_LOGIN: &str = "board-owner";

/// In-memory adapters wired into a dispatcher.
pub struct Wiring {
    pub linkage: Arc<InMemoryLinkageRepository>,
    pub installations: Arc<InMemoryInstallationRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub projects: Arc<InMemoryProjectDirectory>,
    pub client: Arc<RecordingIssueClient>,
    pub lanes: StatusLanes,
    pub integration: Integration,
    pub owner: UserId,
    pub system_user: UserId,
}

/// Provides a project bound to [`REPOSITORY`] through [`INSTALLATION`].
#[fixture]
pub async fn wiring() -> Wiring {
    Wiring::new().await.expect("wiring builds")
}

impl Wiring {
    /// Seeds one project, a member owning the installation, and the
    /// integration.
    ///
    /// # Errors
    ///
    /// Returns an error if any in-memory store rejects the seed data.
    pub async fn new() -> eyre::Result<Self> {
        let lanes = StatusLanes::new(ProjectId::new(), StatusId::new(), StatusId::new())?;
        let projects = Arc::new(InMemoryProjectDirectory::new());
        projects.add_project(lanes)?;
        let owner = UserId::new();
        projects.add_member(lanes.project_id(), owner)?;

        let installations = Arc::new(InMemoryInstallationRepository::new());
        installations
            .store(&Installation::new(
                installation_id()?,
                owner,
                AccountLogin::new(OWNER_LOGIN)?,
                &DefaultClock,
            ))
            .await
            .wrap_err("store installation")?;

        let linkage = Arc::new(InMemoryLinkageRepository::new());
        let integration = Integration::new(
            lanes.project_id(),
            installation_id()?,
            repository()?,
            &DefaultClock,
        );
        linkage
            .store_integration(&integration)
            .await
            .wrap_err("store integration")?;

        Ok(Self {
            linkage,
            installations,
            tasks: Arc::new(InMemoryTaskRepository::new()),
            projects,
            client: Arc::new(RecordingIssueClient::new()),
            lanes,
            integration,
            owner,
            system_user: UserId::new(),
        })
    }

    /// Returns the port bundle over the in-memory adapters.
    #[must_use]
    pub fn ports(&self) -> SyncPorts<DefaultClock> {
        SyncPorts {
            linkage: self.linkage.clone(),
            installations: self.installations.clone(),
            tasks: self.tasks.clone(),
            projects: self.projects.clone(),
            issue_client: self.client.clone(),
            clock: Arc::new(DefaultClock),
        }
    }

    /// Builds a dispatcher over [`Self::ports`].
    #[must_use]
    pub fn dispatcher(&self) -> WebhookDispatcher<DefaultClock> {
        WebhookDispatcher::new(self.ports(), self.system_user)
    }

    /// Builds a link service over [`Self::ports`].
    #[must_use]
    pub fn links(&self) -> LinkService<DefaultClock> {
        LinkService::new(self.ports())
    }

    /// Decodes and applies a payload, then waits for outbound notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not decode or a store fails.
    pub async fn deliver(&self, event_type: &str, payload: &Value) -> eyre::Result<Dispatched> {
        let body = serde_json::to_vec(payload)?;
        let event = WebhookEvent::parse(event_type, &body)?;
        let dispatched = self.dispatcher().dispatch(&event).await?;
        Ok(dispatched)
    }

    /// Finds the live task carrying a project number.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn task_numbered(&self, number: u64) -> eyre::Result<Option<Task>> {
        Ok(self
            .tasks
            .find_active_by_number(self.lanes.project_id(), TaskNumber::new(number)?)
            .await?)
    }

    /// Returns the lane a task currently sits in.
    ///
    /// # Errors
    ///
    /// Returns an error if the task is missing or sits outside both lanes.
    pub async fn lane_of(&self, task: &Task) -> eyre::Result<Lane> {
        let current = self
            .tasks
            .find_by_id(task.id())
            .await?
            .ok_or_else(|| eyre::eyre!("task {} missing", task.id()))?;
        self.lanes
            .lane_of(current.status_id())
            .ok_or_else(|| eyre::eyre!("task {} outside designated lanes", task.id()))
    }
}

/// Parses [`REPOSITORY`].
///
/// # Errors
///
/// Never fails for the constant; the signature mirrors the validating
/// constructor.
pub fn repository() -> eyre::Result<RepositoryFullName> {
    Ok(RepositoryFullName::new(REPOSITORY)?)
}

/// Parses [`INSTALLATION`].
///
/// # Errors
///
/// Never fails for the constant; the signature mirrors the validating
/// constructor.
pub fn installation_id() -> eyre::Result<InstallationId> {
    Ok(InstallationId::new(INSTALLATION)?)
}

/// Builds an `issues` payload for [`REPOSITORY`].
#[must_use]
pub fn issue_event(action: &str, number: u64, title: &str) -> Value {
    json!({
        "action": action,
        "repository": { "full_name": REPOSITORY },
        "issue": {
            "number": number,
            "title": title,
            "body": format!("Body of {title}"),
            "html_url": format!("https://github.com/{REPOSITORY}/issues/{number}"),
        },
    })
}

/// Builds a `push` payload for [`REPOSITORY`].
#[must_use]
pub fn push_event(messages: &[&str]) -> Value {
    let commits: Vec<Value> = messages
        .iter()
        .map(|message| json!({ "message": message }))
        .collect();
    json!({
        "repository": { "full_name": REPOSITORY },
        "commits": commits,
    })
}

/// Builds a `pull_request` payload for [`REPOSITORY`].
#[must_use]
pub fn pull_request_event(action: &str, number: u64, state: &str, merged: bool) -> Value {
    json!({
        "action": action,
        "repository": { "full_name": REPOSITORY },
        "pull_request": {
            "number": number,
            "title": "Ship the board",
            "body": null,
            "state": state,
            "merged": merged,
        },
    })
}

/// Builds an `installation` payload for [`INSTALLATION`].
#[must_use]
pub fn installation_event(action: &str) -> Value {
    json!({
        "action": action,
        "installation": { "id": INSTALLATION },
    })
}
