//! Shared wiring for sync service tests.

use std::sync::Arc;

use crate::sync::{
    adapters::memory::{
        InMemoryInstallationRepository, InMemoryLinkageRepository, RecordingIssueClient,
    },
    domain::{
        AccountLogin, Installation, InstallationId, Integration, IssueLink, IssueNumber,
        PullRequestContent, PullRequestLink, PullRequestLinkData, PullRequestNumber,
        RepositoryFullName, WebhookEvent,
    },
    ports::{ExternalIssueClient, InstallationRepository, LinkageRepository},
    services::{Dispatched, SyncPorts, WebhookDispatcher},
};
use crate::task::{
    adapters::memory::{InMemoryProjectDirectory, InMemoryTaskRepository},
    domain::{Lane, NewTask, ProjectId, StatusId, StatusLanes, Task, UserId},
    ports::{ProjectDirectory, TaskRepository},
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};

pub(super) const REPOSITORY: &str = "org/repo";
pub(super) const INSTALLATION: u64 = 42;
pub(super) const OWNER_LOGIN: &str = "octocat";

pub(super) struct Harness {
    pub(super) linkage: Arc<InMemoryLinkageRepository>,
    pub(super) installations: Arc<InMemoryInstallationRepository>,
    pub(super) tasks: Arc<InMemoryTaskRepository>,
    pub(super) projects: Arc<InMemoryProjectDirectory>,
    pub(super) client: Arc<RecordingIssueClient>,
    pub(super) lanes: StatusLanes,
    pub(super) integration: Integration,
    pub(super) owner: UserId,
    pub(super) system_user: UserId,
}

#[fixture]
pub(super) async fn harness() -> Harness {
    Harness::new().await
}

impl Harness {
    /// Project with open/done lanes, an installation owned by a project
    /// member, and an integration for [`REPOSITORY`].
    pub(super) async fn new() -> Self {
        let lanes = StatusLanes::new(ProjectId::new(), StatusId::new(), StatusId::new())
            .expect("distinct lanes");
        let projects = Arc::new(InMemoryProjectDirectory::new());
        projects.add_project(lanes).expect("register project");
        let owner = UserId::new();
        projects
            .add_member(lanes.project_id(), owner)
            .expect("add member");

        let installations = Arc::new(InMemoryInstallationRepository::new());
        let installation_id = installation_id();
        installations
            .store(&Installation::new(
                installation_id,
                owner,
                AccountLogin::new(OWNER_LOGIN).expect("valid login"),
                &DefaultClock,
            ))
            .await
            .expect("store installation");

        let linkage = Arc::new(InMemoryLinkageRepository::new());
        let integration = Integration::new(
            lanes.project_id(),
            installation_id,
            repository(),
            &DefaultClock,
        );
        linkage
            .store_integration(&integration)
            .await
            .expect("store integration");

        Self {
            linkage,
            installations,
            tasks: Arc::new(InMemoryTaskRepository::new()),
            projects,
            client: Arc::new(RecordingIssueClient::new()),
            lanes,
            integration,
            owner,
            system_user: UserId::new(),
        }
    }

    pub(super) fn ports(&self) -> SyncPorts<DefaultClock> {
        self.ports_with_client(self.client.clone())
    }

    pub(super) fn ports_with_client(
        &self,
        client: Arc<dyn ExternalIssueClient>,
    ) -> SyncPorts<DefaultClock> {
        SyncPorts {
            linkage: self.linkage.clone(),
            installations: self.installations.clone(),
            tasks: self.tasks.clone(),
            projects: self.projects.clone(),
            issue_client: client,
            clock: Arc::new(DefaultClock),
        }
    }

    pub(super) fn dispatcher(&self) -> WebhookDispatcher<DefaultClock> {
        WebhookDispatcher::new(self.ports(), self.system_user)
    }

    /// Decodes and dispatches a payload, waiting for notifications.
    pub(super) async fn deliver(&self, event_type: &str, payload: &Value) -> Dispatched {
        let event =
            WebhookEvent::parse(event_type, payload.to_string().as_bytes()).expect("valid payload");
        self.dispatcher()
            .dispatch(&event)
            .await
            .expect("dispatch succeeds")
    }

    /// Stores a task in the open lane with the next project number.
    pub(super) async fn seed_task(&self, name: &str) -> Task {
        let task = self.unsaved_task(name).await;
        self.tasks.store(&task).await.expect("store task");
        task
    }

    /// Builds an open task with the next project number without storing it.
    pub(super) async fn unsaved_task(&self, name: &str) -> Task {
        let number = self
            .projects
            .allocate_task_number(self.lanes.project_id())
            .await
            .expect("allocate number");
        Task::new(
            NewTask {
                project_id: self.lanes.project_id(),
                number,
                name: name.to_owned(),
                description: String::new(),
                status_id: self.lanes.status_for(Lane::Open),
                assignee: None,
            },
            &DefaultClock,
        )
    }

    pub(super) async fn seed_issue_link(&self, task: &Task, number: u64) -> IssueLink {
        let link = IssueLink::new(
            self.integration.id(),
            IssueNumber::new(number).expect("valid issue number"),
            task.id(),
            None,
            &DefaultClock,
        );
        assert!(
            self.linkage
                .insert_issue_link_if_absent(&link)
                .await
                .expect("insert link")
        );
        link
    }

    pub(super) async fn seed_pull_request_link(&self, task: &Task, number: u64) -> PullRequestLink {
        let link = PullRequestLink::new(
            PullRequestLinkData {
                integration_id: self.integration.id(),
                pull_request_number: PullRequestNumber::new(number)
                    .expect("valid pull request number"),
                task_id: task.id(),
                url: None,
                branch: Some("feature/login".to_owned()),
                content: PullRequestContent {
                    title: "Initial title".to_owned(),
                    body: None,
                },
                merged: false,
            },
            &DefaultClock,
        );
        self.linkage
            .insert_pull_request_link(&link)
            .await
            .expect("insert link");
        link
    }

    pub(super) async fn reload(&self, task: &Task) -> Option<Task> {
        self.tasks.find_by_id(task.id()).await.expect("lookup task")
    }

    pub(super) async fn lane_of(&self, task: &Task) -> Option<Lane> {
        let current = self.reload(task).await.expect("task exists");
        self.lanes.lane_of(current.status_id())
    }
}

pub(super) fn repository() -> RepositoryFullName {
    RepositoryFullName::new(REPOSITORY).expect("valid repository")
}

pub(super) fn installation_id() -> InstallationId {
    InstallationId::new(INSTALLATION).expect("valid installation id")
}

pub(super) fn issues_payload(action: &str, number: u64, title: &str, body: Option<&str>) -> Value {
    json!({
        "action": action,
        "repository": { "full_name": REPOSITORY },
        "issue": {
            "number": number,
            "title": title,
            "body": body,
            "state": "open",
            "html_url": format!("https://github.com/{REPOSITORY}/issues/{number}"),
        },
    })
}

pub(super) fn assignment_payload(event: &str, action: &str, number: u64, login: &str) -> Value {
    let entity = if event == "issues" {
        "issue"
    } else {
        "pull_request"
    };
    let mut payload = json!({
        "action": action,
        "repository": { "full_name": REPOSITORY },
        "assignee": { "login": login },
    });
    payload[entity] = json!({
        "number": number,
        "title": "Title",
        "body": null,
        "state": "open",
        "merged": false,
    });
    payload
}

pub(super) fn pull_request_payload(action: &str, number: u64, state: &str, merged: bool) -> Value {
    json!({
        "action": action,
        "repository": { "full_name": REPOSITORY },
        "pull_request": {
            "number": number,
            "title": "Add login flow",
            "body": "Implements the login flow",
            "state": state,
            "merged": merged,
        },
    })
}

pub(super) fn push_payload(repository: &str, messages: &[&str]) -> Value {
    let commits: Vec<Value> = messages
        .iter()
        .map(|message| json!({ "message": message }))
        .collect();
    json!({
        "repository": { "full_name": repository },
        "commits": commits,
    })
}
