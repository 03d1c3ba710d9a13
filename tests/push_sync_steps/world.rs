//! Shared world state for push synchronization BDD scenarios.

use std::sync::Arc;

use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;
use tracksync::sync::{
    adapters::memory::{
        InMemoryInstallationRepository, InMemoryLinkageRepository, RecordingIssueClient,
    },
    domain::WebhookEvent,
    services::{SyncOutcome, SyncPorts, WebhookDispatcher},
};
use tracksync::task::{
    adapters::memory::{InMemoryProjectDirectory, InMemoryTaskRepository},
    domain::{ProjectId, StatusId, StatusLanes, UserId},
};

/// Scenario world for push synchronization behaviour tests.
pub struct PushSyncWorld {
    pub linkage: Arc<InMemoryLinkageRepository>,
    pub installations: Arc<InMemoryInstallationRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub projects: Arc<InMemoryProjectDirectory>,
    pub client: Arc<RecordingIssueClient>,
    pub lanes: StatusLanes,
    pub dispatcher: WebhookDispatcher<DefaultClock>,
    pub last_outcome: Option<SyncOutcome>,
}

impl PushSyncWorld {
    /// Creates a world over empty in-memory adapters.
    ///
    /// # Panics
    ///
    /// Panics if three fresh random status identifiers collide.
    #[must_use]
    pub fn new() -> Self {
        let linkage = Arc::new(InMemoryLinkageRepository::new());
        let installations = Arc::new(InMemoryInstallationRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let projects = Arc::new(InMemoryProjectDirectory::new());
        let client = Arc::new(RecordingIssueClient::new());
        let lanes = StatusLanes::new(ProjectId::new(), StatusId::new(), StatusId::new())
            .expect("fresh status identifiers are distinct");
        let ports = SyncPorts {
            linkage: linkage.clone(),
            installations: installations.clone(),
            tasks: tasks.clone(),
            projects: projects.clone(),
            issue_client: client.clone(),
            clock: Arc::new(DefaultClock),
        };

        Self {
            linkage,
            installations,
            tasks,
            projects,
            client,
            lanes,
            dispatcher: WebhookDispatcher::new(ports, UserId::new()),
            last_outcome: None,
        }
    }

    /// Decodes and dispatches a payload, waiting for outbound notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not decode or a store fails.
    pub fn deliver(&mut self, event_type: &str, payload: &Value) -> eyre::Result<()> {
        let body = serde_json::to_vec(payload)?;
        let event = WebhookEvent::parse(event_type, &body)?;
        let dispatched = run_async(self.dispatcher.dispatch(&event))
            .wrap_err_with(|| format!("dispatch {event_type} event"))?;
        run_async(dispatched.notifications.settle());
        self.last_outcome = Some(dispatched.outcome);
        Ok(())
    }
}

impl Default for PushSyncWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PushSyncWorld {
    PushSyncWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
