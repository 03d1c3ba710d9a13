//! Event dispatcher: the single entry point for authenticated deliveries.

use super::{
    IgnoreReason, InstallationEventOutcome, InstallationLifecycleService, IssueSyncService,
    PendingNotifications, PullRequestSyncService, PushSyncService, SyncOutcome, SyncPorts,
    SyncResult,
};
use crate::sync::domain::WebhookEvent;
use crate::task::domain::UserId;
use mockable::Clock;
use tracing::{debug, info};

/// Outcome of dispatching one delivery.
#[derive(Debug)]
pub struct Dispatched {
    /// What the handler did.
    pub outcome: SyncOutcome,
    /// Outbound notifications still running.
    pub notifications: PendingNotifications,
}

impl Dispatched {
    fn local(outcome: SyncOutcome) -> Self {
        Self {
            outcome,
            notifications: PendingNotifications::default(),
        }
    }
}

/// Routes decoded events to their handlers.
pub struct WebhookDispatcher<C>
where
    C: Clock + Send + Sync,
{
    ports: SyncPorts<C>,
    issues: IssueSyncService<C>,
    pull_requests: PullRequestSyncService<C>,
    pushes: PushSyncService<C>,
    installations: InstallationLifecycleService<C>,
}

impl<C> WebhookDispatcher<C>
where
    C: Clock + Send + Sync,
{
    /// Builds every handler over the same ports.
    #[must_use]
    pub fn new(ports: SyncPorts<C>, system_user: UserId) -> Self {
        Self {
            issues: IssueSyncService::new(ports.clone(), system_user),
            pull_requests: PullRequestSyncService::new(ports.clone()),
            pushes: PushSyncService::new(ports.clone()),
            installations: InstallationLifecycleService::new(ports.clone()),
            ports,
        }
    }

    /// Returns the installation lifecycle manager.
    #[must_use]
    pub const fn installations(&self) -> &InstallationLifecycleService<C> {
        &self.installations
    }

    /// Applies one event.
    ///
    /// Unknown event types and unhandled actions are acknowledged as
    /// ignored. When an installation is deleted, the integrations bound to
    /// it are removed as well.
    ///
    /// # Errors
    ///
    /// Returns [`super::SyncError`] when a store fails.
    pub async fn dispatch(&self, event: &WebhookEvent) -> SyncResult<Dispatched> {
        let dispatched = match event {
            WebhookEvent::InstallationRepositories(payload) => {
                Dispatched::local(self.installations.remove_repositories(payload).await?)
            }
            WebhookEvent::Issues(payload) => Dispatched::local(self.issues.handle(payload).await?),
            WebhookEvent::Push(payload) => {
                let report = self.pushes.handle(payload).await?;
                Dispatched {
                    outcome: report.outcome,
                    notifications: report.notifications,
                }
            }
            WebhookEvent::Installation(payload) => {
                let effect = self.installations.handle_event(payload).await?;
                if let InstallationEventOutcome::Deleted(installation_id) = effect {
                    let removed = self
                        .ports
                        .linkage
                        .delete_integrations_for_installation(installation_id)
                        .await?;
                    info!(installation_id = %installation_id, removed, "orphaned integrations removed");
                }
                Dispatched::local(effect.outcome())
            }
            WebhookEvent::PullRequest(payload) => {
                Dispatched::local(self.pull_requests.handle(payload).await?)
            }
            WebhookEvent::Unknown(_) => {
                Dispatched::local(SyncOutcome::Ignored(IgnoreReason::NotApplicable))
            }
        };

        match dispatched.outcome {
            SyncOutcome::Applied => info!(event_type = event.event_type(), "event applied"),
            SyncOutcome::Ignored(reason) => debug!(
                event_type = event.event_type(),
                reason = reason.as_str(),
                "event ignored"
            ),
        }
        Ok(dispatched)
    }
}
