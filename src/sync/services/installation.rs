//! Installation lifecycle manager.

use super::{IgnoreReason, SyncOutcome, SyncPorts, SyncResult};
use crate::sync::{
    domain::{
        AccountLogin, Installation, InstallationId, RepositoryFullName, SyncDomainError,
        event::{InstallationAction, InstallationPayload, InstallationRepositoriesPayload},
    },
    ports::InstallationRepositoryError,
};
use crate::task::domain::UserId;
use mockable::Clock;
use thiserror::Error;
use tracing::{debug, info};

/// Installation data obtained at the end of the authorization flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterInstallationRequest {
    installation_id: u64,
    owner: UserId,
    account_login: String,
}

impl RegisterInstallationRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(installation_id: u64, owner: UserId, account_login: impl Into<String>) -> Self {
        Self {
            installation_id,
            owner,
            account_login: account_login.into(),
        }
    }
}

/// Errors raised while registering installations.
#[derive(Debug, Error)]
pub enum InstallationLifecycleError {
    /// Request data failed validation.
    #[error(transparent)]
    Domain(#[from] SyncDomainError),
    /// Installation store failed.
    #[error(transparent)]
    Repository(#[from] InstallationRepositoryError),
}

/// Effect of an `installation` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationEventOutcome {
    /// Access was suspended.
    Suspended,
    /// Access was restored.
    Unsuspended,
    /// The installation record was removed; its integrations are orphaned.
    Deleted(InstallationId),
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl InstallationEventOutcome {
    /// Collapses the effect into a handler outcome.
    #[must_use]
    pub const fn outcome(self) -> SyncOutcome {
        match self {
            Self::Ignored(reason) => SyncOutcome::Ignored(reason),
            Self::Suspended | Self::Unsuspended | Self::Deleted(_) => SyncOutcome::Applied,
        }
    }
}

/// Tracks installation validity and resolves account logins to users.
pub struct InstallationLifecycleService<C>
where
    C: Clock + Send + Sync,
{
    ports: SyncPorts<C>,
}

impl<C> Clone for InstallationLifecycleService<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            ports: self.ports.clone(),
        }
    }
}

impl<C> InstallationLifecycleService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates the service.
    #[must_use]
    pub const fn new(ports: SyncPorts<C>) -> Self {
        Self { ports }
    }

    /// Stores a newly authorized installation.
    ///
    /// Registering a known installation id again reassigns its owner and
    /// login and leaves the suspension flag alone.
    ///
    /// # Errors
    ///
    /// Returns [`InstallationLifecycleError::Domain`] for an invalid id or
    /// empty login, or [`InstallationLifecycleError::Repository`] when the
    /// store fails.
    pub async fn register(
        &self,
        request: RegisterInstallationRequest,
    ) -> Result<Installation, InstallationLifecycleError> {
        let installation_id = InstallationId::new(request.installation_id)?;
        let login = AccountLogin::new(request.account_login)?;
        let clock = &*self.ports.clock;

        let existing = self
            .ports
            .installations
            .find_by_installation_id(installation_id)
            .await?;
        let installation = if let Some(mut installation) = existing {
            installation.reassign(request.owner, login, clock);
            self.ports.installations.update(&installation).await?;
            installation
        } else {
            let installation = Installation::new(installation_id, request.owner, login, clock);
            self.ports.installations.store(&installation).await?;
            installation
        };
        info!(
            installation_id = %installation_id,
            account = %installation.account_login(),
            "installation registered"
        );
        Ok(installation)
    }

    /// Applies an `installation` event.
    ///
    /// # Errors
    ///
    /// Returns [`super::SyncError`] when the installation store fails.
    pub async fn handle_event(
        &self,
        payload: &InstallationPayload,
    ) -> SyncResult<InstallationEventOutcome> {
        let Ok(installation_id) = InstallationId::new(payload.installation.id) else {
            return Ok(InstallationEventOutcome::Ignored(IgnoreReason::NotApplicable));
        };
        let Some(mut installation) = self
            .ports
            .installations
            .find_by_installation_id(installation_id)
            .await?
        else {
            debug!(installation_id = %installation_id, "unknown installation");
            return Ok(InstallationEventOutcome::Ignored(IgnoreReason::NotLinked));
        };

        let clock = &*self.ports.clock;
        let effect = match &payload.action {
            InstallationAction::Suspend => {
                installation.set_suspended(true, clock);
                self.ports.installations.update(&installation).await?;
                InstallationEventOutcome::Suspended
            }
            InstallationAction::Unsuspend => {
                installation.set_suspended(false, clock);
                self.ports.installations.update(&installation).await?;
                InstallationEventOutcome::Unsuspended
            }
            InstallationAction::Deleted => {
                self.ports.installations.delete(installation_id).await?;
                InstallationEventOutcome::Deleted(installation_id)
            }
            InstallationAction::Other(_) => {
                InstallationEventOutcome::Ignored(IgnoreReason::NotApplicable)
            }
        };
        info!(installation_id = %installation_id, ?effect, "installation event applied");
        Ok(effect)
    }

    /// Deletes the integrations of repositories removed from an
    /// installation. Repositories without an integration are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`super::SyncError`] when the linkage store fails.
    pub async fn remove_repositories(
        &self,
        payload: &InstallationRepositoriesPayload,
    ) -> SyncResult<SyncOutcome> {
        let mut removed = 0_usize;
        for repository in &payload.repositories_removed {
            let Ok(full_name) = RepositoryFullName::new(repository.full_name.as_str()) else {
                continue;
            };
            let Some(integration) = self
                .ports
                .linkage
                .find_integration_by_repository(&full_name)
                .await?
            else {
                continue;
            };
            if self.ports.linkage.delete_integration(integration.id()).await? {
                info!(repository = %full_name, "integration removed with repository access");
                removed += 1;
            }
        }
        if removed == 0 {
            return Ok(SyncOutcome::Ignored(IgnoreReason::NotLinked));
        }
        Ok(SyncOutcome::Applied)
    }

    /// Resolves an external account login to the user owning its
    /// installation.
    ///
    /// # Errors
    ///
    /// Returns [`super::SyncError`] when the installation store fails.
    pub async fn resolve_user(&self, login: &str) -> SyncResult<Option<UserId>> {
        let Ok(account) = AccountLogin::new(login) else {
            return Ok(None);
        };
        let installation = self
            .ports
            .installations
            .find_by_account_login(&account)
            .await?;
        Ok(installation.map(|found| found.owner()))
    }
}
