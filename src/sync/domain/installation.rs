//! External app installation tracked by the lifecycle manager.

use super::{AccountLogin, InstallationId};
use crate::task::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// An installation of the external app on an account's repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    installation_id: InstallationId,
    owner: UserId,
    account_login: AccountLogin,
    suspended: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedInstallationData {
    /// External installation identifier.
    pub installation_id: InstallationId,
    /// Owning internal user.
    pub owner: UserId,
    /// External account login.
    pub account_login: AccountLogin,
    /// Suspension flag.
    pub suspended: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Installation {
    /// Creates an active installation.
    #[must_use]
    pub fn new(
        installation_id: InstallationId,
        owner: UserId,
        account_login: AccountLogin,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            installation_id,
            owner,
            account_login,
            suspended: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an installation from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedInstallationData) -> Self {
        Self {
            installation_id: data.installation_id,
            owner: data.owner,
            account_login: data.account_login,
            suspended: data.suspended,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the external installation identifier.
    #[must_use]
    pub const fn installation_id(&self) -> InstallationId {
        self.installation_id
    }

    /// Returns the owning internal user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the external account login.
    #[must_use]
    pub const fn account_login(&self) -> &AccountLogin {
        &self.account_login
    }

    /// Returns whether the installation is suspended.
    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        self.suspended
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

    /// Sets the suspension flag.
    pub fn set_suspended(&mut self, suspended: bool, clock: &impl Clock) {
        self.suspended = suspended;
        self.updated_at = clock.utc();
    }

    /// Rebinds the installation to a new owner and login.
    pub fn reassign(&mut self, owner: UserId, account_login: AccountLogin, clock: &impl Clock) {
        self.owner = owner;
        self.account_login = account_login;
        self.updated_at = clock.utc();
    }
}
