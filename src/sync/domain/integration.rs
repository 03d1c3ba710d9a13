//! Binding between one internal project and one external repository.

use super::{InstallationId, IntegrationId, RepositoryFullName};
use crate::task::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Repository integration record.
///
/// At most one integration exists per repository full name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    id: IntegrationId,
    project_id: ProjectId,
    installation_id: InstallationId,
    repository: RepositoryFullName,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIntegrationData {
    /// Persisted integration identifier.
    pub id: IntegrationId,
    /// Linked project.
    pub project_id: ProjectId,
    /// Installation granting repository access.
    pub installation_id: InstallationId,
    /// Linked repository.
    pub repository: RepositoryFullName,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Integration {
    /// Creates a new integration.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        installation_id: InstallationId,
        repository: RepositoryFullName,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: IntegrationId::new(),
            project_id,
            installation_id,
            repository,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an integration from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIntegrationData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            installation_id: data.installation_id,
            repository: data.repository,
            created_at: data.created_at,
        }
    }

    /// Returns the integration identifier.
    #[must_use]
    pub const fn id(&self) -> IntegrationId {
        self.id
    }

    /// Returns the linked project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the installation granting access to the repository.
    #[must_use]
    pub const fn installation_id(&self) -> InstallationId {
        self.installation_id
    }

    /// Returns the linked repository.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryFullName {
        &self.repository
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
