//! Installation store port.

use crate::sync::domain::{AccountLogin, Installation, InstallationId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for installation store operations.
pub type InstallationRepositoryResult<T> = Result<T, InstallationRepositoryError>;

/// Installation persistence contract.
#[async_trait]
pub trait InstallationRepository: Send + Sync {
    /// Stores a new installation.
    ///
    /// # Errors
    ///
    /// Returns [`InstallationRepositoryError::DuplicateInstallation`] when
    /// the installation id is already stored.
    async fn store(&self, installation: &Installation) -> InstallationRepositoryResult<()>;

    /// Persists changes to an existing installation.
    ///
    /// # Errors
    ///
    /// Returns [`InstallationRepositoryError::NotFound`] when the
    /// installation does not exist.
    async fn update(&self, installation: &Installation) -> InstallationRepositoryResult<()>;

    /// Removes an installation record entirely.
    ///
    /// Returns `false` when it did not exist.
    async fn delete(&self, installation_id: InstallationId) -> InstallationRepositoryResult<bool>;

    /// Finds an installation by external identifier.
    async fn find_by_installation_id(
        &self,
        installation_id: InstallationId,
    ) -> InstallationRepositoryResult<Option<Installation>>;

    /// Finds the installation registered for an external account login.
    async fn find_by_account_login(
        &self,
        login: &AccountLogin,
    ) -> InstallationRepositoryResult<Option<Installation>>;
}

/// Errors returned by installation store implementations.
#[derive(Debug, Clone, Error)]
pub enum InstallationRepositoryError {
    /// The installation id is already stored.
    #[error("duplicate installation: {0}")]
    DuplicateInstallation(InstallationId),

    /// The installation was not found.
    #[error("installation not found: {0}")]
    NotFound(InstallationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InstallationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
