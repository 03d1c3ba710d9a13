//! In-memory installation store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::sync::{
    domain::{AccountLogin, Installation, InstallationId},
    ports::{InstallationRepository, InstallationRepositoryError, InstallationRepositoryResult},
};

/// Thread-safe in-memory installation store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInstallationRepository {
    state: Arc<RwLock<HashMap<InstallationId, Installation>>>,
}

fn lock_error(err: impl ToString) -> InstallationRepositoryError {
    InstallationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryInstallationRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InstallationRepository for InMemoryInstallationRepository {
    async fn store(&self, installation: &Installation) -> InstallationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let id = installation.installation_id();
        if state.contains_key(&id) {
            return Err(InstallationRepositoryError::DuplicateInstallation(id));
        }
        state.insert(id, installation.clone());
        Ok(())
    }

    async fn update(&self, installation: &Installation) -> InstallationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let id = installation.installation_id();
        let stored = state
            .get_mut(&id)
            .ok_or(InstallationRepositoryError::NotFound(id))?;
        *stored = installation.clone();
        Ok(())
    }

    async fn delete(&self, installation_id: InstallationId) -> InstallationRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        Ok(state.remove(&installation_id).is_some())
    }

    async fn find_by_installation_id(
        &self,
        installation_id: InstallationId,
    ) -> InstallationRepositoryResult<Option<Installation>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&installation_id).cloned())
    }

    async fn find_by_account_login(
        &self,
        login: &AccountLogin,
    ) -> InstallationRepositoryResult<Option<Installation>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .values()
            .filter(|installation| installation.account_login() == login)
            .min_by_key(|installation| installation.created_at())
            .cloned())
    }
}
