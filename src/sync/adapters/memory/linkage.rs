//! In-memory linkage store for tests and local wiring.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::sync::{
    domain::{
        InstallationId, Integration, IntegrationId, IssueLink, IssueNumber, PullRequestLink,
        PullRequestNumber, RepositoryFullName,
    },
    ports::{LinkageRepository, LinkageRepositoryError, LinkageRepositoryResult},
};
use crate::task::domain::{ProjectId, TaskId};

/// Thread-safe in-memory linkage store.
///
/// A single lock guards every table, so conditional inserts are atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLinkageRepository {
    state: Arc<RwLock<LinkageState>>,
}

#[derive(Debug, Default)]
struct LinkageState {
    integrations: HashMap<IntegrationId, Integration>,
    repository_index: HashMap<RepositoryFullName, IntegrationId>,
    issue_links: HashMap<(IntegrationId, IssueNumber), IssueLink>,
    pull_request_links: HashMap<(IntegrationId, PullRequestNumber), PullRequestLink>,
}

impl LinkageState {
    fn remove_integration(&mut self, id: IntegrationId) -> bool {
        let Some(removed) = self.integrations.remove(&id) else {
            return false;
        };
        self.repository_index.remove(removed.repository());
        self.issue_links.retain(|(owner, _), _| *owner != id);
        self.pull_request_links.retain(|(owner, _), _| *owner != id);
        true
    }
}

impl InMemoryLinkageRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored issue links.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn issue_link_count(&self) -> LinkageRepositoryResult<usize> {
        Ok(self.read()?.issue_links.len())
    }

    /// Returns the number of stored integrations.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn integration_count(&self) -> LinkageRepositoryResult<usize> {
        Ok(self.read()?.integrations.len())
    }

    fn read(&self) -> LinkageRepositoryResult<RwLockReadGuard<'_, LinkageState>> {
        self.state.read().map_err(|err| {
            LinkageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> LinkageRepositoryResult<RwLockWriteGuard<'_, LinkageState>> {
        self.state.write().map_err(|err| {
            LinkageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl LinkageRepository for InMemoryLinkageRepository {
    async fn store_integration(&self, integration: &Integration) -> LinkageRepositoryResult<()> {
        let mut state = self.write()?;
        if state.repository_index.contains_key(integration.repository()) {
            return Err(LinkageRepositoryError::DuplicateRepository(
                integration.repository().clone(),
            ));
        }
        state
            .repository_index
            .insert(integration.repository().clone(), integration.id());
        state
            .integrations
            .insert(integration.id(), integration.clone());
        Ok(())
    }

    async fn find_integration_by_repository(
        &self,
        repository: &RepositoryFullName,
    ) -> LinkageRepositoryResult<Option<Integration>> {
        let state = self.read()?;
        Ok(state
            .repository_index
            .get(repository)
            .and_then(|id| state.integrations.get(id))
            .cloned())
    }

    async fn find_integrations_by_project(
        &self,
        project_id: ProjectId,
    ) -> LinkageRepositoryResult<Vec<Integration>> {
        let state = self.read()?;
        let mut found: Vec<Integration> = state
            .integrations
            .values()
            .filter(|integration| integration.project_id() == project_id)
            .cloned()
            .collect();
        found.sort_by_key(Integration::created_at);
        Ok(found)
    }

    async fn delete_integration(&self, id: IntegrationId) -> LinkageRepositoryResult<bool> {
        Ok(self.write()?.remove_integration(id))
    }

    async fn delete_integrations_for_installation(
        &self,
        installation_id: InstallationId,
    ) -> LinkageRepositoryResult<usize> {
        let mut state = self.write()?;
        let orphaned: Vec<IntegrationId> = state
            .integrations
            .values()
            .filter(|integration| integration.installation_id() == installation_id)
            .map(Integration::id)
            .collect();
        for id in &orphaned {
            state.remove_integration(*id);
        }
        Ok(orphaned.len())
    }

    async fn insert_issue_link_if_absent(
        &self,
        link: &IssueLink,
    ) -> LinkageRepositoryResult<bool> {
        let mut state = self.write()?;
        let key = (link.integration_id(), link.issue_number());
        if state.issue_links.contains_key(&key) {
            return Ok(false);
        }
        if state
            .issue_links
            .values()
            .any(|existing| existing.task_id() == link.task_id())
        {
            return Err(LinkageRepositoryError::TaskAlreadyLinked(link.task_id()));
        }
        state.issue_links.insert(key, link.clone());
        Ok(true)
    }

    async fn find_issue_link(
        &self,
        integration_id: IntegrationId,
        issue_number: IssueNumber,
    ) -> LinkageRepositoryResult<Option<IssueLink>> {
        Ok(self
            .read()?
            .issue_links
            .get(&(integration_id, issue_number))
            .cloned())
    }

    async fn find_issue_link_by_task(
        &self,
        task_id: TaskId,
    ) -> LinkageRepositoryResult<Option<IssueLink>> {
        Ok(self
            .read()?
            .issue_links
            .values()
            .find(|link| link.task_id() == task_id)
            .cloned())
    }

    async fn delete_issue_link(
        &self,
        integration_id: IntegrationId,
        issue_number: IssueNumber,
    ) -> LinkageRepositoryResult<bool> {
        Ok(self
            .write()?
            .issue_links
            .remove(&(integration_id, issue_number))
            .is_some())
    }

    async fn insert_pull_request_link(
        &self,
        link: &PullRequestLink,
    ) -> LinkageRepositoryResult<()> {
        let mut state = self.write()?;
        let key = (link.integration_id(), link.pull_request_number());
        if state.pull_request_links.contains_key(&key) {
            return Err(LinkageRepositoryError::DuplicatePullRequestLink {
                integration_id: link.integration_id(),
                pull_request_number: link.pull_request_number(),
            });
        }
        if state
            .pull_request_links
            .values()
            .any(|existing| existing.task_id() == link.task_id())
        {
            return Err(LinkageRepositoryError::TaskAlreadyLinked(link.task_id()));
        }
        state.pull_request_links.insert(key, link.clone());
        Ok(())
    }

    async fn update_pull_request_link(
        &self,
        link: &PullRequestLink,
    ) -> LinkageRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .pull_request_links
            .get_mut(&(link.integration_id(), link.pull_request_number()))
            .ok_or(LinkageRepositoryError::PullRequestLinkNotFound {
                integration_id: link.integration_id(),
                pull_request_number: link.pull_request_number(),
            })?;
        *stored = link.clone();
        Ok(())
    }

    async fn find_pull_request_link(
        &self,
        integration_id: IntegrationId,
        pull_request_number: PullRequestNumber,
    ) -> LinkageRepositoryResult<Option<PullRequestLink>> {
        Ok(self
            .read()?
            .pull_request_links
            .get(&(integration_id, pull_request_number))
            .cloned())
    }

    async fn find_pull_request_link_by_task(
        &self,
        task_id: TaskId,
    ) -> LinkageRepositoryResult<Option<PullRequestLink>> {
        Ok(self
            .read()?
            .pull_request_links
            .values()
            .find(|link| link.task_id() == task_id)
            .cloned())
    }

    async fn delete_pull_request_link(
        &self,
        integration_id: IntegrationId,
        pull_request_number: PullRequestNumber,
    ) -> LinkageRepositoryResult<bool> {
        Ok(self
            .write()?
            .pull_request_links
            .remove(&(integration_id, pull_request_number))
            .is_some())
    }
}
