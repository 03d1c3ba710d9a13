//! In-memory project directory for tests and local wiring.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{ProjectId, StatusLanes, TaskNumber, UserId},
    ports::{ProjectDirectory, ProjectDirectoryError, ProjectDirectoryResult},
};

/// Thread-safe in-memory project directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectDirectory {
    state: Arc<RwLock<HashMap<ProjectId, ProjectEntry>>>,
}

#[derive(Debug)]
struct ProjectEntry {
    lanes: StatusLanes,
    members: HashSet<UserId>,
    task_counter: u64,
}

fn lock_error(err: impl ToString) -> ProjectDirectoryError {
    ProjectDirectoryError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryProjectDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a project with its lane designation and an empty counter.
    ///
    /// Registering an existing project replaces its lanes and keeps its
    /// members and counter.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn add_project(&self, lanes: StatusLanes) -> ProjectDirectoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .entry(lanes.project_id())
            .and_modify(|entry| entry.lanes = lanes)
            .or_insert_with(|| ProjectEntry {
                lanes,
                members: HashSet::new(),
                task_counter: 0,
            });
        Ok(())
    }

    /// Adds a member to a registered project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDirectoryError::UnknownProject`] when the project is
    /// not registered.
    pub fn add_member(&self, project_id: ProjectId, user_id: UserId) -> ProjectDirectoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let entry = state
            .get_mut(&project_id)
            .ok_or(ProjectDirectoryError::UnknownProject(project_id))?;
        entry.members.insert(user_id);
        Ok(())
    }
}

#[async_trait]
impl ProjectDirectory for InMemoryProjectDirectory {
    async fn lanes(&self, project_id: ProjectId) -> ProjectDirectoryResult<StatusLanes> {
        let state = self.state.read().map_err(lock_error)?;
        state
            .get(&project_id)
            .map(|entry| entry.lanes)
            .ok_or(ProjectDirectoryError::UnknownProject(project_id))
    }

    async fn is_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectDirectoryResult<bool> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .get(&project_id)
            .is_some_and(|entry| entry.members.contains(&user_id)))
    }

    async fn allocate_task_number(
        &self,
        project_id: ProjectId,
    ) -> ProjectDirectoryResult<TaskNumber> {
        let mut state = self.state.write().map_err(lock_error)?;
        let entry = state
            .get_mut(&project_id)
            .ok_or(ProjectDirectoryError::UnknownProject(project_id))?;
        entry.task_counter += 1;
        TaskNumber::new(entry.task_counter).map_err(ProjectDirectoryError::persistence)
    }
}
