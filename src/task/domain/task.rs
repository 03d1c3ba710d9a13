//! Task aggregate root.

use super::{Lane, ProjectId, StatusId, StatusLanes, TaskDomainError, TaskId, TaskNumber, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    number: TaskNumber,
    name: String,
    description: String,
    status_id: StatusId,
    assignee: Option<UserId>,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Owning project.
    pub project_id: ProjectId,
    /// Number allocated from the project counter.
    pub number: TaskNumber,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Initial status lane.
    pub status_id: StatusId,
    /// Initial assignee, if any.
    pub assignee: Option<UserId>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted project-scoped number.
    pub number: TaskNumber,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted status lane.
    pub status_id: StatusId,
    /// Persisted assignee.
    pub assignee: Option<UserId>,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task.
    #[must_use]
    pub fn new(data: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            project_id: data.project_id,
            number: data.number,
            name: data.name,
            description: data.description,
            status_id: data.status_id,
            assignee: data.assignee,
            deleted_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            number: data.number,
            name: data.name,
            description: data.description,
            status_id: data.status_id,
            assignee: data.assignee,
            deleted_at: data.deleted_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the project-scoped task number.
    #[must_use]
    pub const fn number(&self) -> TaskNumber {
        self.number
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current status lane.
    #[must_use]
    pub const fn status_id(&self) -> StatusId {
        self.status_id
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns whether the task has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns the soft-deletion timestamp.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
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

    /// Replaces name and description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for soft-deleted tasks.
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_active()?;
        self.name = name.into();
        self.description = description.into();
        self.touch(clock);
        Ok(())
    }

    /// Moves the task into one of the project's designated lanes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for soft-deleted tasks.
    pub fn move_to_lane(
        &mut self,
        lane: Lane,
        lanes: &StatusLanes,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_active()?;
        self.status_id = lanes.status_for(lane);
        self.touch(clock);
        Ok(())
    }

    /// Sets or clears the assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for soft-deleted tasks.
    pub fn set_assignee(
        &mut self,
        assignee: Option<UserId>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_active()?;
        self.assignee = assignee;
        self.touch(clock);
        Ok(())
    }

    /// Soft-deletes the task. Deleting twice keeps the first timestamp.
    pub fn mark_deleted(&mut self, clock: &impl Clock) {
        if self.deleted_at.is_none() {
            let timestamp = clock.utc();
            self.deleted_at = Some(timestamp);
            self.updated_at = timestamp;
        }
    }

    const fn ensure_active(&self) -> Result<(), TaskDomainError> {
        if self.deleted_at.is_some() {
            return Err(TaskDomainError::TaskDeleted(self.id));
        }
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
