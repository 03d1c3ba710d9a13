//! Open/done lane designation used by webhook-driven status changes.

use super::{ProjectId, StatusId, TaskDomainError};
use serde::{Deserialize, Serialize};

/// The two lanes webhook events may move a task between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Work not finished.
    Open,
    /// Work finished.
    Done,
}

impl Lane {
    /// Returns the lane matching an "is the external entity open" flag.
    #[must_use]
    pub const fn from_open_flag(is_open: bool) -> Self {
        if is_open { Self::Open } else { Self::Done }
    }

    /// Returns the canonical lane name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Done => "done",
        }
    }
}

/// A project's designated open and done status lanes.
///
/// A project board may have any number of lanes; exactly one is marked as
/// the initial lane and exactly one as the terminal lane. Webhooks never
/// select any other lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLanes {
    project_id: ProjectId,
    open: StatusId,
    done: StatusId,
}

impl StatusLanes {
    /// Creates a lane designation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IndistinctLanes`] when both lanes point at
    /// the same status.
    pub fn new(
        project_id: ProjectId,
        open: StatusId,
        done: StatusId,
    ) -> Result<Self, TaskDomainError> {
        if open == done {
            return Err(TaskDomainError::IndistinctLanes {
                project_id,
                status_id: open,
            });
        }
        Ok(Self {
            project_id,
            open,
            done,
        })
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the status backing the given lane.
    #[must_use]
    pub const fn status_for(&self, lane: Lane) -> StatusId {
        match lane {
            Lane::Open => self.open,
            Lane::Done => self.done,
        }
    }

    /// Classifies a status as one of the designated lanes, if it is one.
    #[must_use]
    pub fn lane_of(&self, status_id: StatusId) -> Option<Lane> {
        if status_id == self.open {
            Some(Lane::Open)
        } else if status_id == self.done {
            Some(Lane::Done)
        } else {
            None
        }
    }
}
