//! Domain model for internal tasks.
//!
//! Tasks live on a project board of ordered status lanes. Webhook-driven
//! changes only ever move a task between the board's designated open and
//! done lanes, so the lane designation is modelled explicitly here.

mod error;
mod ids;
mod lanes;
mod task;

pub use error::TaskDomainError;
pub use ids::{ProjectId, StatusId, TaskId, TaskNumber, UserId};
pub use lanes::{Lane, StatusLanes};
pub use task::{NewTask, PersistedTaskData, Task};
