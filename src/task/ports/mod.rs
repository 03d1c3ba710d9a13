//! Port contracts for task persistence and project queries.
//!
//! Ports define infrastructure-agnostic interfaces used by sync services.

pub mod project;
pub mod repository;

pub use project::{ProjectDirectory, ProjectDirectoryError, ProjectDirectoryResult};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
