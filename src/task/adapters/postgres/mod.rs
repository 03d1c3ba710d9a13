//! `PostgreSQL` adapters for task persistence and project queries.

mod models;
mod project;
mod repository;
mod schema;

pub use project::PostgresProjectDirectory;
pub(crate) use repository::insert_task;
pub use repository::{PostgresTaskRepository, TaskPgPool};
