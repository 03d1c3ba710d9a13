//! In-memory adapters for task ports.

mod project;
mod task;

pub use project::InMemoryProjectDirectory;
pub use task::InMemoryTaskRepository;
