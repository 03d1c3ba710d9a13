//! Port contracts for webhook synchronization.

mod installation;
mod issue_client;
mod linkage;

pub use installation::{
    InstallationRepository, InstallationRepositoryError, InstallationRepositoryResult,
};
pub use issue_client::{
    CreatedIssue, ExternalIssueClient, ExternalIssueClientError, ExternalIssueClientResult,
    ExternalState, ExternalTarget, TaskStateUpdate,
};
pub use linkage::{LinkageRepository, LinkageRepositoryError, LinkageRepositoryResult};
