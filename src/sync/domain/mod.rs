//! Domain model for webhook synchronization.
//!
//! Covers the linkage records (integrations, installations, issue and pull
//! request links), the inbound payload model, and the commit directive
//! parser. No infrastructure concerns cross this boundary.

mod commit;
mod error;
pub mod event;
mod ids;
mod installation;
mod integration;
mod link;

pub use commit::{CommitAction, CommitDirective, parse_commit_message};
pub use error::SyncDomainError;
pub use event::{PayloadError, WebhookEvent};
pub use ids::{
    AccountLogin, InstallationId, IntegrationId, IssueNumber, PullRequestNumber,
    RepositoryFullName,
};
pub use installation::{Installation, PersistedInstallationData};
pub use integration::{Integration, PersistedIntegrationData};
pub use link::{IssueLink, PullRequestContent, PullRequestLink, PullRequestLinkData};
