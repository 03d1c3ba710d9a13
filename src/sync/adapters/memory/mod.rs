//! In-memory adapters for sync ports.

mod installation;
mod issue_client;
mod linkage;

pub use installation::InMemoryInstallationRepository;
pub use issue_client::{RecordedCreation, RecordingIssueClient};
pub use linkage::InMemoryLinkageRepository;
