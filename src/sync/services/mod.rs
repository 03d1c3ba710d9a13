//! Application services for webhook synchronization.

mod assignment;
mod context;
mod dispatcher;
mod error;
mod installation;
mod issue;
mod linking;
mod notification;
mod outcome;
mod pull_request;
mod push;

pub use context::SyncPorts;
pub use dispatcher::{Dispatched, WebhookDispatcher};
pub use error::{SyncError, SyncResult};
pub use installation::{
    InstallationEventOutcome, InstallationLifecycleError, InstallationLifecycleService,
    RegisterInstallationRequest,
};
pub use issue::IssueSyncService;
pub use linking::{
    ConnectIssueRequest, ConnectPullRequestRequest, LinkService, LinkingError, LinkingResult,
};
pub use notification::PendingNotifications;
pub use outcome::{IgnoreReason, SyncOutcome};
pub use pull_request::PullRequestSyncService;
pub use push::{PushReport, PushSyncService};
