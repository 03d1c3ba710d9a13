//! Detached outbound notifications started by the push handler.

use tokio::task::JoinHandle;
use tracing::warn;

/// Handles of outbound notifications still in flight.
///
/// Dropping the value detaches the notifications; they keep running.
#[derive(Debug, Default)]
pub struct PendingNotifications {
    handles: Vec<JoinHandle<()>>,
}

impl PendingNotifications {
    pub(super) const fn new(handles: Vec<JoinHandle<()>>) -> Self {
        Self { handles }
    }

    /// Returns the number of notifications started.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns whether no notification was started.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every notification to finish.
    pub async fn settle(self) {
        for handle in self.handles {
            if let Err(err) = handle.await {
                warn!(error = %err, "notification task did not complete");
            }
        }
    }
}
