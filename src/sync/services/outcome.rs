//! Result of applying one event.

/// What a handler did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local state changed.
    Applied,
    /// Nothing changed; the event is still acknowledged.
    Ignored(IgnoreReason),
}

impl SyncOutcome {
    /// Returns whether local state changed.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Why an acknowledged event changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No integration, installation or link matches the event.
    NotLinked,
    /// The event type or action is not handled.
    NotApplicable,
    /// A concurrent or repeated delivery already applied the change.
    Duplicate,
}

impl IgnoreReason {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotLinked => "not_linked",
            Self::NotApplicable => "not_applicable",
            Self::Duplicate => "duplicate",
        }
    }
}
