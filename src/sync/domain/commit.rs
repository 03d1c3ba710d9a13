//! Task-status directives embedded in commit messages.
//!
//! A directive is an optional `close` or `reopen` keyword immediately
//! followed by `!` and a task number: `!12`, `close!12`, `reopen!12`.
//! Only the first directive with a valid task number counts.

use crate::task::domain::{Lane, TaskNumber};
use regex::{Captures, Regex};
use std::sync::LazyLock;

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal and is exercised by the parser tests"
)]
static DIRECTIVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(reopen|close)?!(\d+)").expect("directive pattern compiles"));

/// Action requested by a commit directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitAction {
    /// Move the task to the done lane (`!n` or `close!n`).
    Close,
    /// Move the task to the open lane (`reopen!n`).
    Reopen,
}

impl CommitAction {
    /// Returns the lane the action moves a task into.
    #[must_use]
    pub const fn target_lane(self) -> Lane {
        match self {
            Self::Close => Lane::Done,
            Self::Reopen => Lane::Open,
        }
    }
}

/// A structured directive parsed from a commit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitDirective {
    /// Requested action.
    pub action: CommitAction,
    /// Referenced task number.
    pub task_number: TaskNumber,
}

/// Extracts the first valid directive from a commit message.
///
/// Matches whose number is not a valid task number (`!0`, or too large to
/// store) are skipped. Returns `None` when no match remains.
#[must_use]
pub fn parse_commit_message(message: &str) -> Option<CommitDirective> {
    DIRECTIVE_PATTERN
        .captures_iter(message)
        .find_map(|captures| directive_from(&captures))
}

fn directive_from(captures: &Captures<'_>) -> Option<CommitDirective> {
    let action = match captures.get(1).map(|keyword| keyword.as_str()) {
        Some("reopen") => CommitAction::Reopen,
        _ => CommitAction::Close,
    };
    let raw_number = captures.get(2)?.as_str().parse::<u64>().ok()?;
    let task_number = TaskNumber::new(raw_number).ok()?;
    Some(CommitDirective {
        action,
        task_number,
    })
}
