//! Issue mirroring and commit directives, end to end.

use super::helpers::{Wiring, issue_event, push_event, wiring};
use rstest::rstest;
use tracksync::sync::{
    ports::{ExternalState, ExternalTarget},
    services::{IgnoreReason, SyncOutcome},
};
use tracksync::task::domain::Lane;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issue_lifecycle_round_trips_through_commits(
    #[future(awt)] wiring: Wiring,
) -> eyre::Result<()> {
    let opened = wiring
        .deliver("issues", &issue_event("opened", 5, "Board renders blank"))
        .await?;
    eyre::ensure!(opened.outcome == SyncOutcome::Applied, "issue not mirrored");
    let task = wiring
        .task_numbered(1)
        .await?
        .ok_or_else(|| eyre::eyre!("mirrored task missing"))?;
    assert_eq!(task.name(), "Board renders blank");
    assert_eq!(task.description(), "Body of Board renders blank");
    assert_eq!(task.assignee(), Some(wiring.system_user));

    let pushed = wiring
        .deliver("push", &push_event(&["Fix blank board close!1"]))
        .await?;
    pushed.notifications.settle().await;
    assert_eq!(wiring.lane_of(&task).await?, Lane::Done);

    let updates = wiring.client.pushed();
    assert_eq!(updates.len(), 1);
    let update = updates
        .first()
        .ok_or_else(|| eyre::eyre!("no outbound update"))?;
    assert_eq!(update.state, ExternalState::Closed);
    assert_eq!(update.title, "Board renders blank");
    assert!(matches!(
        update.targets.as_slice(),
        [ExternalTarget::Issue(number)] if number.value() == 5
    ));

    wiring
        .deliver("issues", &issue_event("reopened", 5, "Board renders blank"))
        .await?;
    assert_eq!(wiring.lane_of(&task).await?, Lane::Open);

    wiring
        .deliver("issues", &issue_event("deleted", 5, "Board renders blank"))
        .await?;
    assert!(wiring.task_numbered(1).await?.is_none());
    assert_eq!(wiring.linkage.issue_link_count()?, 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn redelivered_opened_event_creates_one_task(
    #[future(awt)] wiring: Wiring,
) -> eyre::Result<()> {
    let payload = issue_event("opened", 8, "Duplicate delivery");

    let first = wiring.deliver("issues", &payload).await?;
    let second = wiring.deliver("issues", &payload).await?;

    assert_eq!(first.outcome, SyncOutcome::Applied);
    assert_eq!(second.outcome, SyncOutcome::Ignored(IgnoreReason::Duplicate));
    assert_eq!(wiring.tasks.len()?, 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn directives_for_unknown_tasks_change_nothing(
    #[future(awt)] wiring: Wiring,
) -> eyre::Result<()> {
    wiring
        .deliver("issues", &issue_event("opened", 9, "Only task"))
        .await?;

    let pushed = wiring
        .deliver("push", &push_event(&["close!77", "reopen!0", "no directive"]))
        .await?;

    assert_eq!(
        pushed.outcome,
        SyncOutcome::Ignored(IgnoreReason::NotApplicable)
    );
    assert!(pushed.notifications.is_empty());
    let task = wiring
        .task_numbered(1)
        .await?
        .ok_or_else(|| eyre::eyre!("task missing"))?;
    assert_eq!(wiring.lane_of(&task).await?, Lane::Open);
    Ok(())
}
