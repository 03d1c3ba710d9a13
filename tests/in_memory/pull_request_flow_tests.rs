//! Pull request attachment and merge flow, end to end.

use super::helpers::{Wiring, issue_event, pull_request_event, repository, wiring};
use rstest::rstest;
use tracksync::sync::{
    domain::PullRequestNumber,
    services::{ConnectPullRequestRequest, IgnoreReason, SyncOutcome},
};
use tracksync::task::domain::Lane;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn merged_pull_request_closes_attached_task(
    #[future(awt)] wiring: Wiring,
) -> eyre::Result<()> {
    wiring
        .deliver("issues", &issue_event("opened", 3, "Ship board"))
        .await?;
    let task = wiring
        .task_numbered(1)
        .await?
        .ok_or_else(|| eyre::eyre!("task missing"))?;
    let number = PullRequestNumber::new(21)?;
    wiring
        .links()
        .connect_pull_request(
            ConnectPullRequestRequest::new(task.id(), repository()?, number, "Ship board")
                .with_branch("feature/board"),
        )
        .await?;

    let closed = wiring
        .deliver("pull_request", &pull_request_event("closed", 21, "closed", true))
        .await?;

    assert_eq!(closed.outcome, SyncOutcome::Applied);
    assert_eq!(wiring.lane_of(&task).await?, Lane::Done);
    let link = wiring
        .links()
        .pull_request_link_for_task(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("pull request link missing"))?;
    assert!(link.is_merged());
    assert_eq!(link.branch(), Some("feature/board"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unattached_pull_request_is_ignored(#[future(awt)] wiring: Wiring) -> eyre::Result<()> {
    let closed = wiring
        .deliver("pull_request", &pull_request_event("closed", 99, "closed", false))
        .await?;

    assert_eq!(closed.outcome, SyncOutcome::Ignored(IgnoreReason::NotLinked));
    assert!(wiring.tasks.is_empty()?);
    Ok(())
}
