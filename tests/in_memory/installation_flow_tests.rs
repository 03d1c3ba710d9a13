//! Installation lifecycle, end to end.

use super::helpers::{Wiring, installation_event, installation_id, issue_event, wiring};
use rstest::rstest;
use tracksync::sync::{
    ports::{InstallationRepository, LinkageRepository},
    services::{IgnoreReason, SyncOutcome},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uninstall_removes_integrations_but_keeps_tasks(
    #[future(awt)] wiring: Wiring,
) -> eyre::Result<()> {
    wiring
        .deliver("issues", &issue_event("opened", 4, "Survives uninstall"))
        .await?;

    let deleted = wiring
        .deliver("installation", &installation_event("deleted"))
        .await?;

    assert_eq!(deleted.outcome, SyncOutcome::Applied);
    assert!(
        wiring
            .installations
            .find_by_installation_id(installation_id()?)
            .await?
            .is_none()
    );
    assert!(
        wiring
            .linkage
            .find_integrations_by_project(wiring.lanes.project_id())
            .await?
            .is_empty()
    );
    assert_eq!(wiring.linkage.issue_link_count()?, 0);
    assert!(wiring.task_numbered(1).await?.is_some());

    let later = wiring
        .deliver("issues", &issue_event("closed", 4, "Survives uninstall"))
        .await?;
    assert_eq!(later.outcome, SyncOutcome::Ignored(IgnoreReason::NotLinked));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn suspend_and_unsuspend_toggle_the_flag(
    #[future(awt)] wiring: Wiring,
) -> eyre::Result<()> {
    wiring
        .deliver("installation", &installation_event("suspend"))
        .await?;
    let suspended = wiring
        .installations
        .find_by_installation_id(installation_id()?)
        .await?
        .ok_or_else(|| eyre::eyre!("installation missing"))?;
    assert!(suspended.is_suspended());

    wiring
        .deliver("installation", &installation_event("unsuspend"))
        .await?;
    let resumed = wiring
        .installations
        .find_by_installation_id(installation_id()?)
        .await?
        .ok_or_else(|| eyre::eyre!("installation missing"))?;
    assert!(!resumed.is_suspended());
    Ok(())
}
