//! Then steps for push synchronization BDD scenarios.

use super::world::{PushSyncWorld, run_async};
use rstest_bdd_macros::then;
use tracksync::sync::{
    ports::{ExternalState, ExternalTarget},
    services::{IgnoreReason, SyncOutcome},
};
use tracksync::task::{
    domain::TaskNumber,
    ports::TaskRepository,
};

#[then("task {task_number:u64} is in the {lane} lane")]
fn task_in_lane(
    world: &PushSyncWorld,
    task_number: u64,
    lane: String,
) -> Result<(), eyre::Report> {
    let task = run_async(
        world
            .tasks
            .find_active_by_number(world.lanes.project_id(), TaskNumber::new(task_number)?),
    )?
    .ok_or_else(|| eyre::eyre!("task {task_number} missing"))?;
    let actual = world
        .lanes
        .lane_of(task.status_id())
        .ok_or_else(|| eyre::eyre!("task {task_number} outside designated lanes"))?;

    eyre::ensure!(
        actual.as_str() == lane,
        "expected lane {lane}, found {}",
        actual.as_str()
    );
    Ok(())
}

#[then("issue #{issue_number:u64} is told the task is {state}")]
fn issue_told_state(
    world: &PushSyncWorld,
    issue_number: u64,
    state: String,
) -> Result<(), eyre::Report> {
    let update = world
        .client
        .pushed()
        .into_iter()
        .last()
        .ok_or_else(|| eyre::eyre!("no outbound update was sent"))?;
    let expected = if state == "closed" {
        ExternalState::Closed
    } else {
        ExternalState::Open
    };

    eyre::ensure!(
        update.state == expected,
        "expected {state}, sent {}",
        update.state.as_str()
    );
    eyre::ensure!(
        update
            .targets
            .iter()
            .any(|target| matches!(target, ExternalTarget::Issue(n) if n.value() == issue_number)),
        "issue #{issue_number} not among targets {:?}",
        update.targets
    );
    Ok(())
}

#[then("the push is acknowledged without changes")]
fn push_acknowledged_without_changes(world: &PushSyncWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.last_outcome == Some(SyncOutcome::Ignored(IgnoreReason::NotLinked)),
        "unexpected outcome {:?}",
        world.last_outcome
    );
    eyre::ensure!(world.client.pushed().is_empty(), "outbound update was sent");
    Ok(())
}
