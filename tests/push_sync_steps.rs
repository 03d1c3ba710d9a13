//! Behaviour tests for commit-directive driven task moves.

#[path = "push_sync_steps/mod.rs"]
mod push_sync_steps_defs;

use push_sync_steps_defs::world::{PushSyncWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/push_sync.feature",
    name = "Closing a mirrored issue's task from a commit"
)]
#[tokio::test(flavor = "multi_thread")]
async fn close_task_from_commit(world: PushSyncWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/push_sync.feature",
    name = "Reopening a task from a commit"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reopen_task_from_commit(world: PushSyncWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/push_sync.feature",
    name = "Pushes to repositories without an integration are ignored"
)]
#[tokio::test(flavor = "multi_thread")]
async fn ignore_push_without_integration(world: PushSyncWorld) {
    let _ = world;
}
