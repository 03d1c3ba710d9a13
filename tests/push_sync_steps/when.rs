//! When steps for push synchronization BDD scenarios.

use super::world::PushSyncWorld;
use rstest_bdd_macros::when;
use serde_json::json;

#[when(r#"a push to "{repository}" carries the message "{message}""#)]
fn push_with_message(
    world: &mut PushSyncWorld,
    repository: String,
    message: String,
) -> Result<(), eyre::Report> {
    world.deliver(
        "push",
        &json!({
            "repository": { "full_name": repository },
            "commits": [{ "message": message }],
        }),
    )
}
