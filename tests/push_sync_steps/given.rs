//! Given steps for push synchronization BDD scenarios.

use super::world::{PushSyncWorld, run_async};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use serde_json::json;
use tracksync::sync::{
    domain::{AccountLogin, Installation, InstallationId, Integration, RepositoryFullName},
    ports::{InstallationRepository, LinkageRepository},
};
use tracksync::task::domain::UserId;

const INSTALLATION: u64 = 5150;

#[given(r#"a project integrated with repository "{repository}""#)]
fn project_integrated(world: &mut PushSyncWorld, repository: String) -> Result<(), eyre::Report> {
    world.projects.add_project(world.lanes)?;
    let installation_id = InstallationId::new(INSTALLATION)?;
    let installation = Installation::new(
        installation_id,
        UserId::new(),
        AccountLogin::new("board-owner")?,
        &DefaultClock,
    );
    run_async(world.installations.store(&installation)).wrap_err("store installation")?;

    let integration = Integration::new(
        world.lanes.project_id(),
        installation_id,
        RepositoryFullName::new(repository)?,
        &DefaultClock,
    );
    run_async(world.linkage.store_integration(&integration)).wrap_err("store integration")?;
    Ok(())
}

#[given(r#"an opened issue #{issue_number:u64} titled "{title}""#)]
fn opened_issue(
    world: &mut PushSyncWorld,
    issue_number: u64,
    title: String,
) -> Result<(), eyre::Report> {
    let repository = run_async(world.linkage.find_integrations_by_project(world.lanes.project_id()))?
        .first()
        .map(|integration| integration.repository().as_str().to_owned())
        .ok_or_else(|| eyre::eyre!("scenario project has no integration"))?;
    world.deliver(
        "issues",
        &json!({
            "action": "opened",
            "repository": { "full_name": repository },
            "issue": { "number": issue_number, "title": title },
        }),
    )
}

#[given("task {task_number:u64} was closed by an earlier commit")]
fn closed_by_earlier_commit(
    world: &mut PushSyncWorld,
    task_number: u64,
) -> Result<(), eyre::Report> {
    let repository = run_async(world.linkage.find_integrations_by_project(world.lanes.project_id()))?
        .first()
        .map(|integration| integration.repository().as_str().to_owned())
        .ok_or_else(|| eyre::eyre!("scenario project has no integration"))?;
    world.deliver(
        "push",
        &json!({
            "repository": { "full_name": repository },
            "commits": [{ "message": format!("close!{task_number}") }],
        }),
    )
}
