//! Link management tests.

use super::harness::{Harness, harness, installation_id, repository};
use crate::sync::{
    domain::{InstallationId, IssueNumber, PullRequestNumber, RepositoryFullName},
    services::{ConnectIssueRequest, ConnectPullRequestRequest, LinkService, LinkingError},
};
use crate::task::domain::{ProjectId, StatusId, StatusLanes, TaskId};
use mockable::DefaultClock;
use rstest::rstest;

fn service(harness: &Harness) -> LinkService<DefaultClock> {
    LinkService::new(harness.ports())
}

fn issue(number: u64) -> IssueNumber {
    IssueNumber::new(number).expect("valid issue number")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connect_issue_links_existing_task(#[future(awt)] harness: Harness) {
    let task = harness.seed_task("Manual").await;
    let links = service(&harness);

    let link = links
        .connect_issue(
            ConnectIssueRequest::new(task.id(), repository(), issue(70))
                .with_url("https://github.com/org/repo/issues/70"),
        )
        .await
        .expect("connect");

    assert_eq!(link.task_id(), task.id());
    assert_eq!(
        links.issue_link_for_task(task.id()).await.expect("lookup"),
        Some(link)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connect_issue_rejects_second_link(#[future(awt)] harness: Harness) {
    let first = harness.seed_task("First").await;
    let second = harness.seed_task("Second").await;
    let links = service(&harness);
    links
        .connect_issue(ConnectIssueRequest::new(first.id(), repository(), issue(71)))
        .await
        .expect("connect");

    let same_task = links
        .connect_issue(ConnectIssueRequest::new(first.id(), repository(), issue(72)))
        .await;
    let same_issue = links
        .connect_issue(ConnectIssueRequest::new(second.id(), repository(), issue(71)))
        .await;

    assert!(matches!(same_task, Err(LinkingError::TaskAlreadyLinked(id)) if id == first.id()));
    assert!(matches!(same_issue, Err(LinkingError::IssueAlreadyLinked(number)) if number == issue(71)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connect_issue_validates_task_and_repository(#[future(awt)] harness: Harness) {
    let task = harness.seed_task("Manual").await;
    let links = service(&harness);
    let missing_task = TaskId::new();
    let elsewhere = RepositoryFullName::new("org/other").expect("valid repository");

    let unknown_task = links
        .connect_issue(ConnectIssueRequest::new(missing_task, repository(), issue(1)))
        .await;
    let unknown_repository = links
        .connect_issue(ConnectIssueRequest::new(task.id(), elsewhere, issue(1)))
        .await;

    assert!(matches!(unknown_task, Err(LinkingError::TaskNotFound(id)) if id == missing_task));
    assert!(matches!(
        unknown_repository,
        Err(LinkingError::IntegrationNotFound(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connect_issue_rejects_foreign_project(#[future(awt)] harness: Harness) {
    let other_lanes = StatusLanes::new(ProjectId::new(), StatusId::new(), StatusId::new())
        .expect("distinct lanes");
    harness.projects.add_project(other_lanes).expect("register");
    let links = service(&harness);
    let other_repository = RepositoryFullName::new("org/other").expect("valid repository");
    links
        .create_integration(
            other_lanes.project_id(),
            installation_id(),
            other_repository.clone(),
        )
        .await
        .expect("integrate");
    let task = harness.seed_task("Wrong project").await;

    let result = links
        .connect_issue(ConnectIssueRequest::new(task.id(), other_repository, issue(3)))
        .await;

    assert!(matches!(result, Err(LinkingError::ProjectMismatch { .. })));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_issue_asks_client_and_links_result(#[future(awt)] harness: Harness) {
    let task = harness.seed_task("Export me").await;
    let links = service(&harness);

    let link = links
        .create_issue(task.id(), &repository())
        .await
        .expect("create");

    let created = harness.client.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created.first().map(|c| c.title.as_str()), Some("Export me"));
    assert_eq!(link.issue_number(), issue(1));
    assert_eq!(link.url(), Some("https://github.com/org/repo/issues/1"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_issue_surfaces_client_failure(#[future(awt)] harness: Harness) {
    let task = harness.seed_task("Export me").await;
    harness.client.fail_all();

    let result = service(&harness).create_issue(task.id(), &repository()).await;

    assert!(matches!(result, Err(LinkingError::Client(_))));
    assert_eq!(harness.linkage.issue_link_count().expect("lock"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disconnect_issue_keeps_task(#[future(awt)] harness: Harness) {
    let task = harness.seed_task("Keep me").await;
    harness.seed_issue_link(&task, 73).await;
    let links = service(&harness);

    assert!(links.disconnect_issue(task.id()).await.expect("disconnect"));
    assert!(!links.disconnect_issue(task.id()).await.expect("disconnect"));
    assert!(harness.reload(&task).await.is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pull_request_attach_and_detach(#[future(awt)] harness: Harness) {
    let task = harness.seed_task("Has PR").await;
    let other = harness.seed_task("Other").await;
    let links = service(&harness);
    let number = PullRequestNumber::new(80).expect("valid number");

    let link = links
        .connect_pull_request(
            ConnectPullRequestRequest::new(task.id(), repository(), number, "Add feature")
                .with_body("Body")
                .with_branch("feature/x"),
        )
        .await
        .expect("connect");
    assert!(!link.is_merged());
    assert_eq!(link.branch(), Some("feature/x"));

    let duplicate = links
        .connect_pull_request(ConnectPullRequestRequest::new(
            other.id(),
            repository(),
            number,
            "Again",
        ))
        .await;
    assert!(matches!(
        duplicate,
        Err(LinkingError::PullRequestAlreadyLinked(found)) if found == number
    ));

    assert!(
        links
            .disconnect_pull_request(task.id())
            .await
            .expect("disconnect")
    );
    assert_eq!(
        links
            .pull_request_link_for_task(task.id())
            .await
            .expect("lookup"),
        None
    );
    assert!(harness.reload(&task).await.is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_integration_rejects_duplicates_and_unknown_installations(
    #[future(awt)] harness: Harness,
) {
    let links = service(&harness);
    let project_id = harness.lanes.project_id();

    let duplicate = links
        .create_integration(project_id, installation_id(), repository())
        .await;
    let unknown = InstallationId::new(404).expect("valid id");
    let missing_installation = links
        .create_integration(
            project_id,
            unknown,
            RepositoryFullName::new("org/fresh").expect("valid repository"),
        )
        .await;

    assert!(matches!(
        duplicate,
        Err(LinkingError::RepositoryAlreadyIntegrated(name)) if name == repository()
    ));
    assert!(matches!(
        missing_installation,
        Err(LinkingError::InstallationNotFound(id)) if id == unknown
    ));
}
