//! Tests for the in-memory task adapters.

use crate::task::{
    adapters::memory::{InMemoryProjectDirectory, InMemoryTaskRepository},
    domain::{Lane, NewTask, ProjectId, StatusId, StatusLanes, Task, TaskNumber, UserId},
    ports::{ProjectDirectory, ProjectDirectoryError, TaskRepository, TaskRepositoryError},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn lanes() -> StatusLanes {
    StatusLanes::new(ProjectId::new(), StatusId::new(), StatusId::new()).expect("distinct lanes")
}

fn task(lanes: &StatusLanes, number: u64) -> Task {
    Task::new(
        NewTask {
            project_id: lanes.project_id(),
            number: TaskNumber::new(number).expect("valid task number"),
            name: format!("Task {number}"),
            description: String::new(),
            status_id: lanes.status_for(Lane::Open),
            assignee: None,
        },
        &DefaultClock,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_duplicate_numbers_within_a_project(lanes: StatusLanes) {
    let repository = InMemoryTaskRepository::new();
    repository
        .store(&task(&lanes, 1))
        .await
        .expect("first store succeeds");

    let result = repository.store(&task(&lanes, 1)).await;

    assert!(matches!(
        result,
        Err(TaskRepositoryError::DuplicateNumber { number, .. }) if number.value() == 1
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_active_by_number_skips_soft_deleted_tasks(lanes: StatusLanes) {
    let repository = InMemoryTaskRepository::new();
    let mut stored = task(&lanes, 3);
    repository.store(&stored).await.expect("store succeeds");
    let number = stored.number();

    let found = repository
        .find_active_by_number(lanes.project_id(), number)
        .await
        .expect("lookup succeeds");
    assert_eq!(found, Some(stored.clone()));

    stored.mark_deleted(&DefaultClock);
    repository.update(&stored).await.expect("update succeeds");
    let found = repository
        .find_active_by_number(lanes.project_id(), number)
        .await
        .expect("lookup succeeds");
    assert_eq!(found, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_frees_the_task_number(lanes: StatusLanes) {
    let repository = InMemoryTaskRepository::new();
    let stored = task(&lanes, 5);
    repository.store(&stored).await.expect("store succeeds");

    assert!(repository.delete(stored.id()).await.expect("delete succeeds"));
    assert!(!repository.delete(stored.id()).await.expect("delete succeeds"));
    assert!(repository.is_empty().expect("lock"));
    repository
        .store(&task(&lanes, 5))
        .await
        .expect("number is free again");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_unknown_task_is_not_found(lanes: StatusLanes) {
    let repository = InMemoryTaskRepository::new();
    let missing = task(&lanes, 9);

    let result = repository.update(&missing).await;

    assert!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == missing.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_directory_allocates_sequential_numbers(lanes: StatusLanes) {
    let directory = InMemoryProjectDirectory::new();
    directory.add_project(lanes).expect("register project");

    let first = directory
        .allocate_task_number(lanes.project_id())
        .await
        .expect("allocate");
    let second = directory
        .allocate_task_number(lanes.project_id())
        .await
        .expect("allocate");

    assert_eq!((first.value(), second.value()), (1, 2));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_directory_answers_membership(lanes: StatusLanes) {
    let directory = InMemoryProjectDirectory::new();
    directory.add_project(lanes).expect("register project");
    let member = UserId::new();
    directory
        .add_member(lanes.project_id(), member)
        .expect("add member");

    assert!(
        directory
            .is_member(lanes.project_id(), member)
            .await
            .expect("query")
    );
    assert!(
        !directory
            .is_member(lanes.project_id(), UserId::new())
            .await
            .expect("query")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_project_is_reported() {
    let directory = InMemoryProjectDirectory::new();
    let project_id = ProjectId::new();

    let result = directory.lanes(project_id).await;

    assert!(matches!(
        result,
        Err(ProjectDirectoryError::UnknownProject(id)) if id == project_id
    ));
}
