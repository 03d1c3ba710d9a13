//! `PostgreSQL` linkage store.
//!
//! Link rows reference their integration with `ON DELETE CASCADE`, so
//! removing an integration removes its links in the same statement.

use super::{
    blocking_helpers::{SyncPgPool, get_conn_with, run_blocking_with, unique_violation},
    models::{IntegrationRow, IssueLinkRow, PullRequestLinkChangeset, PullRequestLinkRow},
    schema::{integrations, issue_links, pull_request_links},
};
use crate::sync::{
    domain::{
        InstallationId, Integration, IntegrationId, IssueLink, IssueNumber,
        PersistedIntegrationData, PullRequestContent, PullRequestLink, PullRequestLinkData,
        PullRequestNumber, RepositoryFullName,
    },
    ports::{LinkageRepository, LinkageRepositoryError, LinkageRepositoryResult},
};
use crate::task::{
    adapters::postgres::insert_task,
    domain::{ProjectId, Task, TaskId},
    ports::TaskRepository,
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

const REPOSITORY_UNIQUE: &str = "idx_integrations_repository_unique";
const ISSUE_LINK_TASK_UNIQUE: &str = "idx_issue_links_task_unique";
const PULL_REQUEST_LINK_TASK_UNIQUE: &str = "idx_pull_request_links_task_unique";

/// Failure inside the task-and-link transaction.
enum LinkedTaskError {
    Linkage(LinkageRepositoryError),
    IssueTaken,
}

impl From<DieselError> for LinkedTaskError {
    fn from(err: DieselError) -> Self {
        Self::Linkage(LinkageRepositoryError::persistence(err))
    }
}

/// `PostgreSQL`-backed linkage store.
#[derive(Debug, Clone)]
pub struct PostgresLinkageRepository {
    pool: SyncPgPool,
}

impl PostgresLinkageRepository {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: SyncPgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> LinkageRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> LinkageRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut conn = get_conn_with(&pool, LinkageRepositoryError::persistence)?;
                f(&mut conn)
            },
            LinkageRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl LinkageRepository for PostgresLinkageRepository {
    async fn store_integration(&self, integration: &Integration) -> LinkageRepositoryResult<()> {
        let row = integration_to_row(integration)?;
        let repository = integration.repository().clone();
        self.run(move |conn| {
            diesel::insert_into(integrations::table)
                .values(&row)
                .execute(conn)
                .map_err(|err| match unique_violation(&err) {
                    Some(REPOSITORY_UNIQUE) => {
                        LinkageRepositoryError::DuplicateRepository(repository)
                    }
                    _ => LinkageRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_integration_by_repository(
        &self,
        repository: &RepositoryFullName,
    ) -> LinkageRepositoryResult<Option<Integration>> {
        let full_name = repository.as_str().to_owned();
        self.run(move |conn| {
            integrations::table
                .filter(integrations::repository_full_name.eq(full_name))
                .select(IntegrationRow::as_select())
                .first::<IntegrationRow>(conn)
                .optional()
                .map_err(LinkageRepositoryError::persistence)?
                .map(row_to_integration)
                .transpose()
        })
        .await
    }

    async fn find_integrations_by_project(
        &self,
        project_id: ProjectId,
    ) -> LinkageRepositoryResult<Vec<Integration>> {
        self.run(move |conn| {
            integrations::table
                .filter(integrations::project_id.eq(project_id.into_inner()))
                .order(integrations::created_at.asc())
                .select(IntegrationRow::as_select())
                .load::<IntegrationRow>(conn)
                .map_err(LinkageRepositoryError::persistence)?
                .into_iter()
                .map(row_to_integration)
                .collect()
        })
        .await
    }

    async fn delete_integration(&self, id: IntegrationId) -> LinkageRepositoryResult<bool> {
        self.run(move |conn| {
            let deleted =
                diesel::delete(integrations::table.filter(integrations::id.eq(id.into_inner())))
                    .execute(conn)
                    .map_err(LinkageRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn delete_integrations_for_installation(
        &self,
        installation_id: InstallationId,
    ) -> LinkageRepositoryResult<usize> {
        let persisted =
            i64::try_from(installation_id.value()).map_err(LinkageRepositoryError::persistence)?;
        self.run(move |conn| {
            diesel::delete(
                integrations::table.filter(integrations::installation_id.eq(persisted)),
            )
            .execute(conn)
            .map_err(LinkageRepositoryError::persistence)
        })
        .await
    }

    async fn insert_issue_link_if_absent(
        &self,
        link: &IssueLink,
    ) -> LinkageRepositoryResult<bool> {
        let row = issue_link_to_row(link)?;
        self.run(move |conn| insert_issue_link_row(conn, &row)).await
    }

    async fn store_task_with_issue_link(
        &self,
        _tasks: &dyn TaskRepository,
        task: &Task,
        link: &IssueLink,
    ) -> LinkageRepositoryResult<bool> {
        let task = task.clone();
        let row = issue_link_to_row(link)?;
        self.run(move |conn| {
            let stored = conn.transaction::<_, LinkedTaskError, _>(|tx| {
                insert_task(tx, &task).map_err(|err| {
                    LinkedTaskError::Linkage(LinkageRepositoryError::persistence(err))
                })?;
                if insert_issue_link_row(tx, &row).map_err(LinkedTaskError::Linkage)? {
                    Ok(())
                } else {
                    Err(LinkedTaskError::IssueTaken)
                }
            });
            match stored {
                Ok(()) => Ok(true),
                Err(LinkedTaskError::IssueTaken) => Ok(false),
                Err(LinkedTaskError::Linkage(err)) => Err(err),
            }
        })
        .await
    }

    async fn find_issue_link(
        &self,
        integration_id: IntegrationId,
        issue_number: IssueNumber,
    ) -> LinkageRepositoryResult<Option<IssueLink>> {
        let number =
            i64::try_from(issue_number.value()).map_err(LinkageRepositoryError::persistence)?;
        self.run(move |conn| {
            issue_links::table
                .filter(issue_links::integration_id.eq(integration_id.into_inner()))
                .filter(issue_links::issue_number.eq(number))
                .select(IssueLinkRow::as_select())
                .first::<IssueLinkRow>(conn)
                .optional()
                .map_err(LinkageRepositoryError::persistence)?
                .map(row_to_issue_link)
                .transpose()
        })
        .await
    }

    async fn find_issue_link_by_task(
        &self,
        task_id: TaskId,
    ) -> LinkageRepositoryResult<Option<IssueLink>> {
        self.run(move |conn| {
            issue_links::table
                .filter(issue_links::task_id.eq(task_id.into_inner()))
                .select(IssueLinkRow::as_select())
                .first::<IssueLinkRow>(conn)
                .optional()
                .map_err(LinkageRepositoryError::persistence)?
                .map(row_to_issue_link)
                .transpose()
        })
        .await
    }

    async fn delete_issue_link(
        &self,
        integration_id: IntegrationId,
        issue_number: IssueNumber,
    ) -> LinkageRepositoryResult<bool> {
        let number =
            i64::try_from(issue_number.value()).map_err(LinkageRepositoryError::persistence)?;
        self.run(move |conn| {
            let deleted = diesel::delete(
                issue_links::table
                    .filter(issue_links::integration_id.eq(integration_id.into_inner()))
                    .filter(issue_links::issue_number.eq(number)),
            )
            .execute(conn)
            .map_err(LinkageRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn insert_pull_request_link(
        &self,
        link: &PullRequestLink,
    ) -> LinkageRepositoryResult<()> {
        let row = pull_request_link_to_row(link)?;
        let integration_id = link.integration_id();
        let pull_request_number = link.pull_request_number();
        let task_id = link.task_id();
        self.run(move |conn| {
            diesel::insert_into(pull_request_links::table)
                .values(&row)
                .execute(conn)
                .map_err(|err| match unique_violation(&err) {
                    Some(PULL_REQUEST_LINK_TASK_UNIQUE) => {
                        LinkageRepositoryError::TaskAlreadyLinked(task_id)
                    }
                    Some(_) => LinkageRepositoryError::DuplicatePullRequestLink {
                        integration_id,
                        pull_request_number,
                    },
                    None => LinkageRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_pull_request_link(
        &self,
        link: &PullRequestLink,
    ) -> LinkageRepositoryResult<()> {
        let integration_id = link.integration_id();
        let pull_request_number = link.pull_request_number();
        let number = i64::try_from(pull_request_number.value())
            .map_err(LinkageRepositoryError::persistence)?;
        let changeset = PullRequestLinkChangeset {
            title: link.content().title.clone(),
            body: link.content().body.clone(),
            merged: link.is_merged(),
            updated_at: link.updated_at(),
        };
        self.run(move |conn| {
            let updated = diesel::update(
                pull_request_links::table
                    .filter(pull_request_links::integration_id.eq(integration_id.into_inner()))
                    .filter(pull_request_links::pull_request_number.eq(number)),
            )
            .set(&changeset)
            .execute(conn)
            .map_err(LinkageRepositoryError::persistence)?;
            if updated == 0 {
                return Err(LinkageRepositoryError::PullRequestLinkNotFound {
                    integration_id,
                    pull_request_number,
                });
            }
            Ok(())
        })
        .await
    }

    async fn find_pull_request_link(
        &self,
        integration_id: IntegrationId,
        pull_request_number: PullRequestNumber,
    ) -> LinkageRepositoryResult<Option<PullRequestLink>> {
        let number = i64::try_from(pull_request_number.value())
            .map_err(LinkageRepositoryError::persistence)?;
        self.run(move |conn| {
            pull_request_links::table
                .filter(pull_request_links::integration_id.eq(integration_id.into_inner()))
                .filter(pull_request_links::pull_request_number.eq(number))
                .select(PullRequestLinkRow::as_select())
                .first::<PullRequestLinkRow>(conn)
                .optional()
                .map_err(LinkageRepositoryError::persistence)?
                .map(row_to_pull_request_link)
                .transpose()
        })
        .await
    }

    async fn find_pull_request_link_by_task(
        &self,
        task_id: TaskId,
    ) -> LinkageRepositoryResult<Option<PullRequestLink>> {
        self.run(move |conn| {
            pull_request_links::table
                .filter(pull_request_links::task_id.eq(task_id.into_inner()))
                .select(PullRequestLinkRow::as_select())
                .first::<PullRequestLinkRow>(conn)
                .optional()
                .map_err(LinkageRepositoryError::persistence)?
                .map(row_to_pull_request_link)
                .transpose()
        })
        .await
    }

    async fn delete_pull_request_link(
        &self,
        integration_id: IntegrationId,
        pull_request_number: PullRequestNumber,
    ) -> LinkageRepositoryResult<bool> {
        let number = i64::try_from(pull_request_number.value())
            .map_err(LinkageRepositoryError::persistence)?;
        self.run(move |conn| {
            let deleted = diesel::delete(
                pull_request_links::table
                    .filter(pull_request_links::integration_id.eq(integration_id.into_inner()))
                    .filter(pull_request_links::pull_request_number.eq(number)),
            )
            .execute(conn)
            .map_err(LinkageRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }
}

fn integration_to_row(integration: &Integration) -> LinkageRepositoryResult<IntegrationRow> {
    Ok(IntegrationRow {
        id: integration.id().into_inner(),
        project_id: integration.project_id().into_inner(),
        installation_id: i64::try_from(integration.installation_id().value())
            .map_err(LinkageRepositoryError::persistence)?,
        repository_full_name: integration.repository().as_str().to_owned(),
        created_at: integration.created_at(),
    })
}

fn row_to_integration(row: IntegrationRow) -> LinkageRepositoryResult<Integration> {
    let raw_installation =
        u64::try_from(row.installation_id).map_err(LinkageRepositoryError::persistence)?;
    Ok(Integration::from_persisted(PersistedIntegrationData {
        id: IntegrationId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        installation_id: InstallationId::new(raw_installation)
            .map_err(LinkageRepositoryError::persistence)?,
        repository: RepositoryFullName::new(row.repository_full_name)
            .map_err(LinkageRepositoryError::persistence)?,
        created_at: row.created_at,
    }))
}

fn row_to_issue_link(row: IssueLinkRow) -> LinkageRepositoryResult<IssueLink> {
    let raw_number = u64::try_from(row.issue_number).map_err(LinkageRepositoryError::persistence)?;
    Ok(IssueLink::from_persisted(
        IntegrationId::from_uuid(row.integration_id),
        IssueNumber::new(raw_number).map_err(LinkageRepositoryError::persistence)?,
        TaskId::from_uuid(row.task_id),
        row.url,
        row.created_at,
    ))
}

fn pull_request_link_to_row(link: &PullRequestLink) -> LinkageRepositoryResult<PullRequestLinkRow> {
    Ok(PullRequestLinkRow {
        integration_id: link.integration_id().into_inner(),
        pull_request_number: i64::try_from(link.pull_request_number().value())
            .map_err(LinkageRepositoryError::persistence)?,
        task_id: link.task_id().into_inner(),
        url: link.url().map(str::to_owned),
        branch: link.branch().map(str::to_owned),
        title: link.content().title.clone(),
        body: link.content().body.clone(),
        merged: link.is_merged(),
        created_at: link.created_at(),
        updated_at: link.updated_at(),
    })
}

fn row_to_pull_request_link(row: PullRequestLinkRow) -> LinkageRepositoryResult<PullRequestLink> {
    let PullRequestLinkRow {
        integration_id,
        pull_request_number,
        task_id,
        url,
        branch,
        title,
        body,
        merged,
        created_at,
        updated_at,
    } = row;
    let raw_number =
        u64::try_from(pull_request_number).map_err(LinkageRepositoryError::persistence)?;
    let data = PullRequestLinkData {
        integration_id: IntegrationId::from_uuid(integration_id),
        pull_request_number: PullRequestNumber::new(raw_number)
            .map_err(LinkageRepositoryError::persistence)?,
        task_id: TaskId::from_uuid(task_id),
        url,
        branch,
        content: PullRequestContent { title, body },
        merged,
    };
    Ok(PullRequestLink::from_persisted(data, created_at, updated_at))
}

fn issue_link_to_row(link: &IssueLink) -> LinkageRepositoryResult<IssueLinkRow> {
    Ok(IssueLinkRow {
        integration_id: link.integration_id().into_inner(),
        issue_number: i64::try_from(link.issue_number().value())
            .map_err(LinkageRepositoryError::persistence)?,
        task_id: link.task_id().into_inner(),
        url: link.url().map(str::to_owned),
        created_at: link.created_at(),
    })
}

/// Inserts an issue link unless the issue is already linked.
fn insert_issue_link_row(
    conn: &mut PgConnection,
    row: &IssueLinkRow,
) -> LinkageRepositoryResult<bool> {
    let inserted = diesel::insert_into(issue_links::table)
        .values(row)
        .on_conflict((issue_links::integration_id, issue_links::issue_number))
        .do_nothing()
        .execute(conn)
        .map_err(|err| match unique_violation(&err) {
            Some(ISSUE_LINK_TASK_UNIQUE) => {
                LinkageRepositoryError::TaskAlreadyLinked(TaskId::from_uuid(row.task_id))
            }
            _ => LinkageRepositoryError::persistence(err),
        })?;
    Ok(inserted > 0)
}
