//! `PostgreSQL` project directory backed by the project tables.

use super::{
    repository::TaskPgPool,
    schema::{project_members, project_statuses, projects},
};
use crate::task::{
    domain::{ProjectId, StatusId, StatusLanes, TaskNumber, UserId},
    ports::{ProjectDirectory, ProjectDirectoryError, ProjectDirectoryResult},
};
use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed project directory.
#[derive(Debug, Clone)]
pub struct PostgresProjectDirectory {
    pool: TaskPgPool,
}

impl PostgresProjectDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectDirectoryError::persistence)?
    }
}

#[async_trait]
impl ProjectDirectory for PostgresProjectDirectory {
    async fn lanes(&self, project_id: ProjectId) -> ProjectDirectoryResult<StatusLanes> {
        self.run_blocking(move |connection| {
            let project_exists = diesel::select(exists(
                projects::table.filter(projects::id.eq(project_id.into_inner())),
            ))
            .get_result::<bool>(connection)
            .map_err(ProjectDirectoryError::persistence)?;
            if !project_exists {
                return Err(ProjectDirectoryError::UnknownProject(project_id));
            }

            let open = find_designated_status(connection, project_id, LaneMarker::Open)?;
            let done = find_designated_status(connection, project_id, LaneMarker::Done)?;
            match (open, done) {
                (Some(open_status), Some(done_status)) => {
                    StatusLanes::new(project_id, open_status, done_status)
                        .map_err(ProjectDirectoryError::persistence)
                }
                _ => Err(ProjectDirectoryError::LanesNotDesignated(project_id)),
            }
        })
        .await
    }

    async fn is_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectDirectoryResult<bool> {
        self.run_blocking(move |connection| {
            diesel::select(exists(
                project_members::table
                    .filter(project_members::project_id.eq(project_id.into_inner()))
                    .filter(project_members::user_id.eq(user_id.into_inner())),
            ))
            .get_result::<bool>(connection)
            .map_err(ProjectDirectoryError::persistence)
        })
        .await
    }

    async fn allocate_task_number(
        &self,
        project_id: ProjectId,
    ) -> ProjectDirectoryResult<TaskNumber> {
        self.run_blocking(move |connection| {
            let counter = diesel::update(projects::table.find(project_id.into_inner()))
                .set(projects::task_counter.eq(projects::task_counter + 1))
                .returning(projects::task_counter)
                .get_result::<i64>(connection)
                .optional()
                .map_err(ProjectDirectoryError::persistence)?
                .ok_or(ProjectDirectoryError::UnknownProject(project_id))?;
            let raw = u64::try_from(counter).map_err(ProjectDirectoryError::persistence)?;
            TaskNumber::new(raw).map_err(ProjectDirectoryError::persistence)
        })
        .await
    }
}

/// Which lane marker column to search for.
#[derive(Debug, Clone, Copy)]
enum LaneMarker {
    Open,
    Done,
}

/// Returns the lowest-ordinal status carrying the given lane marker.
fn find_designated_status(
    connection: &mut PgConnection,
    project_id: ProjectId,
    marker: LaneMarker,
) -> ProjectDirectoryResult<Option<StatusId>> {
    let board = project_statuses::table
        .filter(project_statuses::project_id.eq(project_id.into_inner()))
        .order(project_statuses::ordinal.asc())
        .select(project_statuses::id);
    let status = match marker {
        LaneMarker::Open => board
            .filter(project_statuses::is_open.eq(true))
            .first::<uuid::Uuid>(connection),
        LaneMarker::Done => board
            .filter(project_statuses::is_done.eq(true))
            .first::<uuid::Uuid>(connection),
    }
    .optional()
    .map_err(ProjectDirectoryError::persistence)?;
    Ok(status.map(StatusId::from_uuid))
}
