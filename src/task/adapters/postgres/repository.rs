//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{PersistedTaskData, ProjectId, StatusId, Task, TaskId, TaskNumber, UserId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type shared by every adapter.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task = task.clone();
        self.run_blocking(move |connection| insert_task(connection, &task))
            .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = TaskChangeset {
            name: task.name().to_owned(),
            description: task.description().to_owned(),
            status_id: task.status_id().into_inner(),
            assignee_id: task.assignee().map(UserId::into_inner),
            deleted_at: task.deleted_at(),
            updated_at: task.updated_at(),
        };

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&changeset)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_active_by_number(
        &self,
        project_id: ProjectId,
        number: TaskNumber,
    ) -> TaskRepositoryResult<Option<Task>> {
        let persisted_number =
            i64::try_from(number.value()).map_err(TaskRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .filter(tasks::number.eq(persisted_number))
                .filter(tasks::deleted_at.is_null())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }
}

/// Inserts a task row on an existing connection.
///
/// Used directly by stores that write a task inside their own transaction.
pub(crate) fn insert_task(
    connection: &mut PgConnection,
    task: &Task,
) -> TaskRepositoryResult<()> {
    let task_id = task.id();
    let project_id = task.project_id();
    let number = task.number();
    let new_row = to_new_row(task)?;
    diesel::insert_into(tasks::table)
        .values(&new_row)
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                if is_number_unique_violation(info.as_ref()) =>
            {
                TaskRepositoryError::DuplicateNumber { project_id, number }
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                TaskRepositoryError::DuplicateTask(task_id)
            }
            _ => TaskRepositoryError::persistence(err),
        })?;
    Ok(())
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let number = i64::try_from(task.number().value()).map_err(TaskRepositoryError::persistence)?;
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        number,
        name: task.name().to_owned(),
        description: task.description().to_owned(),
        status_id: task.status_id().into_inner(),
        assignee_id: task.assignee().map(UserId::into_inner),
        deleted_at: task.deleted_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        number: persisted_number,
        name,
        description,
        status_id,
        assignee_id,
        deleted_at,
        created_at,
        updated_at,
    } = row;

    let raw_number = u64::try_from(persisted_number).map_err(TaskRepositoryError::persistence)?;
    let number = TaskNumber::new(raw_number).map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        project_id: ProjectId::from_uuid(project_id),
        number,
        name,
        description,
        status_id: StatusId::from_uuid(status_id),
        assignee: assignee_id.map(UserId::from_uuid),
        deleted_at,
        created_at,
        updated_at,
    }))
}

fn is_number_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_tasks_project_number_unique")
}
