//! `PostgreSQL` installation store.

use super::{
    blocking_helpers::{SyncPgPool, get_conn_with, run_blocking_with, unique_violation},
    models::{InstallationChangeset, InstallationRow},
    schema::installations,
};
use crate::sync::{
    domain::{AccountLogin, Installation, InstallationId, PersistedInstallationData},
    ports::{InstallationRepository, InstallationRepositoryError, InstallationRepositoryResult},
};
use crate::task::domain::UserId;
use async_trait::async_trait;
use diesel::prelude::*;

/// `PostgreSQL`-backed installation store.
#[derive(Debug, Clone)]
pub struct PostgresInstallationRepository {
    pool: SyncPgPool,
}

impl PostgresInstallationRepository {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: SyncPgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> InstallationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> InstallationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut conn = get_conn_with(&pool, InstallationRepositoryError::persistence)?;
                f(&mut conn)
            },
            InstallationRepositoryError::persistence,
        )
        .await
    }
}

fn persisted_id(id: InstallationId) -> InstallationRepositoryResult<i64> {
    i64::try_from(id.value()).map_err(InstallationRepositoryError::persistence)
}

#[async_trait]
impl InstallationRepository for PostgresInstallationRepository {
    async fn store(&self, installation: &Installation) -> InstallationRepositoryResult<()> {
        let id = installation.installation_id();
        let row = InstallationRow {
            installation_id: persisted_id(id)?,
            owner_id: installation.owner().into_inner(),
            account_login: installation.account_login().as_str().to_owned(),
            suspended: installation.is_suspended(),
            created_at: installation.created_at(),
            updated_at: installation.updated_at(),
        };
        self.run(move |conn| {
            diesel::insert_into(installations::table)
                .values(&row)
                .execute(conn)
                .map_err(|err| {
                    if unique_violation(&err).is_some() {
                        InstallationRepositoryError::DuplicateInstallation(id)
                    } else {
                        InstallationRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, installation: &Installation) -> InstallationRepositoryResult<()> {
        let id = installation.installation_id();
        let key = persisted_id(id)?;
        let changeset = InstallationChangeset {
            owner_id: installation.owner().into_inner(),
            account_login: installation.account_login().as_str().to_owned(),
            suspended: installation.is_suspended(),
            updated_at: installation.updated_at(),
        };
        self.run(move |conn| {
            let updated = diesel::update(installations::table.find(key))
                .set(&changeset)
                .execute(conn)
                .map_err(InstallationRepositoryError::persistence)?;
            if updated == 0 {
                return Err(InstallationRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, installation_id: InstallationId) -> InstallationRepositoryResult<bool> {
        let key = persisted_id(installation_id)?;
        self.run(move |conn| {
            let deleted = diesel::delete(installations::table.find(key))
                .execute(conn)
                .map_err(InstallationRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn find_by_installation_id(
        &self,
        installation_id: InstallationId,
    ) -> InstallationRepositoryResult<Option<Installation>> {
        let key = persisted_id(installation_id)?;
        self.run(move |conn| {
            installations::table
                .find(key)
                .select(InstallationRow::as_select())
                .first::<InstallationRow>(conn)
                .optional()
                .map_err(InstallationRepositoryError::persistence)?
                .map(row_to_installation)
                .transpose()
        })
        .await
    }

    async fn find_by_account_login(
        &self,
        login: &AccountLogin,
    ) -> InstallationRepositoryResult<Option<Installation>> {
        let account_login = login.as_str().to_owned();
        self.run(move |conn| {
            installations::table
                .filter(installations::account_login.eq(account_login))
                .order(installations::created_at.asc())
                .select(InstallationRow::as_select())
                .first::<InstallationRow>(conn)
                .optional()
                .map_err(InstallationRepositoryError::persistence)?
                .map(row_to_installation)
                .transpose()
        })
        .await
    }
}

fn row_to_installation(row: InstallationRow) -> InstallationRepositoryResult<Installation> {
    let raw_id =
        u64::try_from(row.installation_id).map_err(InstallationRepositoryError::persistence)?;
    Ok(Installation::from_persisted(PersistedInstallationData {
        installation_id: InstallationId::new(raw_id)
            .map_err(InstallationRepositoryError::persistence)?,
        owner: UserId::from_uuid(row.owner_id),
        account_login: AccountLogin::new(row.account_login)
            .map_err(InstallationRepositoryError::persistence)?,
        suspended: row.suspended,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
