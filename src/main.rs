//! `tracksync` server: receives hosting-service webhooks and mirrors them
//! onto internal tasks stored in `PostgreSQL`.

use std::error::Error;
use std::sync::Arc;

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use tracing::info;

use tracksync::config::ServerConfig;
use tracksync::server::{AppState, build_router};
use tracksync::sync::{
    adapters::{
        TracingIssueClient,
        postgres::{PostgresInstallationRepository, PostgresLinkageRepository},
    },
    services::{SyncPorts, WebhookDispatcher},
};
use tracksync::task::adapters::postgres::{PostgresProjectDirectory, PostgresTaskRepository};
use tracksync::telemetry;

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    telemetry::init()?;
    let config = ServerConfig::from_env()?;

    let pool = Pool::builder()
        .max_size(config.db_pool_size)
        .build(ConnectionManager::<PgConnection>::new(&config.database_url))?;

    let ports = SyncPorts {
        linkage: Arc::new(PostgresLinkageRepository::new(pool.clone())),
        installations: Arc::new(PostgresInstallationRepository::new(pool.clone())),
        tasks: Arc::new(PostgresTaskRepository::new(pool.clone())),
        projects: Arc::new(PostgresProjectDirectory::new(pool)),
        issue_client: Arc::new(TracingIssueClient),
        clock: Arc::new(DefaultClock),
    };
    let dispatcher = WebhookDispatcher::new(ports, config.system_user);
    let app = build_router(AppState::new(dispatcher, config.webhook_secret));

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!(address = %config.bind_address, "tracksync listening");
    axum::serve(listener, app).await?;
    Ok(())
}
