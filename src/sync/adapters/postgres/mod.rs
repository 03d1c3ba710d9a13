//! `PostgreSQL` adapters for the linkage and installation stores.

mod blocking_helpers;
mod installation;
mod linkage;
mod models;
mod schema;

pub use blocking_helpers::SyncPgPool;
pub use installation::PostgresInstallationRepository;
pub use linkage::PostgresLinkageRepository;
