//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

use crate::sync::signature::WebhookSecret;
use crate::task::domain::UserId;

/// Shared secret deliveries are signed with.
pub const ENV_WEBHOOK_SECRET: &str = "TRACKSYNC_WEBHOOK_SECRET";
/// Internal account credited with mirrored issues.
pub const ENV_SYSTEM_USER_ID: &str = "TRACKSYNC_SYSTEM_USER_ID";
/// `PostgreSQL` connection string.
pub const ENV_DATABASE_URL: &str = "TRACKSYNC_DATABASE_URL";
/// Socket address the HTTP listener binds to.
pub const ENV_BIND_ADDRESS: &str = "TRACKSYNC_BIND_ADDRESS";
/// Maximum number of pooled database connections.
pub const ENV_DB_POOL_SIZE: &str = "TRACKSYNC_DB_POOL_SIZE";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_DB_POOL_SIZE: u32 = 8;

/// Configuration loading failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Parse failure.
        reason: String,
    },
}

/// Settings for the `tracksync` server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Webhook signing secret.
    pub webhook_secret: WebhookSecret,
    /// System user assigned to tasks created from external issues.
    pub system_user: UserId,
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Listener address.
    pub bind_address: SocketAddr,
    /// Connection pool size.
    pub db_pool_size: u32,
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook_secret = WebhookSecret::new(required(&lookup, ENV_WEBHOOK_SECRET)?);
        let system_user = UserId::from_uuid(parse::<Uuid>(
            ENV_SYSTEM_USER_ID,
            &required(&lookup, ENV_SYSTEM_USER_ID)?,
        )?);
        let database_url = required(&lookup, ENV_DATABASE_URL)?;
        let bind_address = parse(
            ENV_BIND_ADDRESS,
            &optional(&lookup, ENV_BIND_ADDRESS).unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned()),
        )?;
        let db_pool_size = optional(&lookup, ENV_DB_POOL_SIZE)
            .map(|raw| parse::<u32>(ENV_DB_POOL_SIZE, &raw))
            .transpose()?
            .unwrap_or(DEFAULT_DB_POOL_SIZE);
        if db_pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: ENV_DB_POOL_SIZE,
                reason: "pool size must be positive".to_owned(),
            });
        }

        Ok(Self {
            webhook_secret,
            system_user,
            database_url,
            bind_address,
            db_pool_size,
        })
    }
}

fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or(ConfigError::Missing(name))
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|err: T::Err| ConfigError::Invalid {
        name,
        reason: err.to_string(),
    })
}
