//! Diesel row models for sync persistence.

use super::schema::{installations, integrations, issue_links, pull_request_links};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Installation row, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = installations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InstallationRow {
    pub installation_id: i64,
    pub owner_id: uuid::Uuid,
    pub account_login: String,
    pub suspended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable installation columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = installations)]
pub struct InstallationChangeset {
    pub owner_id: uuid::Uuid,
    pub account_login: String,
    pub suspended: bool,
    pub updated_at: DateTime<Utc>,
}

/// Integration row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = integrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IntegrationRow {
    pub id: uuid::Uuid,
    pub project_id: uuid::Uuid,
    pub installation_id: i64,
    pub repository_full_name: String,
    pub created_at: DateTime<Utc>,
}

/// Issue link row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = issue_links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IssueLinkRow {
    pub integration_id: uuid::Uuid,
    pub issue_number: i64,
    pub task_id: uuid::Uuid,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Pull request link row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = pull_request_links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PullRequestLinkRow {
    pub integration_id: uuid::Uuid,
    pub pull_request_number: i64,
    pub task_id: uuid::Uuid,
    pub url: Option<String>,
    pub branch: Option<String>,
    pub title: String,
    pub body: Option<String>,
    pub merged: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable pull request link columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pull_request_links)]
#[diesel(treat_none_as_null = true)]
pub struct PullRequestLinkChangeset {
    pub title: String,
    pub body: Option<String>,
    pub merged: bool,
    pub updated_at: DateTime<Utc>,
}
