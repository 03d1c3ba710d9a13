//! Diesel schema for sync linkage tables.

diesel::table! {
    /// External app installations.
    installations (installation_id) {
        /// External installation identifier.
        installation_id -> Int8,
        /// Owning internal user.
        owner_id -> Uuid,
        /// Lowercased external account login.
        account_login -> Text,
        /// Whether access is suspended.
        suspended -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Project-to-repository bindings.
    integrations (id) {
        /// Integration identifier.
        id -> Uuid,
        /// Bound project.
        project_id -> Uuid,
        /// Installation granting repository access.
        installation_id -> Int8,
        /// `owner/repo` full name.
        repository_full_name -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issue links owning their task.
    issue_links (integration_id, issue_number) {
        /// Scoping integration.
        integration_id -> Uuid,
        /// External issue number.
        issue_number -> Int8,
        /// Owned task.
        task_id -> Uuid,
        /// Browser URL.
        url -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pull request links attached to a task.
    pull_request_links (integration_id, pull_request_number) {
        /// Scoping integration.
        integration_id -> Uuid,
        /// External pull request number.
        pull_request_number -> Int8,
        /// Attached task.
        task_id -> Uuid,
        /// Browser URL.
        url -> Nullable<Text>,
        /// Head branch name.
        branch -> Nullable<Text>,
        /// Cached pull request title.
        title -> Text,
        /// Cached pull request body.
        body -> Nullable<Text>,
        /// Whether the pull request was merged.
        merged -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
