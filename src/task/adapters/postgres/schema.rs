//! Diesel schema for tasks and the project tables they reference.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Project-scoped task number.
        number -> Int8,
        /// Task name.
        name -> Text,
        /// Task description.
        description -> Text,
        /// Current status lane.
        status_id -> Uuid,
        /// Optional assignee.
        assignee_id -> Nullable<Uuid>,
        /// Soft-deletion timestamp.
        deleted_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Projects with their task-number counter.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Last allocated task number.
        task_counter -> Int8,
    }
}

diesel::table! {
    /// Ordered status lanes of a project board.
    project_statuses (id) {
        /// Status identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Board position.
        ordinal -> Int4,
        /// Marks the designated open lane.
        is_open -> Bool,
        /// Marks the designated done lane.
        is_done -> Bool,
    }
}

diesel::table! {
    /// Project membership.
    project_members (project_id, user_id) {
        /// Project identifier.
        project_id -> Uuid,
        /// Member user identifier.
        user_id -> Uuid,
    }
}
