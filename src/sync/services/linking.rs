//! Entry points used by the REST layer to manage integrations and links.

use super::SyncPorts;
use crate::sync::{
    domain::{
        InstallationId, Integration, IssueLink, IssueNumber, PullRequestContent, PullRequestLink,
        PullRequestLinkData, PullRequestNumber, RepositoryFullName,
    },
    ports::{ExternalIssueClientError, InstallationRepositoryError, LinkageRepositoryError},
};
use crate::task::{
    domain::{ProjectId, Task, TaskId},
    ports::{ProjectDirectoryError, TaskRepositoryError},
};
use mockable::Clock;
use thiserror::Error;
use tracing::info;

/// Errors raised by link management.
#[derive(Debug, Error)]
pub enum LinkingError {
    /// The task does not exist or was deleted.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// No integration exists for the repository.
    #[error("repository not integrated: {0}")]
    IntegrationNotFound(RepositoryFullName),
    /// The repository is integrated with a different project.
    #[error("repository {repository} is not integrated with project {project_id}")]
    ProjectMismatch {
        /// Task's project.
        project_id: ProjectId,
        /// Requested repository.
        repository: RepositoryFullName,
    },
    /// The task already has a link of the requested kind.
    #[error("task already linked: {0}")]
    TaskAlreadyLinked(TaskId),
    /// The issue is already linked to a task.
    #[error("issue #{0} already linked")]
    IssueAlreadyLinked(IssueNumber),
    /// The pull request is already attached to a task.
    #[error("pull request #{0} already linked")]
    PullRequestAlreadyLinked(PullRequestNumber),
    /// The installation is not registered.
    #[error("installation not found: {0}")]
    InstallationNotFound(InstallationId),
    /// The repository already has an integration.
    #[error("repository already integrated: {0}")]
    RepositoryAlreadyIntegrated(RepositoryFullName),
    /// Task store failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
    /// Project directory failed.
    #[error(transparent)]
    ProjectDirectory(#[from] ProjectDirectoryError),
    /// Linkage store failed.
    #[error(transparent)]
    Linkage(#[from] LinkageRepositoryError),
    /// Installation store failed.
    #[error(transparent)]
    Installation(#[from] InstallationRepositoryError),
    /// Hosting-service client failed.
    #[error(transparent)]
    Client(#[from] ExternalIssueClientError),
}

/// Result type for link management.
pub type LinkingResult<T> = Result<T, LinkingError>;

/// Request to link an existing external issue to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectIssueRequest {
    task_id: TaskId,
    repository: RepositoryFullName,
    issue_number: IssueNumber,
    url: Option<String>,
}

impl ConnectIssueRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub const fn new(
        task_id: TaskId,
        repository: RepositoryFullName,
        issue_number: IssueNumber,
    ) -> Self {
        Self {
            task_id,
            repository,
            issue_number,
            url: None,
        }
    }

    /// Sets the issue's browser URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Request to attach an existing pull request to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectPullRequestRequest {
    task_id: TaskId,
    repository: RepositoryFullName,
    pull_request_number: PullRequestNumber,
    title: String,
    body: Option<String>,
    url: Option<String>,
    branch: Option<String>,
}

impl ConnectPullRequestRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        repository: RepositoryFullName,
        pull_request_number: PullRequestNumber,
        title: impl Into<String>,
    ) -> Self {
        Self {
            task_id,
            repository,
            pull_request_number,
            title: title.into(),
            body: None,
            url: None,
            branch: None,
        }
    }

    /// Sets the cached pull request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the pull request's browser URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the head branch name.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

/// Manages integrations and explicit task links.
pub struct LinkService<C>
where
    C: Clock + Send + Sync,
{
    ports: SyncPorts<C>,
}

impl<C> LinkService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates the service.
    #[must_use]
    pub const fn new(ports: SyncPorts<C>) -> Self {
        Self { ports }
    }

    /// Binds a repository to a project through a registered installation.
    ///
    /// # Errors
    ///
    /// Returns [`LinkingError::InstallationNotFound`] for an unknown
    /// installation, [`LinkingError::ProjectDirectory`] for an unknown
    /// project, and [`LinkingError::RepositoryAlreadyIntegrated`] when the
    /// repository is already bound.
    pub async fn create_integration(
        &self,
        project_id: ProjectId,
        installation_id: InstallationId,
        repository: RepositoryFullName,
    ) -> LinkingResult<Integration> {
        if self
            .ports
            .installations
            .find_by_installation_id(installation_id)
            .await?
            .is_none()
        {
            return Err(LinkingError::InstallationNotFound(installation_id));
        }
        self.ports.projects.lanes(project_id).await?;

        let integration =
            Integration::new(project_id, installation_id, repository, &*self.ports.clock);
        self.ports
            .linkage
            .store_integration(&integration)
            .await
            .map_err(|err| match err {
                LinkageRepositoryError::DuplicateRepository(name) => {
                    LinkingError::RepositoryAlreadyIntegrated(name)
                }
                other => other.into(),
            })?;
        info!(repository = %integration.repository(), project_id = %project_id, "integration created");
        Ok(integration)
    }

    /// Links an existing external issue to a task.
    ///
    /// # Errors
    ///
    /// Returns [`LinkingError::TaskAlreadyLinked`] when the task owns an
    /// issue link and [`LinkingError::IssueAlreadyLinked`] when the issue
    /// is linked to another task.
    pub async fn connect_issue(&self, request: ConnectIssueRequest) -> LinkingResult<IssueLink> {
        let (task, integration) = self
            .task_and_integration(request.task_id, &request.repository)
            .await?;
        self.ensure_no_issue_link(&task).await?;

        let link = IssueLink::new(
            integration.id(),
            request.issue_number,
            task.id(),
            request.url,
            &*self.ports.clock,
        );
        self.insert_issue_link(&link).await?;
        Ok(link)
    }

    /// Creates an external issue from a task and links it.
    ///
    /// # Errors
    ///
    /// Returns [`LinkingError::Client`] when the hosting service refuses
    /// the issue, plus the lookup errors of [`Self::connect_issue`].
    pub async fn create_issue(
        &self,
        task_id: TaskId,
        repository: &RepositoryFullName,
    ) -> LinkingResult<IssueLink> {
        let (task, integration) = self.task_and_integration(task_id, repository).await?;
        self.ensure_no_issue_link(&task).await?;

        let created = self.ports.issue_client.create_issue(&integration, &task).await?;
        let link = IssueLink::new(
            integration.id(),
            created.number,
            task.id(),
            created.url,
            &*self.ports.clock,
        );
        self.insert_issue_link(&link).await?;
        Ok(link)
    }

    /// Removes a task's issue link. The task stays.
    ///
    /// Returns `false` when the task had no issue link.
    ///
    /// # Errors
    ///
    /// Returns [`LinkingError::Linkage`] when the store fails.
    pub async fn disconnect_issue(&self, task_id: TaskId) -> LinkingResult<bool> {
        let Some(link) = self.ports.linkage.find_issue_link_by_task(task_id).await? else {
            return Ok(false);
        };
        Ok(self
            .ports
            .linkage
            .delete_issue_link(link.integration_id(), link.issue_number())
            .await?)
    }

    /// Attaches an existing pull request to a task.
    ///
    /// # Errors
    ///
    /// Returns [`LinkingError::TaskAlreadyLinked`] when the task has a
    /// pull request and [`LinkingError::PullRequestAlreadyLinked`] when the
    /// pull request is attached elsewhere.
    pub async fn connect_pull_request(
        &self,
        request: ConnectPullRequestRequest,
    ) -> LinkingResult<PullRequestLink> {
        let (task, integration) = self
            .task_and_integration(request.task_id, &request.repository)
            .await?;

        let link = PullRequestLink::new(
            PullRequestLinkData {
                integration_id: integration.id(),
                pull_request_number: request.pull_request_number,
                task_id: task.id(),
                url: request.url,
                branch: request.branch,
                content: PullRequestContent {
                    title: request.title,
                    body: request.body,
                },
                merged: false,
            },
            &*self.ports.clock,
        );
        self.ports
            .linkage
            .insert_pull_request_link(&link)
            .await
            .map_err(|err| match err {
                LinkageRepositoryError::TaskAlreadyLinked(id) => LinkingError::TaskAlreadyLinked(id),
                LinkageRepositoryError::DuplicatePullRequestLink {
                    pull_request_number,
                    ..
                } => LinkingError::PullRequestAlreadyLinked(pull_request_number),
                other => other.into(),
            })?;
        Ok(link)
    }

    /// Removes a task's pull request link. The task stays.
    ///
    /// # Errors
    ///
    /// Returns [`LinkingError::Linkage`] when the store fails.
    pub async fn disconnect_pull_request(&self, task_id: TaskId) -> LinkingResult<bool> {
        let Some(link) = self
            .ports
            .linkage
            .find_pull_request_link_by_task(task_id)
            .await?
        else {
            return Ok(false);
        };
        Ok(self
            .ports
            .linkage
            .delete_pull_request_link(link.integration_id(), link.pull_request_number())
            .await?)
    }

    /// Returns the issue link owning a task.
    ///
    /// # Errors
    ///
    /// Returns [`LinkingError::Linkage`] when the store fails.
    pub async fn issue_link_for_task(&self, task_id: TaskId) -> LinkingResult<Option<IssueLink>> {
        Ok(self.ports.linkage.find_issue_link_by_task(task_id).await?)
    }

    /// Returns the pull request link attached to a task.
    ///
    /// # Errors
    ///
    /// Returns [`LinkingError::Linkage`] when the store fails.
    pub async fn pull_request_link_for_task(
        &self,
        task_id: TaskId,
    ) -> LinkingResult<Option<PullRequestLink>> {
        Ok(self
            .ports
            .linkage
            .find_pull_request_link_by_task(task_id)
            .await?)
    }

    async fn task_and_integration(
        &self,
        task_id: TaskId,
        repository: &RepositoryFullName,
    ) -> LinkingResult<(Task, Integration)> {
        let task = self
            .ports
            .tasks
            .find_by_id(task_id)
            .await?
            .filter(|task| !task.is_deleted())
            .ok_or(LinkingError::TaskNotFound(task_id))?;
        let integration = self
            .ports
            .linkage
            .find_integration_by_repository(repository)
            .await?
            .ok_or_else(|| LinkingError::IntegrationNotFound(repository.clone()))?;
        if integration.project_id() != task.project_id() {
            return Err(LinkingError::ProjectMismatch {
                project_id: task.project_id(),
                repository: repository.clone(),
            });
        }
        Ok((task, integration))
    }

    async fn ensure_no_issue_link(&self, task: &Task) -> LinkingResult<()> {
        if self
            .ports
            .linkage
            .find_issue_link_by_task(task.id())
            .await?
            .is_some()
        {
            return Err(LinkingError::TaskAlreadyLinked(task.id()));
        }
        Ok(())
    }

    async fn insert_issue_link(&self, link: &IssueLink) -> LinkingResult<()> {
        let inserted = self
            .ports
            .linkage
            .insert_issue_link_if_absent(link)
            .await
            .map_err(|err| match err {
                LinkageRepositoryError::TaskAlreadyLinked(id) => LinkingError::TaskAlreadyLinked(id),
                other => other.into(),
            })?;
        if !inserted {
            return Err(LinkingError::IssueAlreadyLinked(link.issue_number()));
        }
        info!(issue_number = %link.issue_number(), task_id = %link.task_id(), "issue linked");
        Ok(())
    }
}
