//! Project (tenant) management.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use common::{AppResult, OptionExt};
use domain::{Action, Actor, CreateProject, NewProject, Project, ProjectChanges, UpdateProject};

use super::address_service::AddressService;
use super::authorization::AccessControl;
use super::validate_command;
use crate::repository::ProjectRepository;

/// Project service trait for dependency injection.
#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn create_project(&self, actor: &Actor, cmd: CreateProject) -> AppResult<Project>;

    async fn update_project(
        &self,
        actor: &Actor,
        id: Uuid,
        cmd: UpdateProject,
    ) -> AppResult<Project>;

    /// Readable by any authenticated actor
    async fn get_project(&self, id: Uuid) -> AppResult<Project>;

    /// Readable by any authenticated actor
    async fn list_projects(&self) -> AppResult<Vec<Project>>;
}

/// Concrete implementation of ProjectService
pub struct ProjectManager {
    projects: Arc<dyn ProjectRepository>,
    addresses: Arc<dyn AddressService>,
    access: Arc<AccessControl>,
}

impl ProjectManager {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        addresses: Arc<dyn AddressService>,
        access: Arc<AccessControl>,
    ) -> Self {
        Self {
            projects,
            addresses,
            access,
        }
    }
}

#[async_trait]
impl ProjectService for ProjectManager {
    async fn create_project(&self, actor: &Actor, cmd: CreateProject) -> AppResult<Project> {
        self.access
            .authorize(actor, Action::ManageProjects, None)
            .await?;
        validate_command(&cmd)?;

        let address_id = self
            .addresses
            .upsert_address(None, cmd.address.as_ref())
            .await?;

        let project = self
            .projects
            .create(NewProject {
                name: cmd.name,
                description: cmd.description,
                email: cmd.email,
                phone: cmd.phone,
                address_id,
            })
            .await?;

        info!(project_id = %project.id, actor_id = %actor.id, "Project created");
        Ok(project)
    }

    async fn update_project(
        &self,
        actor: &Actor,
        id: Uuid,
        cmd: UpdateProject,
    ) -> AppResult<Project> {
        self.access
            .authorize(actor, Action::ManageProjects, Some(id))
            .await?;
        validate_command(&cmd)?;

        let project = self.get_project(id).await?;
        let address_id = self
            .addresses
            .upsert_address(project.address_id, cmd.address.as_ref())
            .await?;

        let changes = ProjectChanges {
            name: cmd.name,
            description: cmd.description,
            email: cmd.email,
            phone: cmd.phone,
            active: cmd.active,
            address_id: address_id.filter(|id| Some(*id) != project.address_id),
        };

        let updated = self.projects.update(id, changes).await?;
        info!(project_id = %id, actor_id = %actor.id, "Project updated");
        Ok(updated)
    }

    async fn get_project(&self, id: Uuid) -> AppResult<Project> {
        self.projects.find_by_id(id).await?.ok_or_not_found("Project")
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        self.projects.list().await
    }
}
