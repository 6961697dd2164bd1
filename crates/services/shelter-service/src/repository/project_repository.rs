//! Project repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::entities::project::{self, ActiveModel, Entity as ProjectEntity};
use common::{AppError, AppResult};
use domain::{NewProject, Project, ProjectChanges};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Project repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Find project by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>>;

    /// List all projects ordered by name
    async fn list(&self) -> AppResult<Vec<Project>>;

    /// Create a new project
    async fn create(&self, project: NewProject) -> AppResult<Project>;

    /// Update project columns
    async fn update(&self, id: Uuid, changes: ProjectChanges) -> AppResult<Project>;
}

/// Concrete implementation of ProjectRepository
pub struct ProjectStore {
    db: DatabaseConnection,
}

impl ProjectStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectRepository for ProjectStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>> {
        let result = ProjectEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Project::from))
    }

    async fn list(&self) -> AppResult<Vec<Project>> {
        let models = ProjectEntity::find()
            .order_by_asc(project::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Project::from).collect())
    }

    async fn create(&self, project: NewProject) -> AppResult<Project> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(project.name),
            description: Set(project.description),
            email: Set(project.email),
            phone: Set(project.phone),
            active: Set(true),
            address_id: Set(project.address_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Project::from(model))
    }

    async fn update(&self, id: Uuid, changes: ProjectChanges) -> AppResult<Project> {
        let project = ProjectEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Project"))?;

        let mut active: ActiveModel = project.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(email) = changes.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(is_active) = changes.active {
            active.active = Set(is_active);
        }
        if let Some(address_id) = changes.address_id {
            active.address_id = Set(Some(address_id));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Project::from(model))
    }
}
