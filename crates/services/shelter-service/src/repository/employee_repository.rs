//! Employee association repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::employee::{self, ActiveModel, Entity as EmployeeEntity};
use common::{AppError, AppResult};
use domain::{AssignEmployee, Employee, UpdateEmployee};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Employee repository trait for dependency injection.
///
/// Associations are keyed by (user, project).
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Find the association for (user, project)
    async fn find(&self, user_id: Uuid, project_id: Uuid) -> AppResult<Option<Employee>>;

    /// List staff of a project
    async fn list_by_project(&self, project_id: Uuid) -> AppResult<Vec<Employee>>;

    /// Create a new association
    async fn create(&self, assignment: AssignEmployee) -> AppResult<Employee>;

    /// Update function and note
    async fn update(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        changes: UpdateEmployee,
    ) -> AppResult<Employee>;

    /// Write the privilege flag
    async fn set_privileges(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        privileges: bool,
    ) -> AppResult<Employee>;

    /// Delete the association
    async fn delete(&self, user_id: Uuid, project_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of EmployeeRepository
pub struct EmployeeStore {
    db: DatabaseConnection,
}

impl EmployeeStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, user_id: Uuid, project_id: Uuid) -> AppResult<employee::Model> {
        EmployeeEntity::find_by_id((user_id, project_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Employee"))
    }
}

#[async_trait]
impl EmployeeRepository for EmployeeStore {
    async fn find(&self, user_id: Uuid, project_id: Uuid) -> AppResult<Option<Employee>> {
        let result = EmployeeEntity::find_by_id((user_id, project_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Employee::from))
    }

    async fn list_by_project(&self, project_id: Uuid) -> AppResult<Vec<Employee>> {
        let models = EmployeeEntity::find()
            .filter(employee::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Employee::from).collect())
    }

    async fn create(&self, assignment: AssignEmployee) -> AppResult<Employee> {
        let active_model = ActiveModel {
            user_id: Set(assignment.user_id),
            project_id: Set(assignment.project_id),
            privileges: Set(assignment.privileges),
            function: Set(assignment.function),
            note: Set(assignment.note),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Employee::from(model))
    }

    async fn update(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        changes: UpdateEmployee,
    ) -> AppResult<Employee> {
        let mut active: ActiveModel = self.find_model(user_id, project_id).await?.into();

        if let Some(function) = changes.function {
            active.function = Set(Some(function));
        }
        if let Some(note) = changes.note {
            active.note = Set(Some(note));
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Employee::from(model))
    }

    async fn set_privileges(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        privileges: bool,
    ) -> AppResult<Employee> {
        let mut active: ActiveModel = self.find_model(user_id, project_id).await?.into();
        active.privileges = Set(privileges);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Employee::from(model))
    }

    async fn delete(&self, user_id: Uuid, project_id: Uuid) -> AppResult<()> {
        let result = EmployeeEntity::delete_by_id((user_id, project_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Employee"));
        }

        Ok(())
    }
}
