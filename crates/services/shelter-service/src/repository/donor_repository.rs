//! Donor association repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::donor::{self, ActiveModel, Entity as DonorEntity};
use common::{AppError, AppResult};
use domain::{Donor, RegisterDonor};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Donor repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DonorRepository: Send + Sync {
    /// Find the association for (user, project)
    async fn find(&self, user_id: Uuid, project_id: Uuid) -> AppResult<Option<Donor>>;

    /// List donors of a project
    async fn list_by_project(&self, project_id: Uuid) -> AppResult<Vec<Donor>>;

    /// Create a new association
    async fn create(&self, registration: RegisterDonor) -> AppResult<Donor>;

    /// Overwrite the association with the given values
    async fn save(&self, donor: Donor) -> AppResult<Donor>;

    /// Delete the association
    async fn delete(&self, user_id: Uuid, project_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of DonorRepository
pub struct DonorStore {
    db: DatabaseConnection,
}

impl DonorStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DonorRepository for DonorStore {
    async fn find(&self, user_id: Uuid, project_id: Uuid) -> AppResult<Option<Donor>> {
        let result = DonorEntity::find_by_id((user_id, project_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(Donor::try_from).transpose().map_err(AppError::from)
    }

    async fn list_by_project(&self, project_id: Uuid) -> AppResult<Vec<Donor>> {
        let models = DonorEntity::find()
            .filter(donor::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models
            .into_iter()
            .map(|model| Donor::try_from(model).map_err(AppError::from))
            .collect()
    }

    async fn create(&self, registration: RegisterDonor) -> AppResult<Donor> {
        let active_model = ActiveModel {
            user_id: Set(registration.user_id),
            project_id: Set(registration.project_id),
            frequency: Set(registration.frequency.as_str().to_string()),
            reminder_date: Set(registration.reminder_date),
            last_contribution: Set(None),
            next_contribution: Set(registration.next_contribution),
            note: Set(registration.note),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Donor::try_from(model).map_err(AppError::from)
    }

    async fn save(&self, donor: Donor) -> AppResult<Donor> {
        let existing = DonorEntity::find_by_id((donor.user_id, donor.project_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Donor"))?;

        let mut active: ActiveModel = existing.into();
        active.frequency = Set(donor.frequency.as_str().to_string());
        active.reminder_date = Set(donor.reminder_date);
        active.last_contribution = Set(donor.last_contribution);
        active.next_contribution = Set(donor.next_contribution);
        active.note = Set(donor.note);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Donor::try_from(model).map_err(AppError::from)
    }

    async fn delete(&self, user_id: Uuid, project_id: Uuid) -> AppResult<()> {
        let result = DonorEntity::delete_by_id((user_id, project_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Donor"));
        }

        Ok(())
    }
}
