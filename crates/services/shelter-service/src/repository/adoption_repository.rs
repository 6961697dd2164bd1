//! Adoption and follow-up repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::entities::adoption::{self, Entity as AdoptionEntity};
use super::entities::adoption_update::{self, Entity as AdoptionUpdateEntity};
use common::{AppError, AppResult};
use domain::{Adoption, AdoptionUpdate, CreateAdoption, NewAdoptionUpdate};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Adoption repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdoptionRepository: Send + Sync {
    /// Find adoption by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Adoption>>;

    /// Create a new adoption
    async fn create(&self, adoption: CreateAdoption) -> AppResult<Adoption>;

    /// Append a follow-up and rewrite the adoption's last update date
    async fn record_update(&self, update: NewAdoptionUpdate) -> AppResult<AdoptionUpdate>;

    /// Follow-ups of an adoption, oldest first
    async fn list_updates(&self, adoption_id: Uuid) -> AppResult<Vec<AdoptionUpdate>>;
}

/// Concrete implementation of AdoptionRepository
pub struct AdoptionStore {
    db: DatabaseConnection,
}

impl AdoptionStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdoptionRepository for AdoptionStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Adoption>> {
        let result = AdoptionEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Adoption::from))
    }

    async fn create(&self, adoption: CreateAdoption) -> AppResult<Adoption> {
        let active_model = adoption::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(adoption.project_id),
            adopter_id: Set(adoption.adopter_id),
            animal_id: Set(adoption.animal_id),
            adoption_date: Set(adoption.adoption_date),
            last_update: Set(None),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Adoption::from(model))
    }

    async fn record_update(&self, update: NewAdoptionUpdate) -> AppResult<AdoptionUpdate> {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let adoption = match AdoptionEntity::find_by_id(update.adoption_id).one(&txn).await? {
            Some(adoption) => adoption,
            None => {
                txn.rollback().await.map_err(AppError::from)?;
                return Err(AppError::not_found("Adoption"));
            }
        };

        let now = chrono::Utc::now();
        let row = adoption_update::ActiveModel {
            id: Set(Uuid::new_v4()),
            adoption_id: Set(update.adoption_id),
            responsible_id: Set(update.responsible_id),
            status: Set(update.status.as_str().to_string()),
            next_date: Set(update.next_date),
            note: Set(update.note),
            created_at: Set(now),
        };
        let model = row.insert(&txn).await?;

        let mut active: adoption::ActiveModel = adoption.into();
        active.last_update = Set(Some(now.date_naive()));
        active.update(&txn).await?;

        txn.commit().await.map_err(AppError::from)?;

        AdoptionUpdate::try_from(model).map_err(AppError::from)
    }

    async fn list_updates(&self, adoption_id: Uuid) -> AppResult<Vec<AdoptionUpdate>> {
        let models = AdoptionUpdateEntity::find()
            .filter(adoption_update::Column::AdoptionId.eq(adoption_id))
            .order_by_asc(adoption_update::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models
            .into_iter()
            .map(|model| AdoptionUpdate::try_from(model).map_err(AppError::from))
            .collect()
    }
}
