//! Address repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use super::entities::address::{ActiveModel, Entity as AddressEntity};
use common::{AppError, AppResult};
use domain::{Address, AddressFields};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Address repository trait for dependency injection.
///
/// Rows are only ever inserted or updated in place; nothing deletes them.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Find address by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Address>>;

    /// Insert a new address row
    async fn create(&self, fields: AddressFields) -> AppResult<Address>;

    /// Overwrite an existing address row, keeping its id
    async fn update(&self, id: Uuid, fields: AddressFields) -> AppResult<Address>;
}

/// Concrete implementation of AddressRepository
pub struct AddressStore {
    db: DatabaseConnection,
}

impl AddressStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AddressRepository for AddressStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Address>> {
        let result = AddressEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Address::from))
    }

    async fn create(&self, fields: AddressFields) -> AppResult<Address> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            cep: Set(fields.postal_code),
            state: Set(fields.state),
            city: Set(fields.city),
            district: Set(fields.district),
            street: Set(fields.street),
            number: Set(fields.number),
            complement: Set(fields.complement),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Address::from(model))
    }

    async fn update(&self, id: Uuid, fields: AddressFields) -> AppResult<Address> {
        let address = AddressEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Address"))?;

        let mut active: ActiveModel = address.into();
        active.cep = Set(fields.postal_code);
        active.state = Set(fields.state);
        active.city = Set(fields.city);
        active.district = Set(fields.district);
        active.street = Set(fields.street);
        active.number = Set(fields.number);
        active.complement = Set(fields.complement);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Address::from(model))
    }
}
