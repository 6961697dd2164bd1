//! Address coalescing for users and projects.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::AppResult;
use domain::AddressInput;

use crate::repository::AddressRepository;

/// Address service trait for dependency injection.
#[async_trait]
pub trait AddressService: Send + Sync {
    /// Coalesce a candidate address into the owner's address reference.
    ///
    /// With all four mandatory fields present, the owner's current row is
    /// updated in place (same id) or a new row is created. Otherwise nothing
    /// is written and the current reference is returned as is.
    async fn upsert_address(
        &self,
        current: Option<Uuid>,
        candidate: Option<&AddressInput>,
    ) -> AppResult<Option<Uuid>>;
}

/// Concrete implementation of AddressService
pub struct AddressManager {
    repo: Arc<dyn AddressRepository>,
}

impl AddressManager {
    pub fn new(repo: Arc<dyn AddressRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AddressService for AddressManager {
    async fn upsert_address(
        &self,
        current: Option<Uuid>,
        candidate: Option<&AddressInput>,
    ) -> AppResult<Option<Uuid>> {
        let Some(fields) = candidate.and_then(AddressInput::resolve) else {
            return Ok(current);
        };

        let address = match current {
            Some(id) => self.repo.update(id, fields).await?,
            None => self.repo.create(fields).await?,
        };
        tracing::debug!(address_id = %address.id, "Address coalesced");

        Ok(Some(address.id))
    }
}
