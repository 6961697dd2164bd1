//! Adoptions and follow-up records.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use common::{AppResult, OptionExt};
use domain::{
    Action, Actor, Adoption, AdoptionUpdate, CreateAdoption, NewAdoptionUpdate,
    RecordAdoptionUpdate,
};

use super::authorization::AccessControl;
use crate::repository::{AdoptionRepository, ProjectRepository, UserRepository};

/// Adoption service trait for dependency injection.
#[async_trait]
pub trait AdoptionService: Send + Sync {
    async fn create_adoption(&self, actor: &Actor, cmd: CreateAdoption) -> AppResult<Adoption>;

    /// Readable by the adopter or project staff
    async fn get_adoption(&self, actor: &Actor, id: Uuid) -> AppResult<Adoption>;

    /// Append a follow-up; the actor is recorded as responsible
    async fn record_adoption_update(
        &self,
        actor: &Actor,
        adoption_id: Uuid,
        cmd: RecordAdoptionUpdate,
    ) -> AppResult<AdoptionUpdate>;

    /// Follow-ups in recording order
    async fn list_adoption_updates(
        &self,
        actor: &Actor,
        adoption_id: Uuid,
    ) -> AppResult<Vec<AdoptionUpdate>>;
}

/// Concrete implementation of AdoptionService
pub struct AdoptionManager {
    adoptions: Arc<dyn AdoptionRepository>,
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn ProjectRepository>,
    access: Arc<AccessControl>,
}

impl AdoptionManager {
    pub fn new(
        adoptions: Arc<dyn AdoptionRepository>,
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
        access: Arc<AccessControl>,
    ) -> Self {
        Self {
            adoptions,
            users,
            projects,
            access,
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<Adoption> {
        self.adoptions.find_by_id(id).await?.ok_or_not_found("Adoption")
    }
}

#[async_trait]
impl AdoptionService for AdoptionManager {
    async fn create_adoption(&self, actor: &Actor, cmd: CreateAdoption) -> AppResult<Adoption> {
        self.access
            .authorize(actor, Action::ManageAdoptions, Some(cmd.project_id))
            .await?;

        self.projects
            .find_by_id(cmd.project_id)
            .await?
            .ok_or_not_found("Project")?;
        self.users
            .find_by_id(cmd.adopter_id)
            .await?
            .ok_or_not_found("Adopter")?;

        let adoption = self.adoptions.create(cmd).await?;
        info!(
            adoption_id = %adoption.id,
            project_id = %adoption.project_id,
            adopter_id = %adoption.adopter_id,
            "Adoption recorded"
        );
        Ok(adoption)
    }

    async fn get_adoption(&self, actor: &Actor, id: Uuid) -> AppResult<Adoption> {
        let adoption = self.find(id).await?;
        self.access
            .authorize_self_or(
                actor,
                adoption.adopter_id,
                Action::ManageAdoptions,
                Some(adoption.project_id),
            )
            .await?;
        Ok(adoption)
    }

    async fn record_adoption_update(
        &self,
        actor: &Actor,
        adoption_id: Uuid,
        cmd: RecordAdoptionUpdate,
    ) -> AppResult<AdoptionUpdate> {
        let adoption = self.find(adoption_id).await?;
        self.access
            .authorize(actor, Action::RecordAdoptionUpdate, Some(adoption.project_id))
            .await?;

        let update = self
            .adoptions
            .record_update(NewAdoptionUpdate {
                adoption_id,
                responsible_id: actor.id,
                status: cmd.status,
                next_date: cmd.next_date,
                note: cmd.note,
            })
            .await?;

        info!(
            adoption_id = %adoption_id,
            responsible_id = %actor.id,
            status = update.status.as_str(),
            "Adoption follow-up recorded"
        );
        Ok(update)
    }

    async fn list_adoption_updates(
        &self,
        actor: &Actor,
        adoption_id: Uuid,
    ) -> AppResult<Vec<AdoptionUpdate>> {
        let adoption = self.find(adoption_id).await?;
        self.access
            .authorize_self_or(
                actor,
                adoption.adopter_id,
                Action::ManageAdoptions,
                Some(adoption.project_id),
            )
            .await?;
        self.adoptions.list_updates(adoption_id).await
    }
}
