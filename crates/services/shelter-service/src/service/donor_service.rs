//! Donor associations between users and projects.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Action, Actor, Donor, RegisterDonor, UpdateDonor};

use super::authorization::AccessControl;
use crate::repository::{DonorRepository, ProjectRepository, UserRepository};

/// Donor service trait for dependency injection.
#[async_trait]
pub trait DonorService: Send + Sync {
    /// Register a user as donor of a project
    async fn register_donor(&self, actor: &Actor, cmd: RegisterDonor) -> AppResult<Donor>;

    /// Update frequency, reminder dates and note
    async fn update_donor(
        &self,
        actor: &Actor,
        user_id: Uuid,
        project_id: Uuid,
        cmd: UpdateDonor,
    ) -> AppResult<Donor>;

    /// Remove the donor association
    async fn remove_donor(&self, actor: &Actor, user_id: Uuid, project_id: Uuid) -> AppResult<()>;

    /// Donors of a project
    async fn list_project_donors(&self, actor: &Actor, project_id: Uuid) -> AppResult<Vec<Donor>>;
}

/// Concrete implementation of DonorService
pub struct DonorManager {
    donors: Arc<dyn DonorRepository>,
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn ProjectRepository>,
    access: Arc<AccessControl>,
}

impl DonorManager {
    pub fn new(
        donors: Arc<dyn DonorRepository>,
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
        access: Arc<AccessControl>,
    ) -> Self {
        Self {
            donors,
            users,
            projects,
            access,
        }
    }
}

#[async_trait]
impl DonorService for DonorManager {
    async fn register_donor(&self, actor: &Actor, cmd: RegisterDonor) -> AppResult<Donor> {
        self.access
            .authorize_self_or(actor, cmd.user_id, Action::ManageDonors, Some(cmd.project_id))
            .await?;

        self.users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_not_found("User")?;
        self.projects
            .find_by_id(cmd.project_id)
            .await?
            .ok_or_not_found("Project")?;
        if self.donors.find(cmd.user_id, cmd.project_id).await?.is_some() {
            return Err(AppError::conflict("Donor"));
        }

        let donor = self.donors.create(cmd).await?;
        info!(
            user_id = %donor.user_id,
            project_id = %donor.project_id,
            frequency = donor.frequency.as_str(),
            "Donor registered"
        );
        Ok(donor)
    }

    async fn update_donor(
        &self,
        actor: &Actor,
        user_id: Uuid,
        project_id: Uuid,
        cmd: UpdateDonor,
    ) -> AppResult<Donor> {
        self.access
            .authorize_self_or(actor, user_id, Action::ManageDonors, Some(project_id))
            .await?;

        let donor = self
            .donors
            .find(user_id, project_id)
            .await?
            .ok_or_not_found("Donor")?;
        self.donors.save(donor.apply(cmd)).await
    }

    async fn remove_donor(&self, actor: &Actor, user_id: Uuid, project_id: Uuid) -> AppResult<()> {
        self.access
            .authorize(actor, Action::ManageDonors, Some(project_id))
            .await?;

        self.donors.delete(user_id, project_id).await?;
        info!(user_id = %user_id, project_id = %project_id, actor_id = %actor.id, "Donor removed");
        Ok(())
    }

    async fn list_project_donors(&self, actor: &Actor, project_id: Uuid) -> AppResult<Vec<Donor>> {
        self.access
            .authorize(actor, Action::ManageDonors, Some(project_id))
            .await?;
        self.donors.list_by_project(project_id).await
    }
}
