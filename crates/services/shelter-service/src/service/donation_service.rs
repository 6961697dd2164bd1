//! Donations, including the anonymous-donor path.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use common::{AppResult, OptionExt};
use domain::{
    Action, Actor, CreateDonation, Donation, DonationRecord, DonationShape, NewUser, Role,
    UpdateDonation, User, ANONYMOUS_NATIONAL_ID,
};

use super::auth_service::PasswordHasher;
use super::authorization::AccessControl;
use crate::repository::{DonationRepository, ProjectRepository, UserRepository};

/// Donation service trait for dependency injection.
#[async_trait]
pub trait DonationService: Send + Sync {
    /// Record a donation; with `anonymous` set it is attributed to the
    /// synthetic anonymous donor.
    async fn create_donation(&self, actor: &Actor, cmd: CreateDonation) -> AppResult<Donation>;

    /// Merge changes and re-apply the aid-type field rules
    async fn update_donation(
        &self,
        actor: &Actor,
        id: Uuid,
        cmd: UpdateDonation,
    ) -> AppResult<Donation>;

    async fn get_donation(&self, actor: &Actor, id: Uuid) -> AppResult<Donation>;

    async fn list_project_donations(
        &self,
        actor: &Actor,
        project_id: Uuid,
    ) -> AppResult<Vec<Donation>>;

    /// Donations of one donor across projects, newest first
    async fn list_donor_donations(&self, actor: &Actor, donor_id: Uuid)
        -> AppResult<Vec<Donation>>;

    async fn delete_donation(&self, actor: &Actor, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of DonationService
pub struct DonationManager {
    donations: Arc<dyn DonationRepository>,
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn ProjectRepository>,
    hasher: Arc<dyn PasswordHasher>,
    access: Arc<AccessControl>,
}

impl DonationManager {
    pub fn new(
        donations: Arc<dyn DonationRepository>,
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
        hasher: Arc<dyn PasswordHasher>,
        access: Arc<AccessControl>,
    ) -> Self {
        Self {
            donations,
            users,
            projects,
            hasher,
            access,
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<Donation> {
        self.donations.find_by_id(id).await?.ok_or_not_found("Donation")
    }

    /// Reuse the existing anonymous donor or create one.
    async fn anonymous_donor(&self) -> AppResult<User> {
        let existing = self
            .users
            .find_by_national_id(ANONYMOUS_NATIONAL_ID)
            .await?
            .filter(User::is_anonymous_donor);
        if let Some(user) = existing {
            return Ok(user);
        }

        let user = self
            .users
            .create(NewUser::anonymous_donor(self.hasher.unusable_hash()?))
            .await?;
        info!(user_id = %user.id, "Anonymous donor created");
        Ok(user)
    }

    /// Check the actor may record this donation and return the donor id
    /// it names; `None` for an anonymous donation.
    async fn authorize_create(
        &self,
        actor: &Actor,
        cmd: &CreateDonation,
    ) -> AppResult<Option<Uuid>> {
        if cmd.anonymous {
            self.access
                .authorize(actor, Action::ManageDonations, Some(cmd.project_id))
                .await?;
            return Ok(None);
        }

        let donor_id = cmd.donor_id.unwrap_or(actor.id);
        let own_donation = actor.is_self(donor_id) && actor.roles.contains(Role::Donor);
        if !own_donation {
            self.access
                .authorize(actor, Action::ManageDonations, Some(cmd.project_id))
                .await?;
        }
        Ok(Some(donor_id))
    }

    /// Resolve the donor a new donation is attributed to.
    async fn resolve_donor(&self, donor_id: Option<Uuid>) -> AppResult<Uuid> {
        let Some(donor_id) = donor_id else {
            return Ok(self.anonymous_donor().await?.id);
        };

        self.users
            .find_by_id(donor_id)
            .await?
            .ok_or_not_found("Donor")?;
        Ok(donor_id)
    }
}

#[async_trait]
impl DonationService for DonationManager {
    async fn create_donation(&self, actor: &Actor, cmd: CreateDonation) -> AppResult<Donation> {
        let named_donor = self.authorize_create(actor, &cmd).await?;

        self.projects
            .find_by_id(cmd.project_id)
            .await?
            .ok_or_not_found("Project")?;

        let donor_id = self.resolve_donor(named_donor).await?;
        let shape = DonationShape::resolve(
            cmd.aid_type,
            cmd.payment_method,
            cmd.amount,
            cmd.items_description,
        )?;
        debug!(aid_type = shape.aid_type.as_stored(), "Donation shape resolved");

        let donation = self
            .donations
            .create(DonationRecord {
                donor_id,
                project_id: cmd.project_id,
                shape,
                date: cmd.date,
                note: cmd.note,
            })
            .await?;

        info!(
            donation_id = %donation.id,
            donor_id = %donation.donor_id,
            project_id = %donation.project_id,
            "Donation recorded"
        );
        Ok(donation)
    }

    async fn update_donation(
        &self,
        actor: &Actor,
        id: Uuid,
        cmd: UpdateDonation,
    ) -> AppResult<Donation> {
        let donation = self.find(id).await?;
        self.access
            .authorize(actor, Action::ManageDonations, Some(donation.project_id))
            .await?;

        let record = donation.merge(cmd)?;
        let updated = self.donations.update(id, record).await?;
        info!(donation_id = %id, actor_id = %actor.id, "Donation updated");
        Ok(updated)
    }

    async fn get_donation(&self, actor: &Actor, id: Uuid) -> AppResult<Donation> {
        let donation = self.find(id).await?;
        self.access
            .authorize_self_or(
                actor,
                donation.donor_id,
                Action::ManageDonations,
                Some(donation.project_id),
            )
            .await?;
        Ok(donation)
    }

    async fn list_project_donations(
        &self,
        actor: &Actor,
        project_id: Uuid,
    ) -> AppResult<Vec<Donation>> {
        self.access
            .authorize(actor, Action::ManageDonations, Some(project_id))
            .await?;
        self.donations.list_by_project(project_id).await
    }

    async fn list_donor_donations(
        &self,
        actor: &Actor,
        donor_id: Uuid,
    ) -> AppResult<Vec<Donation>> {
        self.access
            .authorize_self_or(actor, donor_id, Action::ManageDonations, None)
            .await?;
        self.donations.list_by_donor(donor_id).await
    }

    async fn delete_donation(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let donation = self.find(id).await?;
        self.access
            .authorize(actor, Action::ManageDonations, Some(donation.project_id))
            .await?;

        self.donations.delete(id).await?;
        info!(donation_id = %id, actor_id = %actor.id, "Donation deleted");
        Ok(())
    }
}
