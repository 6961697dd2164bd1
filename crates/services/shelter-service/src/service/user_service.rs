//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    ensure_super_admin_capacity, Action, Actor, CreateUser, NewUser, Role, RoleSet, UpdateUser,
    User, UserChanges,
};

use super::address_service::AddressService;
use super::auth_service::PasswordHasher;
use super::authorization::AccessControl;
use super::validate_command;
use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Public self-registration; only VOLUNTEER, DONOR and ADOPTER may be
    /// requested, DONOR when none is given.
    async fn register(&self, cmd: CreateUser) -> AppResult<User>;

    /// Administrative creation with any role set
    async fn create_user(&self, actor: &Actor, cmd: CreateUser) -> AppResult<User>;

    /// Create a SUPER_ADMIN without an acting user (CLI bootstrap)
    async fn bootstrap_super_admin(&self, cmd: CreateUser) -> AppResult<User>;

    /// Get user by ID; anonymous donors included
    async fn get_user(&self, actor: &Actor, id: Uuid) -> AppResult<User>;

    /// List users, excluding anonymous donors
    async fn list_users(&self, actor: &Actor) -> AppResult<Vec<User>>;

    /// Update profile fields
    async fn update_user(&self, actor: &Actor, id: Uuid, cmd: UpdateUser) -> AppResult<User>;

    /// Add a role to a user (idempotent)
    async fn grant_role(&self, actor: &Actor, id: Uuid, role: Role) -> AppResult<User>;

    /// Remove a role from a user (idempotent; the last role stays)
    async fn revoke_role(&self, actor: &Actor, id: Uuid, role: Role) -> AppResult<User>;

    /// Replace a user's password
    async fn set_password(&self, actor: &Actor, id: Uuid, password: &str) -> AppResult<()>;

    /// Permanently delete a user
    async fn delete_user(&self, actor: &Actor, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    addresses: Arc<dyn AddressService>,
    hasher: Arc<dyn PasswordHasher>,
    access: Arc<AccessControl>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(
        users: Arc<dyn UserRepository>,
        addresses: Arc<dyn AddressService>,
        hasher: Arc<dyn PasswordHasher>,
        access: Arc<AccessControl>,
    ) -> Self {
        Self {
            users,
            addresses,
            hasher,
            access,
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found("User")
    }

    /// Changing another SUPER_ADMIN's account needs SUPER_ADMIN clearance
    async fn authorize_super_admin_target(&self, actor: &Actor, target: &User) -> AppResult<()> {
        if actor.is_self(target.id) || !target.is_super_admin() {
            return Ok(());
        }
        self.access
            .authorize(actor, Action::ManageSuperAdmins, None)
            .await
    }

    async fn ensure_unique(&self, email: &str, national_id: Option<&str>) -> AppResult<()> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }
        if let Some(national_id) = national_id {
            if self.users.find_by_national_id(national_id).await?.is_some() {
                return Err(AppError::conflict("National id"));
            }
        }
        Ok(())
    }

    async fn insert(&self, cmd: CreateUser, roles: RoleSet) -> AppResult<User> {
        validate_command(&cmd)?;
        self.ensure_unique(&cmd.email, cmd.national_id.as_deref()).await?;

        if roles.contains(Role::SuperAdmin) {
            ensure_super_admin_capacity(self.users.count_super_admins().await?)?;
        }

        let password_hash = self.hasher.hash(&cmd.password)?;
        let address_id = self.addresses.upsert_address(None, cmd.address.as_ref()).await?;

        let user = self
            .users
            .create(NewUser {
                name: cmd.name,
                email: cmd.email,
                national_id: cmd.national_id,
                phone: cmd.phone,
                photo_url: cmd.photo_url,
                roles,
                address_id,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, roles = ?user.roles.tokens(), "User created");
        Ok(user)
    }

    async fn authorize_role_change(&self, actor: &Actor, role: Role) -> AppResult<()> {
        self.access.authorize(actor, Action::ManageRoles, None).await?;
        if role == Role::SuperAdmin {
            self.access
                .authorize(actor, Action::ManageSuperAdmins, None)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn register(&self, cmd: CreateUser) -> AppResult<User> {
        if let Some(role) = cmd.roles.iter().find(|role| !role.is_self_service()) {
            return Err(AppError::forbidden(format!(
                "role {} cannot be self-assigned",
                role
            )));
        }

        let roles = if cmd.roles.is_empty() {
            RoleSet::single(Role::Donor)
        } else {
            RoleSet::new(cmd.roles.iter().copied())?
        };

        self.insert(cmd, roles).await
    }

    async fn create_user(&self, actor: &Actor, cmd: CreateUser) -> AppResult<User> {
        self.access.authorize(actor, Action::ManageUsers, None).await?;

        let roles = RoleSet::new(cmd.roles.iter().copied())?;
        if roles.contains(Role::SuperAdmin) {
            self.access
                .authorize(actor, Action::ManageSuperAdmins, None)
                .await?;
        }

        self.insert(cmd, roles).await
    }

    async fn bootstrap_super_admin(&self, cmd: CreateUser) -> AppResult<User> {
        self.insert(cmd, RoleSet::single(Role::SuperAdmin)).await
    }

    async fn get_user(&self, actor: &Actor, id: Uuid) -> AppResult<User> {
        self.access
            .authorize_self_or(actor, id, Action::ManageUsers, None)
            .await?;
        self.find(id).await
    }

    async fn list_users(&self, actor: &Actor) -> AppResult<Vec<User>> {
        self.access.authorize(actor, Action::ManageUsers, None).await?;

        let users = self.users.list().await?;
        Ok(users
            .into_iter()
            .filter(|user| !user.is_anonymous_donor())
            .collect())
    }

    async fn update_user(&self, actor: &Actor, id: Uuid, cmd: UpdateUser) -> AppResult<User> {
        validate_command(&cmd)?;
        self.access
            .authorize_self_or(actor, id, Action::ManageUsers, None)
            .await?;
        if cmd.active.is_some() {
            self.access.authorize(actor, Action::ManageUsers, None).await?;
        }

        let user = self.find(id).await?;
        self.authorize_super_admin_target(actor, &user).await?;

        if let Some(email) = cmd.email.as_deref().filter(|email| *email != user.email) {
            if self.users.find_by_email(email).await?.is_some() {
                return Err(AppError::conflict("Email"));
            }
        }
        if let Some(national_id) = cmd
            .national_id
            .as_deref()
            .filter(|nid| Some(*nid) != user.national_id.as_deref())
        {
            if self.users.find_by_national_id(national_id).await?.is_some() {
                return Err(AppError::conflict("National id"));
            }
        }

        let address_id = self
            .addresses
            .upsert_address(user.address_id, cmd.address.as_ref())
            .await?;

        let changes = UserChanges {
            name: cmd.name,
            email: cmd.email,
            national_id: cmd.national_id,
            phone: cmd.phone,
            photo_url: cmd.photo_url,
            active: cmd.active,
            address_id: address_id.filter(|id| Some(*id) != user.address_id),
        };

        let updated = self.users.update(id, changes).await?;
        info!(user_id = %id, actor_id = %actor.id, "User updated");
        Ok(updated)
    }

    async fn grant_role(&self, actor: &Actor, id: Uuid, role: Role) -> AppResult<User> {
        self.authorize_role_change(actor, role).await?;

        let user = self.find(id).await?;
        if user.has_role(role) {
            return Ok(user);
        }

        if role == Role::SuperAdmin {
            ensure_super_admin_capacity(self.users.count_super_admins().await?)?;
        }

        let promoted = user.with_role(role);
        let saved = self.users.set_roles(id, promoted.roles).await?;
        info!(user_id = %id, actor_id = %actor.id, role = %role, "Role granted");
        Ok(saved)
    }

    async fn revoke_role(&self, actor: &Actor, id: Uuid, role: Role) -> AppResult<User> {
        self.authorize_role_change(actor, role).await?;

        let user = self.find(id).await?;
        if !user.has_role(role) {
            return Ok(user);
        }

        let demoted = user.without_role(role)?;
        let saved = self.users.set_roles(id, demoted.roles).await?;
        info!(user_id = %id, actor_id = %actor.id, role = %role, "Role revoked");
        Ok(saved)
    }

    async fn set_password(&self, actor: &Actor, id: Uuid, password: &str) -> AppResult<()> {
        self.access
            .authorize_self_or(actor, id, Action::ManageUsers, None)
            .await?;
        if !actor.is_self(id) {
            let user = self.find(id).await?;
            self.authorize_super_admin_target(actor, &user).await?;
        }

        let password_hash = self.hasher.hash(password)?;
        self.users.set_password(id, password_hash).await?;
        info!(user_id = %id, actor_id = %actor.id, "Password changed");
        Ok(())
    }

    async fn delete_user(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        self.access.authorize(actor, Action::ManageUsers, None).await?;

        let user = self.find(id).await?;
        self.authorize_super_admin_target(actor, &user).await?;

        self.users.delete(id).await?;
        info!(user_id = %id, actor_id = %actor.id, "User deleted");
        Ok(())
    }
}
