//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::address::AddressInput;
use crate::constants::{
    ANONYMOUS_DONOR_NAME, ANONYMOUS_EMAIL_PREFIX, ANONYMOUS_EMAIL_SUFFIX, ANONYMOUS_NATIONAL_ID,
};
use crate::error::DomainResult;
use crate::role::{Role, RoleSet};

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub active: bool,
    pub roles: RoleSet,
    pub address_id: Option<Uuid>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(Role::SuperAdmin)
    }

    /// Copy of this user holding `role` as well
    pub fn with_role(&self, role: Role) -> Self {
        Self {
            roles: self.roles.with(role),
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Copy of this user without `role`; the last role cannot be removed
    pub fn without_role(&self, role: Role) -> DomainResult<Self> {
        Ok(Self {
            roles: self.roles.without(role)?,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    /// Whether this record is a synthetic anonymous donor
    pub fn is_anonymous_donor(&self) -> bool {
        is_anonymous_donor(&self.name, &self.email, self.national_id.as_deref())
    }
}

/// Heuristic recognizing synthetic anonymous-donor records.
///
/// Any single sentinel is enough: the fixed name, an `anonimo_…@temp.com`
/// email, or the all-zero national id.
pub fn is_anonymous_donor(name: &str, email: &str, national_id: Option<&str>) -> bool {
    name == ANONYMOUS_DONOR_NAME
        || (email.starts_with(ANONYMOUS_EMAIL_PREFIX) && email.ends_with(ANONYMOUS_EMAIL_SUFFIX))
        || national_id == Some(ANONYMOUS_NATIONAL_ID)
}

/// Fields for a user about to be inserted (password already hashed)
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub roles: RoleSet,
    pub address_id: Option<Uuid>,
    pub password_hash: String,
}

impl NewUser {
    /// Synthetic anonymous donor carrying exactly the sentinel values
    pub fn anonymous_donor(password_hash: String) -> Self {
        Self {
            name: ANONYMOUS_DONOR_NAME.to_string(),
            email: format!(
                "{}{}{}",
                ANONYMOUS_EMAIL_PREFIX,
                Uuid::new_v4().simple(),
                ANONYMOUS_EMAIL_SUFFIX
            ),
            national_id: Some(ANONYMOUS_NATIONAL_ID.to_string()),
            phone: None,
            photo_url: None,
            roles: RoleSet::single(Role::Donor),
            address_id: None,
            password_hash,
        }
    }
}

/// User creation command
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    /// Display name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    /// Unique email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Plain-text password (minimum 8 characters)
    pub password: String,
    /// Unique national id (CPF)
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    /// Requested roles
    pub roles: Vec<Role>,
    /// Address candidate, coalesced into an address row when complete
    #[serde(default)]
    pub address: Option<AddressInput>,
}

/// User update command.
///
/// The updatable fields are enumerated here; anything else on a user is
/// changed through a dedicated operation (roles, password, activation).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    /// Only administrators may flip activation
    pub active: Option<bool>,
    #[serde(default)]
    pub address: Option<AddressInput>,
}

/// Column changes handed to the persistence layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub active: Option<bool>,
    pub address_id: Option<Uuid>,
}
