//! Roles and role sets.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_SUPER_ADMINS, ROLE_ADMINISTRATOR, ROLE_ADOPTER, ROLE_DONOR, ROLE_EMPLOYEE,
    ROLE_SUPER_ADMIN, ROLE_VOLUNTEER,
};
use crate::error::{DomainError, DomainResult};

/// Closed set of roles a user account may hold.
///
/// Variants are declared from highest to lowest precedence, so the derived
/// ordering doubles as the precedence relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Administrator,
    Employee,
    Volunteer,
    Donor,
    Adopter,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::Administrator,
        Role::Employee,
        Role::Volunteer,
        Role::Donor,
        Role::Adopter,
    ];

    /// Persisted token for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => ROLE_SUPER_ADMIN,
            Role::Administrator => ROLE_ADMINISTRATOR,
            Role::Employee => ROLE_EMPLOYEE,
            Role::Volunteer => ROLE_VOLUNTEER,
            Role::Donor => ROLE_DONOR,
            Role::Adopter => ROLE_ADOPTER,
        }
    }

    /// Roles anyone may pick for themselves when registering
    pub fn is_self_service(&self) -> bool {
        matches!(self, Role::Volunteer | Role::Donor | Role::Adopter)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_SUPER_ADMIN => Ok(Role::SuperAdmin),
            ROLE_ADMINISTRATOR => Ok(Role::Administrator),
            ROLE_EMPLOYEE => Ok(Role::Employee),
            ROLE_VOLUNTEER => Ok(Role::Volunteer),
            ROLE_DONOR => Ok(Role::Donor),
            ROLE_ADOPTER => Ok(Role::Adopter),
            other => Err(DomainError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable, non-empty set of roles held by a user.
///
/// Membership is what matters: authorization checks ask `contains`, never
/// for exclusivity. Mutations return a new set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// Build a role set, rejecting an empty one
    pub fn new(roles: impl IntoIterator<Item = Role>) -> DomainResult<Self> {
        let set: BTreeSet<Role> = roles.into_iter().collect();
        if set.is_empty() {
            return Err(DomainError::validation("A user must hold at least one role"));
        }
        Ok(Self(set))
    }

    /// Set holding exactly one role
    pub fn single(role: Role) -> Self {
        Self(BTreeSet::from([role]))
    }

    /// Parse persisted role tokens
    pub fn parse<'a>(tokens: impl IntoIterator<Item = &'a str>) -> DomainResult<Self> {
        let roles = tokens
            .into_iter()
            .map(Role::from_str)
            .collect::<DomainResult<Vec<_>>>()?;
        Self::new(roles)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn contains_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.0.contains(role))
    }

    /// New set with `role` added
    pub fn with(&self, role: Role) -> Self {
        let mut set = self.0.clone();
        set.insert(role);
        Self(set)
    }

    /// New set with `role` removed; removing the last role is rejected
    pub fn without(&self, role: Role) -> DomainResult<Self> {
        let mut set = self.0.clone();
        set.remove(&role);
        Self::new(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Persisted tokens in precedence order
    pub fn tokens(&self) -> Vec<String> {
        self.iter().map(|role| role.as_str().to_string()).collect()
    }
}

impl TryFrom<Vec<Role>> for RoleSet {
    type Error = DomainError;

    fn try_from(roles: Vec<Role>) -> Result<Self, Self::Error> {
        RoleSet::new(roles)
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.0.into_iter().collect()
    }
}

/// Check the system-wide SUPER_ADMIN ceiling before adding one more holder.
///
/// `existing` counts the other accounts already holding the role.
pub fn ensure_super_admin_capacity(existing: u64) -> DomainResult<()> {
    if existing >= MAX_SUPER_ADMINS {
        return Err(DomainError::validation(format!(
            "Maximum of {} SUPER_ADMIN accounts reached",
            MAX_SUPER_ADMINS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_follows_declaration_order() {
        assert!(Role::SuperAdmin < Role::Administrator);
        assert!(Role::Administrator < Role::Employee);
        assert!(Role::Volunteer < Role::Donor);
    }

    #[test]
    fn test_role_tokens_parse_back() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("ADMIN".parse::<Role>().is_err());
    }

    #[test]
    fn test_empty_role_set_rejected() {
        assert!(RoleSet::new(Vec::new()).is_err());
    }

    #[test]
    fn test_with_and_without_return_new_sets() {
        let donor = RoleSet::single(Role::Donor);
        let both = donor.with(Role::Volunteer);

        assert!(!donor.contains(Role::Volunteer));
        assert!(both.contains(Role::Volunteer) && both.contains(Role::Donor));

        let back = both.without(Role::Volunteer).unwrap();
        assert_eq!(back, donor);
        assert!(donor.without(Role::Donor).is_err());
    }

    #[test]
    fn test_role_set_serde_rejects_empty() {
        let parsed: RoleSet = serde_json::from_str(r#"["DONOR","SUPER_ADMIN"]"#).unwrap();
        assert_eq!(parsed.tokens(), vec!["SUPER_ADMIN", "DONOR"]);
        assert!(serde_json::from_str::<RoleSet>("[]").is_err());
    }

    #[test]
    fn test_super_admin_capacity() {
        assert!(ensure_super_admin_capacity(0).is_ok());
        assert!(ensure_super_admin_capacity(1).is_ok());
        assert!(matches!(
            ensure_super_admin_capacity(2),
            Err(DomainError::Validation(_))
        ));
    }
}
