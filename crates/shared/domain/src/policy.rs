//! Role-based authorization policy.
//!
//! Pure decisions: the caller resolves the per-project privilege flag
//! beforehand (see [`PrivilegeLookup`]) and the policy never performs I/O.
//!
//! Precedence:
//! 1. SUPER_ADMIN may do anything.
//! 2. ADMINISTRATOR may do anything except super-admin-only actions. No
//!    membership check against the target project is made.
//! 3. EMPLOYEE may do staff-delegable actions when privileged in the target
//!    project. An unknown lookup result denies.
//! 4. VOLUNTEER, DONOR and ADOPTER are denied administrative actions; their
//!    self-service rights are coded per operation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::role::{Role, RoleSet};
use crate::user::User;

/// The user performing an operation, as established by a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub roles: RoleSet,
}

impl Actor {
    pub fn new(id: Uuid, roles: RoleSet) -> Self {
        Self { id, roles }
    }

    pub fn is_super_admin(&self) -> bool {
        self.roles.contains(Role::SuperAdmin)
    }

    /// SUPER_ADMIN or ADMINISTRATOR
    pub fn is_admin(&self) -> bool {
        self.roles.contains_any(&[Role::SuperAdmin, Role::Administrator])
    }

    pub fn is_self(&self, user_id: Uuid) -> bool {
        self.id == user_id
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.roles.clone())
    }
}

/// Who may be granted an action beyond SUPER_ADMIN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clearance {
    /// Administrators and privileged employees of the target project
    ProjectStaff,
    /// Administrators only
    Administrator,
    /// SUPER_ADMIN only
    SuperAdmin,
}

/// Operations gated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ManageStaff,
    ManageDonors,
    ManageDonations,
    ManageAdoptions,
    RecordAdoptionUpdate,
    ManageProjects,
    ManagePrivileges,
    ManageUsers,
    ManageRoles,
    ManageSuperAdmins,
}

impl Action {
    pub fn clearance(&self) -> Clearance {
        match self {
            Action::ManageStaff
            | Action::ManageDonors
            | Action::ManageDonations
            | Action::ManageAdoptions
            | Action::RecordAdoptionUpdate => Clearance::ProjectStaff,
            Action::ManageProjects
            | Action::ManagePrivileges
            | Action::ManageUsers
            | Action::ManageRoles => Clearance::Administrator,
            Action::ManageSuperAdmins => Clearance::SuperAdmin,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Action::ManageStaff => "manage project staff",
            Action::ManageDonors => "manage donors",
            Action::ManageDonations => "manage donations",
            Action::ManageAdoptions => "manage adoptions",
            Action::RecordAdoptionUpdate => "record adoption updates",
            Action::ManageProjects => "manage projects",
            Action::ManagePrivileges => "grant or revoke employee privileges",
            Action::ManageUsers => "manage users",
            Action::ManageRoles => "change user roles",
            Action::ManageSuperAdmins => "create or promote super administrators",
        }
    }
}

/// Result of looking up an employee's privilege flag for a project.
///
/// `Unknown` covers lookup failures; it is kept distinct so the caller's
/// mapping to deny is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeLookup {
    Unknown,
    Privileged,
    NotPrivileged,
}

/// Policy outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> DomainResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(DomainError::forbidden(reason)),
        }
    }
}

/// Whether deciding `action` for `actor` depends on the project privilege flag.
pub fn needs_privilege_lookup(actor: &Actor, action: Action) -> bool {
    !actor.is_admin()
        && actor.roles.contains(Role::Employee)
        && action.clearance() == Clearance::ProjectStaff
}

/// Decide whether `actor` may perform `action`.
pub fn can_perform(actor: &Actor, action: Action, privilege: PrivilegeLookup) -> Decision {
    if actor.is_super_admin() {
        return Decision::Allow;
    }

    let clearance = action.clearance();
    if clearance == Clearance::SuperAdmin {
        return Decision::Deny(format!("only SuperAdmin may {}", action.describe()));
    }

    if actor.roles.contains(Role::Administrator) {
        return Decision::Allow;
    }

    match clearance {
        Clearance::ProjectStaff => {
            if actor.roles.contains(Role::Employee) && privilege == PrivilegeLookup::Privileged {
                Decision::Allow
            } else {
                Decision::Deny(format!(
                    "only SuperAdmin, Administrator, or privileged Employee may {}",
                    action.describe()
                ))
            }
        }
        _ => Decision::Deny(format!(
            "only SuperAdmin or Administrator may {}",
            action.describe()
        )),
    }
}

/// [`can_perform`] as a result carrying the denial reason.
pub fn authorize(actor: &Actor, action: Action, privilege: PrivilegeLookup) -> DomainResult<()> {
    can_perform(actor, action, privilege).into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(roles: &[Role]) -> Actor {
        Actor::new(Uuid::new_v4(), RoleSet::new(roles.iter().copied()).unwrap())
    }

    const ALL_ACTIONS: [Action; 10] = [
        Action::ManageStaff,
        Action::ManageDonors,
        Action::ManageDonations,
        Action::ManageAdoptions,
        Action::RecordAdoptionUpdate,
        Action::ManageProjects,
        Action::ManagePrivileges,
        Action::ManageUsers,
        Action::ManageRoles,
        Action::ManageSuperAdmins,
    ];

    #[test]
    fn test_super_admin_may_do_everything() {
        let root = actor(&[Role::SuperAdmin]);
        for action in ALL_ACTIONS {
            assert!(can_perform(&root, action, PrivilegeLookup::Unknown).is_allowed());
        }
    }

    #[test]
    fn test_administrator_everything_but_super_admin_actions() {
        let admin = actor(&[Role::Administrator]);
        for action in ALL_ACTIONS {
            let allowed = can_perform(&admin, action, PrivilegeLookup::NotPrivileged).is_allowed();
            assert_eq!(allowed, action != Action::ManageSuperAdmins, "{:?}", action);
        }
    }

    #[test]
    fn test_privileged_employee_limited_to_project_staff_actions() {
        let employee = actor(&[Role::Employee]);
        assert!(can_perform(&employee, Action::RecordAdoptionUpdate, PrivilegeLookup::Privileged)
            .is_allowed());
        assert!(!can_perform(&employee, Action::ManagePrivileges, PrivilegeLookup::Privileged)
            .is_allowed());
        assert!(!can_perform(&employee, Action::ManageProjects, PrivilegeLookup::Privileged)
            .is_allowed());
    }

    #[test]
    fn test_employee_denied_without_or_with_unknown_privilege() {
        let employee = actor(&[Role::Employee]);
        for lookup in [PrivilegeLookup::NotPrivileged, PrivilegeLookup::Unknown] {
            let decision = can_perform(&employee, Action::RecordAdoptionUpdate, lookup);
            assert_eq!(
                decision,
                Decision::Deny(
                    "only SuperAdmin, Administrator, or privileged Employee may record adoption updates"
                        .into()
                )
            );
        }
    }

    #[test]
    fn test_self_service_roles_denied_administrative_actions() {
        for role in [Role::Volunteer, Role::Donor, Role::Adopter] {
            let user = actor(&[role]);
            for action in ALL_ACTIONS {
                // A privileged flag cannot leak to non-employees
                assert!(!can_perform(&user, action, PrivilegeLookup::Privileged).is_allowed());
            }
        }
    }

    #[test]
    fn test_lookup_needed_only_for_plain_employees_on_staff_actions() {
        assert!(needs_privilege_lookup(&actor(&[Role::Employee]), Action::ManageDonations));
        assert!(!needs_privilege_lookup(&actor(&[Role::Employee]), Action::ManageRoles));
        assert!(!needs_privilege_lookup(
            &actor(&[Role::Employee, Role::Administrator]),
            Action::ManageDonations
        ));
        assert!(!needs_privilege_lookup(&actor(&[Role::Donor]), Action::ManageDonations));
    }

    #[test]
    fn test_authorize_maps_deny_to_forbidden() {
        let err = authorize(&actor(&[Role::Donor]), Action::ManageUsers, PrivilegeLookup::Unknown)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::Forbidden("only SuperAdmin or Administrator may manage users".into())
        );
    }
}
