//! Staff association between a user and a project, and its privilege lifecycle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Employee association keyed by (user, project)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub user_id: Uuid,
    pub project_id: Uuid,
    /// Grants the same mutation rights as an administrator inside this project
    pub privileges: bool,
    pub function: Option<String>,
    pub note: Option<String>,
}

impl Employee {
    pub fn state(&self) -> PrivilegeState {
        if self.privileges {
            PrivilegeState::Privileged
        } else {
            PrivilegeState::NoPrivilege
        }
    }
}

/// Fields for a new staff assignment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignEmployee {
    pub user_id: Uuid,
    pub project_id: Uuid,
    #[serde(default)]
    pub privileges: bool,
    pub function: Option<String>,
    pub note: Option<String>,
}

/// Editable staff fields; privileges have their own transitions
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateEmployee {
    pub function: Option<String>,
    pub note: Option<String>,
}

/// Privilege lifecycle of a user within one project.
///
/// `NotEmployee` is the implicit initial state and is terminal once an
/// association is deleted: no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeState {
    NotEmployee,
    NoPrivilege,
    Privileged,
}

impl PrivilegeState {
    pub fn of(association: Option<&Employee>) -> Self {
        association.map_or(PrivilegeState::NotEmployee, Employee::state)
    }

    /// `NoPrivilege -> Privileged`; idempotent on `Privileged`
    pub fn grant(self) -> DomainResult<Self> {
        match self {
            PrivilegeState::NotEmployee => Err(DomainError::not_found("Employee")),
            PrivilegeState::NoPrivilege | PrivilegeState::Privileged => {
                Ok(PrivilegeState::Privileged)
            }
        }
    }

    /// `Privileged -> NoPrivilege`; idempotent on `NoPrivilege`
    pub fn revoke(self) -> DomainResult<Self> {
        match self {
            PrivilegeState::NotEmployee => Err(DomainError::not_found("Employee")),
            PrivilegeState::NoPrivilege | PrivilegeState::Privileged => {
                Ok(PrivilegeState::NoPrivilege)
            }
        }
    }

    pub fn is_privileged(self) -> bool {
        self == PrivilegeState::Privileged
    }
}
