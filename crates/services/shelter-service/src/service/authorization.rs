//! Authorization gate shared by every service.
//!
//! Resolves the per-project privilege flag through the employee repository
//! and hands the decision to the pure policy in `domain::policy`.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::policy::{self, needs_privilege_lookup, Decision};
use domain::{Action, Actor, PrivilegeLookup};

use crate::repository::EmployeeRepository;

/// Policy enforcement point backed by the employee associations.
pub struct AccessControl {
    employees: Arc<dyn EmployeeRepository>,
}

impl AccessControl {
    pub fn new(employees: Arc<dyn EmployeeRepository>) -> Self {
        Self { employees }
    }

    /// Look up whether `user_id` is a privileged employee of `project_id`.
    ///
    /// Lookup failures are reported as `Unknown`, never as errors.
    pub async fn privilege_for(&self, user_id: Uuid, project_id: Uuid) -> PrivilegeLookup {
        match self.employees.find(user_id, project_id).await {
            Ok(Some(employee)) if employee.privileges => PrivilegeLookup::Privileged,
            Ok(_) => PrivilegeLookup::NotPrivileged,
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    project_id = %project_id,
                    error = %e,
                    "Privilege lookup failed"
                );
                PrivilegeLookup::Unknown
            }
        }
    }

    /// Decide `action` for `actor`, optionally scoped to a project.
    ///
    /// Without a project, employees are never treated as privileged.
    pub async fn decide(&self, actor: &Actor, action: Action, project_id: Option<Uuid>) -> Decision {
        let lookup = match project_id {
            Some(project_id) if needs_privilege_lookup(actor, action) => {
                self.privilege_for(actor.id, project_id).await
            }
            _ => PrivilegeLookup::NotPrivileged,
        };

        policy::can_perform(actor, action, lookup)
    }

    /// Like [`AccessControl::decide`] but fails with `Forbidden` on denial.
    pub async fn authorize(
        &self,
        actor: &Actor,
        action: Action,
        project_id: Option<Uuid>,
    ) -> AppResult<()> {
        match self.decide(actor, action, project_id).await {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                debug!(actor_id = %actor.id, action = ?action, reason = %reason, "Access denied");
                Err(AppError::Forbidden(reason))
            }
        }
    }

    /// Allow when the actor is `owner_id`, otherwise fall back to `action`.
    pub async fn authorize_self_or(
        &self,
        actor: &Actor,
        owner_id: Uuid,
        action: Action,
        project_id: Option<Uuid>,
    ) -> AppResult<()> {
        if actor.is_self(owner_id) {
            return Ok(());
        }
        self.authorize(actor, action, project_id).await
    }
}
