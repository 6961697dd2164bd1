//! Staff associations and the per-project privilege lifecycle.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Action, Actor, AssignEmployee, Employee, PrivilegeState, UpdateEmployee};

use super::authorization::AccessControl;
use crate::repository::{EmployeeRepository, ProjectRepository, UserRepository};

/// Employee service trait for dependency injection.
#[async_trait]
pub trait EmployeeService: Send + Sync {
    /// Assign a user to a project as staff
    async fn assign_employee(&self, actor: &Actor, cmd: AssignEmployee) -> AppResult<Employee>;

    /// Update function and note
    async fn update_employee(
        &self,
        actor: &Actor,
        user_id: Uuid,
        project_id: Uuid,
        cmd: UpdateEmployee,
    ) -> AppResult<Employee>;

    /// End the assignment; the association returns to `NotEmployee`
    async fn remove_employee(&self, actor: &Actor, user_id: Uuid, project_id: Uuid)
        -> AppResult<()>;

    /// `NoPrivilege -> Privileged`, idempotent
    async fn grant_privilege(
        &self,
        actor: &Actor,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AppResult<PrivilegeState>;

    /// `Privileged -> NoPrivilege`, idempotent
    async fn revoke_privilege(
        &self,
        actor: &Actor,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AppResult<PrivilegeState>;

    /// Current privilege state of (user, project)
    async fn privilege_state(
        &self,
        actor: &Actor,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AppResult<PrivilegeState>;

    /// Staff of a project
    async fn list_employees(&self, actor: &Actor, project_id: Uuid) -> AppResult<Vec<Employee>>;
}

/// Concrete implementation of EmployeeService
pub struct EmployeeManager {
    employees: Arc<dyn EmployeeRepository>,
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn ProjectRepository>,
    access: Arc<AccessControl>,
}

impl EmployeeManager {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
        access: Arc<AccessControl>,
    ) -> Self {
        Self {
            employees,
            users,
            projects,
            access,
        }
    }

    async fn current_state(&self, user_id: Uuid, project_id: Uuid) -> AppResult<PrivilegeState> {
        let association = self.employees.find(user_id, project_id).await?;
        Ok(PrivilegeState::of(association.as_ref()))
    }

    /// Persist `next` only when it differs from `current`
    async fn transition(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        current: PrivilegeState,
        next: PrivilegeState,
    ) -> AppResult<PrivilegeState> {
        if next != current {
            self.employees
                .set_privileges(user_id, project_id, next.is_privileged())
                .await?;
            info!(
                user_id = %user_id,
                project_id = %project_id,
                from = ?current,
                to = ?next,
                "Employee privilege changed"
            );
        }
        Ok(next)
    }
}

#[async_trait]
impl EmployeeService for EmployeeManager {
    async fn assign_employee(&self, actor: &Actor, cmd: AssignEmployee) -> AppResult<Employee> {
        self.access
            .authorize(actor, Action::ManageStaff, Some(cmd.project_id))
            .await?;
        if cmd.privileges {
            self.access
                .authorize(actor, Action::ManagePrivileges, Some(cmd.project_id))
                .await?;
        }

        self.users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_not_found("User")?;
        self.projects
            .find_by_id(cmd.project_id)
            .await?
            .ok_or_not_found("Project")?;
        if self.employees.find(cmd.user_id, cmd.project_id).await?.is_some() {
            return Err(AppError::conflict("Employee"));
        }

        let employee = self.employees.create(cmd).await?;
        info!(
            user_id = %employee.user_id,
            project_id = %employee.project_id,
            actor_id = %actor.id,
            "Employee assigned"
        );
        Ok(employee)
    }

    async fn update_employee(
        &self,
        actor: &Actor,
        user_id: Uuid,
        project_id: Uuid,
        cmd: UpdateEmployee,
    ) -> AppResult<Employee> {
        self.access
            .authorize(actor, Action::ManageStaff, Some(project_id))
            .await?;
        self.employees.update(user_id, project_id, cmd).await
    }

    async fn remove_employee(
        &self,
        actor: &Actor,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AppResult<()> {
        self.access
            .authorize(actor, Action::ManageStaff, Some(project_id))
            .await?;

        self.employees.delete(user_id, project_id).await?;
        info!(user_id = %user_id, project_id = %project_id, actor_id = %actor.id, "Employee removed");
        Ok(())
    }

    async fn grant_privilege(
        &self,
        actor: &Actor,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AppResult<PrivilegeState> {
        self.access
            .authorize(actor, Action::ManagePrivileges, Some(project_id))
            .await?;

        let current = self.current_state(user_id, project_id).await?;
        let next = current.grant()?;
        self.transition(user_id, project_id, current, next).await
    }

    async fn revoke_privilege(
        &self,
        actor: &Actor,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AppResult<PrivilegeState> {
        self.access
            .authorize(actor, Action::ManagePrivileges, Some(project_id))
            .await?;

        let current = self.current_state(user_id, project_id).await?;
        let next = current.revoke()?;
        self.transition(user_id, project_id, current, next).await
    }

    async fn privilege_state(
        &self,
        actor: &Actor,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AppResult<PrivilegeState> {
        self.access
            .authorize_self_or(actor, user_id, Action::ManageStaff, Some(project_id))
            .await?;
        self.current_state(user_id, project_id).await
    }

    async fn list_employees(&self, actor: &Actor, project_id: Uuid) -> AppResult<Vec<Employee>> {
        self.access
            .authorize(actor, Action::ManageStaff, Some(project_id))
            .await?;
        self.employees.list_by_project(project_id).await
    }
}
