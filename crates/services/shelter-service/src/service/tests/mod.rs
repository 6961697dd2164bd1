//! Service unit tests backed by mockall repositories.

mod address_service_test;
mod adoption_service_test;
mod donation_service_test;
mod user_service_test;

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use domain::{Actor, Employee, Project, Role, RoleSet, User};

use super::AccessControl;
use crate::repository::MockEmployeeRepository;

fn create_test_user(id: Uuid, roles: &[Role]) -> User {
    User {
        id,
        name: "Maria Silva".to_string(),
        email: format!("{}@example.com", id.simple()),
        national_id: None,
        phone: None,
        photo_url: None,
        active: true,
        roles: RoleSet::new(roles.iter().copied()).unwrap(),
        address_id: None,
        password_hash: "hashed".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn create_test_project(id: Uuid) -> Project {
    Project {
        id,
        name: "Abrigo Patas".to_string(),
        description: None,
        email: None,
        phone: None,
        active: true,
        address_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn actor(roles: &[Role]) -> Actor {
    Actor::new(Uuid::new_v4(), RoleSet::new(roles.iter().copied()).unwrap())
}

/// Access control that must never consult the employee table
fn admin_access() -> Arc<AccessControl> {
    Arc::new(AccessControl::new(Arc::new(MockEmployeeRepository::new())))
}

/// Access control where `user_id` is an employee of every project
fn employee_access(user_id: Uuid, privileges: bool) -> Arc<AccessControl> {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_find().returning(move |uid, project_id| {
        Ok((uid == user_id).then(|| Employee {
            user_id: uid,
            project_id,
            privileges,
            function: None,
            note: None,
        }))
    });
    Arc::new(AccessControl::new(Arc::new(repo)))
}
