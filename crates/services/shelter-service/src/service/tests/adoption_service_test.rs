use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    Adoption, AdoptionUpdate, FollowUpStatus, NewAdoptionUpdate, RecordAdoptionUpdate, Role,
};

use super::{actor, admin_access, employee_access};
use crate::repository::{
    MockAdoptionRepository, MockEmployeeRepository, MockProjectRepository, MockUserRepository,
};
use crate::service::{AccessControl, AdoptionManager, AdoptionService};

fn adoption(id: Uuid, project_id: Uuid, adopter_id: Uuid) -> Adoption {
    Adoption {
        id,
        project_id,
        adopter_id,
        animal_id: Uuid::new_v4(),
        adoption_date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
        last_update: None,
    }
}

fn appended(update: NewAdoptionUpdate) -> AppResult<AdoptionUpdate> {
    Ok(AdoptionUpdate {
        id: Uuid::new_v4(),
        adoption_id: update.adoption_id,
        responsible_id: update.responsible_id,
        status: update.status,
        next_date: update.next_date,
        note: update.note,
        created_at: Utc::now(),
    })
}

fn follow_up() -> RecordAdoptionUpdate {
    RecordAdoptionUpdate {
        status: FollowUpStatus::VisitScheduled,
        next_date: NaiveDate::from_ymd_opt(2024, 3, 10),
        note: Some("Visita agendada".to_string()),
    }
}

fn manager(adoptions: MockAdoptionRepository, access: Arc<AccessControl>) -> AdoptionManager {
    AdoptionManager::new(
        Arc::new(adoptions),
        Arc::new(MockUserRepository::new()),
        Arc::new(MockProjectRepository::new()),
        access,
    )
}

fn adoptions_in(project_id: Uuid, expect_append: bool) -> MockAdoptionRepository {
    let mut repo = MockAdoptionRepository::new();
    repo.expect_find_by_id()
        .returning(move |id| Ok(Some(adoption(id, project_id, Uuid::new_v4()))));
    if expect_append {
        repo.expect_record_update().times(1).returning(appended);
    } else {
        repo.expect_record_update().never();
    }
    repo
}

#[tokio::test]
async fn test_unprivileged_employee_denied_adoption_update() {
    let employee = actor(&[Role::Employee]);
    let service = manager(
        adoptions_in(Uuid::new_v4(), false),
        employee_access(employee.id, false),
    );

    let result = service
        .record_adoption_update(&employee, Uuid::new_v4(), follow_up())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_privileged_employee_records_adoption_update() {
    let employee = actor(&[Role::Employee]);
    let service = manager(
        adoptions_in(Uuid::new_v4(), true),
        employee_access(employee.id, true),
    );

    let update = service
        .record_adoption_update(&employee, Uuid::new_v4(), follow_up())
        .await
        .unwrap();

    assert_eq!(update.responsible_id, employee.id);
    assert_eq!(update.status, FollowUpStatus::VisitScheduled);
}

#[tokio::test]
async fn test_privilege_lookup_failure_denies() {
    let employee = actor(&[Role::Employee]);

    let mut employees = MockEmployeeRepository::new();
    employees
        .expect_find()
        .returning(|_, _| Err(AppError::internal("connection reset")));
    let access = Arc::new(AccessControl::new(Arc::new(employees)));

    let service = manager(adoptions_in(Uuid::new_v4(), false), access);
    let result = service
        .record_adoption_update(&employee, Uuid::new_v4(), follow_up())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_volunteer_denied_adoption_update() {
    let volunteer = actor(&[Role::Volunteer]);
    let service = manager(adoptions_in(Uuid::new_v4(), false), admin_access());

    let result = service
        .record_adoption_update(&volunteer, Uuid::new_v4(), follow_up())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_adopter_lists_own_follow_ups() {
    let adopter = actor(&[Role::Adopter]);
    let adopter_id = adopter.id;

    let mut repo = MockAdoptionRepository::new();
    repo.expect_find_by_id()
        .returning(move |id| Ok(Some(adoption(id, Uuid::new_v4(), adopter_id))));
    repo.expect_list_updates().returning(|_| Ok(Vec::new()));

    let service = manager(repo, admin_access());
    let updates = service
        .list_adoption_updates(&adopter, Uuid::new_v4())
        .await
        .unwrap();

    assert!(updates.is_empty());
}

#[tokio::test]
async fn test_record_update_on_missing_adoption() {
    let mut repo = MockAdoptionRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let service = manager(repo, admin_access());
    let result = service
        .record_adoption_update(&actor(&[Role::Administrator]), Uuid::new_v4(), follow_up())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Adoption"));
}
