use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::{always, eq};
use uuid::Uuid;

use common::AppError;
use domain::{
    Address, AddressInput, CreateUser, NewUser, Role, UpdateUser, User, ANONYMOUS_DONOR_NAME,
};

use super::{actor, admin_access, create_test_user};
use crate::repository::{MockAddressRepository, MockUserRepository};
use crate::service::{AddressManager, MockPasswordHasher, UserManager, UserService};

fn stored_user(new_user: NewUser) -> User {
    User {
        id: Uuid::new_v4(),
        name: new_user.name,
        email: new_user.email,
        national_id: new_user.national_id,
        phone: new_user.phone,
        photo_url: new_user.photo_url,
        active: true,
        roles: new_user.roles,
        address_id: new_user.address_id,
        password_hash: new_user.password_hash,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn create_command(roles: Vec<Role>) -> CreateUser {
    CreateUser {
        name: "Joana Souza".to_string(),
        email: "joana@example.com".to_string(),
        password: "s3nha-forte".to_string(),
        national_id: None,
        phone: None,
        photo_url: None,
        roles,
        address: None,
    }
}

fn hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|plain| Ok(format!("hashed:{}", plain)));
    hasher
}

fn manager(users: MockUserRepository, addresses: MockAddressRepository) -> UserManager {
    UserManager::new(
        Arc::new(users),
        Arc::new(AddressManager::new(Arc::new(addresses))),
        Arc::new(hasher()),
        admin_access(),
    )
}

#[tokio::test]
async fn test_third_super_admin_rejected() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users.expect_count_super_admins().returning(|| Ok(2));
    users.expect_create().never();

    let service = manager(users, MockAddressRepository::new());
    let root = actor(&[Role::SuperAdmin]);

    let result = service
        .create_user(&root, create_command(vec![Role::SuperAdmin]))
        .await;

    match result {
        Err(AppError::Validation(msg)) => {
            assert_eq!(msg, "Maximum of 2 SUPER_ADMIN accounts reached")
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_second_super_admin_created() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users.expect_count_super_admins().returning(|| Ok(1));
    users
        .expect_create()
        .times(1)
        .returning(|new_user| Ok(stored_user(new_user)));

    let service = manager(users, MockAddressRepository::new());
    let root = actor(&[Role::SuperAdmin]);

    let user = service
        .create_user(&root, create_command(vec![Role::SuperAdmin]))
        .await
        .unwrap();

    assert!(user.is_super_admin());
    assert_eq!(user.password_hash, "hashed:s3nha-forte");
}

#[tokio::test]
async fn test_administrator_cannot_create_super_admin() {
    let service = manager(MockUserRepository::new(), MockAddressRepository::new());
    let admin = actor(&[Role::Administrator]);

    let result = service
        .create_user(&admin, create_command(vec![Role::SuperAdmin]))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_bootstrap_respects_super_admin_ceiling() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users.expect_count_super_admins().returning(|| Ok(2));

    let service = manager(users, MockAddressRepository::new());
    let result = service.bootstrap_super_admin(create_command(Vec::new())).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_register_defaults_to_donor() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_create()
        .returning(|new_user| Ok(stored_user(new_user)));

    let service = manager(users, MockAddressRepository::new());
    let user = service.register(create_command(Vec::new())).await.unwrap();

    assert_eq!(user.roles.iter().collect::<Vec<_>>(), vec![Role::Donor]);
}

#[tokio::test]
async fn test_register_rejects_staff_roles() {
    let service = manager(MockUserRepository::new(), MockAddressRepository::new());

    let result = service
        .register(create_command(vec![Role::Donor, Role::Administrator]))
        .await;

    match result {
        Err(AppError::Forbidden(reason)) => {
            assert_eq!(reason, "role ADMINISTRATOR cannot be self-assigned")
        }
        other => panic!("expected forbidden, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(|_| Ok(Some(create_test_user(Uuid::new_v4(), &[Role::Donor]))));

    let service = manager(users, MockAddressRepository::new());
    let result = service.register(create_command(Vec::new())).await;

    assert!(matches!(result, Err(AppError::Conflict(entity)) if entity == "Email"));
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let service = manager(MockUserRepository::new(), MockAddressRepository::new());
    let cmd = CreateUser {
        email: "not-an-email".to_string(),
        ..create_command(Vec::new())
    };

    let result = service.register(cmd).await;
    assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "Invalid email address"));
}

#[tokio::test]
async fn test_anonymous_donor_hidden_from_list_but_fetchable() {
    let anonymous_id = Uuid::new_v4();
    let anonymous = User {
        name: ANONYMOUS_DONOR_NAME.to_string(),
        ..create_test_user(anonymous_id, &[Role::Donor])
    };
    let regular = create_test_user(Uuid::new_v4(), &[Role::Volunteer]);

    let mut users = MockUserRepository::new();
    let listed = vec![anonymous.clone(), regular.clone()];
    users.expect_list().returning(move || Ok(listed.clone()));
    users
        .expect_find_by_id()
        .with(eq(anonymous_id))
        .returning(move |_| Ok(Some(anonymous.clone())));

    let service = manager(users, MockAddressRepository::new());
    let admin = actor(&[Role::Administrator]);

    let listed = service.list_users(&admin).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, regular.id);

    let fetched = service.get_user(&admin, anonymous_id).await.unwrap();
    assert!(fetched.is_anonymous_donor());
}

#[tokio::test]
async fn test_list_users_requires_administrator() {
    let service = manager(MockUserRepository::new(), MockAddressRepository::new());
    let volunteer = actor(&[Role::Volunteer]);

    let result = service.list_users(&volunteer).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_user_may_read_self() {
    let me = actor(&[Role::Donor]);
    let my_id = me.id;

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(my_id))
        .returning(|id| Ok(Some(create_test_user(id, &[Role::Donor]))));

    let service = manager(users, MockAddressRepository::new());

    assert_eq!(service.get_user(&me, my_id).await.unwrap().id, my_id);
    assert!(matches!(
        service.get_user(&me, Uuid::new_v4()).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_user_address_created_then_updated_in_place() {
    let address_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut addresses = MockAddressRepository::new();
    addresses.expect_create().times(1).returning(move |fields| {
        Ok(Address {
            id: address_id,
            postal_code: fields.postal_code,
            state: fields.state,
            city: fields.city,
            district: fields.district,
            street: fields.street,
            number: fields.number,
            complement: fields.complement,
        })
    });
    addresses
        .expect_update()
        .with(eq(address_id), always())
        .times(1)
        .returning(|id, fields| {
            Ok(Address {
                id,
                postal_code: fields.postal_code,
                state: fields.state,
                city: fields.city,
                district: fields.district,
                street: fields.street,
                number: fields.number,
                complement: fields.complement,
            })
        });

    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users.expect_create().returning(move |new_user| {
        assert_eq!(new_user.address_id, Some(address_id));
        Ok(User {
            id: user_id,
            ..stored_user(new_user)
        })
    });
    users.expect_find_by_id().returning(move |id| {
        Ok(Some(User {
            address_id: Some(address_id),
            ..create_test_user(id, &[Role::Donor])
        }))
    });
    users.expect_update().returning(move |id, changes| {
        // Same row, so the reference does not change
        assert_eq!(changes.address_id, None);
        Ok(User {
            address_id: Some(address_id),
            ..create_test_user(id, &[Role::Donor])
        })
    });

    let service = manager(users, addresses);
    let address = AddressInput {
        postal_code: Some("01310930".to_string()),
        district: Some("Bela Vista".to_string()),
        city: Some("São Paulo".to_string()),
        state: Some("SP".to_string()),
        ..Default::default()
    };

    let created = service
        .register(CreateUser {
            address: Some(address.clone()),
            ..create_command(Vec::new())
        })
        .await
        .unwrap();
    assert_eq!(created.address_id, Some(address_id));

    let me = domain::Actor::from(&created);
    let updated = service
        .update_user(
            &me,
            user_id,
            UpdateUser {
                address: Some(AddressInput {
                    city: Some("Campinas".to_string()),
                    ..address
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.address_id, Some(address_id));
}

#[tokio::test]
async fn test_only_administrators_change_activation() {
    let me = actor(&[Role::Volunteer]);
    let service = manager(MockUserRepository::new(), MockAddressRepository::new());

    let result = service
        .update_user(
            &me,
            me.id,
            UpdateUser {
                active: Some(false),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_grant_role_is_idempotent() {
    let user_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, &[Role::Volunteer]))));
    users.expect_set_roles().never();

    let service = manager(users, MockAddressRepository::new());
    let admin = actor(&[Role::Administrator]);

    let user = service
        .grant_role(&admin, user_id, Role::Volunteer)
        .await
        .unwrap();
    assert!(user.has_role(Role::Volunteer));
}

#[tokio::test]
async fn test_grant_super_admin_checks_ceiling() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, &[Role::Administrator]))));
    users.expect_count_super_admins().returning(|| Ok(2));
    users.expect_set_roles().never();

    let service = manager(users, MockAddressRepository::new());
    let root = actor(&[Role::SuperAdmin]);

    let result = service
        .grant_role(&root, Uuid::new_v4(), Role::SuperAdmin)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_revoke_last_role_rejected() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, &[Role::Donor]))));
    users.expect_set_roles().never();

    let service = manager(users, MockAddressRepository::new());
    let admin = actor(&[Role::Administrator]);

    let result = service.revoke_role(&admin, Uuid::new_v4(), Role::Donor).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_delete_super_admin_requires_super_admin() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, &[Role::SuperAdmin]))));
    users.expect_delete().never();

    let service = manager(users, MockAddressRepository::new());
    let admin = actor(&[Role::Administrator]);

    let result = service.delete_user(&admin, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_admin_cannot_reset_super_admin_password() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, &[Role::SuperAdmin]))));
    users.expect_set_password().never();

    let service = manager(users, MockAddressRepository::new());
    let admin = actor(&[Role::Administrator]);

    let result = service
        .set_password(&admin, Uuid::new_v4(), "n0va-senha-forte")
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_admin_resets_regular_user_password() {
    let user_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, &[Role::Volunteer]))));
    users
        .expect_set_password()
        .with(eq(user_id), eq("hashed:n0va-senha-forte".to_string()))
        .times(1)
        .returning(|_, _| Ok(()));

    let service = manager(users, MockAddressRepository::new());

    service
        .set_password(&actor(&[Role::Administrator]), user_id, "n0va-senha-forte")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_admin_cannot_update_super_admin_account() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, &[Role::SuperAdmin]))));
    users.expect_update().never();

    let service = manager(users, MockAddressRepository::new());
    let admin = actor(&[Role::Administrator]);

    let result = service
        .update_user(
            &admin,
            Uuid::new_v4(),
            UpdateUser {
                email: Some("tomada@example.com".to_string()),
                active: Some(false),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}
