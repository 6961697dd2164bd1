use std::sync::Arc;

use chrono::NaiveDate;
use mockall::predicate::eq;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    AidType, CreateDonation, Donation, DonationRecord, PaymentMethod, Role, UpdateDonation, User,
    ANONYMOUS_DONOR_NAME, ANONYMOUS_NATIONAL_ID,
};

use super::{actor, admin_access, create_test_project, create_test_user};
use crate::repository::{MockDonationRepository, MockProjectRepository, MockUserRepository};
use crate::service::{DonationManager, DonationService, MockPasswordHasher};

fn persisted(record: DonationRecord) -> AppResult<Donation> {
    Ok(Donation {
        id: Uuid::new_v4(),
        donor_id: record.donor_id,
        project_id: record.project_id,
        aid_type: record.shape.aid_type,
        payment_method: record.shape.payment_method,
        amount: record.shape.amount,
        items_description: record.shape.items_description,
        date: record.date,
        note: record.note,
    })
}

fn projects() -> MockProjectRepository {
    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_project(id))));
    projects
}

fn users() -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, &[Role::Donor]))));
    users
}

fn manager(
    donations: MockDonationRepository,
    users: MockUserRepository,
    hasher: MockPasswordHasher,
) -> DonationManager {
    DonationManager::new(
        Arc::new(donations),
        Arc::new(users),
        Arc::new(projects()),
        Arc::new(hasher),
        admin_access(),
    )
}

fn command(json: serde_json::Value) -> CreateDonation {
    serde_json::from_value(json).unwrap()
}

#[tokio::test]
async fn test_financial_donation_normalized() {
    let donor = actor(&[Role::Donor]);

    let mut donations = MockDonationRepository::new();
    donations.expect_create().times(1).returning(|record| {
        assert_eq!(record.shape.aid_type.as_stored(), "FINANCEIRA");
        assert_eq!(
            record.shape.payment_method.as_ref().map(PaymentMethod::as_stored),
            Some("PIX")
        );
        assert_eq!(record.shape.amount, Some(50.0));
        persisted(record)
    });

    let service = manager(donations, users(), MockPasswordHasher::new());
    let donation = service
        .create_donation(
            &donor,
            command(serde_json::json!({
                "projectId": Uuid::new_v4(),
                "aidType": "Financeira",
                "paymentMethod": "pix",
                "amount": 50.0,
                "date": "2024-05-01"
            })),
        )
        .await
        .unwrap();

    assert_eq!(donation.donor_id, donor.id);
    let json = serde_json::to_value(&donation).unwrap();
    assert_eq!(json["aidType"], "Financeira");
    assert_eq!(json["paymentMethod"], "Pix");
    assert_eq!(json["amount"], 50.0);
}

#[tokio::test]
async fn test_items_donation_drops_money_fields() {
    let donor = actor(&[Role::Donor]);

    let mut donations = MockDonationRepository::new();
    donations.expect_create().returning(persisted);

    let service = manager(donations, users(), MockPasswordHasher::new());
    let donation = service
        .create_donation(
            &donor,
            command(serde_json::json!({
                "projectId": Uuid::new_v4(),
                "aidType": "Itens",
                "paymentMethod": "Dinheiro",
                "amount": 30.0,
                "itemsDescription": "Ração",
                "date": "2024-05-01"
            })),
        )
        .await
        .unwrap();

    assert_eq!(donation.aid_type, AidType::Items);
    assert_eq!(donation.amount, None);
    assert_eq!(donation.payment_method, None);
    assert_eq!(serde_json::to_value(&donation).unwrap()["aidType"], "Itens");
}

#[tokio::test]
async fn test_financial_donation_without_amount_rejected() {
    let donor = actor(&[Role::Donor]);

    let mut donations = MockDonationRepository::new();
    donations.expect_create().never();

    let service = manager(donations, users(), MockPasswordHasher::new());
    let result = service
        .create_donation(
            &donor,
            command(serde_json::json!({
                "projectId": Uuid::new_v4(),
                "aidType": "Financeira",
                "date": "2024-05-01"
            })),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_update_to_other_clears_money_fields() {
    let donation_id = Uuid::new_v4();

    let mut donations = MockDonationRepository::new();
    donations
        .expect_find_by_id()
        .with(eq(donation_id))
        .returning(|id| {
            Ok(Some(Donation {
                id,
                donor_id: Uuid::new_v4(),
                project_id: Uuid::new_v4(),
                aid_type: AidType::Financial,
                payment_method: Some(PaymentMethod::Cash),
                amount: Some(80.0),
                items_description: None,
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                note: None,
            }))
        });
    donations.expect_update().returning(|id, record| {
        assert_eq!(record.shape.amount, None);
        assert_eq!(record.shape.payment_method, None);
        Ok(Donation {
            id,
            ..persisted(record)?
        })
    });

    let service = manager(donations, users(), MockPasswordHasher::new());
    let updated = service
        .update_donation(
            &actor(&[Role::Administrator]),
            donation_id,
            UpdateDonation {
                aid_type: Some(AidType::Other),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, donation_id);
    assert_eq!(updated.aid_type, AidType::Other);
}

#[tokio::test]
async fn test_anonymous_donation_reuses_existing_donor() {
    let anonymous_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_national_id()
        .with(eq(ANONYMOUS_NATIONAL_ID))
        .returning(move |_| {
            Ok(Some(User {
                name: ANONYMOUS_DONOR_NAME.to_string(),
                national_id: Some(ANONYMOUS_NATIONAL_ID.to_string()),
                ..create_test_user(anonymous_id, &[Role::Donor])
            }))
        });
    users.expect_create().never();

    let mut donations = MockDonationRepository::new();
    donations.expect_create().returning(persisted);

    let service = manager(donations, users, MockPasswordHasher::new());
    let donation = service
        .create_donation(
            &actor(&[Role::Administrator]),
            command(serde_json::json!({
                "anonymous": true,
                "projectId": Uuid::new_v4(),
                "aidType": "Outro",
                "date": "2024-05-01"
            })),
        )
        .await
        .unwrap();

    assert_eq!(donation.donor_id, anonymous_id);
}

#[tokio::test]
async fn test_anonymous_donation_creates_donor_once_missing() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_national_id().returning(|_| Ok(None));
    users.expect_create().times(1).returning(|new_user| {
        assert_eq!(new_user.name, ANONYMOUS_DONOR_NAME);
        assert_eq!(new_user.national_id.as_deref(), Some(ANONYMOUS_NATIONAL_ID));
        assert_eq!(new_user.password_hash, "unusable");
        let user = User {
            name: new_user.name,
            email: new_user.email,
            national_id: new_user.national_id,
            ..create_test_user(Uuid::new_v4(), &[Role::Donor])
        };
        assert!(user.is_anonymous_donor());
        Ok(user)
    });

    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_unusable_hash()
        .times(1)
        .returning(|| Ok("unusable".to_string()));

    let mut donations = MockDonationRepository::new();
    donations.expect_create().returning(persisted);

    let service = manager(donations, users, hasher);
    let result = service
        .create_donation(
            &actor(&[Role::SuperAdmin]),
            command(serde_json::json!({
                "anonymous": true,
                "projectId": Uuid::new_v4(),
                "aidType": "Itens",
                "itemsDescription": "Cobertores",
                "date": "2024-05-01"
            })),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_donor_cannot_record_anonymous_donation() {
    let service = manager(
        MockDonationRepository::new(),
        MockUserRepository::new(),
        MockPasswordHasher::new(),
    );

    let result = service
        .create_donation(
            &actor(&[Role::Donor]),
            command(serde_json::json!({
                "anonymous": true,
                "projectId": Uuid::new_v4(),
                "aidType": "Outro",
                "date": "2024-05-01"
            })),
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_donor_cannot_attribute_donation_to_someone_else() {
    let service = manager(
        MockDonationRepository::new(),
        users(),
        MockPasswordHasher::new(),
    );

    let result = service
        .create_donation(
            &actor(&[Role::Donor]),
            command(serde_json::json!({
                "donorId": Uuid::new_v4(),
                "projectId": Uuid::new_v4(),
                "aidType": "Outro",
                "date": "2024-05-01"
            })),
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_unauthorized_donation_denied_before_project_lookup() {
    let mut projects = MockProjectRepository::new();
    projects.expect_find_by_id().never();

    let service = DonationManager::new(
        Arc::new(MockDonationRepository::new()),
        Arc::new(MockUserRepository::new()),
        Arc::new(projects),
        Arc::new(MockPasswordHasher::new()),
        admin_access(),
    );

    let result = service
        .create_donation(
            &actor(&[Role::Volunteer]),
            command(serde_json::json!({
                "projectId": Uuid::new_v4(),
                "aidType": "Itens",
                "itemsDescription": "Ração",
                "date": "2024-05-01"
            })),
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_donor_lists_own_donations_only() {
    let donor = actor(&[Role::Donor]);

    let mut donations = MockDonationRepository::new();
    donations
        .expect_list_by_donor()
        .with(eq(donor.id))
        .returning(|_| Ok(Vec::new()));

    let service = manager(donations, users(), MockPasswordHasher::new());

    assert!(service
        .list_donor_donations(&donor, donor.id)
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        service.list_donor_donations(&donor, Uuid::new_v4()).await,
        Err(AppError::Forbidden(_))
    ));
}
