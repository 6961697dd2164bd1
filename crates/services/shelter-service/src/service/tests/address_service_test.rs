use std::sync::Arc;

use mockall::predicate::{always, eq};
use uuid::Uuid;

use domain::{Address, AddressFields, AddressInput};

use crate::repository::MockAddressRepository;
use crate::service::{AddressManager, AddressService};

fn stored(id: Uuid, fields: AddressFields) -> Address {
    Address {
        id,
        postal_code: fields.postal_code,
        state: fields.state,
        city: fields.city,
        district: fields.district,
        street: fields.street,
        number: fields.number,
        complement: fields.complement,
    }
}

fn paulista() -> AddressInput {
    AddressInput {
        postal_code: Some("01310930".to_string()),
        district: Some("Bela Vista".to_string()),
        city: Some("São Paulo".to_string()),
        state: Some("SP".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_address_created_then_updated_in_place() {
    let address_id = Uuid::new_v4();

    let mut repo = MockAddressRepository::new();
    repo.expect_create()
        .times(1)
        .returning(move |fields| Ok(stored(address_id, fields)));
    repo.expect_update()
        .with(eq(address_id), always())
        .times(1)
        .returning(|id, fields| {
            assert_eq!(fields.city, "Campinas");
            assert_eq!(fields.postal_code, "01310930");
            Ok(stored(id, fields))
        });

    let service = AddressManager::new(Arc::new(repo));

    let created = service.upsert_address(None, Some(&paulista())).await.unwrap();
    assert_eq!(created, Some(address_id));

    let moved = AddressInput {
        city: Some("Campinas".to_string()),
        ..paulista()
    };
    let updated = service.upsert_address(created, Some(&moved)).await.unwrap();
    assert_eq!(updated, Some(address_id));
}

#[tokio::test]
async fn test_incomplete_address_writes_nothing() {
    let current = Some(Uuid::new_v4());
    let service = AddressManager::new(Arc::new(MockAddressRepository::new()));

    let missing_district = AddressInput {
        district: Some("   ".to_string()),
        ..paulista()
    };

    assert_eq!(
        service
            .upsert_address(current, Some(&missing_district))
            .await
            .unwrap(),
        current
    );
    assert_eq!(service.upsert_address(None, None).await.unwrap(), None);
}

#[tokio::test]
async fn test_postal_code_stored_as_digits() {
    let mut repo = MockAddressRepository::new();
    repo.expect_create().returning(|fields| {
        assert_eq!(fields.postal_code, "01310930");
        Ok(stored(Uuid::new_v4(), fields))
    });

    let service = AddressManager::new(Arc::new(repo));
    let formatted = AddressInput {
        postal_code: Some("01310-930".to_string()),
        ..paulista()
    };

    assert!(service
        .upsert_address(None, Some(&formatted))
        .await
        .unwrap()
        .is_some());
}
