//! Donation repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::donation::{self, ActiveModel, Entity as DonationEntity};
use common::{AppError, AppResult};
use domain::{Donation, DonationRecord};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Donation repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Find donation by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Donation>>;

    /// List donations of a project, newest first
    async fn list_by_project(&self, project_id: Uuid) -> AppResult<Vec<Donation>>;

    /// List donations made by a donor, newest first
    async fn list_by_donor(&self, donor_id: Uuid) -> AppResult<Vec<Donation>>;

    /// Insert a validated donation
    async fn create(&self, record: DonationRecord) -> AppResult<Donation>;

    /// Overwrite a donation with validated values
    async fn update(&self, id: Uuid, record: DonationRecord) -> AppResult<Donation>;

    /// Delete donation by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of DonationRepository
pub struct DonationStore {
    db: DatabaseConnection,
}

impl DonationStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Write every column of the record, clearing the ones its aid type forbids
fn apply(active: &mut ActiveModel, record: DonationRecord) {
    let shape = record.shape;
    active.donor_id = Set(record.donor_id);
    active.project_id = Set(record.project_id);
    active.tp_ajuda = Set(shape.aid_type.as_stored().to_string());
    active.tp_pagamento = Set(shape.payment_method.map(|m| m.as_stored().to_string()));
    active.valor = Set(shape.amount);
    active.items_description = Set(shape.items_description);
    active.date = Set(record.date);
    active.note = Set(record.note);
}

#[async_trait]
impl DonationRepository for DonationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Donation>> {
        let result = DonationEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Donation::from))
    }

    async fn list_by_project(&self, project_id: Uuid) -> AppResult<Vec<Donation>> {
        let models = DonationEntity::find()
            .filter(donation::Column::ProjectId.eq(project_id))
            .order_by_desc(donation::Column::Date)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Donation::from).collect())
    }

    async fn list_by_donor(&self, donor_id: Uuid) -> AppResult<Vec<Donation>> {
        let models = DonationEntity::find()
            .filter(donation::Column::DonorId.eq(donor_id))
            .order_by_desc(donation::Column::Date)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Donation::from).collect())
    }

    async fn create(&self, record: DonationRecord) -> AppResult<Donation> {
        let mut active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            ..Default::default()
        };
        apply(&mut active_model, record);

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Donation::from(model))
    }

    async fn update(&self, id: Uuid, record: DonationRecord) -> AppResult<Donation> {
        let donation = DonationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Donation"))?;

        let mut active: ActiveModel = donation.into();
        apply(&mut active, record);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Donation::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = DonationEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Donation"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use domain::{AidType, DonationShape, PaymentMethod};

    use super::*;

    fn record(shape: DonationShape) -> DonationRecord {
        DonationRecord {
            donor_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            shape,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            note: None,
        }
    }

    fn model(tp_ajuda: &str, tp_pagamento: Option<&str>, valor: Option<f64>) -> donation::Model {
        donation::Model {
            id: Uuid::new_v4(),
            donor_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            tp_ajuda: tp_ajuda.to_string(),
            tp_pagamento: tp_pagamento.map(str::to_string),
            valor,
            items_description: None,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            note: None,
        }
    }

    #[test]
    fn test_financial_record_written_with_stored_tokens() {
        let shape = DonationShape::resolve(
            AidType::from_app("Financeira"),
            Some(PaymentMethod::from_app("pix")),
            Some(50.0),
            None,
        )
        .unwrap();

        let mut active = <ActiveModel as Default>::default();
        apply(&mut active, record(shape));

        assert_eq!(active.tp_ajuda.unwrap(), "FINANCEIRA");
        assert_eq!(active.tp_pagamento.unwrap(), Some("PIX".to_string()));
        assert_eq!(active.valor.unwrap(), Some(50.0));
    }

    #[test]
    fn test_items_record_clears_money_columns() {
        let shape = DonationShape::resolve(
            AidType::Items,
            Some(PaymentMethod::Cash),
            Some(30.0),
            Some("Ração e cobertores".to_string()),
        )
        .unwrap();

        let mut active = <ActiveModel as Default>::default();
        apply(&mut active, record(shape));

        assert_eq!(active.tp_ajuda.unwrap(), "ITENS");
        assert_eq!(active.tp_pagamento.unwrap(), None);
        assert_eq!(active.valor.unwrap(), None);
        assert_eq!(
            active.items_description.unwrap(),
            Some("Ração e cobertores".to_string())
        );
    }

    #[test]
    fn test_stored_row_read_back_with_application_tokens() {
        let donation = Donation::from(model("FINANCEIRA", Some("PIX"), Some(50.0)));

        assert_eq!(donation.aid_type, AidType::Financial);
        assert_eq!(donation.payment_method, Some(PaymentMethod::Pix));

        let json = serde_json::to_value(&donation).unwrap();
        assert_eq!(json["aidType"], "Financeira");
        assert_eq!(json["paymentMethod"], "Pix");
        assert_eq!(json["amount"], 50.0);
    }

    #[test]
    fn test_unknown_stored_aid_type_passes_through() {
        let donation = Donation::from(model("CAMPANHA_RACAO", None, None));

        assert_eq!(
            donation.aid_type,
            AidType::Unrecognized("CAMPANHA_RACAO".to_string())
        );
        assert_eq!(serde_json::to_value(&donation).unwrap()["aidType"], "CAMPANHA_RACAO");
    }
}
