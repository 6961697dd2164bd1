//! Donation database entity for SeaORM.
//!
//! Aid type and payment method are stored as upper-case tokens
//! (`FINANCEIRA`, `PIX`, ...) in `tp_ajuda` / `tp_pagamento`.

use sea_orm::entity::prelude::*;

use domain::{AidType, Donation, PaymentMethod};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub donor_id: Uuid,
    pub project_id: Uuid,
    pub tp_ajuda: String,
    pub tp_pagamento: Option<String>,
    pub valor: Option<f64>,
    pub items_description: Option<String>,
    pub date: Date,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Donation {
    fn from(model: Model) -> Self {
        Donation {
            id: model.id,
            donor_id: model.donor_id,
            project_id: model.project_id,
            aid_type: AidType::from_stored(&model.tp_ajuda),
            payment_method: model.tp_pagamento.as_deref().map(PaymentMethod::from_stored),
            amount: model.valor,
            items_description: model.items_description,
            date: model.date,
            note: model.note,
        }
    }
}
