//! Donor association entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{DomainError, DonationFrequency, Donor};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "donors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: Uuid,
    pub frequency: String,
    pub reminder_date: Option<Date>,
    pub last_contribution: Option<Date>,
    pub next_contribution: Option<Date>,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Donor {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Donor {
            user_id: model.user_id,
            project_id: model.project_id,
            frequency: DonationFrequency::parse(&model.frequency)?,
            reminder_date: model.reminder_date,
            last_contribution: model.last_contribution,
            next_contribution: model.next_contribution,
            note: model.note,
        })
    }
}
