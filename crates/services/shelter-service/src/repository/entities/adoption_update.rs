//! Adoption follow-up entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{AdoptionUpdate, DomainError, FollowUpStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "adoption_updates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub adoption_id: Uuid,
    pub responsible_id: Uuid,
    pub status: String,
    pub next_date: Option<Date>,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for AdoptionUpdate {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(AdoptionUpdate {
            id: model.id,
            adoption_id: model.adoption_id,
            responsible_id: model.responsible_id,
            status: FollowUpStatus::parse(&model.status)?,
            next_date: model.next_date,
            note: model.note,
            created_at: model.created_at,
        })
    }
}
