//! Address database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Address;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Postal code, digits only
    pub cep: String,
    pub state: String,
    pub city: String,
    pub district: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Address {
    fn from(model: Model) -> Self {
        Address {
            id: model.id,
            postal_code: model.cep,
            state: model.state,
            city: model.city,
            district: model.district,
            street: model.street,
            number: model.number,
            complement: model.complement,
        }
    }
}
