//! Adoption database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Adoption;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "adoptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub adopter_id: Uuid,
    pub animal_id: Uuid,
    pub adoption_date: Date,
    pub last_update: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Adoption {
    fn from(model: Model) -> Self {
        Adoption {
            id: model.id,
            project_id: model.project_id,
            adopter_id: model.adopter_id,
            animal_id: model.animal_id,
            adoption_date: model.adoption_date,
            last_update: model.last_update,
        }
    }
}
