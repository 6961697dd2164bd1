//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{RoleSet, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub active: bool,
    pub address_id: Option<Uuid>,
    pub password_hash: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRole,
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRole.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Combine the row with its role rows into the domain entity
    pub fn into_user(self, roles: RoleSet) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            national_id: self.national_id,
            phone: self.phone,
            photo_url: self.photo_url,
            active: self.active,
            roles,
            address_id: self.address_id,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
