//! SeaORM entities.

pub mod address;
pub mod adoption;
pub mod adoption_update;
pub mod donation;
pub mod donor;
pub mod employee;
pub mod project;
pub mod user;
pub mod user_role;
