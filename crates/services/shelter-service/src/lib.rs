//! Shelter Service Library
//!
//! Administration core of the shelter platform: users and roles, projects,
//! staff privileges, donors, donations and adoptions. Transports embed the
//! [`Services`](service::Services) container; the binary only exposes
//! maintenance commands.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use tracing::info;

use domain::{CreateUser, User};

use crate::config::ShelterServiceConfig;
use crate::infra::Database;
use crate::service::{ServiceContainer, Services};

/// Connect, apply pending migrations and build the service container.
pub async fn bootstrap() -> Result<Services, Box<dyn std::error::Error>> {
    let config = ShelterServiceConfig::from_env()?;
    let db = Database::connect(&config.database).await?;
    Ok(Services::from_connection(db.get_connection(), &config))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = ShelterServiceConfig::from_env()?;
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            db.ping().await?;
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Create a SUPER_ADMIN account from the command line.
///
/// Subject to the same two-account ceiling as every other path.
pub async fn bootstrap_super_admin(
    name: String,
    email: String,
    password: String,
) -> Result<User, Box<dyn std::error::Error>> {
    let services = bootstrap().await?;

    let user = services
        .users()
        .bootstrap_super_admin(CreateUser {
            name,
            email,
            password,
            national_id: None,
            phone: None,
            photo_url: None,
            roles: Vec::new(),
            address: None,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "Super admin created");
    Ok(user)
}
