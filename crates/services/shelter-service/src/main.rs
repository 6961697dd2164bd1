//! Shelter Service - maintenance commands for the administration core.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelter_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "shelter-service")]
#[command(about = "Animal shelter administration core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Create a SUPER_ADMIN account (at most two may exist)
    BootstrapSuperAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SUPER_ADMIN_PASSWORD")]
        password: String,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            shelter_service_lib::run_migrations(migrate_action).await?;
        }
        Commands::BootstrapSuperAdmin {
            name,
            email,
            password,
        } => {
            let user = shelter_service_lib::bootstrap_super_admin(name, email, password).await?;
            println!("Created SUPER_ADMIN {} ({})", user.email, user.id);
        }
    }

    Ok(())
}
