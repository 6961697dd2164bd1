//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and repositories to fulfill the
//! administration use cases. Every mutating operation goes through the
//! shared [`AccessControl`] gate first.

mod address_service;
mod adoption_service;
mod auth_service;
mod authorization;
pub mod container;
mod donation_service;
mod donor_service;
mod employee_service;
mod project_service;
mod user_service;

#[cfg(test)]
mod tests;

use validator::Validate;

use common::{AppError, AppResult};

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use address_service::{AddressManager, AddressService};
pub use adoption_service::{AdoptionManager, AdoptionService};
pub use auth_service::{
    Argon2Hasher, AuthService, Authenticator, Claims, JwtTokenService, PasswordHasher,
    TokenResponse, TokenService,
};
pub use authorization::AccessControl;
pub use donation_service::{DonationManager, DonationService};
pub use donor_service::{DonorManager, DonorService};
pub use employee_service::{EmployeeManager, EmployeeService};
pub use project_service::{ProjectManager, ProjectService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::{MockPasswordHasher, MockTokenService};
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

/// Run the `validator` rules of a command, reporting field messages.
pub(crate) fn validate_command<T: Validate>(command: &T) -> AppResult<()> {
    command
        .validate()
        .map_err(|e| AppError::validation(format_validation_errors(&e)))
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let message = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ");

    if message.is_empty() {
        "Validation failed".to_string()
    } else {
        message
    }
}
