//! Service Container - Centralized service access.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AccessControl, AddressManager, AdoptionManager, AdoptionService, Argon2Hasher, AuthService,
    Authenticator, DonationManager, DonationService, DonorManager, DonorService,
    EmployeeManager, EmployeeService, JwtTokenService, PasswordHasher, ProjectManager,
    ProjectService, UserManager, UserService,
};
use crate::config::ShelterServiceConfig;
use crate::repository::{
    AddressStore, AdoptionStore, DonationStore, DonorStore, EmployeeStore, ProjectStore,
    UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn projects(&self) -> Arc<dyn ProjectService>;

    fn employees(&self) -> Arc<dyn EmployeeService>;

    fn donors(&self) -> Arc<dyn DonorService>;

    fn donations(&self) -> Arc<dyn DonationService>;

    fn adoptions(&self) -> Arc<dyn AdoptionService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    project_service: Arc<dyn ProjectService>,
    employee_service: Arc<dyn EmployeeService>,
    donor_service: Arc<dyn DonorService>,
    donation_service: Arc<dyn DonationService>,
    adoption_service: Arc<dyn AdoptionService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: DatabaseConnection, config: &ShelterServiceConfig) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let projects = Arc::new(ProjectStore::new(db.clone()));
        let employees = Arc::new(EmployeeStore::new(db.clone()));
        let donors = Arc::new(DonorStore::new(db.clone()));
        let donations = Arc::new(DonationStore::new(db.clone()));
        let adoptions = Arc::new(AdoptionStore::new(db.clone()));
        let addresses = Arc::new(AddressManager::new(Arc::new(AddressStore::new(db))));

        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher);
        let tokens = Arc::new(JwtTokenService::new(&config.jwt));
        let access = Arc::new(AccessControl::new(employees.clone()));

        Self {
            auth_service: Arc::new(Authenticator::new(users.clone(), hasher.clone(), tokens)),
            user_service: Arc::new(UserManager::new(
                users.clone(),
                addresses.clone(),
                hasher.clone(),
                access.clone(),
            )),
            project_service: Arc::new(ProjectManager::new(
                projects.clone(),
                addresses,
                access.clone(),
            )),
            employee_service: Arc::new(EmployeeManager::new(
                employees,
                users.clone(),
                projects.clone(),
                access.clone(),
            )),
            donor_service: Arc::new(DonorManager::new(
                donors,
                users.clone(),
                projects.clone(),
                access.clone(),
            )),
            donation_service: Arc::new(DonationManager::new(
                donations,
                users.clone(),
                projects.clone(),
                hasher,
                access.clone(),
            )),
            adoption_service: Arc::new(AdoptionManager::new(adoptions, users, projects, access)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn projects(&self) -> Arc<dyn ProjectService> {
        self.project_service.clone()
    }

    fn employees(&self) -> Arc<dyn EmployeeService> {
        self.employee_service.clone()
    }

    fn donors(&self) -> Arc<dyn DonorService> {
        self.donor_service.clone()
    }

    fn donations(&self) -> Arc<dyn DonationService> {
        self.donation_service.clone()
    }

    fn adoptions(&self) -> Arc<dyn AdoptionService> {
        self.adoption_service.clone()
    }
}
