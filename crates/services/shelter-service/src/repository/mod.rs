//! Repository layer for data access.

mod address_repository;
mod adoption_repository;
mod donation_repository;
mod donor_repository;
mod employee_repository;
pub mod entities;
mod project_repository;
mod user_repository;

pub use address_repository::{AddressRepository, AddressStore};
pub use adoption_repository::{AdoptionRepository, AdoptionStore};
pub use donation_repository::{DonationRepository, DonationStore};
pub use donor_repository::{DonorRepository, DonorStore};
pub use employee_repository::{EmployeeRepository, EmployeeStore};
pub use project_repository::{ProjectRepository, ProjectStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use address_repository::MockAddressRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use adoption_repository::MockAdoptionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use donation_repository::MockDonationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use donor_repository::MockDonorRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use employee_repository::MockEmployeeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use project_repository::MockProjectRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
