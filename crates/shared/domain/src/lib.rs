//! Domain layer - Core shelter-administration entities, rules and policy.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the role model, the authorization policy, the employee privilege state
//! machine, donation validation and enum normalization, address coalescing
//! rules and the anonymous-donor heuristic.

pub mod address;
pub mod adoption;
pub mod constants;
pub mod donation;
pub mod donor;
pub mod employee;
pub mod error;
pub mod normalize;
pub mod password;
pub mod policy;
pub mod project;
pub mod role;
pub mod user;

pub use address::{Address, AddressFields, AddressInput};
pub use adoption::{
    Adoption, AdoptionUpdate, CreateAdoption, FollowUpStatus, NewAdoptionUpdate,
    RecordAdoptionUpdate,
};
pub use constants::*;
pub use donation::{
    AidType, CreateDonation, Donation, DonationRecord, DonationShape, PaymentMethod,
    UpdateDonation,
};
pub use donor::{DonationFrequency, Donor, RegisterDonor, UpdateDonor};
pub use employee::{AssignEmployee, Employee, PrivilegeState, UpdateEmployee};
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use policy::{Action, Actor, Clearance, Decision, PrivilegeLookup};
pub use project::{CreateProject, NewProject, Project, ProjectChanges, UpdateProject};
pub use role::{ensure_super_admin_capacity, Role, RoleSet};
pub use user::{is_anonymous_donor, CreateUser, NewUser, UpdateUser, User, UserChanges};
