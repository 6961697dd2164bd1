//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Persisted token of the super-administrator role
pub const ROLE_SUPER_ADMIN: &str = "SUPER_ADMIN";

/// Persisted token of the administrator role
pub const ROLE_ADMINISTRATOR: &str = "ADMINISTRATOR";

/// Persisted token of the employee role
pub const ROLE_EMPLOYEE: &str = "EMPLOYEE";

/// Persisted token of the volunteer role
pub const ROLE_VOLUNTEER: &str = "VOLUNTEER";

/// Persisted token of the donor role
pub const ROLE_DONOR: &str = "DONOR";

/// Persisted token of the adopter role
pub const ROLE_ADOPTER: &str = "ADOPTER";

/// System-wide ceiling on accounts holding SUPER_ADMIN
pub const MAX_SUPER_ADMINS: u64 = 2;

// =============================================================================
// Anonymous donor sentinels
// =============================================================================

/// Name given to synthetic anonymous-donor users
pub const ANONYMOUS_DONOR_NAME: &str = "Doação Anônima";

/// Email prefix of synthetic anonymous-donor users
pub const ANONYMOUS_EMAIL_PREFIX: &str = "anonimo_";

/// Email suffix of synthetic anonymous-donor users
pub const ANONYMOUS_EMAIL_SUFFIX: &str = "@temp.com";

/// National id of synthetic anonymous-donor users
pub const ANONYMOUS_NATIONAL_ID: &str = "00000000000";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
