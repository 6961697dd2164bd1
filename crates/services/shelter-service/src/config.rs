//! Shelter service configuration.

use std::env;

use common::{AppError, AppResult, DatabaseConfig, JwtConfig};
use domain::{DEFAULT_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH};

/// Shelter service configuration.
#[derive(Debug, Clone)]
pub struct ShelterServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Token signing settings
    pub jwt: JwtConfig,
}

impl ShelterServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: env::var("SHELTER_DATABASE_URL")
                .or_else(|_| env::var("DATABASE_URL"))
                .unwrap_or(defaults.url),
            max_connections: env::var("SHELTER_DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.max_connections),
            min_connections: env::var("SHELTER_DATABASE_MIN_CONNECTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.min_connections),
        };

        let secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::validation("JWT_SECRET must be set (minimum 32 characters)"))?;

        let jwt = JwtConfig {
            secret,
            expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
        };

        let config = Self { database, jwt };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the services cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::validation(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        if self.jwt.expiration_hours <= 0 {
            return Err(AppError::validation("JWT_EXPIRATION_HOURS must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, hours: i64) -> ShelterServiceConfig {
        ShelterServiceConfig {
            database: DatabaseConfig::default(),
            jwt: JwtConfig {
                secret: secret.to_string(),
                expiration_hours: hours,
            },
        }
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(config("too-short", 24).validate().is_err());
    }

    #[test]
    fn test_valid_config_accepted() {
        let secret = "a".repeat(MIN_JWT_SECRET_LENGTH);
        assert!(config(&secret, 24).validate().is_ok());
        assert!(config(&secret, 0).validate().is_err());
    }
}
