//! Authentication - Password hashing, token issuance and actor resolution.
//!
//! DDD: Uses domain Password value object for hashing.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::{
    Actor, Password, Role, RoleSet, User, BEARER_TOKEN_PREFIX, SECONDS_PER_HOUR,
    TOKEN_TYPE_BEARER,
};

use crate::repository::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub roles: Vec<Role>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// The acting user for this request; the claimed roles are authoritative.
    pub fn actor(&self) -> AppResult<Actor> {
        let roles = RoleSet::new(self.roles.iter().copied()).map_err(|_| AppError::Unauthorized)?;
        Ok(Actor::new(self.sub, roles))
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiration time in seconds
    pub expires_in: i64,
}

/// Password hashing collaborator
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain-text password, enforcing the password rules
    fn hash(&self, plain_text: &str) -> AppResult<String>;

    /// Compare a plain-text password with a stored hash
    fn verify(&self, plain_text: &str, hash: &str) -> bool;

    /// Hash of a random secret, for accounts nobody logs into
    fn unusable_hash(&self) -> AppResult<String>;
}

/// Argon2 implementation of PasswordHasher
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain_text: &str) -> AppResult<String> {
        Ok(Password::new(plain_text)?.into_string())
    }

    fn verify(&self, plain_text: &str, hash: &str) -> bool {
        Password::from_hash(hash).verify(plain_text)
    }

    fn unusable_hash(&self) -> AppResult<String> {
        Ok(Password::random()?.into_string())
    }
}

/// Signed identity token collaborator
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token carrying the user's id, email and roles
    fn issue(&self, user: &User) -> AppResult<TokenResponse>;

    /// Verify a token and extract its claims
    fn verify(&self, token: &str) -> AppResult<Claims>;
}

/// HS256 JWT implementation of TokenService
pub struct JwtTokenService {
    secret: String,
    expiration_hours: i64,
}

impl JwtTokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            expiration_hours: config.expiration_hours,
        }
    }

    /// Get JWT secret as bytes
    fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiration_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            roles: user.roles.iter().collect(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_bytes()),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.expiration_hours * SECONDS_PER_HOUR,
        })
    }

    fn verify(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Login and return JWT token
    async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve the acting user from an `Authorization: Bearer ...` header value
    fn authenticate(&self, authorization: &str) -> AppResult<Actor>;
}

/// Concrete implementation of AuthService
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        let user = self.users.find_by_email(email).await?;

        // Verify against a dummy hash when the user is unknown so both paths
        // cost the same.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        let password_hash = user.as_ref().map_or(dummy_hash, |u| u.password_hash.as_str());
        let password_valid = self.hasher.verify(password, password_hash);

        let user = match user {
            Some(user) if password_valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        if !user.active {
            tracing::info!(user_id = %user.id, "Login refused for inactive account");
            return Err(AppError::forbidden("Account is inactive"));
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.tokens.issue(&user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token)
    }

    fn authenticate(&self, authorization: &str) -> AppResult<Actor> {
        let token = authorization
            .strip_prefix(BEARER_TOKEN_PREFIX)
            .ok_or(AppError::Unauthorized)?;

        self.verify_token(token.trim())?.actor()
    }
}
