use anyhow::{Context, anyhow};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::AccountId;
use crate::storage::Repository;

use super::AppError;

/// JWT claims issued on login.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

/// Hash a password with argon2 and a random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Hashing failed: {}", e))?;
    Ok(hash.to_string())
}

/// Check a password against a stored argon2 hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed =
        PasswordHash::new(password_hash).map_err(|e| anyhow!("Invalid hash format: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Checks credentials and issues/verifies bearer tokens.
pub struct AuthService {
    repo: Repository,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(repo: Repository, jwt_secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            repo,
            jwt_secret: jwt_secret.into(),
            token_ttl,
        }
    }

    /// Log in with email and password, returning a signed token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let account = self
            .repo
            .get_account_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash)? {
            tracing::debug!(account = %account.id, "password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        self.issue_token(account.id)
    }

    /// Issue a token for an account.
    pub fn issue_token(&self, account: AccountId) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| anyhow!("Token expiration out of range"))?;

        let claims = Claims {
            sub: account.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .context("Failed to generate token")?;
        Ok(token)
    }

    /// Resolve a bearer token to the account it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<AccountId, AppError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| AppError::InvalidToken)?
        .claims;

        Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }
}
