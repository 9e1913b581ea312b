pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub use password::{hash_password, verify_password, PasswordError};

const RESET_PURPOSE: &str = "password_reset";

/// Access token claims: subject id and role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub id: i32,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Short-lived password reset claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResetClaims {
    pub id: i32,
    pub purpose: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    InvalidSecret,
    #[error("JWT generation error: {0}")]
    TokenGeneration(jsonwebtoken::errors::Error),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),
    #[error("Token was not issued for this purpose")]
    WrongPurpose,
    #[error("{0} is out of range")]
    InvalidExpiry(&'static str),
}

/// Convert a configured expiry into a lifetime that can be added to the current time
fn expiry(
    value: u64,
    to_duration: fn(i64) -> Option<Duration>,
    key: &'static str,
) -> Result<Duration, JwtError> {
    i64::try_from(value)
        .ok()
        .and_then(to_duration)
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or(JwtError::InvalidExpiry(key))
}

/// HS256 signing and verification with the configured expiries
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    reset_ttl: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("access_ttl", &self.access_ttl)
            .field("reset_ttl", &self.reset_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn from_config(security: &SecurityConfig) -> Result<Self, JwtError> {
        let secret = security.jwt_secret.as_bytes();
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl: expiry(
                security.jwt_expiry_hours,
                Duration::try_hours,
                "SECURITY_JWT_EXPIRY_HOURS",
            )?,
            reset_ttl: expiry(
                security.reset_token_expiry_minutes,
                Duration::try_minutes,
                "SECURITY_RESET_TOKEN_EXPIRY_MINUTES",
            )?,
        })
    }

    pub fn issue_access(&self, id: i32, role: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: Self::expires_at(now, self.access_ttl)?,
        };
        self.sign(&claims)
    }

    pub fn issue_reset(&self, id: i32) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = ResetClaims {
            id,
            purpose: RESET_PURPOSE.to_string(),
            iat: now.timestamp(),
            exp: Self::expires_at(now, self.reset_ttl)?,
        };
        self.sign(&claims)
    }

    /// Validate signature and expiry of an access token.
    /// Reset tokens carry no role and are rejected here.
    pub fn verify_access(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(JwtError::InvalidToken)
    }

    pub fn verify_reset(&self, token: &str) -> Result<ResetClaims, JwtError> {
        let claims = decode::<ResetClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(JwtError::InvalidToken)?;

        if claims.purpose != RESET_PURPOSE {
            return Err(JwtError::WrongPurpose);
        }
        Ok(claims)
    }

    fn expires_at(now: DateTime<Utc>, ttl: Duration) -> Result<i64, JwtError> {
        now.checked_add_signed(ttl)
            .map(|exp| exp.timestamp())
            .ok_or(JwtError::InvalidExpiry("token expiry"))
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding).map_err(JwtError::TokenGeneration)
    }
}
