use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};

use super::ServiceError;
use crate::auth::{hash_password, verify_password, JwtKeys};
use crate::database::models::{User, UserInfo};

const DEFAULT_ROLE: &str = "user";
const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_RESET_TOKEN: &str = "Invalid or expired token";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordInput {
    pub token: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Credential storage and token issuance
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(pool: PgPool, keys: JwtKeys) -> Self {
        Self { pool, keys }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<UserInfo, ServiceError> {
        let (Some(name), Some(email), Some(password)) = (
            required(&input.name),
            required(&input.email),
            required(&input.password),
        ) else {
            return Err(ServiceError::validation("Name, email and password are required"));
        };
        let role = required(&input.role).unwrap_or(DEFAULT_ROLE);

        if self.find_by_email(email).await?.is_some() {
            return Err(ServiceError::validation("Email already registered"));
        }

        let hashed = hash_blocking(password.to_string()).await?;

        let user = sqlx::query_as::<_, UserInfo>(
            "INSERT INTO users (name, email, password, role) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, role",
        )
        .bind(name)
        .bind(email)
        .bind(&hashed)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration of the same email
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                ServiceError::validation("Email already registered")
            } else {
                ServiceError::Database(e)
            }
        })?;

        info!("Registered user {} with role '{}'", user.id, user.role);
        Ok(user)
    }

    /// Returns a signed access token and the user's public view
    pub async fn login(&self, input: LoginInput) -> Result<(String, UserInfo), ServiceError> {
        let (Some(email), Some(password)) = (required(&input.email), required(&input.password))
        else {
            return Err(ServiceError::validation("Email and password are required"));
        };

        let Some(user) = self.find_by_email(email).await? else {
            warn!("Login failed: unknown email");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let stored = user.password.clone();
        let candidate = password.to_string();
        let valid =
            tokio::task::spawn_blocking(move || verify_password(&candidate, &stored)).await??;
        if !valid {
            warn!("Login failed: wrong password for user {}", user.id);
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.keys.issue_access(user.id, &user.role)?;
        info!("User {} logged in", user.id);
        Ok((token, user.into()))
    }

    /// `None` for unknown emails so callers cannot tell them apart.
    /// The reset token is handed back directly; there is no mail delivery.
    pub async fn forgot_password(&self, email: Option<&str>) -> Result<Option<String>, ServiceError> {
        let email = email
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::validation("Email is required"))?;

        match self.find_by_email(email).await? {
            Some(user) => {
                let token = self.keys.issue_reset(user.id)?;
                info!("Issued password reset token for user {}", user.id);
                Ok(Some(token))
            }
            None => Ok(None),
        }
    }

    pub async fn reset_password(&self, input: ResetPasswordInput) -> Result<(), ServiceError> {
        let (Some(token), Some(new_password)) =
            (required(&input.token), required(&input.new_password))
        else {
            return Err(ServiceError::validation("Token and new password are required"));
        };

        let claims = self.keys.verify_reset(token).map_err(|e| {
            warn!("Rejected password reset token: {}", e);
            ServiceError::validation(INVALID_RESET_TOKEN)
        })?;

        let hashed = hash_blocking(new_password.to_string()).await?;

        let result = sqlx::query(
            "UPDATE users SET password = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2",
        )
        .bind(&hashed)
        .bind(claims.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::validation(INVALID_RESET_TOKEN));
        }

        info!("Password reset for user {}", claims.id);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }
}

/// Argon2 is CPU-bound; keep it off the async workers
async fn hash_blocking(password: String) -> Result<String, ServiceError> {
    Ok(tokio::task::spawn_blocking(move || hash_password(&password)).await??)
}
