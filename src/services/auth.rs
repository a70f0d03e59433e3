// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{SessionRepository, UserRepository},
    models::auth::{Session, User},
};

/// Random bytes per session token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Opaque bearer token, rendered as lowercase hex.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    session_repo: SessionRepository,
    session_ttl: Duration,
    bcrypt_cost: u32,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        session_repo: SessionRepository,
        session_ttl: Duration,
        bcrypt_cost: u32,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, session_repo, session_ttl, bcrypt_cost, pool }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User, AppError> {
        // Hashing is CPU-bound, keep it off the async workers
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("hashing task failed: {}", e))??;

        let user = self
            .user_repo
            .create_user(&self.pool, username, email, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(Session, User), AppError> {
        let user = self
            .user_repo
            .find_by_username(&self.pool, username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_owned();
        let password_hash = user.password_hash.clone();
        let is_password_valid = tokio::task::spawn_blocking(move || verify(password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("password verification task failed: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }
        // Only reported once the password matched
        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        let expires_at = Utc::now() + self.session_ttl;
        let session = self
            .session_repo
            .create(&self.pool, user.id, &generate_token(), expires_at)
            .await?;

        tracing::info!(user_id = %user.id, "session opened");
        Ok((session, user))
    }

    /// Resolves a bearer token. Expired sessions are removed on the way out.
    pub async fn validate_session(&self, token: &str) -> Result<(Session, User), AppError> {
        let session = self
            .session_repo
            .find_by_token(&self.pool, token)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if session.is_expired_at(Utc::now()) {
            self.session_repo.delete_by_token(&self.pool, token).await?;
            return Err(AppError::SessionExpired);
        }

        let user = self
            .user_repo
            .find_by_id(&self.pool, session.user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        Ok((session, user))
    }

    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.session_repo.delete_by_token(&self.pool, token).await
    }

    /// Deletes every session past its expiry and returns how many were removed.
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        let removed = self.session_repo.delete_expired(&self.pool, Utc::now()).await?;
        if removed > 0 {
            tracing::info!(removed, "expired sessions swept");
        }
        Ok(removed)
    }
}
