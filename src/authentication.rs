use std::sync::Arc;

use crate::config::AuthConfig;
use crate::db_helpers::get_user_by_id;
use crate::errors::RequestError;
use crate::models::User;
use crate::AppState;
use anyhow::{Context, Result};
use argon2::PasswordVerifier;
use argon2::{password_hash::SaltString, Argon2, PasswordHash};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::Extension;
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use time::OffsetDateTime;

#[derive(Debug, Serialize, Deserialize)]
struct AuthClaim {
    id: i64,
    exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
}

impl From<TokenError> for RequestError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Invalid => RequestError::Unauthenticated("Invalid token"),
            TokenError::Expired => RequestError::Unauthenticated("Token expired"),
        }
    }
}

/// Issues and verifies the HS256 bearer tokens handed out at login.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl: time::Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            ttl: time::Duration::minutes(config.token_ttl_minutes),
        }
    }

    pub fn issue(&self, id: i64) -> Result<String> {
        let expiry_date = OffsetDateTime::now_utc() + self.ttl;
        let claim = AuthClaim {
            id,
            exp: expiry_date.unix_timestamp(),
        };

        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claim,
            &jsonwebtoken::EncodingKey::from_secret(self.secret.as_ref()),
        )
        .context("Failed to generate jwt token")
    }

    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let token_data = jsonwebtoken::decode::<AuthClaim>(
            token,
            &jsonwebtoken::DecodingKey::from_secret(self.secret.as_ref()),
            &jsonwebtoken::Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => {
                tracing::debug!("rejected token: {}", e);
                TokenError::Invalid
            }
        })?;
        Ok(token_data.claims.id)
    }
}

/// Turns a bearer credential into the live, enabled user it was issued for.
pub async fn resolve_identity(
    pool: &SqlitePool,
    tokens: &TokenService,
    credential: &str,
) -> Result<User, RequestError> {
    let id = tokens.verify(credential)?;
    let user = match get_user_by_id(pool, id).await? {
        Some(user) => user,
        None => {
            tracing::warn!(user_id = id, "token subject no longer exists");
            return Err(RequestError::Unauthenticated("User no longer exists"));
        }
    };
    if user.disabled {
        tracing::warn!(user_id = id, "disabled account presented a token");
        return Err(RequestError::Unauthenticated("Account disabled"));
    }
    Ok(user)
}

/// The authenticated caller; rejects the request when no valid token is sent.
pub struct CurrentUser(pub User);

/// The caller when a token is sent. A token that is present but bad is still rejected.
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn get_id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<String>, RequestError> {
    let header = match parts.headers.get("Authorization") {
        Some(header) => header,
        None => return Ok(None),
    };
    let header = header
        .to_str()
        .map_err(|_| RequestError::Unauthenticated("Invalid token"))?;
    match header.strip_prefix("Bearer ") {
        Some(token) => Ok(Some(token.trim().to_owned())),
        None => Err(RequestError::Unauthenticated("Invalid token")),
    }
}

async fn app_state<S>(parts: &mut Parts, state: &S) -> Result<Arc<AppState>, RequestError>
where
    S: Send + Sync,
{
    let Extension(app) = Extension::<Arc<AppState>>::from_request_parts(parts, state)
        .await
        .map_err(|_| RequestError::Internal("application state is not installed".into()))?;
    Ok(app)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = match bearer_token(parts)? {
            Some(token) => token,
            None => return Ok(MaybeUser(None)),
        };
        let app = app_state(parts, state).await?;
        let user = resolve_identity(&app.pool, &app.tokens, &token).await?;
        Ok(MaybeUser(Some(user)))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user)) => Ok(CurrentUser(user)),
            MaybeUser(None) => Err(RequestError::Unauthenticated("Need to be authorized")),
        }
    }
}

pub async fn verify_password_argon2(password: String, hash: &str) -> Result<bool> {
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || {
        let hash = PasswordHash::new(hash.as_str())
            .map_err(|_| anyhow::anyhow!("Failed to parse password hash"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok())
    })
    .await
    .context("Failed to verify password")?
}

pub async fn hash_password_argon2(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = PasswordHash::generate(Argon2::default(), password, salt.as_salt())
            .map_err(|_| anyhow::anyhow!("Failed to hash password"))?;
        Ok(hash.to_string())
    })
    .await
    .context("Failed to hash password")?
}
