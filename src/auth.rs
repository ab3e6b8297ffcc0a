use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{db, error::ApiError, models::UserRow, state::AppState};

/// Signed payload of an access token: the subject is the user's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = PasswordHash::new(password_hash);
    match parsed_hash {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

pub fn issue_token(
    secret: &str,
    subject: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: subject.to_string(),
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Bad signature, malformed payload, and past expiry all collapse into
/// `Unauthenticated`; callers never see decode internals.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthenticated)
}

/// Matches credentials against the store. The login name is the user's
/// display name, not the email.
pub async fn authenticate_credentials(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<UserRow>, ApiError> {
    let user = match db::find_user_by_name(pool, username).await? {
        Some(user) => user,
        None => return Ok(None),
    };

    if !verify_password(password, &user.password_hash) {
        return Ok(None);
    }

    Ok(Some(user))
}

/// Resolves a bearer token to the user it identifies.
pub async fn current_user(state: &AppState, token: &str) -> Result<UserRow, ApiError> {
    let claims = verify_token(&state.config.secret_key, token)?;
    db::find_user_by_email(&state.db, &claims.sub)
        .await?
        .ok_or(ApiError::Unauthenticated)
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
