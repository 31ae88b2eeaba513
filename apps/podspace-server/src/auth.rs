//! Password hashing, opaque tokens, and the authenticated-user extractor.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use rand::RngCore;

use crate::error::ApiError;
use crate::server::PodspaceServer;
use podspace_storage::{StoreError, UserId};

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// 32 random bytes, hex-encoded. Used for session and invitation tokens;
/// uniqueness is enforced by the store's UNIQUE constraints, not by
/// collision checks here.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// The acting user, resolved from `Authorization: Bearer <token>`.
///
/// Core operations take this id explicitly; there is no ambient session
/// state below the extractor.
#[derive(Clone, Debug)]
pub struct AuthUser(pub UserId);

#[async_trait]
impl FromRequestParts<Arc<PodspaceServer>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        server: &Arc<PodspaceServer>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated("missing authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated("malformed authorization header"))?;

        match server.store.get_session_user(token).await {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(StoreError::NotFound) => Err(ApiError::Unauthenticated("invalid session token")),
            Err(e) => Err(e.into()),
        }
    }
}
