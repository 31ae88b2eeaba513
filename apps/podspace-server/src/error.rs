//! API error taxonomy and its HTTP mapping.
//!
//! Every denial carries a specific message: "not a member of this pod" is a
//! different rule than "no access to this block" or "only the creator can
//! ...", and the distinction must survive to the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use podspace_storage::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Referenced entity does not exist. Checked before authorization.
    #[error("{0}")]
    NotFound(&'static str),

    /// No valid acting-user identity. Short-circuits all further checks.
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// Password re-verification failed on a destructive operation.
    #[error("invalid password")]
    InvalidPassword,

    /// Identity known, but an access rule denies the operation.
    #[error("{0}")]
    Forbidden(String),

    /// Uniqueness violation (duplicate membership, duplicate pending
    /// invitation). A 400, not a generic 500.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthenticated(_) | ApiError::InvalidPassword => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::NotFound("not found"),
            StoreError::AlreadyExists => ApiError::Conflict("already exists".to_string()),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
