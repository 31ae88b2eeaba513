//! Signup and signin.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::PodspaceServer;
use podspace_storage::User;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub profile_picture: Option<String>,
    pub created_at: i64,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id.0.to_string(),
            email: u.email,
            name: u.name,
            profile_picture: u.profile_picture,
            created_at: u.created_at.timestamp(),
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

pub async fn signup(
    State(server): State<Arc<PodspaceServer>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, token) = server
        .signup(&req.email, &req.password, &req.name, req.profile_picture)
        .await?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

pub async fn signin(
    State(server): State<Arc<PodspaceServer>>,
    Json(req): Json<SigninRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, token) = server.signin(&req.email, &req.password).await?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
