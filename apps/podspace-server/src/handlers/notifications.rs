//! Unread digest endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::server::{PodspaceServer, UnreadNotification};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub block_id: String,
    pub pod_id: String,
    pub block_label: String,
    pub pod_name: String,
    pub unread_count: i64,
}

impl From<UnreadNotification> for NotificationResponse {
    fn from(n: UnreadNotification) -> Self {
        Self {
            block_id: n.block_id.0.to_string(),
            pod_id: n.pod_id.0.to_string(),
            block_label: n.block_label,
            pod_name: n.pod_name,
            unread_count: n.unread_count,
        }
    }
}

pub async fn unread(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let digest = server.unread_digest(&user_id).await?;
    let notifications: Vec<NotificationResponse> = digest.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "notifications": notifications })))
}
