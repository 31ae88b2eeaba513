//! Chat message endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::server::PodspaceServer;
use podspace_storage::{BlockId, ChatMessage, ChatMessageView, MessageId};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i64,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_profile_picture: Option<String>,
    pub body: String,
    pub created_at: i64,
}

impl From<ChatMessageView> for MessageResponse {
    fn from(m: ChatMessageView) -> Self {
        Self {
            id: m.id.0,
            user_id: m.user_id.0.to_string(),
            user_name: m.user_name,
            user_email: m.user_email,
            user_profile_picture: m.user_profile_picture,
            body: m.body,
            created_at: m.created_at.timestamp(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessageResponse {
    pub id: i64,
    pub block_id: String,
    pub user_id: String,
    pub body: String,
    pub created_at: i64,
}

impl From<ChatMessage> for SentMessageResponse {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id.0,
            block_id: m.block_id.0.to_string(),
            user_id: m.user_id.0.to_string(),
            body: m.body,
            created_at: m.created_at.timestamp(),
        }
    }
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}

pub async fn list(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(block_id): Path<Uuid>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let messages = server.list_messages(&user_id, &BlockId(block_id)).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

pub async fn send(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(block_id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SentMessageResponse>, ApiError> {
    let message = server
        .send_message(&user_id, &BlockId(block_id), &req.body)
        .await?;
    Ok(Json(message.into()))
}

pub async fn remove(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path((block_id, message_id)): Path<(Uuid, i64)>,
) -> Result<Json<Value>, ApiError> {
    server
        .delete_message(&user_id, &BlockId(block_id), &MessageId(message_id))
        .await?;
    Ok(Json(json!({ "success": true })))
}
