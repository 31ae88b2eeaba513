//! Block CRUD, block membership, and the per-block unread endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::server::PodspaceServer;
use podspace_storage::{Block, BlockId, BlockMemberView, BlockType, PodId, UserId};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResponse {
    pub id: String,
    pub pod_id: String,
    pub block_type: String,
    pub label: String,
    pub description: Option<String>,
    pub x: f64,
    pub y: f64,
    pub creator_id: String,
    pub created_at: i64,
}

impl From<Block> for BlockResponse {
    fn from(b: Block) -> Self {
        Self {
            id: b.id.0.to_string(),
            pod_id: b.pod_id.0.to_string(),
            block_type: b.block_type.as_str().to_string(),
            label: b.label,
            description: b.description,
            x: b.x,
            y: b.y,
            creator_id: b.creator_id.0.to_string(),
            created_at: b.created_at.timestamp(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMemberResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub added_at: i64,
}

impl From<BlockMemberView> for BlockMemberResponse {
    fn from(m: BlockMemberView) -> Self {
        Self {
            user_id: m.user_id.0.to_string(),
            name: m.name,
            email: m.email,
            profile_picture: m.profile_picture,
            added_at: m.added_at.timestamp(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockListQuery {
    pub pod_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockRequest {
    pub pod_id: Uuid,
    pub block_type: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBlockMemberRequest {
    pub user_id: Uuid,
}

pub async fn list(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<BlockListQuery>,
) -> Result<Json<Vec<BlockResponse>>, ApiError> {
    let blocks = server.list_blocks(&user_id, &PodId(query.pod_id)).await?;
    Ok(Json(blocks.into_iter().map(Into::into).collect()))
}

pub async fn create(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateBlockRequest>,
) -> Result<Json<BlockResponse>, ApiError> {
    let block_type: BlockType = req
        .block_type
        .parse()
        .map_err(ApiError::BadRequest)?;
    let block = server
        .create_block(
            &user_id,
            &PodId(req.pod_id),
            block_type,
            &req.label,
            req.description,
            req.x,
            req.y,
        )
        .await?;
    Ok(Json(block.into()))
}

pub async fn remove(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    server.delete_block(&user_id, &BlockId(id)).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn members(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BlockMemberResponse>>, ApiError> {
    let members = server.list_block_members(&user_id, &BlockId(id)).await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

pub async fn add_member(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AddBlockMemberRequest>,
) -> Result<Json<Value>, ApiError> {
    server
        .add_block_member(&user_id, &BlockId(id), &UserId(req.user_id))
        .await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn unread_count(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let count = server.unread_count(&user_id, &BlockId(id)).await?;
    Ok(Json(json!({ "unreadCount": count })))
}

pub async fn mark_read(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    server.mark_read(&user_id, &BlockId(id)).await?;
    Ok(Json(json!({ "success": true })))
}
