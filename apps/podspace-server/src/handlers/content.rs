//! Block-scoped content endpoints: documents, calendar events, goals.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::server::PodspaceServer;
use podspace_storage::{
    BlockId, CalendarEvent, CreateEventParams, CreateGoalParams, DocumentId, DocumentMeta,
    EventId, Goal, GoalId, GoalStatus, UpdateGoalParams,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockScopedQuery {
    pub block_id: Uuid,
}

fn parse_timestamp(secs: i64, field: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ApiError::BadRequest(format!("{field} is out of range")))
}

// Distinguishes an absent field from an explicit null: the outer Option is
// filled in by `#[serde(default)]` when the key is missing, the inner one
// carries the null.
fn double_option<'de, D>(d: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(d).map(Some)
}

// ───────────────────────────── Documents ──────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: String,
    pub block_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_by: String,
    pub uploaded_at: i64,
}

impl From<DocumentMeta> for DocumentResponse {
    fn from(d: DocumentMeta) -> Self {
        Self {
            id: d.id.0.to_string(),
            block_id: d.block_id.0.to_string(),
            file_name: d.file_name,
            file_type: d.file_type,
            file_size: d.file_size,
            uploaded_by: d.uploaded_by.0.to_string(),
            uploaded_at: d.uploaded_at.timestamp(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub block_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
}

pub async fn list_documents(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<BlockScopedQuery>,
) -> Result<Json<Vec<DocumentResponse>>, ApiError> {
    let docs = server
        .list_documents(&user_id, &BlockId(query.block_id))
        .await?;
    Ok(Json(docs.into_iter().map(Into::into).collect()))
}

pub async fn create_document(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let doc = server
        .create_document(
            &user_id,
            &BlockId(req.block_id),
            &req.file_name,
            &req.file_type,
            req.file_size,
        )
        .await?;
    Ok(Json(doc.into()))
}

pub async fn remove_document(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    server.delete_document(&user_id, &DocumentId(id)).await?;
    Ok(Json(json!({ "success": true })))
}

// ────────────────────────── Calendar events ───────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub block_id: String,
    pub title: String,
    pub date: i64,
    pub time: Option<String>,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: i64,
}

impl From<CalendarEvent> for EventResponse {
    fn from(e: CalendarEvent) -> Self {
        Self {
            id: e.id.0.to_string(),
            block_id: e.block_id.0.to_string(),
            title: e.title,
            date: e.date.timestamp(),
            time: e.time,
            description: e.description,
            created_by: e.created_by.0.to_string(),
            created_at: e.created_at.timestamp(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub block_id: Uuid,
    pub title: String,
    pub date: i64,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

pub async fn list_events(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<BlockScopedQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = server
        .list_events(&user_id, &BlockId(query.block_id))
        .await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

pub async fn create_event(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let params = CreateEventParams {
        block_id: BlockId(req.block_id),
        title: req.title,
        date: parse_timestamp(req.date, "date")?,
        time: req.time,
        description: req.description,
        created_by: user_id.clone(),
    };
    let event = server.create_event(&user_id, &params).await?;
    Ok(Json(event.into()))
}

pub async fn remove_event(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    server.delete_event(&user_id, &EventId(id)).await?;
    Ok(Json(json!({ "success": true })))
}

// ─────────────────────────────── Goals ────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    pub id: String,
    pub block_id: String,
    pub title: String,
    pub status: String,
    pub due_date: Option<i64>,
    pub created_by: String,
    pub created_at: i64,
}

impl From<Goal> for GoalResponse {
    fn from(g: Goal) -> Self {
        Self {
            id: g.id.0.to_string(),
            block_id: g.block_id.0.to_string(),
            title: g.title,
            status: g.status.as_str().to_string(),
            due_date: g.due_date.map(|d| d.timestamp()),
            created_by: g.created_by.0.to_string(),
            created_at: g.created_at.timestamp(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub block_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<i64>>,
}

pub async fn list_goals(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<BlockScopedQuery>,
) -> Result<Json<Vec<GoalResponse>>, ApiError> {
    let goals = server
        .list_goals(&user_id, &BlockId(query.block_id))
        .await?;
    Ok(Json(goals.into_iter().map(Into::into).collect()))
}

pub async fn create_goal(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateGoalRequest>,
) -> Result<Json<GoalResponse>, ApiError> {
    let status = match req.status.as_deref() {
        Some(s) => s.parse().map_err(ApiError::BadRequest)?,
        None => GoalStatus::NotStarted,
    };
    let due_date = req
        .due_date
        .map(|d| parse_timestamp(d, "dueDate"))
        .transpose()?;
    let params = CreateGoalParams {
        block_id: BlockId(req.block_id),
        title: req.title,
        status,
        due_date,
        created_by: user_id.clone(),
    };
    let goal = server.create_goal(&user_id, &params).await?;
    Ok(Json(goal.into()))
}

pub async fn update_goal(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<Json<GoalResponse>, ApiError> {
    let status = req
        .status
        .as_deref()
        .map(|s| s.parse().map_err(ApiError::BadRequest))
        .transpose()?;
    let due_date = match req.due_date {
        None => None,
        Some(None) => Some(None),
        Some(Some(secs)) => Some(Some(parse_timestamp(secs, "dueDate")?)),
    };
    let params = UpdateGoalParams {
        title: req.title,
        status,
        due_date,
    };
    let goal = server.update_goal(&user_id, &GoalId(id), &params).await?;
    Ok(Json(goal.into()))
}

pub async fn remove_goal(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    server.delete_goal(&user_id, &GoalId(id)).await?;
    Ok(Json(json!({ "success": true })))
}
