//! Pod CRUD, member listing, and invitations.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::server::PodspaceServer;
use podspace_storage::{Invitation, Pod, PodId, PodMemberView, PodRole, PodSummary};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodResponse {
    pub id: String,
    pub name: String,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    pub creator_id: String,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl PodResponse {
    fn new(pod: Pod, role: Option<PodRole>) -> Self {
        Self {
            id: pod.id.0.to_string(),
            name: pod.name,
            tagline: pod.tagline,
            logo_url: pod.logo_url,
            creator_id: pod.creator_id.0.to_string(),
            created_at: pod.created_at.timestamp(),
            role: role.map(|r| r.as_str().to_string()),
        }
    }
}

impl From<PodSummary> for PodResponse {
    fn from(s: PodSummary) -> Self {
        PodResponse::new(s.pod, Some(s.role))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodMemberResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub role: String,
    pub joined_at: i64,
}

impl From<PodMemberView> for PodMemberResponse {
    fn from(m: PodMemberView) -> Self {
        Self {
            user_id: m.user_id.0.to_string(),
            name: m.name,
            email: m.email,
            profile_picture: m.profile_picture,
            role: m.role.as_str().to_string(),
            joined_at: m.joined_at.timestamp(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: String,
    pub pod_id: String,
    pub email: String,
    pub token: String,
    pub status: String,
    pub expires_at: i64,
}

impl From<Invitation> for InvitationResponse {
    fn from(i: Invitation) -> Self {
        Self {
            id: i.id.0.to_string(),
            pod_id: i.pod_id.0.to_string(),
            email: i.email,
            token: i.token,
            status: i.status.as_str().to_string(),
            expires_at: i.expires_at.timestamp(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePodRequest {
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePodRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Deserialize)]
pub struct DeletePodRequest {
    pub password: String,
}

#[derive(Deserialize)]
pub struct InviteRequest {
    pub email: String,
}

pub async fn list(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<PodResponse>>, ApiError> {
    let pods = server.list_pods(&user_id).await?;
    Ok(Json(pods.into_iter().map(Into::into).collect()))
}

pub async fn create(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreatePodRequest>,
) -> Result<Json<PodResponse>, ApiError> {
    let pod = server
        .create_pod(&user_id, &req.name, req.tagline, req.logo_url)
        .await?;
    Ok(Json(PodResponse::new(pod, Some(PodRole::Creator))))
}

pub async fn get(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PodResponse>, ApiError> {
    let pod_id = PodId(id);
    let pod = server.get_pod(&user_id, &pod_id).await?;
    let role = server.pod_role(&user_id, &pod_id).await?;
    Ok(Json(PodResponse::new(pod, role)))
}

pub async fn update(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePodRequest>,
) -> Result<Json<PodResponse>, ApiError> {
    let pod = server
        .update_pod(&user_id, &PodId(id), req.name, req.tagline, req.logo_url)
        .await?;
    Ok(Json(PodResponse::new(pod, Some(PodRole::Creator))))
}

pub async fn remove(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DeletePodRequest>,
) -> Result<Json<Value>, ApiError> {
    server.delete_pod(&user_id, &PodId(id), &req.password).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn members(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PodMemberResponse>>, ApiError> {
    let members = server.list_pod_members(&user_id, &PodId(id)).await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

pub async fn invite(
    State(server): State<Arc<PodspaceServer>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<InviteRequest>,
) -> Result<Json<InvitationResponse>, ApiError> {
    let invitation = server.invite_member(&user_id, &PodId(id), &req.email).await?;
    Ok(Json(invitation.into()))
}
