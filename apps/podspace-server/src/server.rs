//! The application core: the access evaluator and every operation, each
//! taking the acting user id explicitly.
//!
//! Handlers stay thin; the membership rules live here, defined once. Two
//! gates stack: pod membership decides whether any of a pod's blocks are
//! visible at all, block membership (or block creatorship) decides whether a
//! specific block's content may be touched. A stale block-membership row
//! never outranks a missing pod membership.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::auth::{generate_token, hash_password, verify_password};
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::mailer::Mailer;
use crate::metrics;
use podspace_storage::{
    Block, BlockId, BlockMemberView, BlockType, ChatMessage, ChatMessageView,
    CreateBlockParams, CreateDocumentParams, CreateEventParams, CreateGoalParams,
    CreateInvitationParams, CreatePodParams, CreateUserParams, DocumentId, DocumentMeta,
    EventId, GoalId, Invitation, InvitationStatus, MessageId, Pod, PodId, PodMemberView,
    PodRole, PodSummary, Store, StoreError, UpdateGoalParams, User, UserId,
};
use podspace_storage::{CalendarEvent, Goal};

/// Outcome of an invitation redemption attempt.
///
/// Redemption is a redirect flow; failures are outcomes to encode in a URL,
/// not errors to return as response bodies.
#[derive(Debug, PartialEq, Eq)]
pub enum RedeemOutcome {
    Joined { pod_id: PodId },
    /// The user already held a membership (added directly while the
    /// invitation was outstanding). The invitation is marked accepted
    /// anyway; redemption reports success, not an error.
    AlreadyMember { pod_id: PodId },
    Invalid,
    Expired,
    EmailMismatch,
}

/// One entry of the unread digest.
#[derive(Debug, Clone)]
pub struct UnreadNotification {
    pub block_id: BlockId,
    pub pod_id: PodId,
    pub block_label: String,
    pub pod_name: String,
    pub unread_count: i64,
}

pub struct PodspaceServer {
    pub store: Arc<dyn Store>,
    pub config: ServerConfig,
    pub mailer: Arc<dyn Mailer>,
}

impl PodspaceServer {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            store,
            config,
            mailer,
        }
    }

    // ───────────────────────────── Access evaluator ───────────────────────

    /// True iff a pod membership row exists. The outer gate: a non-member
    /// never sees any of the pod's blocks.
    pub async fn can_access_pod(
        &self,
        user_id: &UserId,
        pod_id: &PodId,
    ) -> Result<bool, ApiError> {
        match self.store.get_pod_member(pod_id, user_id).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Pod membership first, then creator-or-block-member. The creator is
    /// always authorized even without a block membership row.
    pub async fn can_access_block(
        &self,
        user_id: &UserId,
        block: &Block,
    ) -> Result<bool, ApiError> {
        if !self.can_access_pod(user_id, &block.pod_id).await? {
            return Ok(false);
        }
        if block.creator_id == *user_id {
            return Ok(true);
        }
        match self.store.get_block_member(&block.id, user_id).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Load the pod (404 before 403), then require membership.
    async fn require_pod_member(&self, user_id: &UserId, pod_id: &PodId) -> Result<Pod, ApiError> {
        let pod = self
            .store
            .get_pod(pod_id)
            .await
            .map_err(|e| not_found(e, "pod not found"))?;
        if !self.can_access_pod(user_id, pod_id).await? {
            return Err(ApiError::Forbidden("not a member of this pod".to_string()));
        }
        Ok(pod)
    }

    /// Load the block (404 before 403), then require block access.
    async fn require_block_access(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
    ) -> Result<Block, ApiError> {
        let block = self
            .store
            .get_block(block_id)
            .await
            .map_err(|e| not_found(e, "block not found"))?;
        if !self.can_access_block(user_id, &block).await? {
            return Err(ApiError::Forbidden("no access to this block".to_string()));
        }
        Ok(block)
    }

    /// Load the pod (404 before 403), then require the acting user to be its
    /// creator. `action` completes the denial message.
    async fn require_pod_creator(
        &self,
        user_id: &UserId,
        pod_id: &PodId,
        action: &str,
    ) -> Result<Pod, ApiError> {
        let pod = self
            .store
            .get_pod(pod_id)
            .await
            .map_err(|e| not_found(e, "pod not found"))?;
        if pod.creator_id != *user_id {
            return Err(ApiError::Forbidden(format!(
                "only the pod creator can {action}"
            )));
        }
        Ok(pod)
    }

    // ───────────────────────────── Auth ───────────────────────────────────

    /// Create an account and issue a session token.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: &str,
        profile_picture: Option<String>,
    ) -> Result<(User, String), ApiError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() || name.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "email, password and name are required".to_string(),
            ));
        }
        let password_hash = hash_password(password)?;
        let user_id = self
            .store
            .create_user(&CreateUserParams {
                email: email.clone(),
                password_hash,
                name: name.trim().to_string(),
                profile_picture,
            })
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists => {
                    ApiError::Conflict("an account with this email already exists".to_string())
                }
                other => other.into(),
            })?;
        let user = self.store.get_user_by_id(&user_id).await?;
        let token = self.issue_session(&user_id).await?;
        tracing::info!(email = %user.email, "user signed up");
        Ok((user, token))
    }

    /// Verify credentials and issue a session token.
    pub async fn signin(&self, email: &str, password: &str) -> Result<(User, String), ApiError> {
        let email = email.trim().to_lowercase();
        let user = match self.store.get_user_by_email(&email).await {
            Ok(u) => u,
            Err(StoreError::NotFound) => {
                return Err(ApiError::Unauthenticated("invalid email or password"))
            }
            Err(e) => return Err(e.into()),
        };
        if !verify_password(password, &user.password_hash) {
            return Err(ApiError::Unauthenticated("invalid email or password"));
        }
        let token = self.issue_session(&user.id).await?;
        Ok((user, token))
    }

    async fn issue_session(&self, user_id: &UserId) -> Result<String, ApiError> {
        let token = generate_token();
        self.store.create_session(user_id, &token).await?;
        Ok(token)
    }

    // ───────────────────────────── Pods ───────────────────────────────────

    pub async fn list_pods(&self, user_id: &UserId) -> Result<Vec<PodSummary>, ApiError> {
        Ok(self.store.list_pods_for_user(user_id).await?)
    }

    pub async fn create_pod(
        &self,
        user_id: &UserId,
        name: &str,
        tagline: Option<String>,
        logo_url: Option<String>,
    ) -> Result<Pod, ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest("pod name is required".to_string()));
        }
        let pod_id = self
            .store
            .create_pod(&CreatePodParams {
                name: name.trim().to_string(),
                tagline,
                logo_url,
                creator_id: user_id.clone(),
            })
            .await?;
        let pod = self.store.get_pod(&pod_id).await?;
        metrics::record_pod_created();
        tracing::info!(pod = %pod.name, "pod created");
        Ok(pod)
    }

    pub async fn get_pod(&self, user_id: &UserId, pod_id: &PodId) -> Result<Pod, ApiError> {
        self.require_pod_member(user_id, pod_id).await
    }

    pub async fn update_pod(
        &self,
        user_id: &UserId,
        pod_id: &PodId,
        name: Option<String>,
        tagline: Option<String>,
        logo_url: Option<String>,
    ) -> Result<Pod, ApiError> {
        self.require_pod_creator(user_id, pod_id, "update this pod")
            .await?;
        self.store
            .update_pod(pod_id, name, tagline, logo_url)
            .await?;
        Ok(self.store.get_pod(pod_id).await?)
    }

    /// Delete a pod and everything in it. The single most destructive
    /// operation in the system: beyond session validity, the caller's
    /// password is re-verified before the cascade runs.
    pub async fn delete_pod(
        &self,
        user_id: &UserId,
        pod_id: &PodId,
        password: &str,
    ) -> Result<(), ApiError> {
        let pod = self
            .require_pod_creator(user_id, pod_id, "delete this pod")
            .await?;
        let user = self.store.get_user_by_id(user_id).await?;
        if !verify_password(password, &user.password_hash) {
            return Err(ApiError::InvalidPassword);
        }
        self.store.delete_pod(pod_id).await?;
        tracing::info!(pod = %pod.name, "pod deleted");
        Ok(())
    }

    pub async fn list_pod_members(
        &self,
        user_id: &UserId,
        pod_id: &PodId,
    ) -> Result<Vec<PodMemberView>, ApiError> {
        self.require_pod_member(user_id, pod_id).await?;
        Ok(self.store.list_pod_members(pod_id).await?)
    }

    // ───────────────────────────── Invitations ────────────────────────────

    /// Invite an existing account's email to a pod.
    ///
    /// Preconditions, first failure wins: acting user is the pod creator;
    /// the email resolves to an account (signup-first policy); the target is
    /// not already a member; no pending invitation exists for (pod, email).
    pub async fn invite_member(
        &self,
        user_id: &UserId,
        pod_id: &PodId,
        email: &str,
    ) -> Result<Invitation, ApiError> {
        let pod = self
            .require_pod_creator(user_id, pod_id, "invite members")
            .await?;
        let email = email.trim().to_lowercase();

        let target = match self.store.get_user_by_email(&email).await {
            Ok(u) => u,
            Err(StoreError::NotFound) => {
                return Err(ApiError::BadRequest(
                    "no account exists for this email; the user must sign up first".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        if self.store.get_pod_member(pod_id, &target.id).await.is_ok() {
            return Err(ApiError::Conflict(
                "user is already a member of this pod".to_string(),
            ));
        }
        if self
            .store
            .find_pending_invitation(pod_id, &email)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict(
                "an invitation is already pending for this email".to_string(),
            ));
        }

        let invitation = self
            .store
            .create_invitation(&CreateInvitationParams {
                pod_id: pod_id.clone(),
                email: email.clone(),
                token: generate_token(),
                invited_by: user_id.clone(),
                expires_at: Utc::now() + Duration::days(self.config.invite_ttl_days),
            })
            .await?;

        let accept_url = format!(
            "{}/invitations/accept/{}",
            self.config.base_url, invitation.token
        );
        self.mailer
            .send_invitation(&email, &pod.name, &accept_url)
            .await;
        metrics::record_invitation_issued();
        tracing::info!(pod = %pod.name, email = %email, "invitation created");
        Ok(invitation)
    }

    /// Redeem an invitation token for the acting user.
    ///
    /// Checked in order, first failure wins: the token resolves; the
    /// invitation is unexpired by time (expiry is computed here, never swept
    /// in the background); the acting user's email equals the invited email.
    /// An already-member redeems idempotently as success — including on a
    /// token already consumed, so retrying a redemption link never turns a
    /// success into an error. Only then does a non-pending status reject.
    pub async fn redeem_invitation(
        &self,
        user_id: &UserId,
        token: &str,
    ) -> Result<RedeemOutcome, ApiError> {
        let invitation = match self.store.get_invitation_by_token(token).await {
            Ok(inv) => inv,
            Err(StoreError::NotFound) => {
                metrics::record_invitation_redeemed("invalid");
                return Ok(RedeemOutcome::Invalid);
            }
            Err(e) => return Err(e.into()),
        };

        if invitation.expires_at < Utc::now() {
            metrics::record_invitation_redeemed("expired");
            return Ok(RedeemOutcome::Expired);
        }

        let user = self.store.get_user_by_id(user_id).await?;
        if user.email != invitation.email {
            metrics::record_invitation_redeemed("email_mismatch");
            return Ok(RedeemOutcome::EmailMismatch);
        }

        if self
            .store
            .get_pod_member(&invitation.pod_id, user_id)
            .await
            .is_ok()
        {
            self.store.mark_invitation_accepted(&invitation.id).await?;
            metrics::record_invitation_redeemed("already_member");
            return Ok(RedeemOutcome::AlreadyMember {
                pod_id: invitation.pod_id,
            });
        }

        if invitation.status != InvitationStatus::Pending {
            metrics::record_invitation_redeemed("expired");
            return Ok(RedeemOutcome::Expired);
        }

        self.store
            .redeem_invitation(&invitation.id, &invitation.pod_id, user_id)
            .await?;
        metrics::record_invitation_redeemed("joined");
        tracing::info!(email = %user.email, "invitation redeemed");
        Ok(RedeemOutcome::Joined {
            pod_id: invitation.pod_id,
        })
    }

    // ───────────────────────────── Blocks ─────────────────────────────────

    pub async fn list_blocks(
        &self,
        user_id: &UserId,
        pod_id: &PodId,
    ) -> Result<Vec<Block>, ApiError> {
        self.require_pod_member(user_id, pod_id).await?;
        Ok(self.store.list_blocks(pod_id).await?)
    }

    pub async fn create_block(
        &self,
        user_id: &UserId,
        pod_id: &PodId,
        block_type: BlockType,
        label: &str,
        description: Option<String>,
        x: f64,
        y: f64,
    ) -> Result<Block, ApiError> {
        if label.trim().is_empty() {
            return Err(ApiError::BadRequest("block label is required".to_string()));
        }
        self.require_pod_member(user_id, pod_id).await?;
        let block_id = self
            .store
            .create_block(&CreateBlockParams {
                pod_id: pod_id.clone(),
                block_type,
                label: label.trim().to_string(),
                description,
                x,
                y,
                creator_id: user_id.clone(),
            })
            .await?;
        Ok(self.store.get_block(&block_id).await?)
    }

    pub async fn delete_block(&self, user_id: &UserId, block_id: &BlockId) -> Result<(), ApiError> {
        let block = self
            .store
            .get_block(block_id)
            .await
            .map_err(|e| not_found(e, "block not found"))?;
        if block.creator_id != *user_id {
            return Err(ApiError::Forbidden(
                "only the block creator can delete this block".to_string(),
            ));
        }
        self.store.delete_block(block_id).await?;
        tracing::info!(block = %block.label, "block deleted");
        Ok(())
    }

    pub async fn list_block_members(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
    ) -> Result<Vec<BlockMemberView>, ApiError> {
        self.require_block_access(user_id, block_id).await?;
        Ok(self.store.list_block_members(block_id).await?)
    }

    /// Grant a pod member access to a block. Creator-only; the target must
    /// already hold a pod membership.
    pub async fn add_block_member(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
        target: &UserId,
    ) -> Result<(), ApiError> {
        let block = self
            .store
            .get_block(block_id)
            .await
            .map_err(|e| not_found(e, "block not found"))?;
        if block.creator_id != *user_id {
            return Err(ApiError::Forbidden(
                "only the block creator can add members".to_string(),
            ));
        }
        if self
            .store
            .get_pod_member(&block.pod_id, target)
            .await
            .is_err()
        {
            return Err(ApiError::BadRequest(
                "user is not a member of this pod".to_string(),
            ));
        }
        self.store
            .add_block_member(block_id, target)
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists => {
                    ApiError::Conflict("user is already a member of this block".to_string())
                }
                other => other.into(),
            })
    }

    // ───────────────────────────── Chat ───────────────────────────────────

    pub async fn list_messages(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
    ) -> Result<Vec<ChatMessageView>, ApiError> {
        self.require_block_access(user_id, block_id).await?;
        Ok(self.store.list_messages(block_id).await?)
    }

    pub async fn send_message(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
        body: &str,
    ) -> Result<ChatMessage, ApiError> {
        if body.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "message body is required".to_string(),
            ));
        }
        self.require_block_access(user_id, block_id).await?;
        let message = self.store.create_message(block_id, user_id, body).await?;
        metrics::record_message_sent();
        Ok(message)
    }

    /// Author-only, no creator override.
    pub async fn delete_message(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
        message_id: &MessageId,
    ) -> Result<(), ApiError> {
        let message = self
            .store
            .get_message(message_id)
            .await
            .map_err(|e| not_found(e, "message not found"))?;
        if message.block_id != *block_id {
            return Err(ApiError::NotFound("message not found"));
        }
        if message.user_id != *user_id {
            return Err(ApiError::Forbidden(
                "only the author can delete this message".to_string(),
            ));
        }
        Ok(self.store.delete_message(message_id).await?)
    }

    // ───────────────────────────── Unread tracking ────────────────────────
    //
    // One cursor per (user, block) instead of a read flag per message.
    // Self-authored messages never count as unread; the "after" comparison
    // is on the monotonic message id, never on timestamps.

    pub async fn unread_count(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
    ) -> Result<i64, ApiError> {
        self.require_block_access(user_id, block_id).await?;
        let cursor = self.store.get_read_cursor(user_id, block_id).await?;
        let count = self
            .store
            .count_messages_after(
                block_id,
                cursor.map(|c| c.last_read_message_id),
                user_id,
            )
            .await?;
        Ok(count)
    }

    /// Move the cursor to the block's latest message. No-op on an empty
    /// block. Last-write-wins: concurrent calls may leave the cursor at
    /// whichever latest message each call observed.
    pub async fn mark_read(&self, user_id: &UserId, block_id: &BlockId) -> Result<(), ApiError> {
        self.require_block_access(user_id, block_id).await?;
        let latest = match self.store.latest_message_id(block_id).await? {
            Some(id) => id,
            None => return Ok(()),
        };
        self.store
            .upsert_read_cursor(user_id, block_id, latest, Utc::now())
            .await?;
        Ok(())
    }

    /// Unread digest across every chat block in the user's pods.
    ///
    /// Deliberately no block-membership filter: a pod member can receive a
    /// count for a chat block they cannot open yet. That matches the
    /// product's current behavior and is pinned by a test.
    pub async fn unread_digest(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UnreadNotification>, ApiError> {
        let pods = self.store.list_pods_for_user(user_id).await?;
        let pod_ids: Vec<PodId> = pods.iter().map(|p| p.pod.id.clone()).collect();
        let blocks = self.store.list_chat_blocks_for_pods(&pod_ids).await?;

        let mut digest = Vec::new();
        for block in blocks {
            let cursor = self.store.get_read_cursor(user_id, &block.id).await?;
            let count = self
                .store
                .count_messages_after(
                    &block.id,
                    cursor.map(|c| c.last_read_message_id),
                    user_id,
                )
                .await?;
            if count > 0 {
                let pod_name = pods
                    .iter()
                    .find(|p| p.pod.id == block.pod_id)
                    .map(|p| p.pod.name.clone())
                    .unwrap_or_default();
                digest.push(UnreadNotification {
                    block_id: block.id,
                    pod_id: block.pod_id,
                    block_label: block.label,
                    pod_name,
                    unread_count: count,
                });
            }
        }
        Ok(digest)
    }

    // ───────────────────────────── Documents ──────────────────────────────

    pub async fn list_documents(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
    ) -> Result<Vec<DocumentMeta>, ApiError> {
        self.require_block_access(user_id, block_id).await?;
        Ok(self.store.list_documents(block_id).await?)
    }

    pub async fn create_document(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
        file_name: &str,
        file_type: &str,
        file_size: i64,
    ) -> Result<DocumentMeta, ApiError> {
        if file_name.trim().is_empty() {
            return Err(ApiError::BadRequest("file name is required".to_string()));
        }
        self.require_block_access(user_id, block_id).await?;
        Ok(self
            .store
            .create_document(&CreateDocumentParams {
                block_id: block_id.clone(),
                file_name: file_name.trim().to_string(),
                file_type: file_type.to_string(),
                file_size,
                uploaded_by: user_id.clone(),
            })
            .await?)
    }

    /// Uploader or block creator — the one content type with a creator
    /// override.
    pub async fn delete_document(
        &self,
        user_id: &UserId,
        document_id: &DocumentId,
    ) -> Result<(), ApiError> {
        let doc = self
            .store
            .get_document(document_id)
            .await
            .map_err(|e| not_found(e, "document not found"))?;
        if doc.uploaded_by != *user_id {
            let block = self.store.get_block(&doc.block_id).await?;
            if block.creator_id != *user_id {
                return Err(ApiError::Forbidden(
                    "only the uploader or the block creator can delete this document".to_string(),
                ));
            }
        }
        Ok(self.store.delete_document(document_id).await?)
    }

    // ───────────────────────────── Calendar events ────────────────────────

    pub async fn list_events(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
    ) -> Result<Vec<CalendarEvent>, ApiError> {
        self.require_block_access(user_id, block_id).await?;
        Ok(self.store.list_events(block_id).await?)
    }

    pub async fn create_event(
        &self,
        user_id: &UserId,
        params: &CreateEventParams,
    ) -> Result<CalendarEvent, ApiError> {
        if params.title.trim().is_empty() {
            return Err(ApiError::BadRequest("event title is required".to_string()));
        }
        self.require_block_access(user_id, &params.block_id).await?;
        Ok(self.store.create_event(params).await?)
    }

    /// Author-only, no creator override.
    pub async fn delete_event(&self, user_id: &UserId, event_id: &EventId) -> Result<(), ApiError> {
        let event = self
            .store
            .get_event(event_id)
            .await
            .map_err(|e| not_found(e, "event not found"))?;
        if event.created_by != *user_id {
            return Err(ApiError::Forbidden(
                "only the author can delete this event".to_string(),
            ));
        }
        Ok(self.store.delete_event(event_id).await?)
    }

    // ───────────────────────────── Goals ──────────────────────────────────

    pub async fn list_goals(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
    ) -> Result<Vec<Goal>, ApiError> {
        self.require_block_access(user_id, block_id).await?;
        Ok(self.store.list_goals(block_id).await?)
    }

    pub async fn create_goal(
        &self,
        user_id: &UserId,
        params: &CreateGoalParams,
    ) -> Result<Goal, ApiError> {
        if params.title.trim().is_empty() {
            return Err(ApiError::BadRequest("goal title is required".to_string()));
        }
        self.require_block_access(user_id, &params.block_id).await?;
        Ok(self.store.create_goal(params).await?)
    }

    /// Any user with block access may update a goal (status changes are
    /// collaborative); deletion stays author-only.
    pub async fn update_goal(
        &self,
        user_id: &UserId,
        goal_id: &GoalId,
        params: &UpdateGoalParams,
    ) -> Result<Goal, ApiError> {
        let goal = self
            .store
            .get_goal(goal_id)
            .await
            .map_err(|e| not_found(e, "goal not found"))?;
        self.require_block_access(user_id, &goal.block_id).await?;
        self.store.update_goal(goal_id, params).await?;
        Ok(self.store.get_goal(goal_id).await?)
    }

    /// Author-only, no creator override.
    pub async fn delete_goal(&self, user_id: &UserId, goal_id: &GoalId) -> Result<(), ApiError> {
        let goal = self
            .store
            .get_goal(goal_id)
            .await
            .map_err(|e| not_found(e, "goal not found"))?;
        if goal.created_by != *user_id {
            return Err(ApiError::Forbidden(
                "only the author can delete this goal".to_string(),
            ));
        }
        Ok(self.store.delete_goal(goal_id).await?)
    }

    // The materialized creator row means a pod role lookup works for
    // creators too; exposed for handlers that report the caller's role.
    pub async fn pod_role(
        &self,
        user_id: &UserId,
        pod_id: &PodId,
    ) -> Result<Option<PodRole>, ApiError> {
        match self.store.get_pod_member(pod_id, user_id).await {
            Ok(m) => Ok(Some(m.role)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Replace a store-level NotFound with an entity-specific message; other
/// errors pass through.
fn not_found(e: StoreError, message: &'static str) -> ApiError {
    match e {
        StoreError::NotFound => ApiError::NotFound(message),
        other => other.into(),
    }
}
