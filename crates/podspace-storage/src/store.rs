//! The Store trait that backends implement.

use chrono::{DateTime, Utc};

use crate::types::*;
use crate::StoreError;

/// The storage trait the server depends on.
///
/// Methods are persistence primitives only: membership rules, the unread
/// algorithm, and the invitation state machine live above this trait so the
/// access rules are defined (and tested) once.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ───────────────────────────────────── Users ──────────────────────────────────────────

    /// Create a new user (returns generated ID).
    async fn create_user(&self, params: &CreateUserParams) -> Result<UserId, StoreError>;

    /// Get user by email.
    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError>;

    /// Get user by ID.
    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, StoreError>;

    // ───────────────────────────────────── Sessions ───────────────────────────────────────

    /// Record an opaque session token for a user.
    async fn create_session(&self, user_id: &UserId, token: &str) -> Result<(), StoreError>;

    /// Resolve a session token to the user it belongs to.
    async fn get_session_user(&self, token: &str) -> Result<UserId, StoreError>;

    // ───────────────────────────────────── Pods ───────────────────────────────────────────

    /// Create a pod and its creator membership row (role = creator) atomically.
    async fn create_pod(&self, params: &CreatePodParams) -> Result<PodId, StoreError>;

    /// Get pod by ID.
    async fn get_pod(&self, pod_id: &PodId) -> Result<Pod, StoreError>;

    /// Update pod fields (None = leave unchanged).
    async fn update_pod(
        &self,
        pod_id: &PodId,
        name: Option<String>,
        tagline: Option<String>,
        logo_url: Option<String>,
    ) -> Result<(), StoreError>;

    /// Delete a pod and every dependent row (blocks, memberships, messages,
    /// documents, events, goals, invitations, read cursors) atomically.
    async fn delete_pod(&self, pod_id: &PodId) -> Result<(), StoreError>;

    /// List all pods a user is a member of, with their role joined in.
    async fn list_pods_for_user(&self, user_id: &UserId) -> Result<Vec<PodSummary>, StoreError>;

    // ───────────────────────────────────── Pod members ────────────────────────────────────

    /// Get a user's membership in a pod.
    async fn get_pod_member(
        &self,
        pod_id: &PodId,
        user_id: &UserId,
    ) -> Result<PodMember, StoreError>;

    /// Add a membership row (unique per (pod, user)).
    async fn add_pod_member(
        &self,
        pod_id: &PodId,
        user_id: &UserId,
        role: PodRole,
    ) -> Result<(), StoreError>;

    /// List pod members with profile fields joined in.
    async fn list_pod_members(&self, pod_id: &PodId) -> Result<Vec<PodMemberView>, StoreError>;

    /// Count members of a pod.
    async fn count_pod_members(&self, pod_id: &PodId) -> Result<i64, StoreError>;

    // ───────────────────────────────────── Invitations ────────────────────────────────────

    /// Create an invitation (token uniqueness enforced by constraint).
    async fn create_invitation(
        &self,
        params: &CreateInvitationParams,
    ) -> Result<Invitation, StoreError>;

    /// Get invitation by token.
    async fn get_invitation_by_token(&self, token: &str) -> Result<Invitation, StoreError>;

    /// Find a pending invitation for (pod, email), if any.
    async fn find_pending_invitation(
        &self,
        pod_id: &PodId,
        email: &str,
    ) -> Result<Option<Invitation>, StoreError>;

    /// Mark an invitation accepted without touching memberships (used when
    /// the invitee already joined through another path).
    async fn mark_invitation_accepted(
        &self,
        invitation_id: &InvitationId,
    ) -> Result<(), StoreError>;

    /// Redeem an invitation: insert the member row (role = member) and mark
    /// the invitation accepted as a single atomic unit.
    async fn redeem_invitation(
        &self,
        invitation_id: &InvitationId,
        pod_id: &PodId,
        user_id: &UserId,
    ) -> Result<(), StoreError>;

    // ───────────────────────────────────── Blocks ─────────────────────────────────────────

    /// Create a block and its creator's block membership row atomically.
    async fn create_block(&self, params: &CreateBlockParams) -> Result<BlockId, StoreError>;

    /// Get block by ID.
    async fn get_block(&self, block_id: &BlockId) -> Result<Block, StoreError>;

    /// List all blocks in a pod, newest first.
    async fn list_blocks(&self, pod_id: &PodId) -> Result<Vec<Block>, StoreError>;

    /// List all chat-type blocks across a set of pods.
    async fn list_chat_blocks_for_pods(&self, pod_ids: &[PodId])
        -> Result<Vec<Block>, StoreError>;

    /// Delete a block and every dependent row (memberships, messages,
    /// documents, events, goals, read cursors) atomically.
    async fn delete_block(&self, block_id: &BlockId) -> Result<(), StoreError>;

    // ───────────────────────────────────── Block members ──────────────────────────────────

    /// Get a user's membership in a block.
    async fn get_block_member(
        &self,
        block_id: &BlockId,
        user_id: &UserId,
    ) -> Result<BlockMember, StoreError>;

    /// Add a block membership row (unique per (block, user)).
    async fn add_block_member(
        &self,
        block_id: &BlockId,
        user_id: &UserId,
    ) -> Result<(), StoreError>;

    /// List block members with profile fields joined in.
    async fn list_block_members(
        &self,
        block_id: &BlockId,
    ) -> Result<Vec<BlockMemberView>, StoreError>;

    // ───────────────────────────────────── Chat messages ──────────────────────────────────

    /// Append a message; the generated ID is the block-local ordering key.
    async fn create_message(
        &self,
        block_id: &BlockId,
        user_id: &UserId,
        body: &str,
    ) -> Result<ChatMessage, StoreError>;

    /// Get a message by ID.
    async fn get_message(&self, message_id: &MessageId) -> Result<ChatMessage, StoreError>;

    /// List all messages in a block, oldest first, with author profile joined.
    async fn list_messages(&self, block_id: &BlockId) -> Result<Vec<ChatMessageView>, StoreError>;

    /// Delete a message.
    async fn delete_message(&self, message_id: &MessageId) -> Result<(), StoreError>;

    /// ID of the most recently created message in a block, if any.
    async fn latest_message_id(&self, block_id: &BlockId)
        -> Result<Option<MessageId>, StoreError>;

    /// Count messages in a block whose ID sorts strictly after `after`
    /// (all messages when `after` is None), excluding those authored by
    /// `exclude_author`.
    async fn count_messages_after(
        &self,
        block_id: &BlockId,
        after: Option<MessageId>,
        exclude_author: &UserId,
    ) -> Result<i64, StoreError>;

    // ───────────────────────────────────── Read cursors ───────────────────────────────────

    /// Get a user's read cursor for a block, if one exists.
    async fn get_read_cursor(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
    ) -> Result<Option<ReadCursor>, StoreError>;

    /// Last-write-wins upsert of the (user, block) cursor.
    async fn upsert_read_cursor(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
        message_id: MessageId,
        read_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    // ───────────────────────────────────── Documents ──────────────────────────────────────

    /// Record uploaded document metadata.
    async fn create_document(
        &self,
        params: &CreateDocumentParams,
    ) -> Result<DocumentMeta, StoreError>;

    /// Get document metadata by ID.
    async fn get_document(&self, document_id: &DocumentId) -> Result<DocumentMeta, StoreError>;

    /// List documents in a block, newest first.
    async fn list_documents(&self, block_id: &BlockId) -> Result<Vec<DocumentMeta>, StoreError>;

    /// Delete document metadata.
    async fn delete_document(&self, document_id: &DocumentId) -> Result<(), StoreError>;

    // ───────────────────────────────────── Calendar events ────────────────────────────────

    /// Create a calendar event.
    async fn create_event(&self, params: &CreateEventParams) -> Result<CalendarEvent, StoreError>;

    /// Get an event by ID.
    async fn get_event(&self, event_id: &EventId) -> Result<CalendarEvent, StoreError>;

    /// List events in a block, soonest first.
    async fn list_events(&self, block_id: &BlockId) -> Result<Vec<CalendarEvent>, StoreError>;

    /// Delete an event.
    async fn delete_event(&self, event_id: &EventId) -> Result<(), StoreError>;

    // ───────────────────────────────────── Goals ──────────────────────────────────────────

    /// Create a goal.
    async fn create_goal(&self, params: &CreateGoalParams) -> Result<Goal, StoreError>;

    /// Get a goal by ID.
    async fn get_goal(&self, goal_id: &GoalId) -> Result<Goal, StoreError>;

    /// List goals in a block, newest first.
    async fn list_goals(&self, block_id: &BlockId) -> Result<Vec<Goal>, StoreError>;

    /// Update goal fields.
    async fn update_goal(
        &self,
        goal_id: &GoalId,
        params: &UpdateGoalParams,
    ) -> Result<(), StoreError>;

    /// Delete a goal.
    async fn delete_goal(&self, goal_id: &GoalId) -> Result<(), StoreError>;
}
