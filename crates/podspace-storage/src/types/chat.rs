//! Chat message and read-cursor types.

use chrono::{DateTime, Utc};

use super::{BlockId, MessageId, UserId};

/// Chat message record.
#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub id: MessageId,
    pub block_id: BlockId,
    pub user_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Read-side projection of a message with author profile fields joined in.
#[derive(Clone, Debug)]
pub struct ChatMessageView {
    pub id: MessageId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub user_profile_picture: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Per-(user, block) unread cursor: one row instead of a read flag per
/// message. Unique on (user_id, block_id).
#[derive(Clone, Debug)]
pub struct ReadCursor {
    pub user_id: UserId,
    pub block_id: BlockId,
    pub last_read_message_id: MessageId,
    pub last_read_at: DateTime<Utc>,
}
