//! Invitation types.

use chrono::{DateTime, Utc};

use super::{InvitationId, PodId, UserId};

/// Invitation status. `pending → accepted` is the only written transition;
/// expiry is computed lazily from `expires_at`, never written by a sweeper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Expired => "expired",
        }
    }
}

impl std::str::FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "expired" => Ok(InvitationStatus::Expired),
            other => Err(format!("unknown invitation status: {other}")),
        }
    }
}

/// Invitation record. `token` is globally unique (enforced by a uniqueness
/// constraint, not generation-time collision checks).
#[derive(Clone, Debug)]
pub struct Invitation {
    pub id: InvitationId,
    pub pod_id: PodId,
    pub email: String,
    pub token: String,
    pub invited_by: UserId,
    pub status: InvitationStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// An invitation is redeemable only while pending and unexpired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now || self.status != InvitationStatus::Pending
    }
}

/// Parameters for creating an invitation.
#[derive(Clone, Debug)]
pub struct CreateInvitationParams {
    pub pod_id: PodId,
    pub email: String,
    pub token: String,
    pub invited_by: UserId,
    pub expires_at: DateTime<Utc>,
}
