//! Pod and pod membership types.

use chrono::{DateTime, Utc};

use super::{PodId, UserId};

/// Role of a user within a pod.
///
/// There is no promotion or demotion path: the creator role is assigned
/// exactly once, atomically with pod creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PodRole {
    Creator,
    Member,
}

impl PodRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PodRole::Creator => "creator",
            PodRole::Member => "member",
        }
    }
}

impl std::str::FromStr for PodRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creator" => Ok(PodRole::Creator),
            "member" => Ok(PodRole::Member),
            other => Err(format!("unknown pod role: {other}")),
        }
    }
}

/// Pod (tenant) record.
#[derive(Clone, Debug)]
pub struct Pod {
    pub id: PodId,
    pub name: String,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a pod.
///
/// The creator's membership row (role = creator) is inserted atomically with
/// the pod itself.
#[derive(Clone, Debug)]
pub struct CreatePodParams {
    pub name: String,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    pub creator_id: UserId,
}

/// Pod membership record.
#[derive(Clone, Debug)]
pub struct PodMember {
    pub pod_id: PodId,
    pub user_id: UserId,
    pub role: PodRole,
    pub joined_at: DateTime<Utc>,
}

/// A pod as seen by one of its members (membership joined in).
#[derive(Clone, Debug)]
pub struct PodSummary {
    pub pod: Pod,
    pub role: PodRole,
}

/// Read-side projection of a pod member with profile fields joined in.
#[derive(Clone, Debug)]
pub struct PodMemberView {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub role: PodRole,
    pub joined_at: DateTime<Utc>,
}
