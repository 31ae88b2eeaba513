//! Block and block membership types.

use chrono::{DateTime, Utc};

use super::{BlockId, PodId, UserId};

/// The kind of content a block holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockType {
    Chat,
    Docs,
    Meetings,
    Calendar,
    Goals,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Chat => "chat",
            BlockType::Docs => "docs",
            BlockType::Meetings => "meetings",
            BlockType::Calendar => "calendar",
            BlockType::Goals => "goals",
        }
    }
}

impl std::str::FromStr for BlockType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(BlockType::Chat),
            "docs" => Ok(BlockType::Docs),
            "meetings" => Ok(BlockType::Meetings),
            "calendar" => Ok(BlockType::Calendar),
            "goals" => Ok(BlockType::Goals),
            other => Err(format!("unknown block type: {other}")),
        }
    }
}

/// Block record. `pod_id` is immutable after creation.
///
/// `x`/`y` are canvas coordinates — presentation state, never consulted by
/// authorization.
#[derive(Clone, Debug)]
pub struct Block {
    pub id: BlockId,
    pub pod_id: PodId,
    pub block_type: BlockType,
    pub label: String,
    pub description: Option<String>,
    pub x: f64,
    pub y: f64,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a block.
///
/// The creator's block membership row is inserted atomically with the block
/// (the evaluator grants the creator access regardless; the row exists so
/// member listings include them).
#[derive(Clone, Debug)]
pub struct CreateBlockParams {
    pub pod_id: PodId,
    pub block_type: BlockType,
    pub label: String,
    pub description: Option<String>,
    pub x: f64,
    pub y: f64,
    pub creator_id: UserId,
}

/// Block membership record. Rows are additional grantees beyond the creator.
#[derive(Clone, Debug)]
pub struct BlockMember {
    pub block_id: BlockId,
    pub user_id: UserId,
    pub added_at: DateTime<Utc>,
}

/// Read-side projection of a block member with profile fields joined in.
#[derive(Clone, Debug)]
pub struct BlockMemberView {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub added_at: DateTime<Utc>,
}
