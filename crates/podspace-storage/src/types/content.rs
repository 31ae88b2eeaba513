//! Content entities scoped to a block: documents, calendar events, goals.
//!
//! The blob behind a document lives in external storage; only the metadata
//! row (and its authorization rules) is handled here.

use chrono::{DateTime, Utc};

use super::{BlockId, DocumentId, EventId, GoalId, UserId};

/// Uploaded document metadata.
#[derive(Clone, Debug)]
pub struct DocumentMeta {
    pub id: DocumentId,
    pub block_id: BlockId,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_by: UserId,
    pub uploaded_at: DateTime<Utc>,
}

/// Parameters for recording an uploaded document.
#[derive(Clone, Debug)]
pub struct CreateDocumentParams {
    pub block_id: BlockId,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_by: UserId,
}

/// Calendar event record.
#[derive(Clone, Debug)]
pub struct CalendarEvent {
    pub id: EventId,
    pub block_id: BlockId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub time: Option<String>,
    pub description: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a calendar event.
#[derive(Clone, Debug)]
pub struct CreateEventParams {
    pub block_id: BlockId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub time: Option<String>,
    pub description: Option<String>,
    pub created_by: UserId,
}

/// Goal progress status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoalStatus {
    NotStarted,
    InProgress,
    Done,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::NotStarted => "not_started",
            GoalStatus::InProgress => "in_progress",
            GoalStatus::Done => "done",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(GoalStatus::NotStarted),
            "in_progress" => Ok(GoalStatus::InProgress),
            "done" => Ok(GoalStatus::Done),
            other => Err(format!("unknown goal status: {other}")),
        }
    }
}

/// Goal record.
#[derive(Clone, Debug)]
pub struct Goal {
    pub id: GoalId,
    pub block_id: BlockId,
    pub title: String,
    pub status: GoalStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a goal.
#[derive(Clone, Debug)]
pub struct CreateGoalParams {
    pub block_id: BlockId,
    pub title: String,
    pub status: GoalStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: UserId,
}

/// Fields of a goal that may be updated after creation.
#[derive(Clone, Debug, Default)]
pub struct UpdateGoalParams {
    pub title: Option<String>,
    pub status: Option<GoalStatus>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<DateTime<Utc>>>,
}
