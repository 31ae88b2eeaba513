//! Strongly-typed identifiers (avoid mixing strings/UUIDs arbitrarily).

use uuid::Uuid;

/// User identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

/// Pod (tenant) identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PodId(pub Uuid);

/// Block identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(pub Uuid);

/// Invitation identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InvitationId(pub Uuid);

/// Chat message identifier.
///
/// Monotonically increasing in creation order within a block (backed by an
/// auto-incrementing column). The unread cursor's "after" comparison is a
/// total-order comparison on this value, never on timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub i64);

/// Document metadata identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentId(pub Uuid);

/// Calendar event identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

/// Goal identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GoalId(pub Uuid);
