//! Append-only level history.
//!
//! Every level mutation flows through one command, [`LevelChange`], and every
//! applied command leaves a [`LevelChangeRecord`]. The ledger is never
//! rewritten; corrections are new entries.

use chrono::{DateTime, Utc};

use super::ids::define_id;
use super::level::Level;
use super::member::MemberId;

define_id! {
    /// Identifier of a level history record.
    pub struct HistoryId;
}

/// Command describing a level mutation.
///
/// `expected_level` makes the write conditional: when set, the store applies
/// the change only if the member still sits at that level, so decisions made
/// against stale reads fail instead of clobbering a concurrent change.
#[derive(Debug, Clone)]
pub struct LevelChange {
    /// Member whose level changes.
    pub member_id: MemberId,
    /// Level the caller observed during validation, if any.
    pub expected_level: Option<Level>,
    /// Level to move the member to.
    pub new_level: Level,
    /// Member responsible for the change.
    pub changed_by: MemberId,
    /// Audit trail entry explaining the change.
    pub reason: String,
}

/// One entry in a member's level ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelChangeRecord {
    id: HistoryId,
    member_id: MemberId,
    previous_level: Level,
    new_level: Level,
    changed_by: MemberId,
    reason: String,
    created_at: DateTime<Utc>,
}

impl LevelChangeRecord {
    /// Materialise the ledger entry for an applied change.
    pub fn from_change(
        id: HistoryId,
        previous_level: Level,
        change: &LevelChange,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            member_id: change.member_id,
            previous_level,
            new_level: change.new_level,
            changed_by: change.changed_by,
            reason: change.reason.clone(),
            created_at,
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> HistoryId {
        self.id
    }

    /// Member the entry belongs to.
    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    /// Level before the change.
    pub fn previous_level(&self) -> Level {
        self.previous_level
    }

    /// Level after the change.
    pub fn new_level(&self) -> Level {
        self.new_level
    }

    /// Member responsible for the change.
    pub fn changed_by(&self) -> MemberId {
        self.changed_by
    }

    /// Why the change happened.
    pub fn reason(&self) -> &str {
        self.reason.as_str()
    }

    /// Moment the change was applied.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
