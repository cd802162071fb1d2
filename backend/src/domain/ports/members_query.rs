//! Driving port for member directory queries.
//!
//! Inbound adapters use this port to read visibility-filtered member data.
//! Every method takes the viewer's id and resolves it internally, so callers
//! never pass pre-fetched member rows across the boundary. A viewer id that
//! no longer resolves yields `Unauthorized`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::audit::{HistoryId, LevelChangeRecord};
use crate::domain::member::MemberId;
use crate::domain::visibility::{FullMember, MemberView};
use crate::domain::{Error, Level};

/// A member's directory page: the member, their inviter, and their invitees.
///
/// The inviter is present only when visible to the viewer, and the invitee
/// list and count cover visible invitees only.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    /// The requested member, sanitized for the viewer.
    pub member: MemberView,
    /// Who invited them, when that member is visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inviter: Option<MemberView>,
    /// Visible members they invited.
    pub invitees: Vec<MemberView>,
    /// Number of visible invitees.
    pub invite_count: u64,
}

/// The authenticated member's own page.
///
/// Members always see their own full projection regardless of level.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnProfile {
    /// The member themselves, never sanitized.
    pub member: FullMember,
    /// Who invited them, when that member is visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inviter: Option<MemberView>,
    /// Number of visible invitees.
    pub invite_count: u64,
}

/// One entry of a member's level ledger.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelHistoryEntry {
    /// Ledger entry identifier.
    pub id: HistoryId,
    /// Member whose level changed.
    pub member_id: MemberId,
    /// Level before the change.
    pub previous_level: Level,
    /// Level after the change.
    pub new_level: Level,
    /// Member who effected the change, when visible to the viewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<MemberId>,
    /// Recorded explanation.
    pub reason: String,
    /// Moment the change landed.
    pub created_at: DateTime<Utc>,
}

impl LevelHistoryEntry {
    /// Project a ledger record, keeping the actor only when visible.
    pub fn from_record(record: &LevelChangeRecord, actor_visible: bool) -> Self {
        Self {
            id: record.id(),
            member_id: record.member_id(),
            previous_level: record.previous_level(),
            new_level: record.new_level(),
            changed_by: actor_visible.then(|| record.changed_by()),
            reason: record.reason().to_owned(),
            created_at: record.created_at(),
        }
    }
}

/// Domain use-case port for reading the member directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembersQuery: Send + Sync {
    /// The viewer's own page.
    async fn own_profile(&self, viewer: MemberId) -> Result<OwnProfile, Error>;

    /// Visible members, optionally restricted to one level, newest first.
    ///
    /// Asking for a level above the viewer's own yields an empty list, not
    /// an error, so the response never confirms the tier is populated.
    async fn list_members(
        &self,
        viewer: MemberId,
        level: Option<Level>,
    ) -> Result<Vec<MemberView>, Error>;

    /// One member's page. Invisible members are reported as absent.
    async fn member_profile(
        &self,
        viewer: MemberId,
        id: MemberId,
    ) -> Result<MemberProfile, Error>;

    /// Visible invitees of a visible member, newest first.
    async fn member_invitees(
        &self,
        viewer: MemberId,
        id: MemberId,
    ) -> Result<Vec<MemberView>, Error>;

    /// Level ledger of a visible member, newest first.
    async fn level_history(
        &self,
        viewer: MemberId,
        id: MemberId,
    ) -> Result<Vec<LevelHistoryEntry>, Error>;
}

/// Temporary fixture query used until persistence is wired.
///
/// Behaves like an empty directory: no viewer resolves to a member.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMembersQuery;

#[async_trait]
impl MembersQuery for FixtureMembersQuery {
    async fn own_profile(&self, viewer: MemberId) -> Result<OwnProfile, Error> {
        Err(Error::unauthorized(format!("member {viewer} not found")))
    }

    async fn list_members(
        &self,
        _viewer: MemberId,
        _level: Option<Level>,
    ) -> Result<Vec<MemberView>, Error> {
        Ok(Vec::new())
    }

    async fn member_profile(
        &self,
        _viewer: MemberId,
        id: MemberId,
    ) -> Result<MemberProfile, Error> {
        Err(Error::not_found(format!("member {id} not found")))
    }

    async fn member_invitees(
        &self,
        _viewer: MemberId,
        _id: MemberId,
    ) -> Result<Vec<MemberView>, Error> {
        Ok(Vec::new())
    }

    async fn level_history(
        &self,
        _viewer: MemberId,
        _id: MemberId,
    ) -> Result<Vec<LevelHistoryEntry>, Error> {
        Ok(Vec::new())
    }
}
