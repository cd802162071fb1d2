//! The visibility rule and its typed projections.
//!
//! A viewer sees a member iff `member.level <= viewer.level`. The rule is
//! enforced structurally: handlers never serialise a [`Member`] directly,
//! only the projections here, and the public projection has no email field
//! to leak. Invisible members read as absent, never as redacted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::level::Level;
use super::member::{EmailAddress, Member, MemberId, MemberStatus, Username};

/// Full projection of a member, served to admin-tier viewers and to the
/// member themselves.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FullMember {
    /// Unique identifier.
    pub id: MemberId,
    /// Sign-in handle.
    pub username: Username,
    /// Contact address, when registered.
    pub email: Option<EmailAddress>,
    /// Current membership level.
    pub level: Level,
    /// Account standing.
    pub status: MemberStatus,
    /// Inviter, absent for the founding member.
    pub invited_by_user_id: Option<MemberId>,
    /// Moment the member joined.
    pub created_at: DateTime<Utc>,
}

/// Projection of a member for viewers below the admin tier.
///
/// Structurally identical to [`FullMember`] minus the contact address.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicMember {
    /// Unique identifier.
    pub id: MemberId,
    /// Sign-in handle.
    pub username: Username,
    /// Current membership level.
    pub level: Level,
    /// Account standing.
    pub status: MemberStatus,
    /// Inviter, absent for the founding member.
    pub invited_by_user_id: Option<MemberId>,
    /// Moment the member joined.
    pub created_at: DateTime<Utc>,
}

/// A sanitised member, shaped by the viewer's level.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum MemberView {
    /// Served to admin-tier viewers.
    Full(FullMember),
    /// Served to everyone else.
    Public(PublicMember),
}

impl MemberView {
    /// Identifier of the projected member.
    pub fn id(&self) -> MemberId {
        match self {
            Self::Full(member) => member.id,
            Self::Public(member) => member.id,
        }
    }

    /// Level of the projected member.
    pub fn level(&self) -> Level {
        match self {
            Self::Full(member) => member.level,
            Self::Public(member) => member.level,
        }
    }

    /// Handle of the projected member.
    pub fn username(&self) -> &Username {
        match self {
            Self::Full(member) => &member.username,
            Self::Public(member) => &member.username,
        }
    }
}

impl From<&Member> for FullMember {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id(),
            username: member.username().clone(),
            email: member.email().cloned(),
            level: member.level(),
            status: member.status(),
            invited_by_user_id: member.invited_by(),
            created_at: member.created_at(),
        }
    }
}

impl From<&Member> for PublicMember {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id(),
            username: member.username().clone(),
            level: member.level(),
            status: member.status(),
            invited_by_user_id: member.invited_by(),
            created_at: member.created_at(),
        }
    }
}

/// Whether `member` exists from the viewer's vantage point.
pub fn can_see(viewer_level: Level, member: &Member) -> bool {
    member.level() <= viewer_level
}

/// Project a member for a viewer.
///
/// Callers must have established visibility (or self-access) first; this
/// only chooses the projection shape.
pub fn sanitize(viewer_level: Level, member: &Member) -> MemberView {
    if viewer_level.is_admin() {
        MemberView::Full(FullMember::from(member))
    } else {
        MemberView::Public(PublicMember::from(member))
    }
}

/// Drop invisible members, then project the rest.
pub fn filter_and_sanitize(viewer_level: Level, members: &[Member]) -> Vec<MemberView> {
    members
        .iter()
        .filter(|member| can_see(viewer_level, member))
        .map(|member| sanitize(viewer_level, member))
        .collect()
}

/// Member count at one level of the distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct LevelCount {
    /// The level counted.
    pub level: Level,
    /// Members currently at that level.
    pub count: u64,
}

/// Level distribution truncated at the viewer's level.
///
/// Levels above the viewer are absent entirely rather than reported as
/// zero, so the shape itself leaks nothing about higher tiers.
pub fn visible_level_distribution(viewer_level: Level, members: &[Member]) -> Vec<LevelCount> {
    Level::all()
        .filter(|level| *level <= viewer_level)
        .map(|level| LevelCount {
            level,
            count: members
                .iter()
                .filter(|member| member.level() == level)
                .count() as u64,
        })
        .collect()
}
