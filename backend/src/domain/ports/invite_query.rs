//! Driving port for invite link queries.
//!
//! Covers the owner's link listing and the public pre-registration check a
//! prospective member runs before submitting the registration form.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::invite::{InviteId, InviteLink, InviteStatus, InviteToken};
use crate::domain::member::{MemberId, Username};
use crate::domain::Error;

/// One of the caller's invite links, with the redeemer's handle resolved.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteLinkSummary {
    /// Link identifier.
    pub id: InviteId,
    /// Redeemable token.
    pub token: InviteToken,
    /// Owning member.
    pub invited_by_user_id: MemberId,
    /// Permitted redemptions, unlimited when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    /// Redemptions so far.
    pub uses_count: u32,
    /// Lifecycle state.
    pub status: InviteStatus,
    /// Most recent redeemer, once redeemed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_by_user_id: Option<MemberId>,
    /// Most recent redeemer's handle, when resolvable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_by_name: Option<Username>,
    /// Moment the link was minted.
    pub created_at: DateTime<Utc>,
}

impl InviteLinkSummary {
    /// Combine a link with its resolved redeemer handle.
    pub fn from_link(link: &InviteLink, used_by_name: Option<Username>) -> Self {
        Self {
            id: link.id(),
            token: link.token().clone(),
            invited_by_user_id: link.invited_by(),
            max_uses: link.max_uses(),
            uses_count: link.uses_count(),
            status: link.status(),
            used_by_user_id: link.used_by(),
            used_by_name,
            created_at: link.created_at(),
        }
    }
}

/// Pre-registration view of an invite link.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitePreview {
    /// Always true; invalid links are reported as errors instead.
    pub valid: bool,
    /// Handle of the member who issued the invite.
    pub inviter_name: String,
}

/// Domain use-case port for reading invite links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InviteQuery: Send + Sync {
    /// The caller's own links, newest first.
    async fn list_links(&self, owner: MemberId) -> Result<Vec<InviteLinkSummary>, Error>;

    /// Check a token before registration.
    ///
    /// Links that do not exist, are not active, or have no remaining uses
    /// are all reported as absent, so the response never distinguishes a
    /// spent link from a fabricated token.
    async fn preview(&self, token: &InviteToken) -> Result<InvitePreview, Error>;
}

/// Temporary fixture query used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInviteQuery;

#[async_trait]
impl InviteQuery for FixtureInviteQuery {
    async fn list_links(&self, _owner: MemberId) -> Result<Vec<InviteLinkSummary>, Error> {
        Ok(Vec::new())
    }

    async fn preview(&self, _token: &InviteToken) -> Result<InvitePreview, Error> {
        Err(Error::not_found("Invalid or expired invite link"))
    }
}
