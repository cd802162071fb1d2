//! Port for invite link persistence.
//!
//! Redemption is a single conditional mutation: adapters re-check the link's
//! status and remaining uses inside their atomic section so concurrent
//! redeemers cannot overspend a link.

use async_trait::async_trait;

use crate::domain::invite::{InviteLink, InviteStatus, InviteToken, NewInviteLink};
use crate::domain::member::MemberId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by invite link adapters.
    pub enum InviteRepositoryError {
        /// Backing store could not serve the request.
        Unavailable { message: String } =>
            "invite store unavailable: {message}",
        /// Token does not match any link.
        UnknownToken =>
            "invite token does not match any link",
        /// Link exists but is not redeemable in its current status.
        LinkNotActive { status: InviteStatus } =>
            "invite link is {status}",
        /// Link has spent every permitted use.
        LinkExhausted =>
            "invite link has no remaining uses",
    }
}

/// Port for creating, inspecting, and redeeming invite links.
///
/// Listings are returned newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Persist a freshly generated link.
    async fn insert_link(&self, draft: NewInviteLink)
    -> Result<InviteLink, InviteRepositoryError>;

    /// Find a link by its token.
    async fn find_by_token(
        &self,
        token: &InviteToken,
    ) -> Result<Option<InviteLink>, InviteRepositoryError>;

    /// List the links a member created.
    async fn list_by_owner(
        &self,
        owner: &MemberId,
    ) -> Result<Vec<InviteLink>, InviteRepositoryError>;

    /// Consume one use of a link on behalf of the redeeming member.
    async fn redeem(
        &self,
        token: &InviteToken,
        redeemer: &MemberId,
    ) -> Result<InviteLink, InviteRepositoryError>;
}

/// Fixture implementation for tests that do not exercise invites.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInviteRepository;

#[async_trait]
impl InviteRepository for FixtureInviteRepository {
    async fn insert_link(
        &self,
        draft: NewInviteLink,
    ) -> Result<InviteLink, InviteRepositoryError> {
        Ok(InviteLink::create(draft, chrono::Utc::now()))
    }

    async fn find_by_token(
        &self,
        _token: &InviteToken,
    ) -> Result<Option<InviteLink>, InviteRepositoryError> {
        Ok(None)
    }

    async fn list_by_owner(
        &self,
        _owner: &MemberId,
    ) -> Result<Vec<InviteLink>, InviteRepositoryError> {
        Ok(Vec::new())
    }

    async fn redeem(
        &self,
        _token: &InviteToken,
        _redeemer: &MemberId,
    ) -> Result<InviteLink, InviteRepositoryError> {
        Err(InviteRepositoryError::unknown_token())
    }
}
