//! Driving port for invite link creation.

use async_trait::async_trait;

use crate::domain::invite::{InviteId, InviteLink, InviteToken, NewInviteLink};
use crate::domain::member::MemberId;
use crate::domain::Error;

/// Domain use-case port for creating invite links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InviteCommand: Send + Sync {
    /// Mint a single-use invite link owned by the caller.
    async fn create_link(&self, owner: MemberId) -> Result<InviteLink, Error>;
}

/// Temporary fixture command used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInviteCommand;

#[async_trait]
impl InviteCommand for FixtureInviteCommand {
    async fn create_link(&self, owner: MemberId) -> Result<InviteLink, Error> {
        Ok(InviteLink::create(
            NewInviteLink {
                id: InviteId::random(),
                token: InviteToken::generate(),
                invited_by: owner,
                max_uses: Some(1),
            },
            chrono::Utc::now(),
        ))
    }
}
