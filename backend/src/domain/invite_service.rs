//! Invite link service.
//!
//! Minting links, listing a member's own links, and the public pre-signup
//! preview. The preview deliberately collapses every failure into the same
//! absent answer so a probing client learns nothing about which tokens
//! exist.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::invite::{InviteId, InviteLink, InviteToken, NewInviteLink};
use crate::domain::member::MemberId;
use crate::domain::ports::{
    DirectoryRepository, InviteCommand, InviteLinkSummary, InvitePreview, InviteQuery,
    InviteRepository,
};
use crate::domain::service_support::{
    check_redeemable, map_directory_error, map_invite_error, require_active, require_member,
};

/// Implements [`InviteCommand`] and [`InviteQuery`] over the directory and
/// invite stores.
#[derive(Clone)]
pub struct InviteService<D, I> {
    directory: Arc<D>,
    invites: Arc<I>,
}

impl<D, I> InviteService<D, I>
where
    D: DirectoryRepository,
    I: InviteRepository,
{
    /// Build the service over its stores.
    pub fn new(directory: Arc<D>, invites: Arc<I>) -> Self {
        Self { directory, invites }
    }
}

#[async_trait]
impl<D, I> InviteCommand for InviteService<D, I>
where
    D: DirectoryRepository,
    I: InviteRepository,
{
    async fn create_link(&self, owner_id: MemberId) -> Result<InviteLink, Error> {
        let owner = require_member(self.directory.as_ref(), owner_id).await?;
        require_active(&owner)?;
        let draft = NewInviteLink {
            id: InviteId::random(),
            token: InviteToken::generate(),
            invited_by: owner.id(),
            max_uses: Some(1),
        };
        let link = self
            .invites
            .insert_link(draft)
            .await
            .map_err(map_invite_error)?;
        info!(link_id = %link.id(), owner_id = %owner.id(), "invite link created");
        Ok(link)
    }
}

#[async_trait]
impl<D, I> InviteQuery for InviteService<D, I>
where
    D: DirectoryRepository,
    I: InviteRepository,
{
    async fn list_links(&self, owner_id: MemberId) -> Result<Vec<InviteLinkSummary>, Error> {
        let owner = require_member(self.directory.as_ref(), owner_id).await?;
        let links = self
            .invites
            .list_by_owner(&owner.id())
            .await
            .map_err(map_invite_error)?;
        let mut summaries = Vec::with_capacity(links.len());
        for link in &links {
            // The redeemer's handle is shown to the link's owner regardless
            // of level: the invitation relationship precedes levels.
            let used_by_name = match link.used_by() {
                Some(redeemer_id) => self
                    .directory
                    .find_member(&redeemer_id)
                    .await
                    .map_err(map_directory_error)?
                    .map(|member| member.username().clone()),
                None => None,
            };
            summaries.push(InviteLinkSummary::from_link(link, used_by_name));
        }
        Ok(summaries)
    }

    async fn preview(&self, token: &InviteToken) -> Result<InvitePreview, Error> {
        let link = self
            .invites
            .find_by_token(token)
            .await
            .map_err(map_invite_error)?
            .ok_or_else(|| Error::not_found("Invalid or expired invite link"))?;
        if check_redeemable(&link).is_err() {
            return Err(Error::not_found("Invalid or expired invite link"));
        }
        let inviter_name = self
            .directory
            .find_member(&link.invited_by())
            .await
            .map_err(map_directory_error)?
            .map_or_else(
                || "Unknown".to_owned(),
                |member| member.username().as_str().to_owned(),
            );
        Ok(InvitePreview {
            valid: true,
            inviter_name,
        })
    }
}

#[cfg(test)]
#[path = "invite_service_tests.rs"]
mod tests;
