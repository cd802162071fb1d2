//! Registration and login service.
//!
//! Covers the whole front door: the founder path for an empty directory,
//! invite-gated registration for everyone else, and username login. The
//! founder path is decided per call, so two racing first registrations
//! serialise in the store and the loser falls back to the invited path when
//! it carried a token.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::level::Level;
use crate::domain::member::{Member, MemberId, NewMember, Username};
use crate::domain::ports::{
    DirectoryRepository, DirectoryRepositoryError, InviteRepository, LoginService,
    MemberOnboarding, NewRegistration,
};
use crate::domain::service_support::{check_redeemable, map_directory_error, map_invite_error};

/// Implements [`MemberOnboarding`] and [`LoginService`] over the directory
/// and invite stores.
#[derive(Clone)]
pub struct RegistrationService<D, I> {
    directory: Arc<D>,
    invites: Arc<I>,
}

impl<D, I> RegistrationService<D, I>
where
    D: DirectoryRepository,
    I: InviteRepository,
{
    /// Build the service over its stores.
    pub fn new(directory: Arc<D>, invites: Arc<I>) -> Self {
        Self { directory, invites }
    }

    /// Admit the registrant as the founding admin.
    ///
    /// Returns `Ok(None)` when another registration founded the directory
    /// first and this one carried an invite token to fall back on.
    async fn register_founder(
        &self,
        registration: &NewRegistration,
    ) -> Result<Option<Member>, Error> {
        let draft = NewMember {
            id: MemberId::random(),
            username: registration.username.clone(),
            email: registration.email.clone(),
            level: Level::ADMIN,
            invited_by: None,
        };
        match self.directory.insert_founding_member(draft).await {
            Ok(member) => {
                info!(member_id = %member.id(), "founding member registered");
                Ok(Some(member))
            }
            Err(DirectoryRepositoryError::DirectoryNotEmpty)
                if registration.invite_token.is_some() =>
            {
                Ok(None)
            }
            Err(error) => Err(map_directory_error(error)),
        }
    }

    /// Admit the registrant through an invite link at the lowest level.
    async fn register_invited(&self, registration: NewRegistration) -> Result<Member, Error> {
        let NewRegistration {
            username,
            email,
            invite_token,
        } = registration;
        let Some(token) = invite_token else {
            return Err(Error::validation_error("inviteToken is required"));
        };

        let link = self
            .invites
            .find_by_token(&token)
            .await
            .map_err(map_invite_error)?
            .ok_or_else(|| Error::not_found("Invalid or expired invite link"))?;
        check_redeemable(&link)?;

        if self
            .directory
            .is_username_taken(&username)
            .await
            .map_err(map_directory_error)?
        {
            return Err(Error::conflict("Username is already taken"));
        }
        if let Some(address) = &email {
            if self
                .directory
                .is_email_taken(address)
                .await
                .map_err(map_directory_error)?
            {
                return Err(Error::conflict("Email is already registered"));
            }
        }

        // The member id is minted before redemption so the link records its
        // redeemer. A duplicate insert after this point burns the use.
        let member_id = MemberId::random();
        let link = self
            .invites
            .redeem(&token, &member_id)
            .await
            .map_err(map_invite_error)?;

        let draft = NewMember {
            id: member_id,
            username,
            email,
            level: Level::MIN,
            invited_by: Some(link.invited_by()),
        };
        let member = self
            .directory
            .insert_member(draft)
            .await
            .map_err(map_directory_error)?;
        info!(
            member_id = %member.id(),
            inviter_id = %link.invited_by(),
            "member registered through invite"
        );
        Ok(member)
    }
}

#[async_trait]
impl<D, I> MemberOnboarding for RegistrationService<D, I>
where
    D: DirectoryRepository,
    I: InviteRepository,
{
    async fn setup_required(&self) -> Result<bool, Error> {
        let count = self
            .directory
            .member_count()
            .await
            .map_err(map_directory_error)?;
        Ok(count == 0)
    }

    async fn register(&self, registration: NewRegistration) -> Result<Member, Error> {
        if self.setup_required().await? {
            if let Some(member) = self.register_founder(&registration).await? {
                return Ok(member);
            }
        }
        self.register_invited(registration).await
    }
}

#[async_trait]
impl<D, I> LoginService for RegistrationService<D, I>
where
    D: DirectoryRepository,
    I: InviteRepository,
{
    async fn authenticate(&self, username: &Username) -> Result<Member, Error> {
        let member = self
            .directory
            .find_member_by_username(username)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::unauthorized("Invalid username"))?;
        if !member.is_active() {
            return Err(Error::forbidden("Account is not active"));
        }
        Ok(member)
    }
}

#[cfg(test)]
#[path = "registration_service_tests.rs"]
mod tests;
