//! Shared plumbing for the domain services.
//!
//! Maps driven-port errors onto the transport-agnostic [`Error`] payload and
//! resolves the acting member behind every use-case call. Wordings here are
//! user-facing; they explain the rejection without disclosing anything the
//! visibility filter hides.

use crate::domain::Error;
use crate::domain::invite::InviteLink;
use crate::domain::member::{Member, MemberId};
use crate::domain::ports::{
    DirectoryRepository, DirectoryRepositoryError, InviteRepositoryError,
    PromotionRepositoryError,
};

pub(crate) fn map_directory_error(error: DirectoryRepositoryError) -> Error {
    match error {
        DirectoryRepositoryError::Unavailable { message } => Error::service_unavailable(format!(
            "membership directory unavailable: {message}"
        )),
        DirectoryRepositoryError::UsernameTaken { .. } => {
            Error::conflict("Username is already taken")
        }
        DirectoryRepositoryError::EmailTaken { .. } => {
            Error::conflict("Email is already registered")
        }
        DirectoryRepositoryError::MemberMissing { .. } => Error::not_found("User not found"),
        DirectoryRepositoryError::StaleLevel { .. } => {
            Error::conflict("Member level changed concurrently, refresh and try again")
        }
        DirectoryRepositoryError::DirectoryNotEmpty => {
            Error::conflict("The directory already has a founding member")
        }
        DirectoryRepositoryError::BootstrapClosed { .. } => {
            Error::conflict("The admin tier no longer has exactly one member")
        }
    }
}

pub(crate) fn map_invite_error(error: InviteRepositoryError) -> Error {
    match error {
        InviteRepositoryError::Unavailable { message } => {
            Error::service_unavailable(format!("invite store unavailable: {message}"))
        }
        InviteRepositoryError::UnknownToken => Error::not_found("Invalid or expired invite link"),
        InviteRepositoryError::LinkNotActive { status } => {
            Error::not_active(format!("This invite link is {status}"))
        }
        InviteRepositoryError::LinkExhausted => {
            Error::exhausted("This invite link has no remaining uses")
        }
    }
}

/// Reject links that redemption would refuse, without consuming a use.
///
/// Checks run in the same order as [`InviteLink::redeem`], so the code a
/// caller sees here matches the one a losing racer sees from the store.
pub(crate) fn check_redeemable(link: &InviteLink) -> Result<(), Error> {
    if !link.is_active() {
        return Err(map_invite_error(InviteRepositoryError::link_not_active(
            link.status(),
        )));
    }
    if link
        .max_uses()
        .is_some_and(|max| link.uses_count() >= max)
    {
        return Err(map_invite_error(InviteRepositoryError::link_exhausted()));
    }
    Ok(())
}

pub(crate) fn map_promotion_error(error: PromotionRepositoryError) -> Error {
    match error {
        PromotionRepositoryError::Unavailable { message } => {
            Error::service_unavailable(format!("promotion store unavailable: {message}"))
        }
        PromotionRepositoryError::UnknownRequest { .. } => {
            Error::not_found("Promotion request not found")
        }
        PromotionRepositoryError::RequestClosed { .. } => {
            Error::conflict("This promotion is no longer open for voting")
        }
        PromotionRepositoryError::DuplicateVote => {
            Error::duplicate_vote("You have already voted on this promotion")
        }
        PromotionRepositoryError::CandidateMissing { id } => {
            Error::internal(format!("promotion candidate {id} is missing"))
        }
    }
}

/// Resolve the acting member, treating an unknown id as a dead session.
pub(crate) async fn require_member<D>(directory: &D, id: MemberId) -> Result<Member, Error>
where
    D: DirectoryRepository + ?Sized,
{
    directory
        .find_member(&id)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| Error::unauthorized("User not found"))
}

/// Refuse actions from members who are not in good standing.
pub(crate) fn require_active(member: &Member) -> Result<(), Error> {
    if member.is_active() {
        Ok(())
    } else {
        Err(Error::forbidden("Account is not active"))
    }
}
