//! Driving port for member registration.
//!
//! Inbound adapters use this port to run invite-gated registration and the
//! founding-member bootstrap without importing persistence concerns. The
//! empty-directory check and invite redemption both happen inside the
//! store's atomic sections, so racing registrations serialise.

use async_trait::async_trait;

use crate::domain::invite::InviteToken;
use crate::domain::member::{EmailAddress, Member, MemberId, NewMember, Username};
use crate::domain::{Error, Level};

/// Registration submission with pre-validated fields.
///
/// Username and email formats are checked at the boundary; availability and
/// invite validity are checked by the implementation, in that order.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    /// Normalised handle the member signs in with.
    pub username: Username,
    /// Optional contact address.
    pub email: Option<EmailAddress>,
    /// Invite being redeemed. Required unless the directory is empty.
    pub invite_token: Option<InviteToken>,
}

/// Domain use-case port for registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberOnboarding: Send + Sync {
    /// Whether the directory is empty and the next registration founds it.
    async fn setup_required(&self) -> Result<bool, Error>;

    /// Register a member.
    ///
    /// An empty directory admits the registrant as the founding admin with
    /// no invite. Otherwise the invite token is mandatory and the member
    /// starts at the lowest level, invited by the link's owner.
    async fn register(&self, registration: NewRegistration) -> Result<Member, Error>;
}

/// Temporary fixture onboarding used until persistence is wired.
///
/// Behaves like an empty directory: every registration founds it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMemberOnboarding;

#[async_trait]
impl MemberOnboarding for FixtureMemberOnboarding {
    async fn setup_required(&self) -> Result<bool, Error> {
        Ok(true)
    }

    async fn register(&self, registration: NewRegistration) -> Result<Member, Error> {
        Ok(Member::create(
            NewMember {
                id: MemberId::random(),
                username: registration.username,
                email: registration.email,
                level: Level::ADMIN,
                invited_by: None,
            },
            chrono::Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_onboarding_always_reports_setup_required() {
        let onboarding = FixtureMemberOnboarding;
        assert!(
            onboarding
                .setup_required()
                .await
                .expect("fixture check succeeds")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_onboarding_founds_the_directory() {
        let onboarding = FixtureMemberOnboarding;
        let registration = NewRegistration {
            username: Username::parse("quorra").expect("valid handle"),
            email: None,
            invite_token: None,
        };
        let member = onboarding
            .register(registration)
            .await
            .expect("fixture registration succeeds");
        assert!(member.level().is_admin());
        assert!(member.invited_by().is_none());
    }
}
