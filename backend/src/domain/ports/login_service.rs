//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! resolve a submitted handle into a member without knowing (or importing)
//! the backing infrastructure. Identity verification itself happens upstream;
//! this port only maps a verified handle onto directory membership.

use async_trait::async_trait;

use crate::domain::member::{Member, MemberId, NewMember, Username};
use crate::domain::{Error, Level};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Resolve a handle to an active member.
    ///
    /// Unknown handles are indistinguishable from known ones: both yield
    /// `Unauthorized`. Members whose standing is not `active` are refused
    /// with `Forbidden`.
    async fn authenticate(&self, username: &Username) -> Result<Member, Error>;
}

/// Temporary in-memory authenticator used until persistence is wired.
///
/// `founder` authenticates successfully and produces a fixed admin member.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

const FIXTURE_MEMBER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, username: &Username) -> Result<Member, Error> {
        if username.as_str() != "founder" {
            return Err(Error::unauthorized("invalid credentials"));
        }
        let id = FIXTURE_MEMBER_ID
            .parse::<MemberId>()
            .map_err(|err| Error::internal(format!("invalid fixture member id: {err}")))?;
        Ok(Member::create(
            NewMember {
                id,
                username: username.clone(),
                email: None,
                level: Level::ADMIN,
                invited_by: None,
            },
            chrono::Utc::now(),
        ))
    }
}
