//! Port for membership directory persistence.
//!
//! Conditional mutations (founder insert, guarded level change, bootstrap
//! promotion) re-derive their premises inside the adapter's atomic section,
//! so racing callers serialise instead of double-applying.

use async_trait::async_trait;

use crate::domain::audit::{LevelChange, LevelChangeRecord};
use crate::domain::governance::AdminCensus;
use crate::domain::level::Level;
use crate::domain::member::{EmailAddress, Member, MemberId, NewMember, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by membership directory adapters.
    pub enum DirectoryRepositoryError {
        /// Backing store could not serve the request.
        Unavailable { message: String } =>
            "membership directory unavailable: {message}",
        /// Username is already registered.
        UsernameTaken { username: String } =>
            "username {username} is already taken",
        /// Email address is already registered.
        EmailTaken { email: String } =>
            "email {email} is already registered",
        /// Referenced member does not exist.
        MemberMissing { id: String } =>
            "member {id} does not exist",
        /// Guarded level write observed a different level.
        StaleLevel { expected: u8, actual: u8 } =>
            "member level changed concurrently: expected {expected}, found {actual}",
        /// Founder insert raced an earlier registration.
        DirectoryNotEmpty =>
            "directory already has members",
        /// Bootstrap window closed between validation and mutation.
        BootstrapClosed { census: u64 } =>
            "bootstrap window closed: admin census is {census}",
    }
}

/// Port for reading and mutating the membership directory.
///
/// Listings are returned newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Insert a member, enforcing username and email uniqueness.
    async fn insert_member(&self, draft: NewMember) -> Result<Member, DirectoryRepositoryError>;

    /// Insert the founding member, conditional on the directory still being
    /// empty inside the atomic section.
    async fn insert_founding_member(
        &self,
        draft: NewMember,
    ) -> Result<Member, DirectoryRepositoryError>;

    /// Find a member by id.
    async fn find_member(
        &self,
        id: &MemberId,
    ) -> Result<Option<Member>, DirectoryRepositoryError>;

    /// Find a member by their normalised username.
    async fn find_member_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Member>, DirectoryRepositoryError>;

    /// List members, optionally restricted to one level.
    async fn list_members(
        &self,
        level: Option<Level>,
    ) -> Result<Vec<Member>, DirectoryRepositoryError>;

    /// List the members a given member invited.
    async fn list_invitees(
        &self,
        inviter: &MemberId,
    ) -> Result<Vec<Member>, DirectoryRepositoryError>;

    /// Total number of members, regardless of level.
    async fn member_count(&self) -> Result<u64, DirectoryRepositoryError>;

    /// Live census of the admin tier.
    async fn admin_census(&self) -> Result<AdminCensus, DirectoryRepositoryError>;

    /// Whether a username is already registered.
    async fn is_username_taken(
        &self,
        username: &Username,
    ) -> Result<bool, DirectoryRepositoryError>;

    /// Whether an email address is already registered.
    async fn is_email_taken(
        &self,
        email: &EmailAddress,
    ) -> Result<bool, DirectoryRepositoryError>;

    /// Apply a level change and append its ledger entry in one atomic step.
    ///
    /// When the command carries an `expected_level`, adapters must compare it
    /// against the member's live level inside the atomic section and fail
    /// with [`DirectoryRepositoryError::StaleLevel`] on mismatch.
    async fn apply_level_change(
        &self,
        change: LevelChange,
    ) -> Result<Member, DirectoryRepositoryError>;

    /// Apply a bootstrap promotion, conditional on the admin census still
    /// being exactly one inside the atomic section.
    async fn bootstrap_promote(
        &self,
        change: LevelChange,
    ) -> Result<Member, DirectoryRepositoryError>;

    /// Level ledger for a member, newest first.
    async fn level_history(
        &self,
        member: &MemberId,
    ) -> Result<Vec<LevelChangeRecord>, DirectoryRepositoryError>;
}

/// Fixture implementation for tests that do not exercise the directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDirectoryRepository;

#[async_trait]
impl DirectoryRepository for FixtureDirectoryRepository {
    async fn insert_member(&self, draft: NewMember) -> Result<Member, DirectoryRepositoryError> {
        Ok(Member::create(draft, chrono::Utc::now()))
    }

    async fn insert_founding_member(
        &self,
        draft: NewMember,
    ) -> Result<Member, DirectoryRepositoryError> {
        Ok(Member::create(draft, chrono::Utc::now()))
    }

    async fn find_member(
        &self,
        _id: &MemberId,
    ) -> Result<Option<Member>, DirectoryRepositoryError> {
        Ok(None)
    }

    async fn find_member_by_username(
        &self,
        _username: &Username,
    ) -> Result<Option<Member>, DirectoryRepositoryError> {
        Ok(None)
    }

    async fn list_members(
        &self,
        _level: Option<Level>,
    ) -> Result<Vec<Member>, DirectoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_invitees(
        &self,
        _inviter: &MemberId,
    ) -> Result<Vec<Member>, DirectoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn member_count(&self) -> Result<u64, DirectoryRepositoryError> {
        Ok(0)
    }

    async fn admin_census(&self) -> Result<AdminCensus, DirectoryRepositoryError> {
        Ok(AdminCensus::new(0))
    }

    async fn is_username_taken(
        &self,
        _username: &Username,
    ) -> Result<bool, DirectoryRepositoryError> {
        Ok(false)
    }

    async fn is_email_taken(
        &self,
        _email: &EmailAddress,
    ) -> Result<bool, DirectoryRepositoryError> {
        Ok(false)
    }

    async fn apply_level_change(
        &self,
        change: LevelChange,
    ) -> Result<Member, DirectoryRepositoryError> {
        Err(DirectoryRepositoryError::member_missing(
            change.member_id.to_string(),
        ))
    }

    async fn bootstrap_promote(
        &self,
        change: LevelChange,
    ) -> Result<Member, DirectoryRepositoryError> {
        Err(DirectoryRepositoryError::member_missing(
            change.member_id.to_string(),
        ))
    }

    async fn level_history(
        &self,
        _member: &MemberId,
    ) -> Result<Vec<LevelChangeRecord>, DirectoryRepositoryError> {
        Ok(Vec::new())
    }
}
