//! Driving port for direct level changes.
//!
//! Admin-tier members may set a member's level directly, bypassing the vote
//! path, except for transitions touching the admin tier itself. The change
//! is guarded against concurrent modification: the level observed during
//! validation must still hold when the write lands.

use async_trait::async_trait;

use crate::domain::member::MemberId;
use crate::domain::visibility::MemberView;
use crate::domain::{Error, Level};

/// A direct level change requested by an admin.
#[derive(Debug, Clone)]
pub struct ManualLevelChange {
    /// Member whose level changes.
    pub member_id: MemberId,
    /// Level to set.
    pub new_level: Level,
    /// Mandatory explanation recorded in the ledger.
    pub reason: String,
}

/// Domain use-case port for direct level changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberLevelCommand: Send + Sync {
    /// Apply a direct level change on behalf of an admin actor.
    ///
    /// Transitions into or out of the admin tier are refused; those go
    /// through the promotion vote or bootstrap paths.
    async fn set_member_level(
        &self,
        actor: MemberId,
        change: ManualLevelChange,
    ) -> Result<MemberView, Error>;
}

/// Temporary fixture command used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMemberLevelCommand;

#[async_trait]
impl MemberLevelCommand for FixtureMemberLevelCommand {
    async fn set_member_level(
        &self,
        _actor: MemberId,
        change: ManualLevelChange,
    ) -> Result<MemberView, Error> {
        Err(Error::not_found(format!(
            "member {} not found",
            change.member_id
        )))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use crate::domain::ErrorCode;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_command_reports_targets_absent() {
        let command = FixtureMemberLevelCommand;
        let err = command
            .set_member_level(
                MemberId::random(),
                ManualLevelChange {
                    member_id: MemberId::random(),
                    new_level: Level::new(2).expect("valid level"),
                    reason: "manual adjustment".to_owned(),
                },
            )
            .await
            .expect_err("fixture has no members");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
