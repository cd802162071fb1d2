//! Driving port for the bootstrap promotion.
//!
//! A sole admin may promote one member directly to the top level without a
//! vote. Eligibility is re-derived inside the store's atomic section, so two
//! concurrent bootstrap attempts cannot both succeed.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::member::MemberId;
use crate::domain::visibility::MemberView;

/// A vote-free direct promotion to the top level.
#[derive(Debug, Clone)]
pub struct BootstrapPromotion {
    /// Member to promote.
    pub candidate_id: MemberId,
    /// Mandatory explanation recorded in the ledger.
    pub reason: String,
}

/// Domain use-case port for bootstrap promotions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GovernanceCommand: Send + Sync {
    /// Promote a member directly to the top level.
    ///
    /// Only an admin-tier actor may call this, and only while the tier
    /// holds exactly one member. Actors below the top level receive
    /// `NotFound`, indistinguishable from the operation not existing.
    async fn bootstrap_promote(
        &self,
        actor: MemberId,
        command: BootstrapPromotion,
    ) -> Result<MemberView, Error>;
}

/// Temporary fixture command used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGovernanceCommand;

#[async_trait]
impl GovernanceCommand for FixtureGovernanceCommand {
    async fn bootstrap_promote(
        &self,
        _actor: MemberId,
        _command: BootstrapPromotion,
    ) -> Result<MemberView, Error> {
        Err(Error::not_found("not found"))
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
    async fn fixture_command_hides_the_operation() {
        let command = FixtureGovernanceCommand;
        let err = command
            .bootstrap_promote(
                MemberId::random(),
                BootstrapPromotion {
                    candidate_id: MemberId::random(),
                    reason: "second admin for succession".to_owned(),
                },
            )
            .await
            .expect_err("fixture resolves no members");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
