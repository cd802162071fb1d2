//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports describe the persistent store; driving ports are the
//! use-cases inbound adapters call. Each port ships a fixture
//! implementation, and a mockall mock in test builds.

mod macros;
pub(crate) use macros::define_port_error;

mod directory_repository;
mod governance_command;
mod governance_query;
mod invite_command;
mod invite_query;
mod invite_repository;
mod login_service;
mod member_level_command;
mod member_onboarding;
mod members_query;
mod promotion_command;
mod promotion_query;
mod promotion_repository;
mod stats_query;

#[cfg(test)]
pub use directory_repository::MockDirectoryRepository;
pub use directory_repository::{
    DirectoryRepository, DirectoryRepositoryError, FixtureDirectoryRepository,
};
#[cfg(test)]
pub use governance_command::MockGovernanceCommand;
pub use governance_command::{BootstrapPromotion, FixtureGovernanceCommand, GovernanceCommand};
#[cfg(test)]
pub use governance_query::MockGovernanceQuery;
pub use governance_query::{FixtureGovernanceQuery, GovernanceQuery, GovernanceSummary};
#[cfg(test)]
pub use invite_command::MockInviteCommand;
pub use invite_command::{FixtureInviteCommand, InviteCommand};
#[cfg(test)]
pub use invite_query::MockInviteQuery;
pub use invite_query::{FixtureInviteQuery, InviteLinkSummary, InvitePreview, InviteQuery};
#[cfg(test)]
pub use invite_repository::MockInviteRepository;
pub use invite_repository::{FixtureInviteRepository, InviteRepository, InviteRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use member_level_command::MockMemberLevelCommand;
pub use member_level_command::{
    FixtureMemberLevelCommand, ManualLevelChange, MemberLevelCommand,
};
#[cfg(test)]
pub use member_onboarding::MockMemberOnboarding;
pub use member_onboarding::{FixtureMemberOnboarding, MemberOnboarding, NewRegistration};
#[cfg(test)]
pub use members_query::MockMembersQuery;
pub use members_query::{
    FixtureMembersQuery, LevelHistoryEntry, MemberProfile, MembersQuery, OwnProfile,
};
#[cfg(test)]
pub use promotion_command::MockPromotionCommand;
pub use promotion_command::{
    FixturePromotionCommand, PromotionCommand, PromotionProposal, VoteOutcome, VoteSubmission,
};
#[cfg(test)]
pub use promotion_query::MockPromotionQuery;
pub use promotion_query::{
    FixturePromotionQuery, PromotionQuery, PromotionRequestView, VoteView,
};
#[cfg(test)]
pub use promotion_repository::MockPromotionRepository;
pub use promotion_repository::{
    FixturePromotionRepository, PromotionRepository, PromotionRepositoryError,
};
#[cfg(test)]
pub use stats_query::MockStatsQuery;
pub use stats_query::{FixtureStatsQuery, StatsOverview, StatsQuery};
