//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    GovernanceCommand, GovernanceQuery, InviteCommand, InviteQuery, LoginService,
    MemberLevelCommand, MemberOnboarding, MembersQuery, PromotionCommand, PromotionQuery,
    StatsQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use conclave_backend::domain::ports::{
///     FixtureGovernanceCommand, FixtureGovernanceQuery, FixtureInviteCommand,
///     FixtureInviteQuery, FixtureLoginService, FixtureMemberLevelCommand,
///     FixtureMemberOnboarding, FixtureMembersQuery, FixturePromotionCommand,
///     FixturePromotionQuery, FixtureStatsQuery,
/// };
/// use conclave_backend::inbound::http::state::HttpState;
///
/// let state = HttpState {
///     onboarding: Arc::new(FixtureMemberOnboarding),
///     login: Arc::new(FixtureLoginService),
///     members: Arc::new(FixtureMembersQuery),
///     member_level: Arc::new(FixtureMemberLevelCommand),
///     invites: Arc::new(FixtureInviteCommand),
///     invites_query: Arc::new(FixtureInviteQuery),
///     promotions: Arc::new(FixturePromotionCommand),
///     promotions_query: Arc::new(FixturePromotionQuery),
///     governance: Arc::new(FixtureGovernanceCommand),
///     governance_query: Arc::new(FixtureGovernanceQuery),
///     stats: Arc::new(FixtureStatsQuery),
/// };
/// let _members = state.members.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub onboarding: Arc<dyn MemberOnboarding>,
    pub login: Arc<dyn LoginService>,
    pub members: Arc<dyn MembersQuery>,
    pub member_level: Arc<dyn MemberLevelCommand>,
    pub invites: Arc<dyn InviteCommand>,
    pub invites_query: Arc<dyn InviteQuery>,
    pub promotions: Arc<dyn PromotionCommand>,
    pub promotions_query: Arc<dyn PromotionQuery>,
    pub governance: Arc<dyn GovernanceCommand>,
    pub governance_query: Arc<dyn GovernanceQuery>,
    pub stats: Arc<dyn StatsQuery>,
}
