//! Driving port for admin-tier governance queries.
//!
//! The summary is only served to admin-tier members; everyone else learns
//! nothing, not even that the operation exists.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::governance::AdminCensus;
use crate::domain::member::MemberId;

/// Live state of the admin tier's governance rules.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceSummary {
    /// Members currently at the top level.
    pub level5_count: u64,
    /// Approvals an admission-by-vote currently needs.
    pub vote_threshold: u32,
    /// Whether a sole admin may promote directly, without a vote.
    pub can_bootstrap: bool,
    /// Prose description of the rules in force.
    pub rules_description: String,
}

impl From<AdminCensus> for GovernanceSummary {
    fn from(census: AdminCensus) -> Self {
        Self {
            level5_count: census.count(),
            vote_threshold: census.vote_threshold(),
            can_bootstrap: census.can_bootstrap(),
            rules_description: census.rules_description(),
        }
    }
}

/// Domain use-case port for reading governance state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GovernanceQuery: Send + Sync {
    /// The governance summary, for admin-tier viewers only.
    ///
    /// Viewers below the top level receive `NotFound`, indistinguishable
    /// from the operation not existing.
    async fn summary(&self, viewer: MemberId) -> Result<GovernanceSummary, Error>;
}

/// Temporary fixture query used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGovernanceQuery;

#[async_trait]
impl GovernanceQuery for FixtureGovernanceQuery {
    async fn summary(&self, _viewer: MemberId) -> Result<GovernanceSummary, Error> {
        Err(Error::not_found("not found"))
    }
}
