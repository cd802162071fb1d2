//! Driving port for the dashboard statistics aggregate.
//!
//! Every number is computed after the visibility filter: totals, the level
//! distribution, and pending-request counts all cover only members the
//! viewer may see. Higher tiers are absent from the distribution entirely
//! rather than reported as zero.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::member::MemberId;
use crate::domain::visibility::LevelCount;

/// Dashboard numbers for one viewer.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    /// Visible members, the viewer included.
    pub total_members: u64,
    /// Members the viewer has invited.
    pub my_invite_count: u64,
    /// Open promotion requests about visible candidates.
    pub pending_promotions: u64,
    /// Open requests the viewer is eligible to vote on and has not yet.
    pub pending_my_vote: u64,
    /// Member counts per visible level, lowest first.
    pub level_distribution: Vec<LevelCount>,
}

/// Domain use-case port for dashboard statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsQuery: Send + Sync {
    /// The viewer's dashboard numbers.
    async fn overview(&self, viewer: MemberId) -> Result<StatsOverview, Error>;
}

/// Temporary fixture query used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStatsQuery;

#[async_trait]
impl StatsQuery for FixtureStatsQuery {
    async fn overview(&self, viewer: MemberId) -> Result<StatsOverview, Error> {
        Err(Error::unauthorized(format!("member {viewer} not found")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use crate::domain::Level;

    use super::*;

    #[rstest]
    fn overview_serialises_with_wire_field_names() {
        let overview = StatsOverview {
            total_members: 4,
            my_invite_count: 2,
            pending_promotions: 1,
            pending_my_vote: 1,
            level_distribution: vec![
                LevelCount {
                    level: Level::new(1).expect("valid level"),
                    count: 3,
                },
                LevelCount {
                    level: Level::new(2).expect("valid level"),
                    count: 1,
                },
            ],
        };
        let body = serde_json::to_value(&overview).expect("overview serialises");
        assert_eq!(body["totalMembers"], 4);
        assert_eq!(body["myInviteCount"], 2);
        assert_eq!(body["pendingPromotions"], 1);
        assert_eq!(body["pendingMyVote"], 1);
        assert_eq!(body["levelDistribution"][0]["level"], 1);
        assert_eq!(body["levelDistribution"][0]["count"], 3);
    }
}
