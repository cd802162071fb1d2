//! Dashboard statistics service.
//!
//! Every number is computed from the viewer's vantage point: totals and the
//! level distribution cover visible members only, and the distribution
//! stops at the viewer's own level so higher tiers stay unobservable.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::member::MemberId;
use crate::domain::ports::{DirectoryRepository, PromotionRepository, StatsOverview, StatsQuery};
use crate::domain::promotion::RequestStatus;
use crate::domain::service_support::{map_directory_error, map_promotion_error, require_member};
use crate::domain::visibility;

/// Implements [`StatsQuery`] over the directory and promotion stores.
#[derive(Clone)]
pub struct StatsService<D, P> {
    directory: Arc<D>,
    promotions: Arc<P>,
}

impl<D, P> StatsService<D, P>
where
    D: DirectoryRepository,
    P: PromotionRepository,
{
    /// Build the service over its stores.
    pub fn new(directory: Arc<D>, promotions: Arc<P>) -> Self {
        Self {
            directory,
            promotions,
        }
    }
}

#[async_trait]
impl<D, P> StatsQuery for StatsService<D, P>
where
    D: DirectoryRepository,
    P: PromotionRepository,
{
    async fn overview(&self, viewer_id: MemberId) -> Result<StatsOverview, Error> {
        let viewer = require_member(self.directory.as_ref(), viewer_id).await?;

        let members = self
            .directory
            .list_members(None)
            .await
            .map_err(map_directory_error)?;
        let total_members = members
            .iter()
            .filter(|member| visibility::can_see(viewer.level(), member))
            .count() as u64;
        let level_distribution =
            visibility::visible_level_distribution(viewer.level(), &members);

        let invitees = self
            .directory
            .list_invitees(&viewer.id())
            .await
            .map_err(map_directory_error)?;
        let my_invite_count = invitees
            .iter()
            .filter(|invitee| visibility::can_see(viewer.level(), invitee))
            .count() as u64;

        let open = self
            .promotions
            .list_requests(Some(RequestStatus::Open))
            .await
            .map_err(map_promotion_error)?;
        let mut pending_promotions = 0_u64;
        let mut pending_my_vote = 0_u64;
        for request in &open {
            let candidate_visible = self
                .directory
                .find_member(&request.candidate_id())
                .await
                .map_err(map_directory_error)?
                .is_some_and(|candidate| visibility::can_see(viewer.level(), &candidate));
            if !candidate_visible {
                continue;
            }
            pending_promotions += 1;

            let eligible = viewer.level() >= request.allowed_voter_min_level()
                && viewer.level() >= request.current_level();
            if !eligible {
                continue;
            }
            let voted = self
                .promotions
                .has_voted(&request.id(), &viewer.id())
                .await
                .map_err(map_promotion_error)?;
            if !voted {
                pending_my_vote += 1;
            }
        }

        Ok(StatsOverview {
            total_members,
            my_invite_count,
            pending_promotions,
            pending_my_vote,
            level_distribution,
        })
    }
}

#[cfg(test)]
#[path = "stats_service_tests.rs"]
mod tests;
