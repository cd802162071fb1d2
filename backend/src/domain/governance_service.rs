//! Admin tier governance service.
//!
//! The governance summary and the bootstrap promotion. Below the top level
//! the whole surface reads as absent: both operations answer `NotFound`
//! rather than `Forbidden`, so a probing member cannot confirm the
//! endpoints exist.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::audit::LevelChange;
use crate::domain::level::Level;
use crate::domain::member::MemberId;
use crate::domain::ports::{
    BootstrapPromotion, DirectoryRepository, GovernanceCommand, GovernanceQuery,
    GovernanceSummary,
};
use crate::domain::service_support::{map_directory_error, require_active, require_member};
use crate::domain::visibility::{self, MemberView};

/// Implements [`GovernanceQuery`] and [`GovernanceCommand`] over the
/// directory store.
#[derive(Clone)]
pub struct GovernanceService<D> {
    directory: Arc<D>,
}

impl<D> GovernanceService<D>
where
    D: DirectoryRepository,
{
    /// Build the service over its store.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<D> GovernanceQuery for GovernanceService<D>
where
    D: DirectoryRepository,
{
    async fn summary(&self, viewer_id: MemberId) -> Result<GovernanceSummary, Error> {
        let viewer = require_member(self.directory.as_ref(), viewer_id).await?;
        if !viewer.level().is_admin() {
            return Err(Error::not_found("Not found"));
        }
        let census = self
            .directory
            .admin_census()
            .await
            .map_err(map_directory_error)?;
        Ok(census.into())
    }
}

#[async_trait]
impl<D> GovernanceCommand for GovernanceService<D>
where
    D: DirectoryRepository,
{
    async fn bootstrap_promote(
        &self,
        actor_id: MemberId,
        command: BootstrapPromotion,
    ) -> Result<MemberView, Error> {
        let actor = require_member(self.directory.as_ref(), actor_id).await?;
        if !actor.level().is_admin() {
            return Err(Error::not_found("Not found"));
        }
        require_active(&actor)?;
        let reason = command.reason.trim();
        if reason.is_empty() {
            return Err(Error::validation_error("reason is required"));
        }

        let census = self
            .directory
            .admin_census()
            .await
            .map_err(map_directory_error)?;
        if !census.can_bootstrap() {
            return Err(Error::forbidden(
                "Bootstrap promotion is only available while the admin tier has a single member",
            ));
        }

        let candidate = self
            .directory
            .find_member(&command.candidate_id)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        if candidate.level().is_admin() {
            return Err(Error::invalid_transition("Candidate is already level 5"));
        }

        // The store re-checks the census inside its atomic section, so two
        // racing bootstraps cannot both land.
        let updated = self
            .directory
            .bootstrap_promote(LevelChange {
                member_id: candidate.id(),
                expected_level: Some(candidate.level()),
                new_level: Level::ADMIN,
                changed_by: actor.id(),
                reason: format!("Bootstrap promotion: {reason}"),
            })
            .await
            .map_err(map_directory_error)?;
        info!(
            member_id = %updated.id(),
            actor_id = %actor.id(),
            "bootstrap promotion applied"
        );
        Ok(visibility::sanitize(actor.level(), &updated))
    }
}

#[cfg(test)]
#[path = "governance_service_tests.rs"]
mod tests;
