//! Promotion request service.
//!
//! Opening requests, casting ballots, and reading requests back. Creation
//! runs a fixed validation chain whose order is part of the contract: the
//! earliest failing check names the rejection, so a stale client sees the
//! conflict before a lecture about ranges, and a malformed justification is
//! only reported once everything structural has passed. Reads are shaped by
//! the viewer's level; requests about invisible candidates are absent, and
//! ballots from invisible voters are dropped from views and tallies alike.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::level::Level;
use crate::domain::member::{Member, MemberId};
use crate::domain::ports::{
    DirectoryRepository, PromotionCommand, PromotionProposal, PromotionQuery,
    PromotionRepository, PromotionRequestView, VoteOutcome, VoteSubmission, VoteView,
};
use crate::domain::promotion::{
    DEFAULT_REQUIRED_VOTES, Justification, NewPromotionRequest, NewVote, PromotionRequest,
    RequestId, RequestStatus, RequestType, VoteId,
};
use crate::domain::service_support::{
    map_directory_error, map_promotion_error, require_active, require_member,
};
use crate::domain::visibility;

/// Implements [`PromotionCommand`] and [`PromotionQuery`] over the
/// directory and promotion stores.
#[derive(Clone)]
pub struct PromotionService<D, P> {
    directory: Arc<D>,
    promotions: Arc<P>,
}

impl<D, P> PromotionService<D, P>
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

    /// Build the viewer-shaped view of one request.
    ///
    /// Returns `None` when the candidate is invisible to the viewer, in
    /// which case the whole request must be treated as absent. Ballots from
    /// invisible voters are dropped before assembly, so the view's tallies
    /// only count what the viewer may see.
    async fn view_for(
        &self,
        viewer: &Member,
        request: &PromotionRequest,
    ) -> Result<Option<PromotionRequestView>, Error> {
        let candidate = self
            .directory
            .find_member(&request.candidate_id())
            .await
            .map_err(map_directory_error)?
            .filter(|candidate| visibility::can_see(viewer.level(), candidate));
        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let created_by = self
            .directory
            .find_member(&request.created_by())
            .await
            .map_err(map_directory_error)?
            .filter(|sponsor| visibility::can_see(viewer.level(), sponsor))
            .map(|sponsor| visibility::sanitize(viewer.level(), &sponsor));

        let ballots = self
            .promotions
            .list_votes(&request.id())
            .await
            .map_err(map_promotion_error)?;
        let mut votes = Vec::with_capacity(ballots.len());
        for ballot in &ballots {
            let voter = self
                .directory
                .find_member(&ballot.voter_id())
                .await
                .map_err(map_directory_error)?
                .filter(|voter| visibility::can_see(viewer.level(), voter));
            if let Some(voter) = voter {
                votes.push(VoteView::from_vote(
                    ballot,
                    visibility::sanitize(viewer.level(), &voter),
                ));
            }
        }

        let candidate_view = visibility::sanitize(viewer.level(), &candidate);
        Ok(Some(PromotionRequestView::assemble(
            request,
            candidate_view,
            created_by,
            votes,
        )))
    }
}

#[async_trait]
impl<D, P> PromotionCommand for PromotionService<D, P>
where
    D: DirectoryRepository,
    P: PromotionRepository,
{
    async fn create_request(
        &self,
        creator_id: MemberId,
        proposal: PromotionProposal,
    ) -> Result<PromotionRequestView, Error> {
        let creator = require_member(self.directory.as_ref(), creator_id).await?;
        require_active(&creator)?;

        // A candidate above the sponsor's level is refused the same way as
        // one that does not exist.
        let candidate = self
            .directory
            .find_member(&proposal.candidate_id)
            .await
            .map_err(map_directory_error)?
            .filter(|candidate| visibility::can_see(creator.level(), candidate))
            .ok_or_else(|| {
                Error::forbidden("You cannot create promotion requests for members above your level")
            })?;

        let current = candidate.level();
        if let Some(supplied) = proposal.current_level {
            if supplied != current.get() {
                return Err(Error::conflict("Candidate's current level does not match"));
            }
        }

        let proposed = Level::new(proposal.proposed_level)
            .map_err(|error| Error::invalid_transition(error.to_string()))?;
        if proposed == current {
            return Err(Error::invalid_transition(
                "Proposed level equals the candidate's current level",
            ));
        }
        if RequestType::for_transition(current, proposed) != proposal.request_type {
            return Err(Error::invalid_transition(format!(
                "{} cannot take a member from level {current} to level {proposed}",
                proposal.request_type
            )));
        }
        if proposal.request_type.governs_admin_tier() && !creator.level().is_admin() {
            return Err(Error::forbidden(
                "Only level 5 members may propose admin tier changes",
            ));
        }

        let (required_votes, allowed_voter_min_level) =
            if proposal.request_type.governs_admin_tier() {
                let census = self
                    .directory
                    .admin_census()
                    .await
                    .map_err(map_directory_error)?;
                if proposal.request_type == RequestType::PromoteToAdmin && census.can_bootstrap() {
                    return Err(Error::use_bootstrap_instead(
                        "As the only level 5 member, use the bootstrap promotion instead",
                    ));
                }
                if proposal.request_type == RequestType::DemoteFromAdmin
                    && !census.can_demote_admin()
                {
                    return Err(Error::last_admin_protected(
                        "Cannot demote the only level 5 member",
                    ));
                }
                (census.vote_threshold(), Level::ADMIN)
            } else {
                (DEFAULT_REQUIRED_VOTES, current)
            };

        let justification = Justification::parse(&proposal.justification)
            .map_err(|error| Error::validation_error(error.to_string()))?;

        let draft = NewPromotionRequest {
            id: RequestId::random(),
            candidate_id: candidate.id(),
            current_level: current,
            proposed_level: proposed,
            created_by: creator.id(),
            request_type: proposal.request_type,
            required_votes,
            allowed_voter_min_level,
            justification,
        };
        let request = self
            .promotions
            .insert_request(draft)
            .await
            .map_err(map_promotion_error)?;
        info!(
            request_id = %request.id(),
            candidate_id = %candidate.id(),
            request_type = %request.request_type(),
            required_votes = request.required_votes(),
            "promotion request opened"
        );

        let candidate_view = visibility::sanitize(creator.level(), &candidate);
        let creator_view = visibility::sanitize(creator.level(), &creator);
        Ok(PromotionRequestView::assemble(
            &request,
            candidate_view,
            Some(creator_view),
            Vec::new(),
        ))
    }

    async fn cast_vote(
        &self,
        voter_id: MemberId,
        submission: VoteSubmission,
    ) -> Result<VoteOutcome, Error> {
        let voter = require_member(self.directory.as_ref(), voter_id).await?;
        require_active(&voter)?;

        let request = self
            .promotions
            .find_request(&submission.request_id)
            .await
            .map_err(map_promotion_error)?
            .ok_or_else(|| Error::not_found("Promotion request not found"))?;

        let candidate = self
            .directory
            .find_member(&request.candidate_id())
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| {
                Error::internal(format!(
                    "promotion candidate {} is missing",
                    request.candidate_id()
                ))
            })?;
        if !visibility::can_see(voter.level(), &candidate) {
            return Err(Error::not_found("Promotion request not found"));
        }

        if !request.is_open() {
            return Err(Error::conflict(
                "This promotion is no longer open for voting",
            ));
        }
        if voter.level() < request.allowed_voter_min_level() {
            return Err(Error::forbidden(format!(
                "Level {}+ required to vote on this promotion",
                request.allowed_voter_min_level()
            )));
        }
        if voter.level() < request.current_level() {
            return Err(Error::forbidden(
                "You cannot vote on promotions for members above your level",
            ));
        }
        if self
            .promotions
            .has_voted(&request.id(), &voter.id())
            .await
            .map_err(map_promotion_error)?
        {
            return Err(Error::duplicate_vote(
                "You have already voted on this promotion",
            ));
        }

        let draft = NewVote {
            id: VoteId::random(),
            request_id: request.id(),
            voter_id: voter.id(),
            choice: submission.choice,
            comment: submission.comment,
        };
        self.promotions
            .record_vote(draft)
            .await
            .map_err(map_promotion_error)?;
        let resolved = self
            .promotions
            .resolve_open_request(&request.id())
            .await
            .map_err(map_promotion_error)?;
        if resolved.status() == RequestStatus::Approved {
            info!(
                request_id = %resolved.id(),
                candidate_id = %resolved.candidate_id(),
                new_level = %resolved.proposed_level(),
                "promotion request approved by vote"
            );
        }
        Ok(VoteOutcome {
            success: true,
            promotion_status: resolved.status(),
        })
    }
}

#[async_trait]
impl<D, P> PromotionQuery for PromotionService<D, P>
where
    D: DirectoryRepository,
    P: PromotionRepository,
{
    async fn list_requests(
        &self,
        viewer_id: MemberId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PromotionRequestView>, Error> {
        let viewer = require_member(self.directory.as_ref(), viewer_id).await?;
        let requests = self
            .promotions
            .list_requests(status)
            .await
            .map_err(map_promotion_error)?;
        let mut views = Vec::with_capacity(requests.len());
        for request in &requests {
            if let Some(view) = self.view_for(&viewer, request).await? {
                views.push(view);
            }
        }
        Ok(views)
    }

    async fn request_detail(
        &self,
        viewer_id: MemberId,
        id: RequestId,
    ) -> Result<PromotionRequestView, Error> {
        let viewer = require_member(self.directory.as_ref(), viewer_id).await?;
        let request = self
            .promotions
            .find_request(&id)
            .await
            .map_err(map_promotion_error)?
            .ok_or_else(|| Error::not_found("Promotion request not found"))?;
        self.view_for(&viewer, &request)
            .await?
            .ok_or_else(|| Error::not_found("Promotion request not found"))
    }
}

#[cfg(test)]
#[path = "promotion_service_tests.rs"]
mod tests;
