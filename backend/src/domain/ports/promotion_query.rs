//! Driving port for promotion request queries.
//!
//! Requests are projected through the visibility filter before leaving the
//! domain: a request is listed only when its candidate is visible to the
//! viewer, embedded members are sanitized, and ballots cast by invisible
//! voters are absent from both the vote list and the tallies.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::member::MemberId;
use crate::domain::promotion::{
    PromotionRequest, RequestId, RequestStatus, RequestType, Vote, VoteChoice, VoteId,
};
use crate::domain::visibility::MemberView;
use crate::domain::{Error, Level};

/// One ballot on a promotion request, with the voter resolved and sanitized.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteView {
    /// Ballot identifier.
    pub id: VoteId,
    /// Who cast it, sanitized for the viewer.
    pub voter: MemberView,
    /// The ballot itself.
    pub vote: VoteChoice,
    /// Optional remark left with the ballot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Moment the ballot was cast.
    pub created_at: DateTime<Utc>,
}

impl VoteView {
    /// Combine a ballot with its sanitized voter.
    pub fn from_vote(vote: &Vote, voter: MemberView) -> Self {
        Self {
            id: vote.id(),
            voter,
            vote: vote.choice(),
            comment: vote.comment().map(str::to_owned),
            created_at: vote.created_at(),
        }
    }
}

/// A promotion request as seen by one viewer.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRequestView {
    /// Request identifier.
    pub id: RequestId,
    /// The member the request is about, sanitized for the viewer.
    pub candidate: MemberView,
    /// Sponsor of the request, when visible to the viewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<MemberView>,
    /// Kind of transition proposed.
    pub request_type: RequestType,
    /// Lifecycle state.
    pub status: RequestStatus,
    /// Candidate's level when the request was opened.
    pub current_level: Level,
    /// Level the request argues for.
    pub proposed_level: Level,
    /// Approvals needed to resolve.
    pub required_votes: u32,
    /// Lowest level allowed to vote.
    pub allowed_voter_min_level: Level,
    /// Sponsor's argument.
    pub justification: String,
    /// Ballots cast by visible voters.
    pub votes: Vec<VoteView>,
    /// Approvals among the visible ballots.
    pub votes_for: u64,
    /// Refusals among the visible ballots.
    pub votes_against: u64,
    /// Moment the request was opened.
    pub created_at: DateTime<Utc>,
    /// Moment the request last changed.
    pub updated_at: DateTime<Utc>,
}

impl PromotionRequestView {
    /// Assemble a view from a request and its already-filtered ballots.
    ///
    /// Tallies are derived from the ballots given, so a caller that filters
    /// to visible voters gets visible-only tallies for free.
    pub fn assemble(
        request: &PromotionRequest,
        candidate: MemberView,
        created_by: Option<MemberView>,
        votes: Vec<VoteView>,
    ) -> Self {
        let votes_for = votes
            .iter()
            .filter(|ballot| ballot.vote == VoteChoice::For)
            .count() as u64;
        let votes_against = votes
            .iter()
            .filter(|ballot| ballot.vote == VoteChoice::Against)
            .count() as u64;
        Self {
            id: request.id(),
            candidate,
            created_by,
            request_type: request.request_type(),
            status: request.status(),
            current_level: request.current_level(),
            proposed_level: request.proposed_level(),
            required_votes: request.required_votes(),
            allowed_voter_min_level: request.allowed_voter_min_level(),
            justification: request.justification().as_str().to_owned(),
            votes,
            votes_for,
            votes_against,
            created_at: request.created_at(),
            updated_at: request.updated_at(),
        }
    }
}

/// Domain use-case port for reading promotion requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromotionQuery: Send + Sync {
    /// Visible requests, optionally restricted to one status, newest first.
    async fn list_requests(
        &self,
        viewer: MemberId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PromotionRequestView>, Error>;

    /// One request. Requests about invisible candidates are reported as
    /// absent.
    async fn request_detail(
        &self,
        viewer: MemberId,
        id: RequestId,
    ) -> Result<PromotionRequestView, Error>;
}

/// Temporary fixture query used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePromotionQuery;

#[async_trait]
impl PromotionQuery for FixturePromotionQuery {
    async fn list_requests(
        &self,
        _viewer: MemberId,
        _status: Option<RequestStatus>,
    ) -> Result<Vec<PromotionRequestView>, Error> {
        Ok(Vec::new())
    }

    async fn request_detail(
        &self,
        _viewer: MemberId,
        id: RequestId,
    ) -> Result<PromotionRequestView, Error> {
        Err(Error::not_found(format!(
            "promotion request {id} not found"
        )))
    }
}
