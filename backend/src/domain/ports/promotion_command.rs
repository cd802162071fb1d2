//! Driving port for promotion request commands.
//!
//! Front door of the promotion engine: sponsoring a new request and casting
//! a ballot. Both validate against live directory state, and a recorded
//! ballot triggers synchronous resolution of its request.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::member::MemberId;
use crate::domain::promotion::{RequestId, RequestStatus, RequestType, VoteChoice};

use super::promotion_query::PromotionRequestView;

/// A proposal to change a member's level by vote.
///
/// Levels are carried raw here: range, direction, and snapshot agreement are
/// all verdicts of the validation chain, not of deserialization.
#[derive(Debug, Clone)]
pub struct PromotionProposal {
    /// Member the proposal is about.
    pub candidate_id: MemberId,
    /// Kind of transition proposed.
    pub request_type: RequestType,
    /// Level argued for.
    pub proposed_level: u8,
    /// Candidate level the sponsor believes current, when supplied.
    pub current_level: Option<u8>,
    /// Sponsor's argument.
    pub justification: String,
}

/// A ballot on an open request.
#[derive(Debug, Clone)]
pub struct VoteSubmission {
    /// Request voted on.
    pub request_id: RequestId,
    /// The ballot.
    pub choice: VoteChoice,
    /// Optional remark.
    pub comment: Option<String>,
}

/// Result of casting a ballot.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    /// Always true; rejected ballots are reported as errors instead.
    pub success: bool,
    /// Request status after resolution ran.
    pub promotion_status: RequestStatus,
}

/// Domain use-case port for promotion commands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromotionCommand: Send + Sync {
    /// Open a promotion request on behalf of a sponsor.
    async fn create_request(
        &self,
        creator: MemberId,
        proposal: PromotionProposal,
    ) -> Result<PromotionRequestView, Error>;

    /// Cast a ballot and resolve the request if the threshold is now met.
    async fn cast_vote(
        &self,
        voter: MemberId,
        submission: VoteSubmission,
    ) -> Result<VoteOutcome, Error>;
}

/// Temporary fixture command used until persistence is wired.
///
/// Behaves like an empty directory: no caller resolves to a member.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePromotionCommand;

#[async_trait]
impl PromotionCommand for FixturePromotionCommand {
    async fn create_request(
        &self,
        creator: MemberId,
        _proposal: PromotionProposal,
    ) -> Result<PromotionRequestView, Error> {
        Err(Error::unauthorized(format!("member {creator} not found")))
    }

    async fn cast_vote(
        &self,
        voter: MemberId,
        _submission: VoteSubmission,
    ) -> Result<VoteOutcome, Error> {
        Err(Error::unauthorized(format!("member {voter} not found")))
    }
}
