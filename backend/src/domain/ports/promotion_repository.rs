//! Port for promotion request and vote persistence.
//!
//! Vote recording and request resolution are conditional mutations: adapters
//! re-check the request's status and the voter's prior ballot inside their
//! atomic section, and resolution applies the resulting level change in the
//! same section so a tallied request and its directory write cannot diverge.

use async_trait::async_trait;

use crate::domain::member::MemberId;
use crate::domain::promotion::{
    NewPromotionRequest, NewVote, PromotionRequest, RequestId, RequestStatus, Vote,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by promotion adapters.
    pub enum PromotionRepositoryError {
        /// Backing store could not serve the request.
        Unavailable { message: String } =>
            "promotion store unavailable: {message}",
        /// Referenced promotion request does not exist.
        UnknownRequest { id: String } =>
            "promotion request {id} does not exist",
        /// Request has already been closed.
        RequestClosed { status: RequestStatus } =>
            "promotion request is already {status}",
        /// Voter has already cast a ballot on this request.
        DuplicateVote =>
            "voter has already voted on this request",
        /// Candidate vanished between tally and level write.
        CandidateMissing { id: String } =>
            "candidate {id} does not exist",
    }
}

/// Port for promotion requests, their ballots, and vote-driven resolution.
///
/// Listings are returned newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromotionRepository: Send + Sync {
    /// Persist a new promotion request.
    async fn insert_request(
        &self,
        draft: NewPromotionRequest,
    ) -> Result<PromotionRequest, PromotionRepositoryError>;

    /// Find a request by id.
    async fn find_request(
        &self,
        id: &RequestId,
    ) -> Result<Option<PromotionRequest>, PromotionRepositoryError>;

    /// List requests, optionally restricted to one status.
    async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PromotionRequest>, PromotionRepositoryError>;

    /// Ballots cast on a request. Unknown requests list as empty.
    async fn list_votes(
        &self,
        request: &RequestId,
    ) -> Result<Vec<Vote>, PromotionRepositoryError>;

    /// Whether a member has already voted on a request.
    async fn has_voted(
        &self,
        request: &RequestId,
        voter: &MemberId,
    ) -> Result<bool, PromotionRepositoryError>;

    /// Record a ballot, re-checking openness and ballot uniqueness inside
    /// the atomic section.
    async fn record_vote(&self, draft: NewVote) -> Result<Vote, PromotionRepositoryError>;

    /// Tally a request and, when the approval threshold is met, apply the
    /// level change, append its ledger entry, and close the request in one
    /// atomic step.
    ///
    /// Resolving an already closed request returns it unchanged, so callers
    /// may re-run resolution without double-applying. A demotion out of the
    /// admin tier is left open when it would empty that tier.
    async fn resolve_open_request(
        &self,
        id: &RequestId,
    ) -> Result<PromotionRequest, PromotionRepositoryError>;
}

/// Fixture implementation for tests that do not exercise promotions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePromotionRepository;

#[async_trait]
impl PromotionRepository for FixturePromotionRepository {
    async fn insert_request(
        &self,
        draft: NewPromotionRequest,
    ) -> Result<PromotionRequest, PromotionRepositoryError> {
        Ok(PromotionRequest::create(draft, chrono::Utc::now()))
    }

    async fn find_request(
        &self,
        _id: &RequestId,
    ) -> Result<Option<PromotionRequest>, PromotionRepositoryError> {
        Ok(None)
    }

    async fn list_requests(
        &self,
        _status: Option<RequestStatus>,
    ) -> Result<Vec<PromotionRequest>, PromotionRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_votes(
        &self,
        _request: &RequestId,
    ) -> Result<Vec<Vote>, PromotionRepositoryError> {
        Ok(Vec::new())
    }

    async fn has_voted(
        &self,
        _request: &RequestId,
        _voter: &MemberId,
    ) -> Result<bool, PromotionRepositoryError> {
        Ok(false)
    }

    async fn record_vote(&self, draft: NewVote) -> Result<Vote, PromotionRepositoryError> {
        Err(PromotionRepositoryError::unknown_request(
            draft.request_id.to_string(),
        ))
    }

    async fn resolve_open_request(
        &self,
        id: &RequestId,
    ) -> Result<PromotionRequest, PromotionRepositoryError> {
        Err(PromotionRepositoryError::unknown_request(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use crate::domain::promotion::VoteChoice;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_lookups_return_empty() {
        let repo = FixturePromotionRepository;
        assert!(
            repo.find_request(&RequestId::random())
                .await
                .expect("fixture lookup succeeds")
                .is_none()
        );
        assert!(
            repo.list_requests(None)
                .await
                .expect("fixture list succeeds")
                .is_empty()
        );
        assert!(
            !repo
                .has_voted(&RequestId::random(), &MemberId::random())
                .await
                .expect("fixture check succeeds")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_vote_reports_an_unknown_request() {
        let repo = FixturePromotionRepository;
        let request_id = RequestId::random();
        let draft = NewVote {
            id: crate::domain::promotion::VoteId::random(),
            request_id,
            voter_id: MemberId::random(),
            choice: VoteChoice::For,
            comment: None,
        };
        let err = repo
            .record_vote(draft)
            .await
            .expect_err("fixture has no requests");
        assert_eq!(
            err,
            PromotionRepositoryError::unknown_request(request_id.to_string())
        );
    }

    #[rstest]
    #[case::approved(RequestStatus::Approved, "promotion request is already approved")]
    #[case::rejected(RequestStatus::Rejected, "promotion request is already rejected")]
    fn closed_error_names_the_status(#[case] status: RequestStatus, #[case] expected: &str) {
        assert_eq!(
            PromotionRepositoryError::request_closed(status).to_string(),
            expected
        );
    }
}
