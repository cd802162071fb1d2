//! Promotion requests and votes.
//!
//! A request snapshots the candidate's level at creation time and carries the
//! voting rules that were assigned to it (`required_votes` and the voter
//! floor). Votes are unique per voter, and resolution is recounted from the
//! stored ballots rather than a running tally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::define_id;
use super::level::Level;
use super::member::MemberId;

define_id! {
    /// Identifier of a promotion request.
    pub struct RequestId;
}

define_id! {
    /// Identifier of a cast vote.
    pub struct VoteId;
}

/// Approvals needed for a request inside levels 1 through 4.
///
/// Admin-tier requests ignore this and take their threshold from the
/// [`AdminCensus`](super::governance::AdminCensus) at creation time.
pub const DEFAULT_REQUIRED_VOTES: u32 = 3;

/// Kind of level change a request proposes.
///
/// The admin-tier variants exist so requests touching level 5 always carry
/// the governed voting rules; a plain promote or demote may never cross that
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RequestType {
    /// Raise the candidate within levels 1 through 4.
    #[serde(rename = "PROMOTE")]
    Promote,
    /// Lower the candidate within levels 1 through 4.
    #[serde(rename = "DEMOTE")]
    Demote,
    /// Raise the candidate into the admin tier.
    #[serde(rename = "PROMOTE_TO_5")]
    PromoteToAdmin,
    /// Remove the candidate from the admin tier.
    #[serde(rename = "DEMOTE_FROM_5")]
    DemoteFromAdmin,
}

impl RequestType {
    /// Whether this request changes the composition of the admin tier.
    pub fn governs_admin_tier(self) -> bool {
        matches!(self, Self::PromoteToAdmin | Self::DemoteFromAdmin)
    }

    /// Whether this request raises the candidate's level.
    pub fn is_promotion(self) -> bool {
        matches!(self, Self::Promote | Self::PromoteToAdmin)
    }

    /// The only honest type for a transition between two levels.
    ///
    /// Any transition into level 5 must be [`RequestType::PromoteToAdmin`]
    /// and any transition out of it must be [`RequestType::DemoteFromAdmin`];
    /// everything else is a plain promote or demote by direction. Callers
    /// must have established `current != proposed` first.
    pub fn for_transition(current: Level, proposed: Level) -> Self {
        if proposed.is_admin() {
            Self::PromoteToAdmin
        } else if current.is_admin() {
            Self::DemoteFromAdmin
        } else if proposed > current {
            Self::Promote
        } else {
            Self::Demote
        }
    }

    /// Wire spelling of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Promote => "PROMOTE",
            Self::Demote => "DEMOTE",
            Self::PromoteToAdmin => "PROMOTE_TO_5",
            Self::DemoteFromAdmin => "DEMOTE_FROM_5",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a promotion request.
///
/// `rejected` and `expired` are representable and honoured when read, but no
/// operation in this service sets them; requests stay `open` until approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Accepting votes.
    Open,
    /// Reached its threshold; the level change has been applied.
    Approved,
    /// Declined by governance action.
    Rejected,
    /// Timed out without resolution.
    Expired,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Open => "open",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        };
        write!(f, "{label}")
    }
}

/// A voter's position on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    /// Supports the proposed change.
    For,
    /// Opposes the proposed change.
    Against,
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::For => "for",
            Self::Against => "against",
        };
        write!(f, "{label}")
    }
}

/// Minimum justification length after trimming.
pub const JUSTIFICATION_MIN_LEN: usize = 10;
/// Maximum justification length after trimming.
pub const JUSTIFICATION_MAX_LEN: usize = 500;

/// Validation errors for [`Justification`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JustificationValidationError {
    TooShort { min: usize },
    TooLong { max: usize },
}

impl std::fmt::Display for JustificationValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort { min } => {
                write!(f, "justification must be at least {min} characters")
            }
            Self::TooLong { max } => {
                write!(f, "justification must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for JustificationValidationError {}

/// Written case for a proposed level change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Justification(String);

impl Justification {
    /// Trim and validate a raw justification.
    pub fn parse(raw: &str) -> Result<Self, JustificationValidationError> {
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if length < JUSTIFICATION_MIN_LEN {
            return Err(JustificationValidationError::TooShort {
                min: JUSTIFICATION_MIN_LEN,
            });
        }
        if length > JUSTIFICATION_MAX_LEN {
            return Err(JustificationValidationError::TooLong {
                max: JUSTIFICATION_MAX_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the justification text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Justification {
    type Error = JustificationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Justification> for String {
    fn from(value: Justification) -> Self {
        value.0
    }
}

/// Input for opening a promotion request.
#[derive(Debug, Clone)]
pub struct NewPromotionRequest {
    /// Identifier minted by the caller.
    pub id: RequestId,
    /// Member whose level would change.
    pub candidate_id: MemberId,
    /// Candidate's level at validation time.
    pub current_level: Level,
    /// Level the request proposes.
    pub proposed_level: Level,
    /// Member sponsoring the change.
    pub created_by: MemberId,
    /// Kind of change.
    pub request_type: RequestType,
    /// Votes in favour needed to approve.
    pub required_votes: u32,
    /// Lowest level allowed to vote.
    pub allowed_voter_min_level: Level,
    /// Written case for the change.
    pub justification: Justification,
}

/// A proposed level change under vote.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionRequest {
    id: RequestId,
    candidate_id: MemberId,
    current_level: Level,
    proposed_level: Level,
    created_by: MemberId,
    request_type: RequestType,
    status: RequestStatus,
    required_votes: u32,
    allowed_voter_min_level: Level,
    justification: Justification,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PromotionRequest {
    /// Materialise an open request from a draft.
    pub fn create(draft: NewPromotionRequest, created_at: DateTime<Utc>) -> Self {
        let NewPromotionRequest {
            id,
            candidate_id,
            current_level,
            proposed_level,
            created_by,
            request_type,
            required_votes,
            allowed_voter_min_level,
            justification,
        } = draft;
        Self {
            id,
            candidate_id,
            current_level,
            proposed_level,
            created_by,
            request_type,
            status: RequestStatus::Open,
            required_votes,
            allowed_voter_min_level,
            justification,
            created_at,
            updated_at: created_at,
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Member whose level would change.
    pub fn candidate_id(&self) -> MemberId {
        self.candidate_id
    }

    /// Candidate's level when the request was validated.
    pub fn current_level(&self) -> Level {
        self.current_level
    }

    /// Level the request proposes.
    pub fn proposed_level(&self) -> Level {
        self.proposed_level
    }

    /// Member sponsoring the change.
    pub fn created_by(&self) -> MemberId {
        self.created_by
    }

    /// Kind of change.
    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    /// Lifecycle state.
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Whether the request is still accepting votes.
    pub fn is_open(&self) -> bool {
        matches!(self.status, RequestStatus::Open)
    }

    /// Votes in favour needed to approve.
    pub fn required_votes(&self) -> u32 {
        self.required_votes
    }

    /// Lowest level allowed to vote.
    pub fn allowed_voter_min_level(&self) -> Level {
        self.allowed_voter_min_level
    }

    /// Written case for the change.
    pub fn justification(&self) -> &Justification {
        &self.justification
    }

    /// Moment the request was opened.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Moment the request last changed.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Copy of this request after approval.
    pub fn approved(mut self, at: DateTime<Utc>) -> Self {
        self.status = RequestStatus::Approved;
        self.updated_at = at;
        self
    }
}

/// Input for recording a vote.
#[derive(Debug, Clone)]
pub struct NewVote {
    /// Identifier minted by the caller.
    pub id: VoteId,
    /// Request being voted on.
    pub request_id: RequestId,
    /// Member casting the ballot.
    pub voter_id: MemberId,
    /// Position taken.
    pub choice: VoteChoice,
    /// Optional remark accompanying the ballot.
    pub comment: Option<String>,
}

/// A recorded ballot.
#[derive(Debug, Clone, PartialEq)]
pub struct Vote {
    id: VoteId,
    request_id: RequestId,
    voter_id: MemberId,
    choice: VoteChoice,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl Vote {
    /// Materialise a vote from a draft.
    pub fn create(draft: NewVote, created_at: DateTime<Utc>) -> Self {
        let NewVote {
            id,
            request_id,
            voter_id,
            choice,
            comment,
        } = draft;
        Self {
            id,
            request_id,
            voter_id,
            choice,
            comment,
            created_at,
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> VoteId {
        self.id
    }

    /// Request the ballot belongs to.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Member who cast the ballot.
    pub fn voter_id(&self) -> MemberId {
        self.voter_id
    }

    /// Position taken.
    pub fn choice(&self) -> VoteChoice {
        self.choice
    }

    /// Optional remark accompanying the ballot.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Moment the ballot was cast.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests;
