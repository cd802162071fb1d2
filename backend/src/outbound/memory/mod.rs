//! In-memory store backing every persistence port.
//!
//! One `RwLock` guards the whole state, so compound mutations (a level write
//! plus its ledger entry, a tally plus the resulting close) happen in a
//! single atomic section. This is the reference adapter for a
//! single-process deployment and the test suite; a database-backed adapter
//! can replace it behind the same ports.
//!
//! Collections are append-only vectors in insertion order; listings walk
//! them in reverse so callers get newest first without relying on clock
//! resolution.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::audit::{HistoryId, LevelChange, LevelChangeRecord};
use crate::domain::governance::AdminCensus;
use crate::domain::invite::{InviteLink, InviteToken, NewInviteLink, RedeemError};
use crate::domain::level::Level;
use crate::domain::member::{EmailAddress, Member, MemberId, NewMember, Username};
use crate::domain::ports::{
    DirectoryRepository, DirectoryRepositoryError, InviteRepository, InviteRepositoryError,
    PromotionRepository, PromotionRepositoryError,
};
use crate::domain::promotion::{
    NewPromotionRequest, NewVote, PromotionRequest, RequestId, RequestStatus, RequestType, Vote,
    VoteChoice,
};

const LOCK_POISONED: &str = "store lock poisoned";

/// Marker for a lock whose holder panicked mid-mutation.
struct PoisonedLock;

impl From<PoisonedLock> for DirectoryRepositoryError {
    fn from(_: PoisonedLock) -> Self {
        Self::unavailable(LOCK_POISONED)
    }
}

impl From<PoisonedLock> for InviteRepositoryError {
    fn from(_: PoisonedLock) -> Self {
        Self::unavailable(LOCK_POISONED)
    }
}

impl From<PoisonedLock> for PromotionRepositoryError {
    fn from(_: PoisonedLock) -> Self {
        Self::unavailable(LOCK_POISONED)
    }
}

#[derive(Debug, Default)]
struct StoreState {
    members: Vec<Member>,
    invites: Vec<InviteLink>,
    requests: Vec<PromotionRequest>,
    votes: Vec<Vote>,
    history: Vec<LevelChangeRecord>,
}

impl StoreState {
    fn member_index(&self, id: &MemberId) -> Option<usize> {
        self.members.iter().position(|member| member.id() == *id)
    }

    fn has_username(&self, username: &Username) -> bool {
        self.members
            .iter()
            .any(|member| member.username() == username)
    }

    fn has_email(&self, email: &EmailAddress) -> bool {
        self.members.iter().any(|member| member.email() == Some(email))
    }

    fn admin_count(&self) -> u64 {
        self.members
            .iter()
            .filter(|member| member.level().is_admin())
            .count() as u64
    }

    /// Swap a member's level and append the ledger entry in one step.
    fn write_level(&mut self, index: usize, change: &LevelChange) -> Member {
        let previous = self.members[index].level();
        let updated = self.members[index].clone().with_level(change.new_level);
        self.members[index] = updated.clone();
        self.history.push(LevelChangeRecord::from_change(
            HistoryId::random(),
            previous,
            change,
            Utc::now(),
        ));
        updated
    }
}

/// In-memory implementation of the persistence ports.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, PoisonedLock> {
        self.state.read().map_err(|_| PoisonedLock)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, PoisonedLock> {
        self.state.write().map_err(|_| PoisonedLock)
    }
}

#[async_trait]
impl DirectoryRepository for MemoryStore {
    async fn insert_member(&self, draft: NewMember) -> Result<Member, DirectoryRepositoryError> {
        let mut state = self.write()?;
        if state.has_username(&draft.username) {
            return Err(DirectoryRepositoryError::username_taken(
                draft.username.as_str(),
            ));
        }
        if let Some(email) = &draft.email {
            if state.has_email(email) {
                return Err(DirectoryRepositoryError::email_taken(email.as_str()));
            }
        }
        let member = Member::create(draft, Utc::now());
        state.members.push(member.clone());
        Ok(member)
    }

    async fn insert_founding_member(
        &self,
        draft: NewMember,
    ) -> Result<Member, DirectoryRepositoryError> {
        let mut state = self.write()?;
        if !state.members.is_empty() {
            return Err(DirectoryRepositoryError::directory_not_empty());
        }
        let member = Member::create(draft, Utc::now());
        state.members.push(member.clone());
        Ok(member)
    }

    async fn find_member(
        &self,
        id: &MemberId,
    ) -> Result<Option<Member>, DirectoryRepositoryError> {
        let state = self.read()?;
        Ok(state.member_index(id).map(|index| state.members[index].clone()))
    }

    async fn find_member_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Member>, DirectoryRepositoryError> {
        let state = self.read()?;
        Ok(state
            .members
            .iter()
            .find(|member| member.username() == username)
            .cloned())
    }

    async fn list_members(
        &self,
        level: Option<Level>,
    ) -> Result<Vec<Member>, DirectoryRepositoryError> {
        let state = self.read()?;
        Ok(state
            .members
            .iter()
            .rev()
            .filter(|member| level.is_none_or(|wanted| member.level() == wanted))
            .cloned()
            .collect())
    }

    async fn list_invitees(
        &self,
        inviter: &MemberId,
    ) -> Result<Vec<Member>, DirectoryRepositoryError> {
        let state = self.read()?;
        Ok(state
            .members
            .iter()
            .rev()
            .filter(|member| member.invited_by() == Some(*inviter))
            .cloned()
            .collect())
    }

    async fn member_count(&self) -> Result<u64, DirectoryRepositoryError> {
        Ok(self.read()?.members.len() as u64)
    }

    async fn admin_census(&self) -> Result<AdminCensus, DirectoryRepositoryError> {
        Ok(AdminCensus::new(self.read()?.admin_count()))
    }

    async fn is_username_taken(
        &self,
        username: &Username,
    ) -> Result<bool, DirectoryRepositoryError> {
        Ok(self.read()?.has_username(username))
    }

    async fn is_email_taken(
        &self,
        email: &EmailAddress,
    ) -> Result<bool, DirectoryRepositoryError> {
        Ok(self.read()?.has_email(email))
    }

    async fn apply_level_change(
        &self,
        change: LevelChange,
    ) -> Result<Member, DirectoryRepositoryError> {
        let mut state = self.write()?;
        let index = state.member_index(&change.member_id).ok_or_else(|| {
            DirectoryRepositoryError::member_missing(change.member_id.to_string())
        })?;
        let actual = state.members[index].level();
        if let Some(expected) = change.expected_level {
            if actual != expected {
                return Err(DirectoryRepositoryError::stale_level(
                    expected.get(),
                    actual.get(),
                ));
            }
        }
        Ok(state.write_level(index, &change))
    }

    async fn bootstrap_promote(
        &self,
        change: LevelChange,
    ) -> Result<Member, DirectoryRepositoryError> {
        let mut state = self.write()?;
        let census = state.admin_count();
        if census != 1 {
            return Err(DirectoryRepositoryError::bootstrap_closed(census));
        }
        let index = state.member_index(&change.member_id).ok_or_else(|| {
            DirectoryRepositoryError::member_missing(change.member_id.to_string())
        })?;
        let actual = state.members[index].level();
        if let Some(expected) = change.expected_level {
            if actual != expected {
                return Err(DirectoryRepositoryError::stale_level(
                    expected.get(),
                    actual.get(),
                ));
            }
        }
        Ok(state.write_level(index, &change))
    }

    async fn level_history(
        &self,
        member: &MemberId,
    ) -> Result<Vec<LevelChangeRecord>, DirectoryRepositoryError> {
        let state = self.read()?;
        Ok(state
            .history
            .iter()
            .rev()
            .filter(|record| record.member_id() == *member)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InviteRepository for MemoryStore {
    async fn insert_link(
        &self,
        draft: NewInviteLink,
    ) -> Result<InviteLink, InviteRepositoryError> {
        let mut state = self.write()?;
        let link = InviteLink::create(draft, Utc::now());
        state.invites.push(link.clone());
        Ok(link)
    }

    async fn find_by_token(
        &self,
        token: &InviteToken,
    ) -> Result<Option<InviteLink>, InviteRepositoryError> {
        let state = self.read()?;
        Ok(state
            .invites
            .iter()
            .find(|link| link.token() == token)
            .cloned())
    }

    async fn list_by_owner(
        &self,
        owner: &MemberId,
    ) -> Result<Vec<InviteLink>, InviteRepositoryError> {
        let state = self.read()?;
        Ok(state
            .invites
            .iter()
            .rev()
            .filter(|link| link.invited_by() == *owner)
            .cloned()
            .collect())
    }

    async fn redeem(
        &self,
        token: &InviteToken,
        redeemer: &MemberId,
    ) -> Result<InviteLink, InviteRepositoryError> {
        let mut state = self.write()?;
        let index = state
            .invites
            .iter()
            .position(|link| link.token() == token)
            .ok_or_else(InviteRepositoryError::unknown_token)?;
        let redeemed = state.invites[index]
            .clone()
            .redeem(*redeemer)
            .map_err(|error| match error {
                RedeemError::NotActive { status } => {
                    InviteRepositoryError::link_not_active(status)
                }
                RedeemError::Exhausted => InviteRepositoryError::link_exhausted(),
            })?;
        state.invites[index] = redeemed.clone();
        Ok(redeemed)
    }
}

#[async_trait]
impl PromotionRepository for MemoryStore {
    async fn insert_request(
        &self,
        draft: NewPromotionRequest,
    ) -> Result<PromotionRequest, PromotionRepositoryError> {
        let mut state = self.write()?;
        let request = PromotionRequest::create(draft, Utc::now());
        state.requests.push(request.clone());
        Ok(request)
    }

    async fn find_request(
        &self,
        id: &RequestId,
    ) -> Result<Option<PromotionRequest>, PromotionRepositoryError> {
        let state = self.read()?;
        Ok(state
            .requests
            .iter()
            .find(|request| request.id() == *id)
            .cloned())
    }

    async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PromotionRequest>, PromotionRepositoryError> {
        let state = self.read()?;
        Ok(state
            .requests
            .iter()
            .rev()
            .filter(|request| status.is_none_or(|wanted| request.status() == wanted))
            .cloned()
            .collect())
    }

    async fn list_votes(&self, request: &RequestId) -> Result<Vec<Vote>, PromotionRepositoryError> {
        let state = self.read()?;
        Ok(state
            .votes
            .iter()
            .rev()
            .filter(|vote| vote.request_id() == *request)
            .cloned()
            .collect())
    }

    async fn has_voted(
        &self,
        request: &RequestId,
        voter: &MemberId,
    ) -> Result<bool, PromotionRepositoryError> {
        let state = self.read()?;
        Ok(state
            .votes
            .iter()
            .any(|vote| vote.request_id() == *request && vote.voter_id() == *voter))
    }

    async fn record_vote(&self, draft: NewVote) -> Result<Vote, PromotionRepositoryError> {
        let mut state = self.write()?;
        let status = state
            .requests
            .iter()
            .find(|request| request.id() == draft.request_id)
            .map(|request| request.status())
            .ok_or_else(|| {
                PromotionRepositoryError::unknown_request(draft.request_id.to_string())
            })?;
        if status != RequestStatus::Open {
            return Err(PromotionRepositoryError::request_closed(status));
        }
        if state
            .votes
            .iter()
            .any(|vote| vote.request_id() == draft.request_id && vote.voter_id() == draft.voter_id)
        {
            return Err(PromotionRepositoryError::duplicate_vote());
        }
        let vote = Vote::create(draft, Utc::now());
        state.votes.push(vote.clone());
        Ok(vote)
    }

    async fn resolve_open_request(
        &self,
        id: &RequestId,
    ) -> Result<PromotionRequest, PromotionRepositoryError> {
        let mut state = self.write()?;
        let request_index = state
            .requests
            .iter()
            .position(|request| request.id() == *id)
            .ok_or_else(|| PromotionRepositoryError::unknown_request(id.to_string()))?;
        let request = state.requests[request_index].clone();
        if !request.is_open() {
            return Ok(request);
        }

        let votes_for = state
            .votes
            .iter()
            .filter(|vote| vote.request_id() == *id && vote.choice() == VoteChoice::For)
            .count() as u64;
        if votes_for < u64::from(request.required_votes()) {
            return Ok(request);
        }

        let member_index = state.member_index(&request.candidate_id()).ok_or_else(|| {
            PromotionRepositoryError::candidate_missing(request.candidate_id().to_string())
        })?;

        // A demotion that would empty the admin tier is left open instead
        // of applied.
        if request.request_type() == RequestType::DemoteFromAdmin
            && state.members[member_index].level().is_admin()
            && state.admin_count() <= 1
        {
            return Ok(request);
        }

        let change = LevelChange {
            member_id: request.candidate_id(),
            expected_level: None,
            new_level: request.proposed_level(),
            changed_by: request.created_by(),
            reason: format!("Promotion approved by vote ({votes_for} votes for)"),
        };
        state.write_level(member_index, &change);
        let approved = request.approved(Utc::now());
        state.requests[request_index] = approved.clone();
        Ok(approved)
    }
}
