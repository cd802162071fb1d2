//! Tests for the promotion request service.

use std::sync::Arc;

use chrono::Utc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::member::{MemberStatus, NewMember, Username};
use crate::domain::ports::{MockDirectoryRepository, MockPromotionRepository};
use crate::domain::promotion::VoteChoice;
use crate::outbound::memory::MemoryStore;

fn service(store: &Arc<MemoryStore>) -> PromotionService<MemoryStore, MemoryStore> {
    PromotionService::new(Arc::clone(store), Arc::clone(store))
}

async fn seed(store: &MemoryStore, name: &str, level: u8) -> Member {
    store
        .insert_member(NewMember {
            id: MemberId::random(),
            username: Username::parse(name).expect("valid handle"),
            email: None,
            level: Level::new(level).expect("valid level"),
            invited_by: None,
        })
        .await
        .expect("member inserts")
}

fn proposal(candidate: &Member, proposed: u8) -> PromotionProposal {
    let proposed_level = Level::new(proposed).expect("valid level");
    PromotionProposal {
        candidate_id: candidate.id(),
        request_type: RequestType::for_transition(candidate.level(), proposed_level),
        proposed_level: proposed,
        current_level: None,
        justification: "Shipped the directory redesign and mentors newcomers".to_owned(),
    }
}

fn ballot(request_id: RequestId, choice: VoteChoice) -> VoteSubmission {
    VoteSubmission {
        request_id,
        choice,
        comment: None,
    }
}

#[tokio::test]
async fn sponsor_opens_a_request_for_a_peer() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 3).await;
    let candidate = seed(&store, "candidate", 2).await;

    let view = service(&store)
        .create_request(sponsor.id(), proposal(&candidate, 3))
        .await
        .expect("request opens");
    assert_eq!(view.status, RequestStatus::Open);
    assert_eq!(view.request_type, RequestType::Promote);
    assert_eq!(view.required_votes, DEFAULT_REQUIRED_VOTES);
    assert_eq!(view.allowed_voter_min_level, candidate.level());
    assert_eq!(view.candidate.id(), candidate.id());
    assert_eq!(
        view.created_by.as_ref().map(|sponsor| sponsor.id()),
        Some(sponsor.id())
    );
    assert!(view.votes.is_empty());
}

#[tokio::test]
async fn candidate_above_the_sponsor_is_refused() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 2).await;
    let candidate = seed(&store, "candidate", 4).await;

    let err = service(&store)
        .create_request(sponsor.id(), proposal(&candidate, 5))
        .await
        .expect_err("higher candidate is out of reach");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn candidate_level_snapshot_must_match() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 3).await;
    let candidate = seed(&store, "candidate", 2).await;

    let mut stale = proposal(&candidate, 3);
    stale.current_level = Some(3);
    let err = service(&store)
        .create_request(sponsor.id(), stale)
        .await
        .expect_err("stale snapshot is refused");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn structural_failures_outrank_the_justification_check() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 3).await;
    let candidate = seed(&store, "candidate", 2).await;

    let mut stale = proposal(&candidate, 3);
    stale.current_level = Some(4);
    stale.justification = "meh".to_owned();
    let err = service(&store)
        .create_request(sponsor.id(), stale)
        .await
        .expect_err("snapshot conflict comes first");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn out_of_range_levels_are_invalid_transitions() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 3).await;
    let candidate = seed(&store, "candidate", 2).await;

    let outlandish = PromotionProposal {
        candidate_id: candidate.id(),
        request_type: RequestType::Promote,
        proposed_level: 6,
        current_level: None,
        justification: "Shipped the directory redesign and mentors newcomers".to_owned(),
    };
    let err = service(&store)
        .create_request(sponsor.id(), outlandish)
        .await
        .expect_err("level 6 does not exist");
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn same_level_proposals_are_refused() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 3).await;
    let candidate = seed(&store, "candidate", 2).await;

    let unchanged = PromotionProposal {
        candidate_id: candidate.id(),
        request_type: RequestType::Promote,
        proposed_level: 2,
        current_level: None,
        justification: "Shipped the directory redesign and mentors newcomers".to_owned(),
    };
    let err = service(&store)
        .create_request(sponsor.id(), unchanged)
        .await
        .expect_err("no-op transition is refused");
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn request_type_must_match_the_transition() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 3).await;
    let candidate = seed(&store, "candidate", 2).await;

    let mislabelled = PromotionProposal {
        candidate_id: candidate.id(),
        request_type: RequestType::Demote,
        proposed_level: 3,
        current_level: None,
        justification: "Shipped the directory redesign and mentors newcomers".to_owned(),
    };
    let err = service(&store)
        .create_request(sponsor.id(), mislabelled)
        .await
        .expect_err("upward demotion is refused");
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn admin_tier_requests_need_an_admin_sponsor() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "chief", 5).await;
    seed(&store, "deputy", 5).await;
    let sponsor = seed(&store, "sponsor", 4).await;
    let candidate = seed(&store, "candidate", 4).await;

    let err = service(&store)
        .create_request(sponsor.id(), proposal(&candidate, 5))
        .await
        .expect_err("tier changes are admin business");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn sole_admin_is_pointed_at_bootstrap() {
    let store = Arc::new(MemoryStore::new());
    let chief = seed(&store, "chief", 5).await;
    let candidate = seed(&store, "candidate", 4).await;

    let err = service(&store)
        .create_request(chief.id(), proposal(&candidate, 5))
        .await
        .expect_err("a sole admin must bootstrap");
    assert_eq!(err.code(), ErrorCode::UseBootstrapInstead);
}

#[tokio::test]
async fn admin_pair_votes_with_the_pair_threshold() {
    let store = Arc::new(MemoryStore::new());
    let chief = seed(&store, "chief", 5).await;
    seed(&store, "deputy", 5).await;
    let candidate = seed(&store, "candidate", 4).await;

    let view = service(&store)
        .create_request(chief.id(), proposal(&candidate, 5))
        .await
        .expect("request opens");
    assert_eq!(view.request_type, RequestType::PromoteToAdmin);
    assert_eq!(view.required_votes, 2);
    assert_eq!(view.allowed_voter_min_level, Level::ADMIN);
}

#[tokio::test]
async fn demoting_the_last_admin_is_refused() {
    let store = Arc::new(MemoryStore::new());
    let chief = seed(&store, "chief", 5).await;

    let err = service(&store)
        .create_request(chief.id(), proposal(&chief, 4))
        .await
        .expect_err("the tier may never empty");
    assert_eq!(err.code(), ErrorCode::LastAdminProtected);
}

#[tokio::test]
async fn short_justification_is_refused() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 3).await;
    let candidate = seed(&store, "candidate", 2).await;

    let mut terse = proposal(&candidate, 3);
    terse.justification = "Because.".to_owned();
    let err = service(&store)
        .create_request(sponsor.id(), terse)
        .await
        .expect_err("the argument must carry some weight");
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[tokio::test]
async fn third_approval_promotes_the_candidate() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 4).await;
    let peer_one = seed(&store, "peer_one", 3).await;
    let peer_two = seed(&store, "peer_two", 3).await;
    let candidate = seed(&store, "candidate", 2).await;

    let view = service(&store)
        .create_request(sponsor.id(), proposal(&candidate, 3))
        .await
        .expect("request opens");

    let outcome = service(&store)
        .cast_vote(sponsor.id(), ballot(view.id, VoteChoice::For))
        .await
        .expect("first ballot lands");
    assert_eq!(outcome.promotion_status, RequestStatus::Open);
    let outcome = service(&store)
        .cast_vote(peer_one.id(), ballot(view.id, VoteChoice::For))
        .await
        .expect("second ballot lands");
    assert_eq!(outcome.promotion_status, RequestStatus::Open);
    let outcome = service(&store)
        .cast_vote(peer_two.id(), ballot(view.id, VoteChoice::For))
        .await
        .expect("third ballot lands");
    assert!(outcome.success);
    assert_eq!(outcome.promotion_status, RequestStatus::Approved);

    let promoted = store
        .find_member(&candidate.id())
        .await
        .expect("lookup succeeds")
        .expect("candidate present");
    assert_eq!(promoted.level().get(), 3);
}

#[tokio::test]
async fn against_ballots_do_not_count_toward_the_threshold() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 4).await;
    let peer_one = seed(&store, "peer_one", 3).await;
    let peer_two = seed(&store, "peer_two", 3).await;
    let peer_three = seed(&store, "peer_three", 3).await;
    let candidate = seed(&store, "candidate", 2).await;

    let view = service(&store)
        .create_request(sponsor.id(), proposal(&candidate, 3))
        .await
        .expect("request opens");
    for (voter, choice) in [
        (&sponsor, VoteChoice::For),
        (&peer_one, VoteChoice::For),
        (&peer_two, VoteChoice::Against),
        (&peer_three, VoteChoice::Against),
    ] {
        let outcome = service(&store)
            .cast_vote(voter.id(), ballot(view.id, choice))
            .await
            .expect("ballot lands");
        assert_eq!(outcome.promotion_status, RequestStatus::Open);
    }
}

#[tokio::test]
async fn duplicate_ballots_are_refused() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 4).await;
    let candidate = seed(&store, "candidate", 2).await;
    let view = service(&store)
        .create_request(sponsor.id(), proposal(&candidate, 3))
        .await
        .expect("request opens");

    service(&store)
        .cast_vote(sponsor.id(), ballot(view.id, VoteChoice::For))
        .await
        .expect("first ballot lands");
    let err = service(&store)
        .cast_vote(sponsor.id(), ballot(view.id, VoteChoice::Against))
        .await
        .expect_err("one ballot per member");
    assert_eq!(err.code(), ErrorCode::DuplicateVote);
}

#[tokio::test]
async fn closed_requests_refuse_further_ballots() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 4).await;
    let peer_one = seed(&store, "peer_one", 3).await;
    let peer_two = seed(&store, "peer_two", 3).await;
    let latecomer = seed(&store, "latecomer", 3).await;
    let candidate = seed(&store, "candidate", 2).await;

    let view = service(&store)
        .create_request(sponsor.id(), proposal(&candidate, 3))
        .await
        .expect("request opens");
    for voter in [&sponsor, &peer_one, &peer_two] {
        service(&store)
            .cast_vote(voter.id(), ballot(view.id, VoteChoice::For))
            .await
            .expect("ballot lands");
    }

    let err = service(&store)
        .cast_vote(latecomer.id(), ballot(view.id, VoteChoice::For))
        .await
        .expect_err("approved request takes no more ballots");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn voters_below_the_candidate_never_see_the_request() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 4).await;
    let candidate = seed(&store, "candidate", 3).await;
    let junior = seed(&store, "junior", 2).await;

    let view = service(&store)
        .create_request(sponsor.id(), proposal(&candidate, 4))
        .await
        .expect("request opens");
    let err = service(&store)
        .cast_vote(junior.id(), ballot(view.id, VoteChoice::For))
        .await
        .expect_err("the request is invisible below the candidate");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn admin_tier_ballots_require_the_top_level() {
    let store = Arc::new(MemoryStore::new());
    let chief = seed(&store, "chief", 5).await;
    seed(&store, "deputy", 5).await;
    let candidate = seed(&store, "candidate", 4).await;
    let senior = seed(&store, "senior", 4).await;

    let view = service(&store)
        .create_request(chief.id(), proposal(&candidate, 5))
        .await
        .expect("request opens");
    let err = service(&store)
        .cast_vote(senior.id(), ballot(view.id, VoteChoice::For))
        .await
        .expect_err("only admins vote on tier changes");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert!(err.message().contains("Level 5+"));
}

#[tokio::test]
async fn votes_on_unknown_requests_are_absent() {
    let store = Arc::new(MemoryStore::new());
    let voter = seed(&store, "voter", 3).await;

    let err = service(&store)
        .cast_vote(voter.id(), ballot(RequestId::random(), VoteChoice::For))
        .await
        .expect_err("unknown request is refused");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn suspended_voters_are_refused() {
    let voter_id = MemberId::random();
    let mut directory = MockDirectoryRepository::new();
    directory
        .expect_find_member()
        .times(1)
        .return_once(move |_| {
            let voter = Member::create(
                NewMember {
                    id: voter_id,
                    username: Username::parse("benched").expect("valid handle"),
                    email: None,
                    level: Level::new(3).expect("valid level"),
                    invited_by: None,
                },
                Utc::now(),
            )
            .with_status(MemberStatus::Suspended);
            Ok(Some(voter))
        });

    let service = PromotionService::new(
        Arc::new(directory),
        Arc::new(MockPromotionRepository::new()),
    );
    let err = service
        .cast_vote(voter_id, ballot(RequestId::random(), VoteChoice::For))
        .await
        .expect_err("suspended voter is refused");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn requests_about_invisible_candidates_are_absent() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 4).await;
    let candidate = seed(&store, "candidate", 3).await;
    let junior = seed(&store, "junior", 2).await;

    let view = service(&store)
        .create_request(sponsor.id(), proposal(&candidate, 4))
        .await
        .expect("request opens");

    let listed = service(&store)
        .list_requests(junior.id(), None)
        .await
        .expect("listing succeeds");
    assert!(listed.is_empty());
    let err = service(&store)
        .request_detail(junior.id(), view.id)
        .await
        .expect_err("detail is absent below the candidate");
    assert_eq!(err.code(), ErrorCode::NotFound);

    let listed = service(&store)
        .list_requests(sponsor.id(), None)
        .await
        .expect("listing succeeds");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn invisible_voters_are_dropped_from_views_and_tallies() {
    let store = Arc::new(MemoryStore::new());
    let chief = seed(&store, "chief", 5).await;
    let street = seed(&store, "street", 2).await;
    let mid = seed(&store, "mid", 3).await;
    let candidate = seed(&store, "candidate", 1).await;

    let view = service(&store)
        .create_request(chief.id(), proposal(&candidate, 2))
        .await
        .expect("request opens");
    service(&store)
        .cast_vote(street.id(), ballot(view.id, VoteChoice::For))
        .await
        .expect("ballot lands");
    service(&store)
        .cast_vote(chief.id(), ballot(view.id, VoteChoice::For))
        .await
        .expect("ballot lands");

    let seen_by_mid = service(&store)
        .request_detail(mid.id(), view.id)
        .await
        .expect("detail resolves");
    assert_eq!(seen_by_mid.votes.len(), 1);
    assert_eq!(seen_by_mid.votes_for, 1);
    assert_eq!(seen_by_mid.votes[0].voter.id(), street.id());

    let seen_by_chief = service(&store)
        .request_detail(chief.id(), view.id)
        .await
        .expect("detail resolves");
    assert_eq!(seen_by_chief.votes.len(), 2);
    assert_eq!(seen_by_chief.votes_for, 2);
}

#[tokio::test]
async fn status_filter_restricts_the_listing() {
    let store = Arc::new(MemoryStore::new());
    let sponsor = seed(&store, "sponsor", 4).await;
    let peer_one = seed(&store, "peer_one", 3).await;
    let peer_two = seed(&store, "peer_two", 3).await;
    let settled = seed(&store, "settled", 2).await;
    let waiting = seed(&store, "waiting", 2).await;

    let approved = service(&store)
        .create_request(sponsor.id(), proposal(&settled, 3))
        .await
        .expect("request opens");
    for voter in [&sponsor, &peer_one, &peer_two] {
        service(&store)
            .cast_vote(voter.id(), ballot(approved.id, VoteChoice::For))
            .await
            .expect("ballot lands");
    }
    service(&store)
        .create_request(sponsor.id(), proposal(&waiting, 3))
        .await
        .expect("request opens");

    let open = service(&store)
        .list_requests(sponsor.id(), Some(RequestStatus::Open))
        .await
        .expect("listing succeeds");
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].candidate.id(), waiting.id());

    let all = service(&store)
        .list_requests(sponsor.id(), None)
        .await
        .expect("listing succeeds");
    assert_eq!(all.len(), 2);
}
