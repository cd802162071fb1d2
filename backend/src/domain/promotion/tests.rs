//! Tests for promotion requests, votes, and their value types.

use chrono::{Duration, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;

fn level(value: u8) -> Level {
    Level::new(value).expect("test levels are in range")
}

#[fixture]
fn draft() -> NewPromotionRequest {
    NewPromotionRequest {
        id: RequestId::random(),
        candidate_id: MemberId::random(),
        current_level: level(2),
        proposed_level: level(3),
        created_by: MemberId::random(),
        request_type: RequestType::Promote,
        required_votes: 3,
        allowed_voter_min_level: level(2),
        justification: Justification::parse("consistently helpful member")
            .expect("fixture justification is valid"),
    }
}

#[rstest]
#[case(RequestType::Promote, "PROMOTE")]
#[case(RequestType::Demote, "DEMOTE")]
#[case(RequestType::PromoteToAdmin, "PROMOTE_TO_5")]
#[case(RequestType::DemoteFromAdmin, "DEMOTE_FROM_5")]
fn request_types_use_uppercase_wire_names(#[case] kind: RequestType, #[case] wire: &str) {
    assert_eq!(
        serde_json::to_value(kind).expect("serialises"),
        json!(wire)
    );
    let parsed: RequestType = serde_json::from_value(json!(wire)).expect("wire name parses");
    assert_eq!(parsed, kind);
}

#[rstest]
#[case(1, 2, RequestType::Promote)]
#[case(2, 4, RequestType::Promote)]
#[case(3, 2, RequestType::Demote)]
#[case(4, 1, RequestType::Demote)]
#[case(4, 5, RequestType::PromoteToAdmin)]
#[case(1, 5, RequestType::PromoteToAdmin)]
#[case(5, 4, RequestType::DemoteFromAdmin)]
#[case(5, 1, RequestType::DemoteFromAdmin)]
fn for_transition_routes_admin_tier_changes(
    #[case] current: u8,
    #[case] proposed: u8,
    #[case] expected: RequestType,
) {
    assert_eq!(
        RequestType::for_transition(level(current), level(proposed)),
        expected
    );
}

#[rstest]
fn only_admin_tier_types_are_governed() {
    assert!(RequestType::PromoteToAdmin.governs_admin_tier());
    assert!(RequestType::DemoteFromAdmin.governs_admin_tier());
    assert!(!RequestType::Promote.governs_admin_tier());
    assert!(!RequestType::Demote.governs_admin_tier());
}

#[rstest]
fn justification_trims_before_measuring() {
    let text = Justification::parse("  a solid write-up  ").expect("long enough once trimmed");
    assert_eq!(text.as_str(), "a solid write-up");
}

#[rstest]
fn justification_rejects_short_text() {
    assert_eq!(
        Justification::parse("too short"),
        Err(JustificationValidationError::TooShort {
            min: JUSTIFICATION_MIN_LEN
        })
    );
}

#[rstest]
fn justification_rejects_overlong_text() {
    let raw = "x".repeat(JUSTIFICATION_MAX_LEN + 1);
    assert_eq!(
        Justification::parse(&raw),
        Err(JustificationValidationError::TooLong {
            max: JUSTIFICATION_MAX_LEN
        })
    );
}

#[rstest]
fn padding_does_not_rescue_short_justifications() {
    let raw = format!("   {}   ", "ab");
    assert!(Justification::parse(&raw).is_err());
}

#[rstest]
fn new_requests_open_with_matching_timestamps(draft: NewPromotionRequest) {
    let now = Utc::now();
    let request = PromotionRequest::create(draft.clone(), now);

    assert_eq!(request.status(), RequestStatus::Open);
    assert!(request.is_open());
    assert_eq!(request.created_at(), now);
    assert_eq!(request.updated_at(), now);
    assert_eq!(request.candidate_id(), draft.candidate_id);
    assert_eq!(request.current_level(), draft.current_level);
    assert_eq!(request.proposed_level(), draft.proposed_level);
    assert_eq!(request.required_votes(), 3);
}

#[rstest]
fn approval_closes_the_request_and_touches_updated_at(draft: NewPromotionRequest) {
    let opened = Utc::now();
    let resolved = opened + Duration::seconds(90);
    let request = PromotionRequest::create(draft, opened).approved(resolved);

    assert_eq!(request.status(), RequestStatus::Approved);
    assert!(!request.is_open());
    assert_eq!(request.created_at(), opened);
    assert_eq!(request.updated_at(), resolved);
}

#[rstest]
fn vote_choice_uses_lowercase_wire_names() {
    assert_eq!(
        serde_json::to_value(VoteChoice::For).expect("serialises"),
        json!("for")
    );
    assert_eq!(
        serde_json::to_value(VoteChoice::Against).expect("serialises"),
        json!("against")
    );
}

#[rstest]
fn votes_carry_their_draft_fields() {
    let now = Utc::now();
    let draft = NewVote {
        id: VoteId::random(),
        request_id: RequestId::random(),
        voter_id: MemberId::random(),
        choice: VoteChoice::Against,
        comment: Some("not convinced yet".to_owned()),
    };
    let vote = Vote::create(draft.clone(), now);

    assert_eq!(vote.id(), draft.id);
    assert_eq!(vote.request_id(), draft.request_id);
    assert_eq!(vote.voter_id(), draft.voter_id);
    assert_eq!(vote.choice(), VoteChoice::Against);
    assert_eq!(vote.comment(), Some("not convinced yet"));
    assert_eq!(vote.created_at(), now);
}

#[rstest]
fn request_status_uses_lowercase_wire_names() {
    assert_eq!(
        serde_json::to_value(RequestStatus::Open).expect("serialises"),
        json!("open")
    );
    assert_eq!(
        serde_json::to_value(RequestStatus::Approved).expect("serialises"),
        json!("approved")
    );
}
