//! Tests for the member model and its value types.

use chrono::Utc;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;

#[fixture]
fn draft() -> NewMember {
    NewMember {
        id: MemberId::random(),
        username: Username::parse("quorra").expect("fixture username is valid"),
        email: Some(EmailAddress::parse("quorra@grid.example").expect("fixture email is valid")),
        level: Level::MIN,
        invited_by: Some(MemberId::random()),
    }
}

#[rstest]
#[case("quorra", "quorra")]
#[case("  Quorra ", "quorra")]
#[case("MEMBER_ONE", "member_one")]
#[case("a_1", "a_1")]
fn username_normalises_before_validating(#[case] raw: &str, #[case] expected: &str) {
    let name = Username::parse(raw).expect("input normalises to a valid handle");
    assert_eq!(name.as_str(), expected);
}

#[rstest]
#[case("ab", UsernameValidationError::TooShort { min: USERNAME_MIN_LEN })]
#[case("  a  ", UsernameValidationError::TooShort { min: USERNAME_MIN_LEN })]
#[case(
    "abcdefghijklmnopqrstuvwxyz01234",
    UsernameValidationError::TooLong { max: USERNAME_MAX_LEN }
)]
#[case("bad name!", UsernameValidationError::InvalidCharacters)]
#[case("dash-ed", UsernameValidationError::InvalidCharacters)]
#[case("émile_x", UsernameValidationError::InvalidCharacters)]
fn username_rejects_invalid_input(
    #[case] raw: &str,
    #[case] expected: UsernameValidationError,
) {
    assert_eq!(Username::parse(raw), Err(expected));
}

#[rstest]
fn username_deserialisation_normalises() {
    let name: Username = serde_json::from_value(json!("Member_One")).expect("payload parses");
    assert_eq!(name.as_str(), "member_one");
}

#[rstest]
fn username_serialises_as_a_plain_string() {
    let name = Username::parse("quorra").expect("valid handle");
    assert_eq!(
        serde_json::to_value(&name).expect("serialises"),
        json!("quorra")
    );
}

#[rstest]
#[case("quorra@grid.example")]
#[case("  padded@host.example  ")]
fn email_accepts_plausible_addresses(#[case] raw: &str) {
    let email = EmailAddress::parse(raw).expect("address is accepted");
    assert_eq!(email.as_str(), raw.trim());
}

#[rstest]
#[case("", EmailValidationError::Empty)]
#[case("   ", EmailValidationError::Empty)]
#[case("no-at-sign", EmailValidationError::MissingAtSign)]
#[case("@host.example", EmailValidationError::MissingAtSign)]
#[case("local@", EmailValidationError::MissingAtSign)]
fn email_rejects_malformed_addresses(
    #[case] raw: &str,
    #[case] expected: EmailValidationError,
) {
    assert_eq!(EmailAddress::parse(raw), Err(expected));
}

#[rstest]
fn email_rejects_overlong_addresses() {
    let raw = format!("{}@host.example", "a".repeat(EMAIL_MAX_LEN));
    assert_eq!(
        EmailAddress::parse(&raw),
        Err(EmailValidationError::TooLong { max: EMAIL_MAX_LEN })
    );
}

#[rstest]
fn create_applies_the_draft_and_starts_active(draft: NewMember) {
    let now = Utc::now();
    let member = Member::create(draft.clone(), now);

    assert_eq!(member.id(), draft.id);
    assert_eq!(member.username().as_str(), "quorra");
    assert_eq!(member.email().map(EmailAddress::as_str), Some("quorra@grid.example"));
    assert_eq!(member.level(), Level::MIN);
    assert_eq!(member.status(), MemberStatus::Active);
    assert!(member.is_active());
    assert_eq!(member.invited_by(), draft.invited_by);
    assert_eq!(member.created_at(), now);
}

#[rstest]
fn with_level_changes_only_the_level(draft: NewMember) {
    let member = Member::create(draft, Utc::now());
    let promoted = member.clone().with_level(Level::new(2).expect("in range"));

    assert_eq!(promoted.level().get(), 2);
    assert_eq!(promoted.id(), member.id());
    assert_eq!(promoted.username(), member.username());
    assert_eq!(promoted.created_at(), member.created_at());
}

#[rstest]
#[case(MemberStatus::Suspended)]
#[case(MemberStatus::Expelled)]
fn non_active_standing_blocks_acting(#[case] status: MemberStatus, draft: NewMember) {
    let member = Member::create(draft, Utc::now()).with_status(status);
    assert!(!member.is_active());
}

#[rstest]
fn member_status_uses_lowercase_wire_names() {
    assert_eq!(
        serde_json::to_value(MemberStatus::Suspended).expect("serialises"),
        json!("suspended")
    );
}
