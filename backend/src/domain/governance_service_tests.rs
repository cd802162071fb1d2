//! Tests for the admin tier governance service.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::member::{Member, MemberStatus, NewMember, Username};
use crate::domain::ports::{DirectoryRepository, MockDirectoryRepository};
use crate::outbound::memory::MemoryStore;

fn service(store: &Arc<MemoryStore>) -> GovernanceService<MemoryStore> {
    GovernanceService::new(Arc::clone(store))
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

#[tokio::test]
async fn summary_is_absent_below_the_top_level() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "chief", 5).await;
    let senior = seed(&store, "senior", 4).await;

    let err = service(&store)
        .summary(senior.id())
        .await
        .expect_err("the surface does not exist below level 5");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case::sole_admin(1, 1, true)]
#[case::pair(2, 2, false)]
#[case::council(3, 3, false)]
#[tokio::test]
async fn summary_reports_the_census(
    #[case] admins: u64,
    #[case] expected_threshold: u32,
    #[case] expected_bootstrap: bool,
) {
    let store = Arc::new(MemoryStore::new());
    let mut first = None;
    for n in 0..admins {
        let admin = seed(&store, &format!("admin{n}"), 5).await;
        first.get_or_insert(admin);
    }
    let viewer = first.expect("at least one admin seeded");

    let summary = service(&store)
        .summary(viewer.id())
        .await
        .expect("summary resolves");
    assert_eq!(summary.level5_count, admins);
    assert_eq!(summary.vote_threshold, expected_threshold);
    assert_eq!(summary.can_bootstrap, expected_bootstrap);
}

#[tokio::test]
async fn bootstrap_promotes_directly_to_the_top() {
    let store = Arc::new(MemoryStore::new());
    let founder = seed(&store, "founder", 5).await;
    let successor = seed(&store, "successor", 3).await;

    let view = service(&store)
        .bootstrap_promote(
            founder.id(),
            BootstrapPromotion {
                candidate_id: successor.id(),
                reason: "Succession planning".to_owned(),
            },
        )
        .await
        .expect("bootstrap applies");
    assert!(view.level().is_admin());

    let census = store.admin_census().await.expect("census reads");
    assert_eq!(census.count(), 2);

    let history = store
        .level_history(&successor.id())
        .await
        .expect("history reads");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reason(), "Bootstrap promotion: Succession planning");
    assert_eq!(history[0].changed_by(), founder.id());
}

#[tokio::test]
async fn bootstrap_closes_once_the_tier_has_two() {
    let store = Arc::new(MemoryStore::new());
    let founder = seed(&store, "founder", 5).await;
    seed(&store, "deputy", 5).await;
    let hopeful = seed(&store, "hopeful", 3).await;

    let err = service(&store)
        .bootstrap_promote(
            founder.id(),
            BootstrapPromotion {
                candidate_id: hopeful.id(),
                reason: "One more".to_owned(),
            },
        )
        .await
        .expect_err("a populated tier votes instead");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn bootstrap_refuses_the_sole_admin_themselves() {
    let store = Arc::new(MemoryStore::new());
    let founder = seed(&store, "founder", 5).await;

    let err = service(&store)
        .bootstrap_promote(
            founder.id(),
            BootstrapPromotion {
                candidate_id: founder.id(),
                reason: "Self promotion".to_owned(),
            },
        )
        .await
        .expect_err("the candidate is already at the top");
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn blank_reason_is_refused() {
    let store = Arc::new(MemoryStore::new());
    let founder = seed(&store, "founder", 5).await;
    let successor = seed(&store, "successor", 3).await;

    let err = service(&store)
        .bootstrap_promote(
            founder.id(),
            BootstrapPromotion {
                candidate_id: successor.id(),
                reason: "  ".to_owned(),
            },
        )
        .await
        .expect_err("the ledger demands a reason");
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[tokio::test]
async fn missing_candidate_is_absent() {
    let store = Arc::new(MemoryStore::new());
    let founder = seed(&store, "founder", 5).await;

    let err = service(&store)
        .bootstrap_promote(
            founder.id(),
            BootstrapPromotion {
                candidate_id: MemberId::random(),
                reason: "Succession planning".to_owned(),
            },
        )
        .await
        .expect_err("unknown candidate is refused");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn bootstrap_surface_is_absent_below_the_top_level() {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "chief", 5).await;
    let senior = seed(&store, "senior", 4).await;
    let hopeful = seed(&store, "hopeful", 2).await;

    let err = service(&store)
        .bootstrap_promote(
            senior.id(),
            BootstrapPromotion {
                candidate_id: hopeful.id(),
                reason: "Skip the queue".to_owned(),
            },
        )
        .await
        .expect_err("the surface does not exist below level 5");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn suspended_admins_cannot_bootstrap() {
    let actor_id = MemberId::random();
    let mut directory = MockDirectoryRepository::new();
    directory
        .expect_find_member()
        .times(1)
        .return_once(move |_| {
            let actor = Member::create(
                NewMember {
                    id: actor_id,
                    username: Username::parse("benched").expect("valid handle"),
                    email: None,
                    level: Level::ADMIN,
                    invited_by: None,
                },
                Utc::now(),
            )
            .with_status(MemberStatus::Suspended);
            Ok(Some(actor))
        });

    let service = GovernanceService::new(Arc::new(directory));
    let err = service
        .bootstrap_promote(
            actor_id,
            BootstrapPromotion {
                candidate_id: MemberId::random(),
                reason: "Succession planning".to_owned(),
            },
        )
        .await
        .expect_err("suspended actor is refused");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
