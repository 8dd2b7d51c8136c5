use parkverse_dispatch::error::DispatchServiceError;
use parkverse_dispatch::usecase::idempotency::{ClaimKeyUseCase, ReleaseKeyUseCase};

use crate::helpers::MockIdempotencyRepo;

#[tokio::test]
async fn first_claim_succeeds_second_fails() {
    let uc = ClaimKeyUseCase {
        repo: MockIdempotencyRepo::empty(),
    };

    assert!(uc.execute("completion:verify:117").await.unwrap());
    assert!(
        !uc.execute("completion:verify:117").await.unwrap(),
        "second claim for the same key must return false"
    );
}

#[tokio::test]
async fn different_keys_claim_independently() {
    let uc = ClaimKeyUseCase {
        repo: MockIdempotencyRepo::empty(),
    };

    assert!(uc.execute("completion:verify:117").await.unwrap());
    assert!(uc.execute("completion:verify:118").await.unwrap());
}

#[tokio::test]
async fn released_key_can_be_reclaimed() {
    let repo = MockIdempotencyRepo::empty();
    let claims = repo.claims_handle();
    let claim = ClaimKeyUseCase { repo };

    assert!(claim.execute("map.edit:apply:42").await.unwrap());
    assert!(!claim.execute("map.edit:apply:42").await.unwrap());

    let release = ReleaseKeyUseCase {
        repo: MockIdempotencyRepo { claims },
    };
    release.execute("map.edit:apply:42").await.unwrap();

    assert!(
        claim.execute("map.edit:apply:42").await.unwrap(),
        "claim must succeed again after release"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_claims_grant_exactly_one_winner() {
    let repo = MockIdempotencyRepo::empty();
    let claims = repo.claims_handle();
    drop(repo);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let claims = std::sync::Arc::clone(&claims);
        handles.push(tokio::spawn(async move {
            let uc = ClaimKeyUseCase {
                repo: MockIdempotencyRepo { claims },
            };
            uc.execute("store.purchase:7:emote").await.unwrap()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1, "exactly one concurrent claim may win");
}

#[tokio::test]
async fn releasing_an_absent_key_is_not_an_error() {
    let uc = ReleaseKeyUseCase {
        repo: MockIdempotencyRepo::empty(),
    };
    uc.execute("never-claimed").await.unwrap();
}

#[tokio::test]
async fn blank_keys_are_rejected() {
    let claim = ClaimKeyUseCase {
        repo: MockIdempotencyRepo::empty(),
    };
    let result = claim.execute("  ").await;
    assert!(matches!(result, Err(DispatchServiceError::MissingData)));

    let release = ReleaseKeyUseCase {
        repo: MockIdempotencyRepo::empty(),
    };
    let result = release.execute("").await;
    assert!(matches!(result, Err(DispatchServiceError::MissingData)));
}
