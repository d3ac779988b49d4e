mod common;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use linkbio::domain::repositories::SessionRepository;
use linkbio::infrastructure::persistence::PgSessionRepository;

#[sqlx::test]
async fn test_create_and_find_session(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    let repo = PgSessionRepository::new(Arc::new(pool));

    let session = repo
        .create("u1", "hash-1", Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    let found = repo.find_by_token_hash("hash-1").await.unwrap().unwrap();
    assert_eq!(found.id, session.id);
    assert_eq!(found.user_id, "u1");
    assert!(found.is_active_at(Utc::now()));
    assert!(repo.find_by_token_hash("other").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_revoke_session(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    let repo = PgSessionRepository::new(Arc::new(pool));
    let session = repo
        .create("u1", "hash-1", Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    assert!(repo.revoke(session.id).await.unwrap());
    assert!(!repo.revoke(session.id).await.unwrap());

    let found = repo.find_by_token_hash("hash-1").await.unwrap().unwrap();
    assert!(found.revoked_at.is_some());
    assert!(!found.is_active_at(Utc::now()));
}

#[sqlx::test]
async fn test_list_for_user(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    common::create_test_user(&pool, "u2", "bob").await;
    let repo = PgSessionRepository::new(Arc::new(pool));
    let expires = Utc::now() + Duration::hours(1);

    repo.create("u1", "h1", expires).await.unwrap();
    repo.create("u1", "h2", expires).await.unwrap();
    repo.create("u2", "h3", expires).await.unwrap();

    assert_eq!(repo.list_for_user("u1").await.unwrap().len(), 2);
    assert_eq!(repo.list_for_user("u2").await.unwrap().len(), 1);
}
