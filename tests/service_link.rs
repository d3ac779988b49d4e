mod common;

use linkbio::domain::position::Direction;
use sqlx::PgPool;
use tokio::task::JoinSet;

fn assert_contiguous(rows: &[(String, i32)]) {
    let positions: Vec<i32> = rows.iter().map(|(_, p)| *p).collect();
    let expected: Vec<i32> = (0..rows.len() as i32).collect();
    assert_eq!(positions, expected, "positions must be exactly 0..n");
}

#[sqlx::test]
async fn test_concurrent_creates_stay_contiguous(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    let state = common::create_test_state(pool.clone());

    let mut tasks = JoinSet::new();
    for i in 0..8 {
        let service = state.link_service.clone();
        tasks.spawn(async move {
            service
                .create("u1", &format!("Link {i}"), "https://example.com", true)
                .await
        });
    }

    let mut created = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert!(e.is_conflict(), "unexpected error: {e}"),
        }
    }

    let rows = common::positions(&pool, "u1").await;
    assert_eq!(rows.len(), created);
    assert_contiguous(&rows);
}

#[sqlx::test]
async fn test_concurrent_moves_and_deletes_stay_contiguous(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    let ids: Vec<String> = (0..6).map(|i| format!("L{i}")).collect();
    for (i, id) in ids.iter().enumerate() {
        common::create_test_link(&pool, id, "u1", id, i as i32).await;
    }
    let state = common::create_test_state(pool.clone());

    let mut tasks = JoinSet::new();
    for (i, id) in ids.iter().enumerate() {
        let service = state.link_service.clone();
        let id = id.clone();
        tasks.spawn(async move {
            if i == 3 {
                service.delete("u1", &id).await.map(|_| ())
            } else {
                let direction = if i % 2 == 0 { Direction::Down } else { Direction::Up };
                service.reorder("u1", &id, direction).await.map(|_| ())
            }
        });
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result.unwrap() {
            assert!(e.is_conflict(), "unexpected error: {e}");
        }
    }

    let rows = common::positions(&pool, "u1").await;
    assert_contiguous(&rows);
    assert!(rows.len() == 5 || rows.len() == 6);
}

#[sqlx::test]
async fn test_concurrent_creates_and_deletes_stay_contiguous(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    let ids: Vec<String> = (0..4).map(|i| format!("L{i}")).collect();
    for (i, id) in ids.iter().enumerate() {
        common::create_test_link(&pool, id, "u1", id, i as i32).await;
    }
    let state = common::create_test_state(pool.clone());

    let mut tasks = JoinSet::new();
    for i in 0..4 {
        let service = state.link_service.clone();
        let id = ids[i].clone();
        tasks.spawn(async move { service.delete("u1", &id).await.map(|_| ()) });

        let service = state.link_service.clone();
        tasks.spawn(async move {
            service
                .create("u1", &format!("New {i}"), "https://example.com", true)
                .await
                .map(|_| ())
        });
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result.unwrap() {
            assert!(e.is_conflict(), "unexpected error: {e}");
        }
    }

    let rows = common::positions(&pool, "u1").await;
    assert_contiguous(&rows);
}

#[sqlx::test]
async fn test_sequence_of_operations(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    let state = common::create_test_state(pool.clone());
    let service = &state.link_service;

    let a = service.create("u1", "A", "https://a.example", true).await.unwrap();
    let b = service.create("u1", "B", "https://b.example", true).await.unwrap();
    let c = service.create("u1", "C", "https://c.example", false).await.unwrap();
    assert_eq!((a.position, b.position, c.position), (0, 1, 2));

    let outcome = service.reorder("u1", &c.id, Direction::Up).await.unwrap();
    assert!(outcome.moved());
    service.delete("u1", &a.id).await.unwrap();
    let d = service.create("u1", "D", "https://d.example", true).await.unwrap();

    let rows = common::positions(&pool, "u1").await;
    let order: Vec<(&str, i32)> = rows.iter().map(|(id, p)| (id.as_str(), *p)).collect();
    assert_eq!(
        order,
        vec![(c.id.as_str(), 0), (b.id.as_str(), 1), (d.id.as_str(), 2)]
    );
}
