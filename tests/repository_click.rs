mod common;

use sqlx::PgPool;
use std::sync::Arc;
use linkbio::domain::repositories::ClickRepository;
use linkbio::infrastructure::persistence::PgClickRepository;

#[sqlx::test]
async fn test_record_click_twice_same_day(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    common::create_test_link(&pool, "A", "u1", "A", 0).await;
    let repo = PgClickRepository::new(Arc::new(pool.clone()));

    assert!(repo.record_click("A", "2025-06-01").await.unwrap());
    assert!(repo.record_click("A", "2025-06-01").await.unwrap());

    assert_eq!(common::total_clicks(&pool, "A").await, 2);
    let daily = repo.daily_clicks("A", "2025-06-01").await.unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].day, "2025-06-01");
    assert_eq!(daily[0].clicks, 2);
}

#[sqlx::test]
async fn test_record_click_inactive_changes_nothing(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    common::create_inactive_link(&pool, "H", "u1", 0).await;
    let repo = PgClickRepository::new(Arc::new(pool.clone()));

    assert!(!repo.record_click("H", "2025-06-01").await.unwrap());

    assert_eq!(common::total_clicks(&pool, "H").await, 0);
    assert_eq!(common::daily_row_count(&pool, "H").await, 0);
}

#[sqlx::test]
async fn test_record_click_missing_link(pool: PgPool) {
    let repo = PgClickRepository::new(Arc::new(pool.clone()));

    assert!(!repo.record_click("ghost", "2025-06-01").await.unwrap());
    assert_eq!(common::daily_row_count(&pool, "ghost").await, 0);
}

#[sqlx::test]
async fn test_total_matches_sum_of_daily(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    common::create_test_link(&pool, "A", "u1", "A", 0).await;
    let repo = PgClickRepository::new(Arc::new(pool.clone()));

    for day in ["2025-06-01", "2025-06-02", "2025-06-02", "2025-06-03", "2025-06-03", "2025-06-03"] {
        assert!(repo.record_click("A", day).await.unwrap());
    }

    let sum: i64 =
        sqlx::query_scalar("SELECT SUM(clicks)::BIGINT FROM link_click_daily WHERE link_id = $1")
            .bind("A")
            .fetch_one(&pool)
            .await
            .unwrap();

    assert_eq!(sum, 6);
    assert_eq!(common::total_clicks(&pool, "A").await, 6);
}

#[sqlx::test]
async fn test_daily_clicks_window_descending(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    common::create_test_link(&pool, "A", "u1", "A", 0).await;
    let repo = PgClickRepository::new(Arc::new(pool));

    for day in ["2025-05-30", "2025-06-01", "2025-06-02", "2025-06-02"] {
        repo.record_click("A", day).await.unwrap();
    }

    let daily = repo.daily_clicks("A", "2025-06-01").await.unwrap();
    let rows: Vec<(&str, i64)> = daily.iter().map(|d| (d.day.as_str(), d.clicks)).collect();

    assert_eq!(rows, vec![("2025-06-02", 2), ("2025-06-01", 1)]);
}

#[sqlx::test]
async fn test_deleting_link_removes_daily_rows(pool: PgPool) {
    common::create_test_user(&pool, "u1", "alice").await;
    common::create_test_link(&pool, "A", "u1", "A", 0).await;
    let repo = PgClickRepository::new(Arc::new(pool.clone()));
    repo.record_click("A", "2025-06-01").await.unwrap();

    sqlx::query("DELETE FROM links WHERE id = $1")
        .bind("A")
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(common::daily_row_count(&pool, "A").await, 0);
}
