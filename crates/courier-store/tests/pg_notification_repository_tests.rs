//! Integration tests for `PgNotificationRepository`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use courier_core::error::DomainError;
use courier_core::notification::Notification;
use courier_core::repository::{MarkReadOutcome, NotificationRepository};
use courier_store::pg_notification_repository::PgNotificationRepository;
use sqlx::PgPool;
use uuid::Uuid;

fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap() + Duration::minutes(minute)
}

async fn seed_user(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, role) VALUES ($1, 'customer')")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    id
}

fn notification(user_id: Uuid, minute: i64) -> Notification {
    Notification {
        id: Uuid::now_v7(),
        user_id,
        order_id: None,
        kind: "test".to_owned(),
        title: format!("n{minute}"),
        message: "Notificação de teste".to_owned(),
        is_read: false,
        created_at: at(minute),
        updated_at: at(minute),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_for_user_is_newest_first_and_limited(pool: PgPool) {
    let me = seed_user(&pool).await;
    let other = seed_user(&pool).await;
    let repo = PgNotificationRepository::new(pool);
    let oldest = notification(me, 1);
    repo.insert_notification(&oldest).await.unwrap();
    for minute in [3, 2] {
        repo.insert_notification(&notification(me, minute))
            .await
            .unwrap();
    }
    repo.insert_notification(&notification(other, 9))
        .await
        .unwrap();

    let page = repo.list_for_user(me, Some(2)).await.unwrap();
    let all = repo.list_for_user(me, None).await.unwrap();

    let titles: Vec<_> = page.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["n3", "n2"]);
    assert_eq!(all.len(), 3);
    assert_eq!(all[2], oldest);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_mark_read_is_scoped_to_owner(pool: PgPool) {
    let owner = seed_user(&pool).await;
    let intruder = seed_user(&pool).await;
    let repo = PgNotificationRepository::new(pool);
    let n = notification(owner, 0);
    repo.insert_notification(&n).await.unwrap();

    let foreign = repo.mark_read(n.id, intruder, at(1)).await.unwrap();
    let missing = repo.mark_read(Uuid::new_v4(), owner, at(1)).await.unwrap();
    assert_eq!(repo.unread_count(owner).await.unwrap(), 1);
    let own = repo.mark_read(n.id, owner, at(2)).await.unwrap();

    assert_eq!(foreign, MarkReadOutcome::NotOwned);
    assert_eq!(missing, MarkReadOutcome::Missing);
    assert_eq!(own, MarkReadOutcome::Marked);
    assert_eq!(repo.unread_count(owner).await.unwrap(), 0);
    let stored = repo.list_for_user(owner, None).await.unwrap();
    assert_eq!(stored[0].updated_at, at(2));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_mark_all_read_then_unread_count_is_zero(pool: PgPool) {
    let me = seed_user(&pool).await;
    let other = seed_user(&pool).await;
    let repo = PgNotificationRepository::new(pool);
    for minute in 0..3 {
        repo.insert_notification(&notification(me, minute))
            .await
            .unwrap();
    }
    repo.insert_notification(&notification(other, 0))
        .await
        .unwrap();

    let updated = repo.mark_all_read(me, at(10)).await.unwrap();

    assert_eq!(updated, 3);
    assert_eq!(repo.unread_count(me).await.unwrap(), 0);
    assert_eq!(repo.unread_count(other).await.unwrap(), 1);
    assert_eq!(repo.mark_all_read(me, at(11)).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_insert_for_unprovisioned_user_is_unauthorized(pool: PgPool) {
    let repo = PgNotificationRepository::new(pool);
    let stranger = Uuid::new_v4();

    let result = repo.insert_notification(&notification(stranger, 0)).await;

    assert!(matches!(result, Err(DomainError::Unauthorized(_))));
    assert!(repo.list_for_user(stranger, None).await.unwrap().is_empty());
}
