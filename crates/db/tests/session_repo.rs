//! Integration tests for the session repository.
//!
//! Exercises the store layer against a real database: row lifecycle,
//! handle-hash lookups, idempotent deletes, and expiry handling.

use chrono::{Duration, Utc};
use scrivia_db::models::session::CreateSession;
use scrivia_db::models::user::CreateUser;
use scrivia_db::repositories::{SessionRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
    .id
}

async fn new_session(pool: &PgPool, user_id: i64, hash: &str, expires_in: Duration) -> i64 {
    SessionRepo::create(
        pool,
        &CreateSession {
            user_id,
            token_hash: hash.to_string(),
            expires_at: Utc::now() + expires_in,
        },
    )
    .await
    .expect("session creation should succeed")
    .id
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Create, find, delete; a second delete of the same id is a clean `false`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_find_delete_idempotent(pool: PgPool) {
    let user_id = new_user(&pool, "repo@test.com").await;
    let session_id = new_session(&pool, user_id, "hash-a", Duration::days(30)).await;

    let found = SessionRepo::find_by_id(&pool, session_id)
        .await
        .unwrap()
        .expect("row should exist");
    assert_eq!(found.user_id, user_id);
    assert_eq!(found.token_hash, "hash-a");
    assert!(found.expires_at > found.created_at);

    assert!(SessionRepo::delete_by_id(&pool, session_id).await.unwrap());
    // Idempotent: the row being gone already is not an error.
    assert!(!SessionRepo::delete_by_id(&pool, session_id).await.unwrap());
    assert!(SessionRepo::find_by_id(&pool, session_id)
        .await
        .unwrap()
        .is_none());
}

/// Hash lookups are scoped to the user and to non-expired rows.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hash_lookup_scoping(pool: PgPool) {
    let alice = new_user(&pool, "alice-hash@test.com").await;
    let bob = new_user(&pool, "bob-hash@test.com").await;
    new_session(&pool, alice, "hash-alice", Duration::days(30)).await;

    assert!(SessionRepo::has_active_with_hash(&pool, alice, "hash-alice")
        .await
        .unwrap());
    assert!(!SessionRepo::has_active_with_hash(&pool, alice, "hash-other")
        .await
        .unwrap());
    // Another user presenting the same hash finds nothing.
    assert!(!SessionRepo::has_active_with_hash(&pool, bob, "hash-alice")
        .await
        .unwrap());

    let found = SessionRepo::find_active_by_hash(&pool, alice, "hash-alice")
        .await
        .unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().user_id, alice);
}

/// Expired rows are invisible to the active listing and the hash lookups,
/// but still reachable by id until GC removes them.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_rows_are_not_active(pool: PgPool) {
    let user_id = new_user(&pool, "expired@test.com").await;
    let expired_id = new_session(&pool, user_id, "hash-old", Duration::hours(-1)).await;

    assert!(SessionRepo::list_active_for_user(&pool, user_id)
        .await
        .unwrap()
        .is_empty());
    assert!(!SessionRepo::has_active_for_user(&pool, user_id)
        .await
        .unwrap());
    assert!(!SessionRepo::has_active_with_hash(&pool, user_id, "hash-old")
        .await
        .unwrap());
    assert!(SessionRepo::find_by_id(&pool, expired_id)
        .await
        .unwrap()
        .is_some());

    let purged = SessionRepo::delete_expired(&pool).await.unwrap();
    assert_eq!(purged, 1);
    assert!(SessionRepo::find_by_id(&pool, expired_id)
        .await
        .unwrap()
        .is_none());
}

/// The active listing is newest-first.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_is_newest_first(pool: PgPool) {
    let user_id = new_user(&pool, "order@test.com").await;
    let first = new_session(&pool, user_id, "hash-1", Duration::days(30)).await;
    let second = new_session(&pool, user_id, "hash-2", Duration::days(30)).await;

    let listed = SessionRepo::list_active_for_user(&pool, user_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second, "newest row first");
    assert_eq!(listed[1].id, first);
}

/// Bulk deletes scope to the one user and honour the keep-id carve-out.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bulk_deletes(pool: PgPool) {
    let alice = new_user(&pool, "alice-repo@test.com").await;
    let bob = new_user(&pool, "bob-repo@test.com").await;

    new_session(&pool, alice, "hash-a1", Duration::days(30)).await;
    new_session(&pool, alice, "hash-a2", Duration::days(30)).await;
    let keep = new_session(&pool, alice, "hash-a3", Duration::days(30)).await;
    let bobs = new_session(&pool, bob, "hash-b1", Duration::days(30)).await;

    let removed = SessionRepo::delete_all_except(&pool, alice, keep)
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let remaining = SessionRepo::list_active_for_user(&pool, alice)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep);

    // Bob is untouched.
    assert!(SessionRepo::find_by_id(&pool, bobs).await.unwrap().is_some());

    let removed = SessionRepo::delete_all_for_user(&pool, alice).await.unwrap();
    assert_eq!(removed, 1);
    assert!(!SessionRepo::has_active_for_user(&pool, alice).await.unwrap());
}
