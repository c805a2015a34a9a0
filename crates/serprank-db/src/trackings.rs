//! Database operations for `rank_trackings`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `rank_trackings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrackingRow {
    pub id: i64,
    pub public_id: Uuid,
    pub entity_kind: String,
    pub keyword: String,
    pub target_url: String,
    pub status: String,
    pub current_session: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creates a new tracking in `active` status at session 1.
///
/// Generates a UUID in Rust and binds it to `public_id`. Returns the full
/// newly-created row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_tracking(
    pool: &PgPool,
    entity_kind: &str,
    keyword: &str,
    target_url: &str,
) -> Result<TrackingRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, TrackingRow>(
        "INSERT INTO rank_trackings (public_id, entity_kind, keyword, target_url) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, public_id, entity_kind, keyword, target_url, status, \
                   current_session, created_at, updated_at",
    )
    .bind(public_id)
    .bind(entity_kind)
    .bind(keyword)
    .bind(target_url)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetches a single tracking by its external `public_id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_tracking_by_public_id(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<TrackingRow, DbError> {
    let row = sqlx::query_as::<_, TrackingRow>(
        "SELECT id, public_id, entity_kind, keyword, target_url, status, \
                current_session, created_at, updated_at \
         FROM rank_trackings \
         WHERE public_id = $1",
    )
    .bind(public_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns all `active` trackings of one entity kind, oldest first.
///
/// The stable `created_at` order makes batch runs process trackings in a
/// predictable sequence.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_by_kind(
    pool: &PgPool,
    entity_kind: &str,
) -> Result<Vec<TrackingRow>, DbError> {
    let rows = sqlx::query_as::<_, TrackingRow>(
        "SELECT id, public_id, entity_kind, keyword, target_url, status, \
                current_session, created_at, updated_at \
         FROM rank_trackings \
         WHERE status = 'active' AND entity_kind = $1 \
         ORDER BY created_at ASC, id ASC",
    )
    .bind(entity_kind)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Marks an `active` tracking as `stopped`.
///
/// Returns `true` when this call performed the transition and `false` when
/// the tracking was already stopped, so callers can report stop requests
/// idempotently.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no tracking exists with the given id,
/// or [`DbError::Sqlx`] if the query fails.
pub async fn stop_if_active(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE rank_trackings \
         SET status = 'stopped', updated_at = NOW() \
         WHERE id = $1 AND status = 'active'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        return Ok(true);
    }

    // Distinguish "already stopped" from "no such tracking".
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM rank_trackings WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if exists {
        Ok(false)
    } else {
        Err(DbError::NotFound)
    }
}

/// Advances an `active` tracking to its next session and returns the new
/// session number.
///
/// The increment is a single guarded UPDATE, so concurrent callers cannot
/// skip a session number.
///
/// # Errors
///
/// Returns [`DbError::InvalidTrackingTransition`] if the tracking is not
/// `active`, or [`DbError::Sqlx`] if the query fails.
pub async fn advance_session(pool: &PgPool, id: i64) -> Result<i64, DbError> {
    let next: Option<i64> = sqlx::query_scalar(
        "UPDATE rank_trackings \
         SET current_session = current_session + 1, updated_at = NOW() \
         WHERE id = $1 AND status = 'active' \
         RETURNING current_session",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    next.ok_or(DbError::InvalidTrackingTransition {
        id,
        expected_status: "active",
    })
}
