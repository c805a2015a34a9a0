//! Database operations for `rank_histories`.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `rank_histories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryRow {
    pub id: i64,
    pub tracking_id: i64,
    pub session_number: i64,
    /// `NULL` records a check where the target was not exposed.
    pub rank: Option<i32>,
    pub checked_on: NaiveDate,
    pub checked_at: DateTime<Utc>,
}

/// Records today's observation for a tracking, overwriting an earlier one.
///
/// Conflicts on `(tracking_id, session_number, checked_on)` update `rank`
/// and `checked_at` in place, so re-checking a tracking within the same
/// calendar day never produces a second row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_today(
    pool: &PgPool,
    tracking_id: i64,
    session_number: i64,
    rank: Option<i32>,
) -> Result<HistoryRow, DbError> {
    let row = sqlx::query_as::<_, HistoryRow>(
        "INSERT INTO rank_histories (tracking_id, session_number, rank) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (tracking_id, session_number, checked_on) DO UPDATE SET \
             rank       = EXCLUDED.rank, \
             checked_at = NOW() \
         RETURNING id, tracking_id, session_number, rank, checked_on, checked_at",
    )
    .bind(tracking_id)
    .bind(session_number)
    .bind(rank)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Counts the exposures (non-null ranks) recorded for one session of a
/// tracking. Drives the session-rotation decision.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_exposures_in_session(
    pool: &PgPool,
    tracking_id: i64,
    session_number: i64,
) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM rank_histories \
         WHERE tracking_id = $1 AND session_number = $2 AND rank IS NOT NULL",
    )
    .bind(tracking_id)
    .bind(session_number)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
