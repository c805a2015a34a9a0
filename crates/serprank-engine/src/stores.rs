//! Engine-facing domain types and the seams to storage and the crawler.

use async_trait::async_trait;
use serprank_core::{EntityKind, TrackingStatus};
use thiserror::Error;
use uuid::Uuid;

/// A keyword/target pair under rank tracking.
#[derive(Debug, Clone)]
pub struct Tracking {
    pub id: i64,
    pub public_id: Uuid,
    pub kind: EntityKind,
    pub keyword: String,
    pub target_url: String,
    pub status: TrackingStatus,
    pub current_session: i64,
}

/// One recorded check of a tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub session_number: i64,
    /// `None` records a check where the target was not exposed.
    pub rank: Option<i32>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("invalid transition: {reason}")]
    InvalidTransition { reason: String },
    #[error("storage backend failed: {reason}")]
    Backend { reason: String },
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("target URL does not identify a known entity: {url}")]
    InvalidTarget { url: String },
    /// Resource-level failure: the browser could not be launched or is
    /// gone. Fatal for the whole run, unlike a single failed page fetch.
    #[error("browser unavailable: {reason}")]
    Browser { reason: String },
    #[error("crawl failed: {reason}")]
    Crawl { reason: String },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("keyword must not be empty")]
    EmptyKeyword,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// Persistence of trackings.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    async fn create(
        &self,
        kind: EntityKind,
        keyword: &str,
        target_url: &str,
    ) -> Result<Tracking, StoreError>;

    async fn get_by_public_id(&self, public_id: Uuid) -> Result<Tracking, StoreError>;

    /// Active trackings of one kind, in stable oldest-first order.
    async fn list_active_by_kind(&self, kind: EntityKind) -> Result<Vec<Tracking>, StoreError>;

    /// Stops an active tracking. Returns `false` when it was already
    /// stopped, so stop requests stay idempotent.
    async fn stop_if_active(&self, id: i64) -> Result<bool, StoreError>;

    /// Moves an active tracking to the next session and returns the new
    /// session number.
    async fn advance_session(&self, id: i64) -> Result<i64, StoreError>;
}

/// Persistence of rank observations.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Records today's observation, overwriting an earlier one for the same
    /// tracking, session, and calendar day.
    async fn record_today(
        &self,
        tracking_id: i64,
        session_number: i64,
        rank: Option<i32>,
    ) -> Result<(), StoreError>;

    /// Number of exposures (non-null ranks) recorded in one session.
    async fn count_exposures(
        &self,
        tracking_id: i64,
        session_number: i64,
    ) -> Result<i64, StoreError>;
}

/// A single rank check against the live search engine.
#[async_trait]
pub trait RankProbe: Send + Sync {
    /// Ranks `target_url` on the result page for `keyword`. `Ok(None)`
    /// means the page was reachable but the target was not exposed.
    async fn probe(
        &self,
        kind: EntityKind,
        keyword: &str,
        target_url: &str,
    ) -> Result<Option<u32>, ProbeError>;

    /// Readies the probe for a run of consecutive checks.
    async fn warm_up(&self) -> Result<(), ProbeError>;

    /// Tears down resources held for a run. Safe to call when idle.
    async fn cool_down(&self);
}
