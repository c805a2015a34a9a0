//! Tracking operations: realtime checks, tracking lifecycle, observation
//! recording with session rotation.

use std::sync::Arc;

use serprank_core::EntityKind;
use uuid::Uuid;

use crate::rotation;
use crate::stores::{
    EngineError, HistoryStore, Observation, ProbeError, RankProbe, Tracking, TrackingStore,
};

/// Result of creating a tracking, including its synchronous first check.
#[derive(Debug, Clone)]
pub struct CreatedTracking {
    pub tracking: Tracking,
    pub rank: Option<u32>,
}

/// Result of a stop request.
#[derive(Debug, Clone, Copy)]
pub struct StopOutcome {
    pub public_id: Uuid,
    /// `true` when the tracking was already stopped before this request.
    pub already_stopped: bool,
}

/// The engine proper: wires stores and probe together.
#[derive(Clone)]
pub struct RankEngine {
    trackings: Arc<dyn TrackingStore>,
    histories: Arc<dyn HistoryStore>,
    probe: Arc<dyn RankProbe>,
    rotation_threshold: i64,
}

impl RankEngine {
    #[must_use]
    pub fn new(
        trackings: Arc<dyn TrackingStore>,
        histories: Arc<dyn HistoryStore>,
        probe: Arc<dyn RankProbe>,
        rotation_threshold: i64,
    ) -> Self {
        Self {
            trackings,
            histories,
            probe,
            rotation_threshold,
        }
    }

    pub(crate) fn probe(&self) -> &dyn RankProbe {
        self.probe.as_ref()
    }

    pub(crate) fn trackings(&self) -> &dyn TrackingStore {
        self.trackings.as_ref()
    }

    /// One-off rank check that records nothing.
    ///
    /// A target URL that does not identify an entity of `kind`, and a page
    /// fetch that fails, both report as not exposed rather than as errors;
    /// ad-hoc callers cannot act on the distinction.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Probe`] only when the browser itself is
    /// unavailable.
    pub async fn realtime_rank(
        &self,
        kind: EntityKind,
        keyword: &str,
        target_url: &str,
    ) -> Result<Option<u32>, EngineError> {
        match self.probe.probe(kind, keyword, target_url).await {
            Ok(rank) => Ok(rank),
            Err(ProbeError::InvalidTarget { url }) => {
                tracing::warn!(url, "realtime check for unrecognized target URL");
                Ok(None)
            }
            Err(ProbeError::Crawl { reason }) => {
                tracing::warn!(reason, "realtime check crawl failed");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Creates a tracking and performs its first check synchronously, so
    /// every tracking starts with exactly one session-1 observation. A
    /// first check that cannot fetch the page records a missing exposure
    /// rather than failing the creation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyKeyword`] for a blank keyword,
    /// [`EngineError::Store`] if the tracking cannot be persisted, and
    /// [`EngineError::Probe`] only when the browser itself is unavailable.
    /// In the last case the tracking exists but has no observation yet;
    /// the next batch run supplies one.
    pub async fn create_tracking(
        &self,
        kind: EntityKind,
        keyword: &str,
        target_url: &str,
    ) -> Result<CreatedTracking, EngineError> {
        if keyword.trim().is_empty() {
            return Err(EngineError::EmptyKeyword);
        }
        let tracking = self.trackings.create(kind, keyword, target_url).await?;
        tracing::info!(
            public_id = %tracking.public_id,
            kind = %kind,
            keyword,
            "tracking created"
        );

        let rank = match self.probe.probe(kind, keyword, target_url).await {
            Ok(rank) => rank,
            Err(ProbeError::InvalidTarget { url }) => {
                tracing::warn!(url, "tracking target URL is unrecognized");
                None
            }
            Err(ProbeError::Crawl { reason }) => {
                tracing::warn!(
                    public_id = %tracking.public_id,
                    reason,
                    "first check crawl failed; recording missing exposure"
                );
                None
            }
            Err(e) => return Err(e.into()),
        };
        self.record_observation(&tracking, rank).await?;

        Ok(CreatedTracking { tracking, rank })
    }

    /// Stops a tracking. Stopping an already-stopped tracking succeeds and
    /// reports `already_stopped`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if no
    /// tracking has this `public_id`.
    pub async fn stop_tracking(&self, public_id: Uuid) -> Result<StopOutcome, EngineError> {
        let tracking = self.trackings.get_by_public_id(public_id).await?;
        let stopped_now = self.trackings.stop_if_active(tracking.id).await?;
        if stopped_now {
            tracing::info!(public_id = %public_id, "tracking stopped");
        }
        Ok(StopOutcome {
            public_id,
            already_stopped: !stopped_now,
        })
    }

    /// Checks one tracking and records the result in its current session.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Probe`] on crawl failure or an unrecognized
    /// target URL; nothing is recorded in that case.
    pub async fn observe(&self, tracking: &Tracking) -> Result<Observation, EngineError> {
        let rank = self
            .probe
            .probe(tracking.kind, &tracking.keyword, &tracking.target_url)
            .await?;
        self.record_observation(tracking, rank).await
    }

    /// Persists an observation and rotates the session when it is full.
    ///
    /// The observation keeps the session number it was checked under; the
    /// rotation only affects where the next observation lands.
    async fn record_observation(
        &self,
        tracking: &Tracking,
        rank: Option<u32>,
    ) -> Result<Observation, EngineError> {
        let session = tracking.current_session;
        let rank_value = rank.map(|r| i32::try_from(r).unwrap_or(i32::MAX));
        self.histories
            .record_today(tracking.id, session, rank_value)
            .await?;

        if rank.is_some() {
            let exposures = self.histories.count_exposures(tracking.id, session).await?;
            if rotation::is_due(exposures, self.rotation_threshold) {
                let next = self.trackings.advance_session(tracking.id).await?;
                tracing::info!(
                    public_id = %tracking.public_id,
                    session,
                    next_session = next,
                    exposures,
                    "session rotated"
                );
            }
        }

        Ok(Observation {
            session_number: session,
            rank: rank_value,
        })
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;
