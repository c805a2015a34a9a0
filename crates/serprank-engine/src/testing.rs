//! In-memory fakes for engine tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serprank_core::{EntityKind, TrackingStatus};
use uuid::Uuid;

use crate::stores::{
    HistoryStore, ProbeError, RankProbe, StoreError, Tracking, TrackingStore,
};

fn lock<'a, T>(mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Trackings
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemTrackings {
    rows: Mutex<Vec<Tracking>>,
    next_id: AtomicI64,
}

impl MemTrackings {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(&self, id: i64) -> Option<Tracking> {
        lock(&self.rows).iter().find(|t| t.id == id).cloned()
    }
}

#[async_trait]
impl TrackingStore for MemTrackings {
    async fn create(
        &self,
        kind: EntityKind,
        keyword: &str,
        target_url: &str,
    ) -> Result<Tracking, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let tracking = Tracking {
            id,
            public_id: Uuid::new_v4(),
            kind,
            keyword: keyword.to_owned(),
            target_url: target_url.to_owned(),
            status: TrackingStatus::Active,
            current_session: 1,
        };
        lock(&self.rows).push(tracking.clone());
        Ok(tracking)
    }

    async fn get_by_public_id(&self, public_id: Uuid) -> Result<Tracking, StoreError> {
        lock(&self.rows)
            .iter()
            .find(|t| t.public_id == public_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_active_by_kind(&self, kind: EntityKind) -> Result<Vec<Tracking>, StoreError> {
        Ok(lock(&self.rows)
            .iter()
            .filter(|t| t.status == TrackingStatus::Active && t.kind == kind)
            .cloned()
            .collect())
    }

    async fn stop_if_active(&self, id: i64) -> Result<bool, StoreError> {
        let mut rows = lock(&self.rows);
        let tracking = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        if tracking.status == TrackingStatus::Active {
            tracking.status = TrackingStatus::Stopped;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn advance_session(&self, id: i64) -> Result<i64, StoreError> {
        let mut rows = lock(&self.rows);
        let tracking = rows
            .iter_mut()
            .find(|t| t.id == id && t.status == TrackingStatus::Active)
            .ok_or_else(|| StoreError::InvalidTransition {
                reason: format!("tracking {id} is not active"),
            })?;
        tracking.current_session += 1;
        Ok(tracking.current_session)
    }
}

// ---------------------------------------------------------------------------
// Histories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemHistoryRow {
    pub tracking_id: i64,
    pub session_number: i64,
    pub rank: Option<i32>,
    pub day: i64,
}

/// History fake with a fake clock: "today" is an integer day counter so
/// same-day overwrite semantics can be exercised without real dates.
#[derive(Default)]
pub struct MemHistories {
    rows: Mutex<Vec<MemHistoryRow>>,
    day: AtomicI64,
}

impl MemHistories {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn advance_day(&self) {
        self.day.fetch_add(1, Ordering::SeqCst);
    }

    pub fn rows_for(&self, tracking_id: i64) -> Vec<MemHistoryRow> {
        lock(&self.rows)
            .iter()
            .filter(|r| r.tracking_id == tracking_id)
            .copied()
            .collect()
    }
}

#[async_trait]
impl HistoryStore for MemHistories {
    async fn record_today(
        &self,
        tracking_id: i64,
        session_number: i64,
        rank: Option<i32>,
    ) -> Result<(), StoreError> {
        let day = self.day.load(Ordering::SeqCst);
        let mut rows = lock(&self.rows);
        if let Some(existing) = rows.iter_mut().find(|r| {
            r.tracking_id == tracking_id && r.session_number == session_number && r.day == day
        }) {
            existing.rank = rank;
        } else {
            rows.push(MemHistoryRow {
                tracking_id,
                session_number,
                rank,
                day,
            });
        }
        Ok(())
    }

    async fn count_exposures(
        &self,
        tracking_id: i64,
        session_number: i64,
    ) -> Result<i64, StoreError> {
        Ok(lock(&self.rows)
            .iter()
            .filter(|r| {
                r.tracking_id == tracking_id
                    && r.session_number == session_number
                    && r.rank.is_some()
            })
            .count() as i64)
    }
}

// ---------------------------------------------------------------------------
// Probe
// ---------------------------------------------------------------------------

/// Probe fake scripted per target URL. Each probe of a URL pops the next
/// outcome from its queue; an exhausted or unscripted URL reports the
/// target as not exposed.
#[derive(Default)]
pub struct ScriptedProbe {
    outcomes: Mutex<HashMap<String, VecDeque<Result<Option<u32>, ProbeError>>>>,
    pub calls: Mutex<Vec<String>>,
    pub warm_ups: AtomicUsize,
    pub cool_downs: AtomicUsize,
    fail_warm_up: Mutex<bool>,
}

impl ScriptedProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, target_url: &str, outcome: Result<Option<u32>, ProbeError>) {
        lock(&self.outcomes)
            .entry(target_url.to_owned())
            .or_default()
            .push_back(outcome);
    }

    pub fn fail_warm_up(&self) {
        *lock(&self.fail_warm_up) = true;
    }

    pub fn call_order(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl RankProbe for ScriptedProbe {
    async fn probe(
        &self,
        _kind: EntityKind,
        _keyword: &str,
        target_url: &str,
    ) -> Result<Option<u32>, ProbeError> {
        lock(&self.calls).push(target_url.to_owned());
        lock(&self.outcomes)
            .get_mut(target_url)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Ok(None))
    }

    async fn warm_up(&self) -> Result<(), ProbeError> {
        if *lock(&self.fail_warm_up) {
            return Err(ProbeError::Browser {
                reason: "browser launch failed".to_owned(),
            });
        }
        self.warm_ups.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn cool_down(&self) {
        self.cool_downs.fetch_add(1, Ordering::SeqCst);
    }
}
