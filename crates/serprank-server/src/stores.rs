//! Production adapters behind the engine's seams: Postgres stores and the
//! headless-browser probe.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serprank_core::{AppConfig, EntityKind, TrackingStatus};
use serprank_crawler::{check_rank, BrowserPool, CrawlConfig, CrawlerError, TargetId};
use serprank_db::{DbError, TrackingRow};
use serprank_engine::{
    HistoryStore, ProbeError, RankProbe, StoreError, Tracking, TrackingStore,
};
use sqlx::PgPool;
use uuid::Uuid;

fn store_err(error: DbError) -> StoreError {
    match error {
        DbError::NotFound => StoreError::NotFound,
        DbError::InvalidTrackingTransition {
            id,
            expected_status,
        } => StoreError::InvalidTransition {
            reason: format!("tracking {id} is not in status '{expected_status}'"),
        },
        other => StoreError::Backend {
            reason: other.to_string(),
        },
    }
}

fn tracking_from_row(row: TrackingRow) -> Result<Tracking, StoreError> {
    let kind = EntityKind::parse(&row.entity_kind).ok_or_else(|| StoreError::Backend {
        reason: format!("unknown entity kind in database: {}", row.entity_kind),
    })?;
    let status = TrackingStatus::parse(&row.status).ok_or_else(|| StoreError::Backend {
        reason: format!("unknown tracking status in database: {}", row.status),
    })?;
    Ok(Tracking {
        id: row.id,
        public_id: row.public_id,
        kind,
        keyword: row.keyword,
        target_url: row.target_url,
        status,
        current_session: row.current_session,
    })
}

#[derive(Clone)]
pub struct PgTrackingStore {
    pool: PgPool,
}

impl PgTrackingStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackingStore for PgTrackingStore {
    async fn create(
        &self,
        kind: EntityKind,
        keyword: &str,
        target_url: &str,
    ) -> Result<Tracking, StoreError> {
        let row = serprank_db::create_tracking(&self.pool, kind.as_str(), keyword, target_url)
            .await
            .map_err(store_err)?;
        tracking_from_row(row)
    }

    async fn get_by_public_id(&self, public_id: Uuid) -> Result<Tracking, StoreError> {
        let row = serprank_db::get_tracking_by_public_id(&self.pool, public_id)
            .await
            .map_err(store_err)?;
        tracking_from_row(row)
    }

    async fn list_active_by_kind(&self, kind: EntityKind) -> Result<Vec<Tracking>, StoreError> {
        let rows = serprank_db::list_active_by_kind(&self.pool, kind.as_str())
            .await
            .map_err(store_err)?;
        rows.into_iter().map(tracking_from_row).collect()
    }

    async fn stop_if_active(&self, id: i64) -> Result<bool, StoreError> {
        serprank_db::stop_if_active(&self.pool, id)
            .await
            .map_err(store_err)
    }

    async fn advance_session(&self, id: i64) -> Result<i64, StoreError> {
        serprank_db::advance_session(&self.pool, id)
            .await
            .map_err(store_err)
    }
}

#[derive(Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn record_today(
        &self,
        tracking_id: i64,
        session_number: i64,
        rank: Option<i32>,
    ) -> Result<(), StoreError> {
        serprank_db::upsert_today(&self.pool, tracking_id, session_number, rank)
            .await
            .map(|_| ())
            .map_err(store_err)
    }

    async fn count_exposures(
        &self,
        tracking_id: i64,
        session_number: i64,
    ) -> Result<i64, StoreError> {
        serprank_db::count_exposures_in_session(&self.pool, tracking_id, session_number)
            .await
            .map_err(store_err)
    }
}

/// Probe that drives the headless browser. The blocking crawl runs on the
/// tokio blocking pool so probe calls stay async at the seam.
pub struct BrowserProbe {
    browser: Arc<BrowserPool>,
    config: CrawlConfig,
}

impl BrowserProbe {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            browser: Arc::new(BrowserPool::new()),
            config: CrawlConfig {
                nav_timeout: Duration::from_secs(config.crawl_nav_timeout_secs),
            },
        }
    }
}

#[async_trait]
impl RankProbe for BrowserProbe {
    async fn probe(
        &self,
        kind: EntityKind,
        keyword: &str,
        target_url: &str,
    ) -> Result<Option<u32>, ProbeError> {
        let target =
            TargetId::from_url(kind, target_url).ok_or_else(|| ProbeError::InvalidTarget {
                url: target_url.to_owned(),
            })?;

        let browser = Arc::clone(&self.browser);
        let config = self.config;
        let keyword = keyword.to_owned();
        tokio::task::spawn_blocking(move || check_rank(&browser, &config, kind, &keyword, &target))
            .await
            .map_err(|e| ProbeError::Crawl {
                reason: e.to_string(),
            })?
            .map_err(|e| match e {
                // Launch failure means no browser for anyone; page-level
                // failures stay per-item.
                CrawlerError::Launch { reason } => ProbeError::Browser { reason },
                other => ProbeError::Crawl {
                    reason: other.to_string(),
                },
            })
    }

    async fn warm_up(&self) -> Result<(), ProbeError> {
        let browser = Arc::clone(&self.browser);
        tokio::task::spawn_blocking(move || browser.acquire().map(|_| ()))
            .await
            .map_err(|e| ProbeError::Browser {
                reason: e.to_string(),
            })?
            .map_err(|e| ProbeError::Browser {
                reason: e.to_string(),
            })
    }

    async fn cool_down(&self) {
        self.browser.release();
    }
}
