//! The scheduled batch run: every active tracking, one crawl each.

use std::time::Duration;

use serprank_core::EntityKind;

use crate::service::RankEngine;
use crate::stores::EngineError;

/// Knobs for one batch run.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    /// Pause between consecutive trackings. Rate-limits the crawl so the
    /// run does not hammer the search engine.
    pub inter_item_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            inter_item_delay: Duration::from_secs(5),
        }
    }
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: u32,
    pub success: u32,
    pub fail: u32,
}

/// Checks every active tracking once, strictly sequentially, grouped by
/// entity kind.
///
/// Failures are isolated per tracking: a failed check is counted and
/// logged, and the run continues with the next tracking. The probe is
/// warmed up once for the whole run and always torn down afterwards, even
/// when listing trackings fails mid-run.
///
/// # Errors
///
/// Returns [`EngineError::Probe`] if the probe cannot warm up and
/// [`EngineError::Store`] if active trackings cannot be listed; both make
/// the rest of the run pointless.
pub async fn run_batch(engine: &RankEngine, config: BatchConfig) -> Result<BatchReport, EngineError> {
    engine.probe().warm_up().await?;
    let result = run_all_kinds(engine, config).await;
    engine.probe().cool_down().await;

    match &result {
        Ok(report) => {
            tracing::info!(
                total = report.total,
                success = report.success,
                fail = report.fail,
                "batch run finished"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "batch run aborted");
        }
    }
    result
}

async fn run_all_kinds(
    engine: &RankEngine,
    config: BatchConfig,
) -> Result<BatchReport, EngineError> {
    let mut report = BatchReport::default();

    for kind in EntityKind::ALL {
        let trackings = engine.trackings().list_active_by_kind(kind).await?;
        if trackings.is_empty() {
            continue;
        }
        tracing::info!(kind = %kind, count = trackings.len(), "batch: checking trackings");

        for tracking in &trackings {
            report.total += 1;
            match engine.observe(tracking).await {
                Ok(observation) => {
                    report.success += 1;
                    tracing::debug!(
                        public_id = %tracking.public_id,
                        session = observation.session_number,
                        rank = ?observation.rank,
                        "batch: tracking checked"
                    );
                }
                Err(e) => {
                    report.fail += 1;
                    tracing::warn!(
                        public_id = %tracking.public_id,
                        error = %e,
                        "batch: tracking check failed"
                    );
                }
            }
            tokio::time::sleep(config.inter_item_delay).await;
        }
    }

    Ok(report)
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod batch_test;
