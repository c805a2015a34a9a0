//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! nightly rank batch run.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use serprank_engine::{run_batch, BatchConfig, RankEngine};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the batch job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    engine: RankEngine,
    batch_config: BatchConfig,
    config: Arc<serprank_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_rank_batch_job(&scheduler, engine, batch_config, &config.batch_cron).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the nightly batch run on the configured cron schedule
/// (default 03:00 UTC). The run checks every active tracking once.
async fn register_rank_batch_job(
    scheduler: &JobScheduler,
    engine: RankEngine,
    batch_config: BatchConfig,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let engine = engine.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting nightly rank batch run");
            match run_batch(&engine, batch_config).await {
                Ok(report) => {
                    tracing::info!(
                        total = report.total,
                        success = report.success,
                        fail = report.fail,
                        "scheduler: nightly rank batch run complete"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "scheduler: nightly rank batch run failed");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
