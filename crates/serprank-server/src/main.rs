mod api;
mod scheduler;
mod stores;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::stores::{BrowserProbe, PgHistoryStore, PgTrackingStore};
use serprank_engine::{BatchConfig, RankEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(serprank_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = serprank_db::PoolConfig::from_app_config(&config);
    let pool = serprank_db::connect_pool(&config.database_url, pool_config).await?;
    serprank_db::run_migrations(&pool).await?;

    let engine = RankEngine::new(
        Arc::new(PgTrackingStore::new(pool.clone())),
        Arc::new(PgHistoryStore::new(pool.clone())),
        Arc::new(BrowserProbe::from_app_config(&config)),
        config.session_rotation_threshold,
    );
    let batch_config = BatchConfig {
        inter_item_delay: Duration::from_secs(config.crawl_delay_secs),
    };

    let _scheduler =
        scheduler::build_scheduler(engine.clone(), batch_config, Arc::clone(&config)).await?;

    let app = build_app(AppState {
        pool,
        engine,
        batch_config,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
