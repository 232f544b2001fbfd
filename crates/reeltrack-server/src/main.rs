mod api;
mod middleware;
mod pages;
mod poll;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    poll::Poller,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(reeltrack_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = reeltrack_db::PoolConfig::from_app_config(&config);
    let pool = reeltrack_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = reeltrack_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations up to date");

    let scraper = reeltrack_scraper::ApifyClient::from_config(&config)?;
    if config.apify_token.is_none() {
        tracing::warn!("APIFY_TOKEN not set; every poll will record an error snapshot");
    }
    let poller = Arc::new(Poller::new(pool.clone(), scraper, &config));

    // Dropping the handle stops the jobs, so keep it bound for the process lifetime.
    let _scheduler = if config.enable_internal_scheduler {
        Some(scheduler::build_scheduler(Arc::clone(&poller), config.daily_run_hour).await?)
    } else {
        tracing::info!("internal scheduler disabled; relying on /api/cron/daily");
        None
    };

    let app = build_app(AppState {
        pool,
        config: Arc::clone(&config),
        poller,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "reeltrack server listening");
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
