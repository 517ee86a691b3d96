use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::signal;
use tokio::time::Duration;
use tracing::{error, info};

use microblog::bootstrap::app_context::{AppContext, AppServices};
use microblog::bootstrap::config::Config;
use microblog::bootstrap::{logging, router};
use microblog::infrastructure::db::repositories::follow_repository_sqlx::SqlxFollowRepository;
use microblog::infrastructure::db::repositories::post_repository_sqlx::SqlxPostRepository;
use microblog::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use microblog::infrastructure::db::{self, PgHealthProbe};
use microblog::presentation::http::rate_limit::RateLimit;

const RATE_LIMIT_PRUNE_EVERY: Duration = Duration::from_secs(60);
const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const DB_RETRY_EVERY: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = Config::from_env()?;
    logging::init(&cfg);
    info!(?cfg, version = env!("CARGO_PKG_VERSION"), "application_starting");

    // Database. A failure here is logged and retried; `/health` reports it meanwhile.
    let pool = db::lazy_pool(&cfg.database_url, DB_ACQUIRE_TIMEOUT)?;
    let setup_handle = match db::prepare(&pool).await {
        Ok(()) => {
            info!("database_connection_ok");
            None
        }
        Err(e) => {
            error!(error = ?e, "database_connection_failed");
            Some(db::retry_prepare(pool.clone(), DB_RETRY_EVERY))
        }
    };

    let services = AppServices::new(
        Arc::new(SqlxUserRepository::new(pool.clone())),
        Arc::new(SqlxPostRepository::new(pool.clone())),
        Arc::new(SqlxFollowRepository::new(pool.clone())),
        Arc::new(PgHealthProbe::new(pool.clone())),
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let limiter = RateLimit::from_config(&cfg)?;
    let prune_handle = limiter.spawn_pruning(RATE_LIMIT_PRUNE_EVERY);
    let app = router::build_router(ctx, limiter)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = %cfg.environment, "application_started");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    prune_handle.abort();
    if let Some(handle) = setup_handle {
        handle.abort();
    }
    pool.close().await;
    info!("application_stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = ?e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = ?e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown_signal_received");
}
