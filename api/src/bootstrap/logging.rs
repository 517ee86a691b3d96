use tracing_subscriber::EnvFilter;

use crate::bootstrap::config::Config;

/// Human-readable output in development, one JSON object per line elsewhere.
/// `RUST_LOG` overrides the default filter in both modes.
pub fn init(cfg: &Config) {
    let default_filter = if cfg.is_development() {
        "microblog=debug,axum=info,tower_http=debug,sqlx=warn"
    } else {
        "microblog=info,axum=info,tower_http=info,sqlx=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if cfg.is_development() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_current_span(true)
            .with_env_filter(filter)
            .init();
    }
}
