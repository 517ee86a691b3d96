use std::time::Instant;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Json, Router, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::bootstrap::app_context::AppContext;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResp {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseCheck {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    pub database: DatabaseCheck,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResp {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsResp {
    pub request_id: Option<String>,
    pub environment: String,
    pub version: &'static str,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/", tag = "Health", responses((status = 200, body = RootResp)))]
pub async fn root() -> Json<RootResp> {
    Json(RootResp {
        status: "healthy",
        version: VERSION,
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, body = HealthResp),
        (status = 503, body = HealthResp)
    )
)]
pub async fn health(State(ctx): State<AppContext>) -> (StatusCode, Json<HealthResp>) {
    let started = Instant::now();
    let probe = ctx.health_probe().ping().await;
    let latency_ms = (started.elapsed().as_secs_f64() * 100_000.0).round() / 100.0;

    let (status, code, database) = match probe {
        Ok(()) => (
            "healthy",
            StatusCode::OK,
            DatabaseCheck {
                status: "ok",
                latency_ms: Some(latency_ms),
                error: None,
            },
        ),
        Err(e) => {
            tracing::error!(error = ?e, "database_health_check_failed");
            (
                "unhealthy",
                StatusCode::SERVICE_UNAVAILABLE,
                DatabaseCheck {
                    status: "error",
                    latency_ms: None,
                    error: Some(e.to_string()),
                },
            )
        }
    };

    (
        code,
        Json(HealthResp {
            status,
            version: VERSION,
            environment: ctx.cfg.environment.clone(),
            checks: HealthChecks { database },
        }),
    )
}

#[utoipa::path(get, path = "/metrics", tag = "Health", responses((status = 200, body = MetricsResp)))]
pub async fn metrics(State(ctx): State<AppContext>, headers: HeaderMap) -> Json<MetricsResp> {
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(MetricsResp {
        request_id,
        environment: ctx.cfg.environment.clone(),
        version: VERSION,
    })
}
