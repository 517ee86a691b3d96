use axum::{Router, middleware};
use http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::presentation::http::openapi::ApiDoc;
use crate::presentation::http::rate_limit::{self, RateLimit};
use crate::presentation::http::{auth, feeds, health, posts, request_log, users};

pub fn cors_layer(cfg: &Config) -> anyhow::Result<CorsLayer> {
    let origins = cfg
        .allowed_origins
        .iter()
        .map(|o| {
            // credentialed CORS cannot use a wildcard origin
            if o == "*" {
                anyhow::bail!("ALLOWED_ORIGINS must list explicit origins, not *");
            }
            HeaderValue::from_str(o).map_err(|_| anyhow::anyhow!("invalid origin in ALLOWED_ORIGINS: {o}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([
            HeaderName::from_static(request_log::REQUEST_ID_HEADER),
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderName::from_static("x-ratelimit-remaining"),
        ])
        .allow_credentials(true))
}

/// Assembles every route plus the middleware stack. Request ids are assigned
/// first so the trace span, the rate limiter and handlers all see them.
pub fn build_router(ctx: AppContext, limiter: RateLimit) -> anyhow::Result<Router> {
    let cors = cors_layer(&ctx.cfg)?;

    let app = Router::new()
        .merge(health::routes(ctx.clone()))
        .nest("/v1/auth", auth::routes(ctx.clone()))
        .nest("/v1/users", users::routes(ctx.clone()))
        .nest("/v1/posts", posts::routes(ctx.clone()))
        .nest("/v1/feeds", feeds::routes(ctx))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(limiter, rate_limit::enforce))
        .layer(request_log::trace_layer())
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
    Ok(app)
}
