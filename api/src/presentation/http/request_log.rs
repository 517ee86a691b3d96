use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, header};
use tracing::{Level, Span, info_span};
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("");

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id,
        user_agent
    )
}

/// 5xx responses are reported at error level, everything else at info.
pub fn trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request<Body>) -> Span,
> {
    TraceLayer::new_for_http()
        .make_span_with(make_span as fn(&Request<Body>) -> Span)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
