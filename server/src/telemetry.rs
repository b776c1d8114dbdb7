//! Logging setup and per-request database query accounting.
//!
//! `init` installs the tracing subscriber (console, plus OTLP export when a
//! collector is reachable). The rest of the module counts `db.query` spans per
//! HTTP request.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tracing::span::{Attributes, Id};
use tracing::{Level, Span, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::Context, EnvFilter, Layer};

const SERVICE_NAME: &str = "recipe-server";

/// Initialize telemetry with optional OpenTelemetry export.
/// If OTEL_EXPORTER_OTLP_ENDPOINT is set and reachable, traces and logs are sent
/// to the collector. Otherwise, only console logging is used.
pub fn init() {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(DbQueryCountingLayer);

    let Some(endpoint) = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok() else {
        registry.init();
        tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only");
        return;
    };

    if !collector_reachable(&endpoint) {
        registry.init();
        tracing::info!(
            "OpenTelemetry endpoint {} not reachable, using console logging only",
            endpoint
        );
        return;
    }

    let service_name = env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.to_string());
    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.clone())
        .build();

    let trace_exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            registry.init();
            tracing::warn!("Failed to create OTLP trace exporter: {}", e);
            return;
        }
    };

    let log_exporter = match opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            registry.init();
            tracing::warn!("Failed to create OTLP log exporter: {}", e);
            return;
        }
    };

    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();
    let tracer = trace_provider.tracer(SERVICE_NAME);
    opentelemetry::global::set_tracer_provider(trace_provider);

    let log_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    registry
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .with(OpenTelemetryTracingBridge::new(&log_provider))
        .init();

    tracing::info!(
        "OpenTelemetry enabled, exporting traces and logs to {} as {}",
        endpoint,
        service_name
    );
}

/// Quick TCP check so an absent collector doesn't stall startup.
fn collector_reachable(endpoint: &str) -> bool {
    let host_port = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');

    host_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false)
}

/// Paths whose requests are traced but never logged on completion.
const QUIET_PATHS: &[&str] = &[crate::api::health::PATH];

/// One `http_request` span per request, tagged with method and route.
/// Quiet paths get a trace-level span, which `log_response` skips.
pub fn make_request_span(request: &Request<Body>) -> Span {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or(request.uri().path());

    if QUIET_PATHS.contains(&path) {
        return tracing::trace_span!("http_request");
    }
    tracing::info_span!("http_request", method = %request.method(), path = %path)
}

pub fn log_response(response: &Response, latency: Duration, span: &Span) {
    if span.metadata().map(|m| *m.level()) == Some(Level::TRACE) {
        return;
    }

    let status = response.status().as_u16();
    let latency_ms = latency.as_millis();
    if response.status().is_server_error() {
        tracing::error!(status, %latency_ms, "request failed with server error");
    } else {
        tracing::info!(status, %latency_ms, "request completed");
    }
}

pub fn log_failure(error: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    tracing::error!(%error, latency_ms = %latency.as_millis(), "request failed");
}

/// Span name opened around every SQL statement; these are what get counted.
pub const QUERY_SPAN: &str = "db.query";

const QUERY_COUNT_HEADER: &str = "x-db-query-count";

tokio::task_local! {
    static QUERIES: Arc<AtomicU32>;
}

/// Queries counted so far in the current request, if there is one.
pub fn current_query_count() -> Option<u32> {
    QUERIES.try_with(|n| n.load(Ordering::Relaxed)).ok()
}

/// Wraps `f` so it sees the calling request's query counter when it runs on
/// another thread (e.g. under `spawn_blocking`).
pub fn with_query_counter<F, R>(f: F) -> impl FnOnce() -> R + Send + 'static
where
    F: FnOnce() -> R + Send + 'static,
    R: 'static,
{
    let counter = QUERIES.try_with(Arc::clone).ok();
    move || match counter {
        Some(counter) => QUERIES.sync_scope(counter, f),
        None => f(),
    }
}

/// Adds one to the current request's counter for each `db.query` span.
pub struct DbQueryCountingLayer;

impl<S: Subscriber> Layer<S> for DbQueryCountingLayer {
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        if attrs.metadata().name() == QUERY_SPAN {
            let _ = QUERIES.try_with(|n| n.fetch_add(1, Ordering::Relaxed));
        }
    }
}

fn report_query_count() -> bool {
    env::var("TRACK_DB_QUERY_COUNT").is_ok_and(|v| v == "1")
}

/// Gives each request its own query counter. With `TRACK_DB_QUERY_COUNT=1`
/// the total is returned in `X-DB-Query-Count`.
///
/// Sits outside the TraceLayer, so queries made anywhere in the request count.
pub async fn count_queries(request: Request<Body>, next: Next) -> Response {
    let counter = Arc::new(AtomicU32::new(0));
    let mut response = QUERIES.scope(counter.clone(), next.run(request)).await;

    if report_query_count() {
        let total = counter.load(Ordering::Relaxed);
        response
            .headers_mut()
            .insert(QUERY_COUNT_HEADER, HeaderValue::from(total));
    }
    response
}

/// Installs a global subscriber that only counts queries, so tests can
/// observe `X-DB-Query-Count` across blocking threads.
#[cfg(test)]
pub fn init_query_counting_for_tests() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(DbQueryCountingLayer)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn test_no_counter_outside_request() {
        assert_eq!(current_query_count(), None);
    }

    #[tokio::test]
    async fn test_counter_follows_work_to_blocking_thread() {
        let counter = Arc::new(AtomicU32::new(0));
        let seen = QUERIES
            .scope(counter.clone(), async {
                let work = with_query_counter(|| {
                    QUERIES.with(|n| n.fetch_add(2, Ordering::Relaxed));
                    current_query_count()
                });
                tokio::task::spawn_blocking(work).await.unwrap()
            })
            .await;

        assert_eq!(seen, Some(2));
        assert_eq!(counter.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_query_spans_are_reported_in_header() {
        init_query_counting_for_tests();
        std::env::set_var("TRACK_DB_QUERY_COUNT", "1");

        let app = Router::new()
            .route(
                "/",
                get(|| async {
                    for _ in 0..3 {
                        let _query = tracing::info_span!("db.query").entered();
                    }
                    let _other = tracing::info_span!("render").entered();
                    "ok"
                }),
            )
            .layer(middleware::from_fn(count_queries));

        let request = Request::get("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()["X-DB-Query-Count"], "3");
    }

    #[test]
    fn test_quiet_paths_get_trace_level_spans() {
        init_query_counting_for_tests();

        let health = Request::get("/health").body(Body::empty()).unwrap();
        let recipe = Request::get("/recipes/1").body(Body::empty()).unwrap();

        let quiet = make_request_span(&health);
        let loud = make_request_span(&recipe);
        assert_eq!(quiet.metadata().map(|m| *m.level()), Some(Level::TRACE));
        assert_eq!(loud.metadata().map(|m| *m.level()), Some(Level::INFO));
    }
}
