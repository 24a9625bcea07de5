pub mod request_id;
pub mod security_headers;
pub mod static_files;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::controllers::{health, tts::TtsController};
use crate::domain::speech::SpeechService;
use crate::error::AppError;
use crate::infrastructure::config::Config;
use crate::infrastructure::rate_limit::{rate_limit_middleware, RateLimitState, RateLimiter};

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Build the application router with all routes and middleware configured
pub fn build_router(
    config: &Config,
    speech_service: Arc<SpeechService>,
    tts_controller: Arc<TtsController>,
    rate_limiter: Arc<dyn RateLimiter>,
) -> Router {
    // TTS proxy (rate limited)
    let tts_routes = Router::new()
        .route("/api/tts", post(TtsController::synthesize))
        .with_state(tts_controller)
        .route_layer(middleware::from_fn_with_state(
            RateLimitState {
                limiter: rate_limiter,
                trust_proxy: config.trust_proxy,
            },
            rate_limit_middleware,
        ));

    // Health routes (never rate limited)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(speech_service);

    let mut app = Router::new()
        .merge(health_routes)
        .merge(tts_routes)
        .fallback_service(static_files::static_client(&config.static_dir))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(CatchPanicLayer::custom(panic_response));

    for (name, value) in security_headers::security_headers() {
        app = app.layer(SetResponseHeaderLayer::if_not_present(name, value));
    }

    app.layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.as_str())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id
        )
    }))
    .layer(middleware::from_fn(request_id_middleware))
}

/// Start the HTTP server and run until shutdown is requested
pub async fn start_http_server(config: &Config, app: Router) -> anyhow::Result<()> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Internal(format!("handler panicked: {}", message)).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
