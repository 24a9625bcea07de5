use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use speech_proxy::controllers::tts::TtsController;
use speech_proxy::domain::speech::SpeechService;
use speech_proxy::infrastructure::config::{Config, LogFormat};
use speech_proxy::infrastructure::http::{build_router, start_http_server};
use speech_proxy::infrastructure::rate_limit::{InMemoryRateLimiter, RateLimiter};
use speech_proxy::infrastructure::repositories::{ElevenLabsSpeechRepository, SpeechRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting speech proxy on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        static_dir = %config.static_dir.display(),
        provider_base_url = %config.eleven_api_base_url,
        has_api_key = config.eleven_api_key.is_some(),
        has_voice_id = config.eleven_voice_id.is_some(),
        "Configuration loaded"
    );

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Rate limiter (process-local; swap here for a shared one)
    let rate_limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(
        config.rate_limit_policy(),
        config.rate_limit_max_keys,
    ));

    // 2. Speech provider
    let http_client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let speech_repo: Arc<dyn SpeechRepository> = Arc::new(ElevenLabsSpeechRepository::new(
        http_client,
        config.eleven_api_base_url.clone(),
    ));

    // 3. Services
    let speech_service = Arc::new(SpeechService::new(speech_repo, config.credentials()));

    // 4. Controllers
    let tts_controller = Arc::new(TtsController::new(speech_service.clone()));

    let app = build_router(&config, speech_service, tts_controller, rate_limiter);

    start_http_server(&config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "speech_proxy=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
