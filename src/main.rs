use async_openai::{config::OpenAIConfig, Client};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use newsie_backend::controllers::dashboard::DashboardController;
use newsie_backend::domain::annotation::AnnotationService;
use newsie_backend::domain::refresh::RefreshService;
use newsie_backend::infrastructure::config::{Config, LogFormat};
use newsie_backend::infrastructure::http::{create_router, start_http_server};
use newsie_backend::infrastructure::repositories::{
    KeywordExtractor, NewsApiRepository, NewsRepository, OpenAiSentimentClassifier,
    SentimentClassifier, SentimentScorer, VaderSentimentScorer, YakeKeywordExtractor,
};

const KEYWORD_MAX_NGRAM: usize = 2;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Newsie Backend on {}:{}",
        config.host,
        config.port
    );

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let news_repo: Arc<dyn NewsRepository> = Arc::new(NewsApiRepository::new(
        config.news_api_endpoint.clone(),
        config.news_api_key.clone(),
        config.fetch_max_attempts,
        config.fetch_cache_ttl(),
    ));
    tracing::info!(
        country = %config.news_country,
        cache_enabled = config.fetch_cache_enabled,
        cache_ttl_secs = config.fetch_cache_ttl_secs,
        "News provider configured"
    );

    let scorer: Arc<dyn SentimentScorer> = Arc::new(VaderSentimentScorer::new());
    let extractor: Arc<dyn KeywordExtractor> = Arc::new(YakeKeywordExtractor::new(
        newsie_backend::domain::annotation::MAX_KEYWORDS,
        KEYWORD_MAX_NGRAM,
    ));

    let classifier: Option<Arc<dyn SentimentClassifier>> = match &config.openai_api_key {
        Some(api_key) => {
            let client = Arc::new(Client::with_config(
                OpenAIConfig::new().with_api_key(api_key.clone()),
            ));
            tracing::info!(model = %config.openai_model, "Second sentiment model enabled");
            Some(Arc::new(OpenAiSentimentClassifier::new(
                client,
                config.openai_model.clone(),
            )))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, second sentiment model disabled");
            None
        }
    };

    // 2. Instantiate services (inject repositories)
    tracing::info!("Instantiating services...");
    let annotation_service = Arc::new(AnnotationService::new(
        scorer,
        classifier,
        extractor,
        config.annotation_concurrency,
        config.annotation_timeout(),
    ));
    let refresh_service = Arc::new(RefreshService::new(
        news_repo,
        annotation_service,
        config.news_country.clone(),
        config.refresh_interval(),
    ));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let dashboard_controller = Arc::new(DashboardController::new(
        refresh_service.clone(),
        config.confidence_threshold,
    ));

    // Start HTTP server with all routes
    let app = create_router(dashboard_controller, refresh_service);
    start_http_server(&config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "newsie_backend=debug,tower_http=debug".into())
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter())
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter())
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
