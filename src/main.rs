//! Legal Intake server binary.

use std::sync::Arc;

use anyhow::Context;
use http::{HeaderValue, Method};
use secrecy::{ExposeSecret, SecretString};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use legal_intake::adapters::http::{intake_router, IntakeAppState};
use legal_intake::adapters::postgres;
use legal_intake::adapters::{
    GeminiConfig, GeminiProvider, InMemoryDocumentRepository, InMemorySessionStore,
    LlmDocumentSynthesizer, LlmExtractionOracle, OpenAIConfig, OpenAIProvider,
    PostgresDocumentRepository, PostgresSessionStore,
};
use legal_intake::config::{AiConfig, AiProvider, AppConfig, LogFormat, ServerConfig, StorageConfig};
use legal_intake::ports::{AIProvider, DocumentRepository, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.server)?;
    config.validate().context("invalid configuration")?;

    let (sessions, documents) = build_stores(&config.storage).await?;
    let provider = build_provider(&config.ai)?;
    let info = provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "language model configured");

    let mut extraction = LlmExtractionOracle::new(provider.clone())
        .with_max_tokens(config.ai.conversation_max_tokens);
    let mut synthesizer =
        LlmDocumentSynthesizer::new(provider).with_max_tokens(config.ai.document_max_tokens);
    if let Some(temperature) = config.ai.temperature {
        extraction = extraction.with_temperature(temperature);
        synthesizer = synthesizer.with_temperature(temperature);
    }

    let state = IntakeAppState::new(
        sessions,
        documents,
        Arc::new(extraction),
        Arc::new(synthesizer),
    );

    let app = intake_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, environment = ?config.server.environment, "legal intake listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server shut down");
    Ok(())
}

fn init_tracing(server: &ServerConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .context("invalid log filter")?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match server.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
    };
    installed.context("failed to install tracing subscriber")
}

async fn build_stores(
    storage: &StorageConfig,
) -> anyhow::Result<(Arc<dyn SessionStore>, Arc<dyn DocumentRepository>)> {
    let Some(db) = storage.postgres() else {
        tracing::warn!("using in-memory storage; sessions and documents are lost on restart");
        return Ok((
            Arc::new(InMemorySessionStore::new()),
            Arc::new(InMemoryDocumentRepository::new()),
        ));
    };

    let pool = postgres::connect(db)
        .await
        .context("failed to connect to database")?;
    if db.run_migrations {
        postgres::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
        tracing::info!("database migrations applied");
    }

    Ok((
        Arc::new(PostgresSessionStore::new(pool.clone())),
        Arc::new(PostgresDocumentRepository::new(pool)),
    ))
}

fn build_provider(ai: &AiConfig) -> anyhow::Result<Arc<dyn AIProvider>> {
    fn key(secret: &Option<SecretString>, name: &str) -> anyhow::Result<String> {
        secret
            .as_ref()
            .map(|s| s.expose_secret().clone())
            .with_context(|| format!("{} is not set", name))
    }

    let provider: Arc<dyn AIProvider> = match ai.primary_provider {
        AiProvider::Gemini => {
            let config = GeminiConfig::new(key(&ai.gemini_api_key, "GEMINI_API_KEY")?)
                .with_model(ai.gemini_model.as_str())
                .with_timeout(ai.timeout());
            Arc::new(GeminiProvider::new(config)?)
        }
        AiProvider::OpenAI => {
            let config = OpenAIConfig::new(key(&ai.openai_api_key, "OPENAI_API_KEY")?)
                .with_model(ai.openai_model.as_str())
                .with_timeout(ai.timeout());
            Arc::new(OpenAIProvider::new(config)?)
        }
    };
    Ok(provider)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
