//! Triage server - HTTP front for the conversational triage router

use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_router::api::{create_router, AppState};
use triage_router::config::TriageConfig;
use triage_router::llm::{LlmService, LoggingService, OpenAIService, UnconfiguredService};
use triage_router::runtime::{LlmClassifier, LlmResponder, TriageRouter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triage_router=info,triage_server=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = TriageConfig::from_env();

    let provider: Arc<dyn LlmService> = if let Some(api_key) = config.openai_api_key.clone() {
        Arc::new(OpenAIService::new(
            api_key,
            config.model.clone(),
            config.gateway.as_deref(),
            config.collaborator_timeout,
        )?)
    } else {
        tracing::warn!("No LLM API key configured. Set OPENAI_API_KEY.");
        Arc::new(UnconfiguredService::new(config.model.clone()))
    };
    let llm: Arc<dyn LlmService> = Arc::new(LoggingService::new(provider));

    let classifier = Arc::new(LlmClassifier::new(llm.clone(), config.collaborator_timeout));
    let responders = LlmResponder::set(&llm, config.collaborator_timeout)
        .ok_or("responder configuration is incomplete")?;
    let router = Arc::new(TriageRouter::new(classifier, responders));

    tracing::info!(
        model = %config.model,
        timeout_secs = config.collaborator_timeout.as_secs(),
        "Triage router initialized"
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(AppState::new(router))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Triage server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
