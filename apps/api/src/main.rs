mod batch;
mod boundary;
mod config;
mod errors;
mod interview_ai;
mod llm_client;
mod models;
mod pages;
mod provenance;
mod records;
mod rest;
mod routes;
mod settings;
mod state;
mod store;
#[cfg(test)]
mod testing;
mod ui;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::boundary::{BoundaryRegistry, TracingReporter};
use crate::config::Config;
use crate::interview_ai::LlmInterviewAi;
use crate::llm_client::LlmClient;
use crate::provenance::ProvenanceCache;
use crate::rest::RestClient;
use crate::routes::build_router;
use crate::settings::SettingsStore;
use crate::state::AppState;
use crate::store::LocalStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ReadySetHire API v{}", env!("CARGO_PKG_VERSION"));

    // Local persisted key space: settings + AI provenance tags
    let store = Arc::new(LocalStore::open(&config.local_store_path)?);
    let settings = Arc::new(SettingsStore::load(store.clone()));
    let provenance = ProvenanceCache::new(store);

    let rest = RestClient::new(
        &config.rest_api_url,
        config.rest_api_token.clone(),
        config.rest_username.clone(),
    );
    info!("REST backend: {}", config.rest_api_url);

    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        rest: Arc::new(rest),
        ai: Arc::new(LlmInterviewAi(llm)),
        settings,
        provenance,
        fault_reporter: Arc::new(TracingReporter),
        boundaries: Arc::new(BoundaryRegistry::default()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
