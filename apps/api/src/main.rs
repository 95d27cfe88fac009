mod analysis;
mod config;
mod errors;
mod extract;
mod judge;
mod llm_client;
mod metrics;
mod models;
mod routes;
mod state;
mod suggestions;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::scoring::validate_weight_profiles;
use crate::config::Config;
use crate::llm_client::AnthropicClient;
use crate::metrics::store::InMemoryQualityLog;
use crate::routes::build_router;
use crate::state::AppState;

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

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // A broken weight profile would corrupt every score; refuse to start.
    validate_weight_profiles().context("weight profile validation failed")?;

    let llm = AnthropicClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    info!(
        "Judge {} (unjudged policy: {:?})",
        if config.judge_enabled { "enabled" } else { "disabled" },
        config.unjudged_policy
    );

    let state = AppState {
        llm: Arc::new(llm),
        quality_log: Arc::new(InMemoryQualityLog::new()),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
