mod handlers;
mod metrics;
mod routes;

use anyhow::Context;
use axum::Router;
use codepad_common::config::{redact_url, JudgeConfig, ServerConfig};
use codepad_common::redis::RedisSnippetStore;
use codepad_common::store::{MemorySnippetStore, SnippetStore};
use codepad_judge::Orchestrator;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub struct AppState {
    pub orchestrator: Orchestrator,
    pub snippets: Arc<dyn SnippetStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("codepad API booting...");

    let judge_config = JudgeConfig::from_env();
    info!(
        judge_url = %judge_config.api_url,
        poll_attempts = judge_config.poll_attempts,
        poll_interval_ms = judge_config.poll_interval.as_millis(),
        "Judge configured"
    );
    if !judge_config.has_credential() {
        warn!("JUDGE0_API_KEY is not set; every execution will fail until it is");
    }

    let orchestrator =
        Orchestrator::from_config(&judge_config).context("Failed to build judge client")?;

    let server_config = ServerConfig::from_env();
    let snippets: Arc<dyn SnippetStore> = match &server_config.redis_url {
        Some(url) => {
            let store = RedisSnippetStore::connect(url, server_config.snippet_ttl_secs)
                .await
                .context("Failed to connect to Redis")?;
            info!(redis_url = %redact_url(url), "Snippets stored in Redis");
            Arc::new(store)
        }
        None => {
            warn!("REDIS_URL not set; shared snippets are kept in memory and lost on restart");
            Arc::new(MemorySnippetStore::new())
        }
    };

    let state = Arc::new(AppState {
        orchestrator,
        snippets,
    });

    // Build router
    let app = Router::new().merge(routes::routes()).with_state(state);

    // Start server
    let listener = TcpListener::bind(&server_config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_config.bind_addr))?;

    info!("HTTP server listening on {}", server_config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
