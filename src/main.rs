use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repo_steward::config::Config;
use repo_steward::dispatch::Supervisor;
use repo_steward::github::GitHubClient;
use repo_steward::handlers::default_registry;
use repo_steward::server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repo_steward=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let github = match &config.github_token {
        Some(token) => Arc::new(
            GitHubClient::from_token(token.clone())
                .context("failed to construct GitHub API client")?,
        ),
        None => {
            tracing::info!(
                "no GITHUB_TOKEN configured; handlers run in observe-only mode"
            );
            Arc::new(GitHubClient::unauthenticated())
        }
    };

    let registry = default_registry(github);
    let mut event_types: Vec<_> = registry.event_types().collect();
    event_types.sort_unstable();
    tracing::info!(?event_types, "handler registry built");

    let supervisor = Supervisor::new(registry, config.handler_timeout);
    let app = build_router(AppState::new(config.webhook_secret.clone(), supervisor));

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            signal_token.cancel();
        }
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("server error")?;

    Ok(())
}
