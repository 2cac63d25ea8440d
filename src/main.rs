mod cli;

use anyhow::Context;
use clap::Parser;
use quarry::{api::routes::create_router, AppState, Config, Provider};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "quarry=debug,tower_http=debug"
    } else {
        "quarry=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let credentials = &config.credentials;
    tracing::info!(
        groq = credentials.groq_configured(),
        tavily = credentials.tavily_configured(),
        secret_key = credentials.secret_key_configured(),
        "Credentials loaded"
    );
    if !config.api_keys_configured() {
        tracing::warn!("Research credentials missing, research requests will be rejected");
    }
    match Provider::from_config(&config) {
        Ok(provider) => {
            tracing::info!(provider = provider.name(), model = provider.model(), "LLM configured")
        }
        Err(e) => tracing::warn!(error = %e, "LLM provider not ready"),
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_secs);

    let state = AppState::from_config(config);
    let tasks = state.tasks.clone();
    let app = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Quarry listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(running = tasks.len(), "Waiting for research jobs to finish");
    let aborted = tasks.shutdown(grace).await;
    tracing::info!(aborted, "Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
