//! ordr-gateway entry point.
//!
//! Loads config, connects the record store, wires middleware and serves.
//! Handlers live in `routes.rs`; shared state in `state.rs`.

use std::sync::Arc;

use anyhow::Context;
use ordr_config::GatewayConfig;
use ordr_gateway::{layers, routes, state::AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if no .env.local / .env exists; production injects env vars directly.
    ordr_config::load_dotenv();

    init_tracing();

    let cfg = GatewayConfig::from_env().context("gateway config")?;
    let store = ordr_store::connect(&cfg.store)
        .await
        .context("record store connect failed")?;
    info!(backend = store.backend_name(), store = ?cfg.store, "record store ready");

    let shared = Arc::new(AppState::new(store));
    info!(service = shared.build.service, version = shared.build.version, "starting");

    let app = routes::build_router(Arc::clone(&shared))
        .layer(layers::trace_layer())
        .layer(layers::cors_layer(cfg.cors_origins.as_deref()));

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("bind {} failed", cfg.bind_addr))?;
    info!("ordr-gateway listening on http://{}", cfg.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
