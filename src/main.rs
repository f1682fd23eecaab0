//! Job scout: binary entrypoint.
//! Loads configuration, builds the pipeline and serves the HTTP API.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ph_job_scout::api::{self, AppState};
use ph_job_scout::metrics::Metrics;
use ph_job_scout::{Pipeline, ScoutConfig};

const ENV_BIND: &str = "SCOUT_BIND";
const DEFAULT_BIND: &str = "0.0.0.0:8000";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ph_job_scout=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = ScoutConfig::load_default().context("loading scout config")?;
    tracing::info!(
        pacing_ms = cfg.pacing_ms,
        timeout_secs = cfg.request_timeout_secs,
        max_results = cfg.max_results,
        demo_fallback = cfg.demo_fallback,
        keywords = cfg.relevance.keywords.len(),
        "config loaded"
    );

    let metrics = Metrics::init(&cfg)?;
    let pipeline = Pipeline::from_config(&cfg)?;
    let state = AppState::new(pipeline, &cfg);
    let app = api::router(state).merge(metrics.router());

    let bind = std::env::var(ENV_BIND).unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid {ENV_BIND} address `{bind}`"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
